//! Explicit resource registry and router assembly.
//!
//! # Responsibility
//! - Record every entity collection mounted under `API_PREFIX`.
//! - Build the axum router: resource routes, API root, token exchange and
//!   request logging.

use crate::auth::obtain_token;
use crate::handlers::{
    create, destroy, list, list_link_statuses, partial_update, retrieve, update,
};
use crate::resource::{
    ElementResource, LinkStatusResource, LocationResource, PointElementResource,
    PointResource, ResourceLinkResource, Resource,
};
use crate::state::SharedState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use log::info;
use std::collections::BTreeMap;
use std::time::Instant;

pub const API_PREFIX: &str = "/api/v1/geoconnector";
pub const TOKEN_PATH: &str = "/token/";

/// One mounted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredResource {
    pub name: &'static str,
    pub collection_path: String,
    pub item_path: String,
}

/// Entity-to-handler mappings, collected before the router is built.
pub struct Registry {
    entries: Vec<RegisteredResource>,
    router: Router<SharedState>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            router: Router::new(),
        }
    }

    /// Mounts `R` with the generic list handler.
    pub fn register<R: Resource>(self) -> Self {
        self.mount::<R>(get(list::<R>))
    }

    /// Mounts `R` with a custom collection `GET` handler.
    pub fn mount<R: Resource>(mut self, collection_get: MethodRouter<SharedState>) -> Self {
        let entry = RegisteredResource {
            name: R::PATH,
            collection_path: format!("{API_PREFIX}/{}/", R::PATH),
            item_path: format!("{API_PREFIX}/{}/:id/", R::PATH),
        };

        self.router = self
            .router
            .route(&entry.collection_path, collection_get.post(create::<R>))
            .route(
                &entry.item_path,
                get(retrieve::<R>)
                    .put(update::<R>)
                    .patch(partial_update::<R>)
                    .delete(destroy::<R>),
            );
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[RegisteredResource] {
        &self.entries
    }

    pub fn into_router(self, state: SharedState) -> Router {
        let index: BTreeMap<&'static str, String> = self
            .entries
            .iter()
            .map(|entry| (entry.name, entry.collection_path.clone()))
            .collect();

        self.router
            .route(
                &format!("{API_PREFIX}/"),
                get(move || {
                    let index = index.clone();
                    async move { Json(index) }
                }),
            )
            .route(TOKEN_PATH, post(obtain_token))
            .layer(middleware::from_fn(log_requests))
            .with_state(state)
    }
}

/// Registry with every geoconnector collection.
pub fn default_registry() -> Registry {
    Registry::new()
        .register::<LocationResource>()
        .register::<ElementResource>()
        .register::<PointResource>()
        .register::<PointElementResource>()
        .register::<ResourceLinkResource>()
        .mount::<LinkStatusResource>(get(list_link_statuses))
}

pub fn build_router(state: SharedState) -> Router {
    default_registry().into_router(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}

#[cfg(test)]
mod tests {
    use super::default_registry;

    #[test]
    fn default_registry_mounts_every_collection_once() {
        let registry = default_registry();
        let names: Vec<&str> = registry.entries().iter().map(|entry| entry.name).collect();
        assert_eq!(
            names,
            vec![
                "locations",
                "elements",
                "points",
                "pointelements",
                "resourcelinks",
                "pointresourcelinkstatuses"
            ]
        );
        assert_eq!(
            registry.entries()[2].item_path,
            "/api/v1/geoconnector/points/:id/"
        );
    }
}
