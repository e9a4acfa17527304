//! Generic CRUD handlers, instantiated once per `Resource`.
//!
//! # Invariants
//! - `Authenticated` is the first extractor of every handler.
//! - Ids that do not parse as integers are treated as unknown (404).
//! - Partial updates merge over the stored write model, then validate like
//!   a full update.

use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::resource::{LinkStatusResource, Resource, WireOf};
use crate::state::SharedState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use geoconnector_core::repo::point_repo::SqlitePointRepository;
use geoconnector_core::wire::LinkStatusListItem;
use geoconnector_core::{FilterSet, Graph, LinkStatusService, Record, RecordId, ToWire};
use log::info;
use rusqlite::Connection;
use serde_json::Value;

pub type QueryPairs = Vec<(String, String)>;

pub async fn list<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<WireOf<R>>>, ApiError> {
    let filter = FilterSet::parse(R::filters(), &params)?;
    let records = state.with_conn(|conn| list_wire::<R>(conn, &filter))?;
    Ok(Json(records))
}

pub async fn create<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    JsonBody(draft): JsonBody<R::Draft>,
) -> Result<(StatusCode, Json<WireOf<R>>), ApiError> {
    let wire = state.with_conn(|conn| {
        let record = R::repository(conn).create(&draft)?;
        info!(
            "event=entity_create module=api status=ok entity={} id={}",
            R::PATH,
            record.id()
        );
        Ok(record.to_wire(&Graph::new(conn))?)
    })?;
    Ok((StatusCode::CREATED, Json(wire)))
}

pub async fn retrieve<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
) -> Result<Json<WireOf<R>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let wire = state.with_conn(|conn| {
        let record = R::repository(conn).get(id)?.ok_or_else(ApiError::not_found)?;
        Ok(record.to_wire(&Graph::new(conn))?)
    })?;
    Ok(Json(wire))
}

pub async fn update<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    JsonBody(draft): JsonBody<R::Draft>,
) -> Result<Json<WireOf<R>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let wire = state.with_conn(|conn| write_update::<R>(conn, id, &draft))?;
    Ok(Json(wire))
}

pub async fn partial_update<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    JsonBody(patch): JsonBody<Value>,
) -> Result<Json<WireOf<R>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Value::Object(patch) = patch else {
        return Err(ApiError::BadRequest(
            "Expected a JSON object of fields to update.".to_string(),
        ));
    };

    let wire = state.with_conn(|conn| {
        let current = R::repository(conn)
            .get(id)?
            .ok_or_else(ApiError::not_found)?;
        let mut merged = serde_json::to_value(current.to_draft())
            .map_err(|err| ApiError::Internal(format!("failed to encode write model: {err}")))?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(patch);
        }
        let draft: R::Draft = serde_json::from_value(merged)
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        write_update::<R>(conn, id, &draft)
    })?;
    Ok(Json(wire))
}

pub async fn destroy<R: Resource>(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state.with_conn(|conn| {
        R::repository(conn).delete(id)?;
        info!(
            "event=entity_delete module=api status=ok entity={} id={}",
            R::PATH,
            id
        );
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Status list: the standard filtered list with linked points resolved to
/// coordinates.
pub async fn list_link_statuses(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<LinkStatusListItem>>, ApiError> {
    let filter = FilterSet::parse(LinkStatusResource::filters(), &params)?;
    let items = state.with_conn(|conn| {
        let statuses = list_wire::<LinkStatusResource>(conn, &filter)?;
        let service = LinkStatusService::new(SqlitePointRepository::new(conn));
        Ok(service.attach_coordinates(statuses)?)
    })?;
    Ok(Json(items))
}

pub(crate) fn list_wire<R: Resource>(
    conn: &Connection,
    filter: &FilterSet,
) -> Result<Vec<WireOf<R>>, ApiError> {
    let graph = Graph::new(conn);
    R::repository(conn)
        .list(filter)?
        .iter()
        .map(|record| record.to_wire(&graph).map_err(ApiError::from))
        .collect()
}

fn write_update<R: Resource>(
    conn: &Connection,
    id: RecordId,
    draft: &R::Draft,
) -> Result<WireOf<R>, ApiError> {
    let record = R::repository(conn).update(id, draft)?;
    info!(
        "event=entity_update module=api status=ok entity={} id={}",
        R::PATH,
        id
    );
    Ok(record.to_wire(&Graph::new(conn))?)
}

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>().map_err(|_| ApiError::not_found())
}
