use geoconnector_core::db::open_db_in_memory;
use geoconnector_core::model::link_status::{
    LinkStatus, PointResourceLinkStatusDraft, ResourceRef,
};
use geoconnector_core::model::location::LocationDraft;
use geoconnector_core::model::point::{GeoPoint, PointDraft};
use geoconnector_core::model::resource_link::ResourceLinkDraft;
use geoconnector_core::repo::link_status_repo::{
    SqliteLinkStatusRepository, LINK_STATUS_FILTERS,
};
use geoconnector_core::repo::location_repo::SqliteLocationRepository;
use geoconnector_core::repo::point_repo::SqlitePointRepository;
use geoconnector_core::repo::resource_link_repo::SqliteResourceLinkRepository;
use geoconnector_core::wire::Coordinates;
use geoconnector_core::{
    FilterSet, Graph, LinkStatusService, RecordId, RepoError, Repository, ToWire, ValidationError,
};
use rusqlite::Connection;

struct Seed {
    points: Vec<RecordId>,
    resources: Vec<RecordId>,
}

fn seed(conn: &Connection) -> Seed {
    let location = SqliteLocationRepository::new(conn)
        .create(&LocationDraft::new("site", "Garissa"))
        .unwrap();
    let point_repo = SqlitePointRepository::new(conn);
    let points = [(10.0, 20.0), (11.0, 21.0), (12.0, 22.0)]
        .into_iter()
        .map(|(lat, lon)| {
            point_repo
                .create(&PointDraft::new(location.id, "well", GeoPoint::new(lat, lon)))
                .unwrap()
                .id
        })
        .collect();
    let resource_repo = SqliteResourceLinkRepository::new(conn);
    let resources = ["water", "power"]
        .into_iter()
        .map(|name| resource_repo.create(&ResourceLinkDraft::new(name)).unwrap().id)
        .collect();
    Seed { points, resources }
}

#[test]
fn create_stores_deduplicated_ordered_link_sets() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let status = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[1], seed.points[0], seed.points[1]],
            vec![seed.resources[0]],
        ))
        .unwrap();

    assert_eq!(status.status, LinkStatus::Incomplete);
    assert_eq!(status.linked_points, vec![seed.points[0], seed.points[1]]);
    assert_eq!(status.linked_resources, vec![seed.resources[0]]);
}

#[test]
fn empty_link_lists_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let err = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![],
            vec![seed.resources[0]],
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyList {
            field: "linked_points"
        })
    ));
}

#[test]
fn missing_linked_rows_are_rejected_without_partial_writes() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let err = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0]],
            vec![seed.resources[0], 404],
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingReference {
            field: "linked_resources",
            id: 404
        }
    ));
    assert!(repo.list(&FilterSet::all()).unwrap().is_empty());
}

#[test]
fn update_replaces_links_and_status() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let status = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0]],
            vec![seed.resources[0]],
        ))
        .unwrap();
    let updated = repo
        .update(
            status.id,
            &PointResourceLinkStatusDraft::new(
                vec![seed.points[2]],
                vec![seed.resources[0], seed.resources[1]],
            )
            .with_status(LinkStatus::Completed),
        )
        .unwrap();

    assert_eq!(updated.status, LinkStatus::Completed);
    assert_eq!(updated.linked_points, vec![seed.points[2]]);
    assert_eq!(updated.linked_resources, seed.resources);
}

#[test]
fn deleting_a_point_removes_it_from_link_sets() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let status = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0], seed.points[1]],
            vec![seed.resources[0]],
        ))
        .unwrap();
    SqlitePointRepository::new(&conn)
        .delete(seed.points[1])
        .unwrap();

    let reloaded = repo.get(status.id).unwrap().unwrap();
    assert_eq!(reloaded.linked_points, vec![seed.points[0]]);
}

#[test]
fn deleting_a_resource_link_removes_it_from_link_sets() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let status = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0]],
            vec![seed.resources[0], seed.resources[1]],
        ))
        .unwrap();
    SqliteResourceLinkRepository::new(&conn)
        .delete(seed.resources[0])
        .unwrap();

    let reloaded = repo.get(status.id).unwrap().unwrap();
    assert_eq!(reloaded.linked_resources, vec![seed.resources[1]]);
    assert_eq!(reloaded.linked_points, vec![seed.points[0]]);
}

#[test]
fn resource_links_may_be_given_by_name() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let mut draft = PointResourceLinkStatusDraft::new(vec![seed.points[0]], vec![]);
    draft.linked_resources = vec![
        ResourceRef::Name("power".to_string()),
        ResourceRef::Id(seed.resources[1]),
        ResourceRef::Name("water".to_string()),
    ];
    let status = repo.create(&draft).unwrap();

    assert_eq!(status.linked_resources, seed.resources);
}

#[test]
fn unknown_or_shared_resource_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);
    let mut draft = PointResourceLinkStatusDraft::new(vec![seed.points[0]], vec![]);

    draft.linked_resources = vec![ResourceRef::Name("gas".to_string())];
    let err = repo.create(&draft).unwrap_err();
    assert!(matches!(
        err,
        RepoError::UnknownName {
            field: "linked_resources",
            ..
        }
    ));

    SqliteResourceLinkRepository::new(&conn)
        .create(&ResourceLinkDraft::new("water"))
        .unwrap();
    draft.linked_resources = vec![ResourceRef::Name("water".to_string())];
    let err = repo.create(&draft).unwrap_err();
    assert!(matches!(
        err,
        RepoError::AmbiguousName {
            field: "linked_resources",
            ..
        }
    ));
    assert!(repo.list(&FilterSet::all()).unwrap().is_empty());
}

#[test]
fn linked_points_filter_matches_any_given_id() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    let first = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0]],
            vec![seed.resources[0]],
        ))
        .unwrap();
    let second = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[1]],
            vec![seed.resources[1]],
        ))
        .unwrap();
    repo.create(&PointResourceLinkStatusDraft::new(
        vec![seed.points[2]],
        vec![seed.resources[1]],
    ))
    .unwrap();

    let p0 = seed.points[0].to_string();
    let p1 = seed.points[1].to_string();
    let filter = FilterSet::parse(
        LINK_STATUS_FILTERS,
        &[("linked_points", p0.as_str()), ("linked_points", p1.as_str())],
    )
    .unwrap();
    let ids: Vec<RecordId> = repo
        .list(&filter)
        .unwrap()
        .into_iter()
        .map(|status| status.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn status_filter_matches_enumerated_value() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);

    repo.create(&PointResourceLinkStatusDraft::new(
        vec![seed.points[0]],
        vec![seed.resources[0]],
    ))
    .unwrap();
    let done = repo
        .create(
            &PointResourceLinkStatusDraft::new(vec![seed.points[1]], vec![seed.resources[0]])
                .with_status(LinkStatus::Completed),
        )
        .unwrap();

    let filter = FilterSet::parse(LINK_STATUS_FILTERS, &[("status", "Completed")]).unwrap();
    let rows = repo.list(&filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, done.id);

    assert!(FilterSet::parse(LINK_STATUS_FILTERS, &[("status", "Done")]).is_err());
}

#[test]
fn status_list_drops_points_that_no_longer_exist() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let repo = SqliteLinkStatusRepository::new(&conn);
    let graph = Graph::new(&conn);

    let status = repo
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[0], seed.points[1]],
            vec![seed.resources[0]],
        ))
        .unwrap();
    let mut wire = status.to_wire(&graph).unwrap();
    // The point vanishes after the record was serialized.
    SqlitePointRepository::new(&conn)
        .delete(seed.points[1])
        .unwrap();
    wire.linked_points.push(999);

    let service = LinkStatusService::new(SqlitePointRepository::new(&conn));
    let items = service.attach_coordinates(vec![wire]).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, status.id);
    assert_eq!(
        items[0].linked_points,
        vec![Coordinates {
            latitude: 10.0,
            longitude: 20.0
        }]
    );
    assert_eq!(items[0].linked_resources, vec!["water".to_string()]);
}

#[test]
fn status_list_keeps_records_with_zero_resolved_points() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let graph = Graph::new(&conn);

    let status = SqliteLinkStatusRepository::new(&conn)
        .create(&PointResourceLinkStatusDraft::new(
            vec![seed.points[2]],
            vec![seed.resources[1]],
        ))
        .unwrap();
    let mut wire = status.to_wire(&graph).unwrap();
    wire.linked_points = vec![1000, 1001];

    let items = LinkStatusService::new(SqlitePointRepository::new(&conn))
        .attach_coordinates(vec![wire])
        .unwrap();

    assert_eq!(items.len(), 1);
    assert!(items[0].linked_points.is_empty());
}
