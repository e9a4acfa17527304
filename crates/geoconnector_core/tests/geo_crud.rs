use chrono::Utc;
use geoconnector_core::db::open_db_in_memory;
use geoconnector_core::model::element::ElementDraft;
use geoconnector_core::model::location::LocationDraft;
use geoconnector_core::model::point::{GeoPoint, PointDraft};
use geoconnector_core::model::point_element::PointElementDraft;
use geoconnector_core::model::resource_link::ResourceLinkDraft;
use geoconnector_core::repo::element_repo::SqliteElementRepository;
use geoconnector_core::repo::location_repo::SqliteLocationRepository;
use geoconnector_core::repo::point_element_repo::SqlitePointElementRepository;
use geoconnector_core::repo::point_repo::SqlitePointRepository;
use geoconnector_core::repo::resource_link_repo::SqliteResourceLinkRepository;
use geoconnector_core::{FilterSet, RepoError, Repository, ValidationError};
use std::thread;
use std::time::Duration;

#[test]
fn location_create_get_update_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocationRepository::new(&conn);

    let created = repo
        .create(&LocationDraft::new("city", "Nairobi"))
        .unwrap();
    assert!(created.meta.active);
    assert_eq!(repo.get(created.id).unwrap().unwrap(), created);

    let mut draft = LocationDraft::new("county", "Nairobi County");
    draft.active = false;
    thread::sleep(Duration::from_millis(5));
    let before_update = Utc::now();
    let updated = repo.update(created.id, &draft).unwrap();
    assert_eq!(updated.kind, "county");
    assert_eq!(updated.location_name, "Nairobi County");
    assert!(!updated.meta.active);
    assert_eq!(updated.meta.created, created.meta.created);
    assert!(updated.meta.modified > created.meta.modified);
    assert!(updated.meta.modified >= before_update);

    repo.delete(created.id).unwrap();
    assert!(repo.get(created.id).unwrap().is_none());
}

#[test]
fn unknown_ids_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteElementRepository::new(&conn);

    assert!(repo.get(42).unwrap().is_none());
    assert!(matches!(
        repo.update(42, &ElementDraft::new("valve")),
        Err(RepoError::NotFound { id: 42, .. })
    ));
    assert!(matches!(
        repo.delete(42),
        Err(RepoError::NotFound { id: 42, .. })
    ));
}

#[test]
fn blank_and_oversized_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteResourceLinkRepository::new(&conn);

    assert!(matches!(
        repo.create(&ResourceLinkDraft::new("  ")),
        Err(RepoError::Validation(ValidationError::Blank { .. }))
    ));
    assert!(matches!(
        repo.create(&ResourceLinkDraft::new("x".repeat(251))),
        Err(RepoError::Validation(ValidationError::TooLong { .. }))
    ));
    assert!(repo.list(&FilterSet::all()).unwrap().is_empty());
}

#[test]
fn list_returns_rows_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteElementRepository::new(&conn);

    for name in ["pump", "tank", "meter"] {
        repo.create(&ElementDraft::new(name)).unwrap();
    }

    let names: Vec<String> = repo
        .list(&FilterSet::all())
        .unwrap()
        .into_iter()
        .map(|element| element.element_name)
        .collect();
    assert_eq!(names, vec!["pump", "tank", "meter"]);
}

#[test]
fn point_requires_existing_location() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePointRepository::new(&conn);

    let err = repo
        .create(&PointDraft::new(7, "well", GeoPoint::new(1.0, 2.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingReference {
            field: "location",
            id: 7
        }
    ));
}

#[test]
fn point_element_requires_existing_point_and_element() {
    let conn = open_db_in_memory().unwrap();
    let locations = SqliteLocationRepository::new(&conn);
    let points = SqlitePointRepository::new(&conn);
    let point_elements = SqlitePointElementRepository::new(&conn);

    let location = locations.create(&LocationDraft::new("site", "A")).unwrap();
    let point = points
        .create(&PointDraft::new(location.id, "well", GeoPoint::new(1.0, 2.0)))
        .unwrap();

    let err = point_elements
        .create(&PointElementDraft::new(point.id, 99))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingReference {
            field: "element",
            id: 99
        }
    ));
}

#[test]
fn deleting_location_cascades_to_points_and_point_elements() {
    let conn = open_db_in_memory().unwrap();
    let locations = SqliteLocationRepository::new(&conn);
    let elements = SqliteElementRepository::new(&conn);
    let points = SqlitePointRepository::new(&conn);
    let point_elements = SqlitePointElementRepository::new(&conn);

    let doomed = locations.create(&LocationDraft::new("site", "A")).unwrap();
    let kept = locations.create(&LocationDraft::new("site", "B")).unwrap();
    let element = elements.create(&ElementDraft::new("pump")).unwrap();

    let doomed_point = points
        .create(&PointDraft::new(doomed.id, "well", GeoPoint::new(1.0, 2.0)))
        .unwrap();
    let kept_point = points
        .create(&PointDraft::new(kept.id, "well", GeoPoint::new(3.0, 4.0)))
        .unwrap();
    let doomed_link = point_elements
        .create(&PointElementDraft::new(doomed_point.id, element.id))
        .unwrap();
    let kept_link = point_elements
        .create(&PointElementDraft::new(kept_point.id, element.id))
        .unwrap();

    locations.delete(doomed.id).unwrap();

    assert!(points.get(doomed_point.id).unwrap().is_none());
    assert!(point_elements.get(doomed_link.id).unwrap().is_none());
    assert!(points.get(kept_point.id).unwrap().is_some());
    assert!(point_elements.get(kept_link.id).unwrap().is_some());
    assert!(elements.get(element.id).unwrap().is_some());
}

#[test]
fn deleting_element_cascades_to_point_elements() {
    let conn = open_db_in_memory().unwrap();
    let locations = SqliteLocationRepository::new(&conn);
    let elements = SqliteElementRepository::new(&conn);
    let points = SqlitePointRepository::new(&conn);
    let point_elements = SqlitePointElementRepository::new(&conn);

    let location = locations.create(&LocationDraft::new("site", "A")).unwrap();
    let element = elements.create(&ElementDraft::new("pump")).unwrap();
    let point = points
        .create(&PointDraft::new(location.id, "well", GeoPoint::new(1.0, 2.0)))
        .unwrap();
    let link = point_elements
        .create(&PointElementDraft::new(point.id, element.id))
        .unwrap();

    elements.delete(element.id).unwrap();

    assert!(point_elements.get(link.id).unwrap().is_none());
    assert!(points.get(point.id).unwrap().is_some());
}
