use geoconnector_core::db::open_db_in_memory;
use geoconnector_core::model::location::LocationDraft;
use geoconnector_core::model::point::{GeoPoint, PointDraft};
use geoconnector_core::repo::location_repo::SqliteLocationRepository;
use geoconnector_core::repo::point_repo::SqlitePointRepository;
use geoconnector_core::{FilterSet, RecordId, RepoError, Repository, ValidationError};
use rusqlite::Connection;

fn seed_location(conn: &Connection) -> RecordId {
    SqliteLocationRepository::new(conn)
        .create(&LocationDraft::new("site", "Kisumu"))
        .unwrap()
        .id
}

#[test]
fn duplicate_geolocation_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    repo.create(&PointDraft::new(location, "well", GeoPoint::new(10.0, 20.0)))
        .unwrap();
    let err = repo
        .create(&PointDraft::new(location, "tap", GeoPoint::new(10.0, 20.0)))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Duplicate {
            field: "geolocation",
            ..
        }
    ));
    assert_eq!(repo.list(&FilterSet::all()).unwrap().len(), 1);
}

#[test]
fn duplicate_point_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    repo.create(&PointDraft::new(location, "well", GeoPoint::new(1.0, 1.0)).with_name("P-1"))
        .unwrap();
    let err = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(2.0, 2.0)).with_name("P-1"))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Duplicate {
            field: "point_name",
            ..
        }
    ));
}

#[test]
fn unnamed_and_blank_named_points_do_not_collide() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    let unnamed = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(1.0, 1.0)))
        .unwrap();
    let blank = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(2.0, 2.0)).with_name(""))
        .unwrap();

    assert_eq!(unnamed.point_name, None);
    assert_eq!(blank.point_name, None);
}

#[test]
fn update_may_keep_its_own_name_and_geolocation() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    let draft = PointDraft::new(location, "well", GeoPoint::new(5.0, 6.0)).with_name("P-5");
    let point = repo.create(&draft).unwrap();

    let mut changed = draft.clone();
    changed.point_type = "borehole".to_string();
    let updated = repo.update(point.id, &changed).unwrap();

    assert_eq!(updated.point_type, "borehole");
    assert_eq!(updated.geolocation, GeoPoint::new(5.0, 6.0));
}

#[test]
fn update_onto_another_points_geolocation_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    repo.create(&PointDraft::new(location, "well", GeoPoint::new(1.0, 1.0)))
        .unwrap();
    let second = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(2.0, 2.0)))
        .unwrap();

    let err = repo
        .update(
            second.id,
            &PointDraft::new(location, "well", GeoPoint::new(1.0, 1.0)),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { .. }));
    assert_eq!(
        repo.get(second.id).unwrap().unwrap().geolocation,
        GeoPoint::new(2.0, 2.0)
    );
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    let err = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(0.0, 181.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::OutOfRange {
            field: "geolocation.longitude",
            ..
        })
    ));
}

#[test]
fn find_by_geolocation_matches_exact_coordinates() {
    let conn = open_db_in_memory().unwrap();
    let location = seed_location(&conn);
    let repo = SqlitePointRepository::new(&conn);

    let point = repo
        .create(&PointDraft::new(location, "well", GeoPoint::new(-1.2921, 36.8219)))
        .unwrap();

    let found = repo
        .find_by_geolocation(GeoPoint::new(-1.2921, 36.8219))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, point.id);
    assert!(repo
        .find_by_geolocation(GeoPoint::new(0.0, 0.0))
        .unwrap()
        .is_none());
}
