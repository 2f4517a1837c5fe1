//! Integration tests for the repository layer.
//!
//! - Upserts by id replace rather than duplicate
//! - Superseded labels are never authoritative
//! - Cluster membership is replaced as a set
//! - Current laser extrinsics follow `created_at`
//! - Unique constraints surface as database errors

use chrono::{Duration, TimeZone, Utc};
use fishsense_db::models::camera::{SaveCamera, SaveCameraIntrinsics};
use fishsense_db::models::data_source::DataSource;
use fishsense_db::models::dive::{CreateLaserExtrinsics, SaveDive};
use fishsense_db::models::dive_frame_cluster::SaveDiveFrameCluster;
use fishsense_db::models::dive_slate::SaveDiveSlate;
use fishsense_db::models::fish::{SaveFish, SaveMeasurement, SaveSpecies};
use fishsense_db::models::image::SaveImage;
use fishsense_db::models::label::{SaveLaserLabel, SaveSpeciesLabel};
use fishsense_db::models::user::SaveUser;
use fishsense_db::repositories::{
    CameraIntrinsicsRepo, CameraRepo, DiveFrameClusterRepo, DiveRepo, DiveSlateRepo, FishRepo,
    ImageRepo, LaserExtrinsicsRepo, LaserLabelRepo, MeasurementRepo, SpeciesLabelRepo,
    SpeciesRepo, UserRepo,
};
use fishsense_db::{PoolSettings, Session, SessionManager};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn session(pool: PgPool) -> Session {
    SessionManager::new(pool, &PoolSettings::default())
        .acquire()
        .await
        .unwrap()
}

fn new_user(email: &str, first_name: &str) -> SaveUser {
    SaveUser {
        label_studio_id: None,
        email: Some(email.to_string()),
        first_name: Some(first_name.to_string()),
        last_name: None,
        last_activity: None,
        date_joined: None,
    }
}

fn new_image(dive_id: i64, checksum: &str) -> SaveImage {
    SaveImage {
        path: format!("/data/{checksum}.ORF"),
        taken_datetime: None,
        checksum: checksum.to_string(),
        is_canonical: false,
        dive_id: Some(dive_id),
        camera_id: None,
    }
}

fn new_laser_label(superseded: bool, minutes: i64) -> SaveLaserLabel {
    SaveLaserLabel {
        id: None,
        label_studio_task_id: None,
        label_studio_project_id: None,
        x: Some(10.0),
        y: Some(20.0),
        label: Some("laser".to_string()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)),
        superseded,
        completed: true,
        label_studio_json: Some(serde_json::json!({"task": minutes})),
        user_id: None,
    }
}

/// Camera 1, dive 1 and a slate-less dive path.
async fn seed_dive(db: &mut Session) -> (i64, i64) {
    let camera_id = CameraRepo::upsert(
        db,
        1,
        &SaveCamera {
            serial_number: "BNBC0001".to_string(),
            name: "FSL-01".to_string(),
        },
    )
    .await
    .unwrap();
    let dive_id = DiveRepo::upsert(
        db,
        1,
        &SaveDive {
            name: "Reef 1".to_string(),
            path: "/dives/reef-1".to_string(),
            dive_datetime: None,
            priority: Some("HIGH".to_string()),
            flip_dive_slate: None,
            camera_id: Some(camera_id),
            dive_slate_id: None,
        },
    )
    .await
    .unwrap();
    (camera_id, dive_id)
}

async fn seed_image(db: &mut Session, dive_id: i64, id: i64, checksum: &str) -> i64 {
    ImageRepo::upsert(db, id, &new_image(dive_id, checksum))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Upserts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_user_upsert_twice_keeps_one_row(pool: PgPool) {
    let mut db = session(pool).await;

    UserRepo::upsert(&mut db, 5, &new_user("a@example.org", "Ann"))
        .await
        .unwrap();
    UserRepo::upsert(&mut db, 5, &new_user("b@example.org", "Bea"))
        .await
        .unwrap();

    let users = UserRepo::list(&mut db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 5);
    assert_eq!(users[0].email.as_deref(), Some("b@example.org"));
    assert_eq!(users[0].first_name.as_deref(), Some("Bea"));
}

#[sqlx::test(migrations = false)]
async fn test_explicit_ids_advance_the_sequence(pool: PgPool) {
    let mut db = session(pool).await;

    UserRepo::upsert(&mut db, 41, &new_user("a@example.org", "Ann"))
        .await
        .unwrap();
    let next = UserRepo::create(&mut db, &new_user("b@example.org", "Bea"))
        .await
        .unwrap();
    assert_eq!(next, 42);
}

#[sqlx::test(migrations = false)]
async fn test_non_positive_explicit_ids_are_accepted(pool: PgPool) {
    let mut db = session(pool).await;

    UserRepo::upsert(&mut db, 0, &new_user("zero@example.org", "Zed"))
        .await
        .unwrap();
    UserRepo::upsert(&mut db, -3, &new_user("neg@example.org", "Neg"))
        .await
        .unwrap();
    assert!(UserRepo::find_by_id(&mut db, -3).await.unwrap().is_some());

    let next = UserRepo::create(&mut db, &new_user("c@example.org", "Cy"))
        .await
        .unwrap();
    assert_eq!(next, 1);
}

#[sqlx::test(migrations = false)]
async fn test_user_secondary_lookups(pool: PgPool) {
    let mut db = session(pool).await;
    let mut input = new_user("diver@example.org", "Dee");
    input.label_studio_id = Some(77);
    let id = UserRepo::create(&mut db, &input).await.unwrap();

    let by_email = UserRepo::find_by_email(&mut db, "diver@example.org")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, id);
    let by_ls = UserRepo::find_by_label_studio_id(&mut db, 77)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_ls.id, id);
    assert!(UserRepo::find_by_id(&mut db, id + 100).await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
async fn test_duplicate_checksum_rejected(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    seed_image(&mut db, dive_id, 1, "abc").await;

    let err = ImageRepo::upsert(&mut db, 2, &new_image(dive_id, "abc"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_image_checksum"));

    // The failed transaction left nothing behind.
    assert!(ImageRepo::find_by_id(&mut db, 2).await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
async fn test_dive_slate_replace_keeps_created_at(pool: PgPool) {
    let mut db = session(pool).await;
    let mut input = SaveDiveSlate {
        name: "Slate A".to_string(),
        dpi: Some(300),
        path: "/slates/a.pdf".to_string(),
        created_at: None,
        reference_points: Some(vec![(1.0, 2.0), (3.0, 4.0)]),
    };
    DiveSlateRepo::upsert(&mut db, 3, &input).await.unwrap();
    let first = DiveSlateRepo::find_by_id(&mut db, 3).await.unwrap().unwrap();
    assert!(first.created_at.is_some());

    input.dpi = Some(600);
    DiveSlateRepo::upsert(&mut db, 3, &input).await.unwrap();
    let second = DiveSlateRepo::find_by_id(&mut db, 3).await.unwrap().unwrap();
    assert_eq!(second.dpi, Some(600));
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.reference_points.unwrap().0, vec![(1.0, 2.0), (3.0, 4.0)]);
}

#[sqlx::test(migrations = false)]
async fn test_intrinsics_current_is_latest(pool: PgPool) {
    let mut db = session(pool).await;
    let (camera_id, _) = seed_dive(&mut db).await;
    assert!(CameraIntrinsicsRepo::find_current(&mut db, camera_id)
        .await
        .unwrap()
        .is_none());

    let identity = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
    for fx in [1.0, 2.0] {
        let mut matrix = identity.clone();
        matrix[0][0] = fx;
        CameraIntrinsicsRepo::save(
            &mut db,
            camera_id,
            &SaveCameraIntrinsics {
                id: None,
                camera_matrix: matrix,
                distortion_coefficients: vec![0.1, 0.2, 0.0, 0.0, 0.0],
            },
        )
        .await
        .unwrap();
    }

    let current = CameraIntrinsicsRepo::find_current(&mut db, camera_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.camera_matrix.0[0][0], 2.0);
    assert_eq!(current.distortion_coefficients.0.len(), 5);
}

#[sqlx::test(migrations = false)]
async fn test_fish_species_and_measurements(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    let image_id = seed_image(&mut db, dive_id, 1, "img-1").await;

    let species_id = SpeciesRepo::save(
        &mut db,
        &SaveSpecies {
            id: None,
            scientific_name: Some("Caranx ignobilis".to_string()),
            common_name: Some("Giant trevally".to_string()),
        },
    )
    .await
    .unwrap();
    let found = SpeciesRepo::find_by_scientific_name(&mut db, "Caranx ignobilis")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, species_id);

    let fish_id = FishRepo::save(&mut db, &SaveFish { id: None, species_id: Some(species_id) })
        .await
        .unwrap();
    // Merging onto an existing id updates in place.
    FishRepo::save(&mut db, &SaveFish { id: Some(fish_id), species_id: None })
        .await
        .unwrap();
    let fish = FishRepo::find_by_id(&mut db, fish_id).await.unwrap().unwrap();
    assert_eq!(fish.species_id, None);
    assert_eq!(FishRepo::list(&mut db).await.unwrap().len(), 1);

    MeasurementRepo::save(
        &mut db,
        fish_id,
        &SaveMeasurement { id: None, length_m: Some(0.42), image_id: Some(image_id) },
    )
    .await
    .unwrap();
    let measurements = MeasurementRepo::list_by_fish(&mut db, fish_id).await.unwrap();
    assert_eq!(measurements.len(), 1);
    assert_eq!(measurements[0].length_m, Some(0.42));
}

// ---------------------------------------------------------------------------
// Laser extrinsics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_current_laser_extrinsics_has_latest_created_at(pool: PgPool) {
    let mut db = session(pool).await;
    let (camera_id, dive_id) = seed_dive(&mut db).await;
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    // Inserted out of order: the later calibration goes in first.
    for (hours, x) in [(5, 0.5), (1, 0.1)] {
        LaserExtrinsicsRepo::create(
            &mut db,
            dive_id,
            &CreateLaserExtrinsics {
                laser_position: vec![x, 0.0, 0.0],
                laser_axis: vec![0.0, 0.0, 1.0],
                created_at: Some(base + Duration::hours(hours)),
                camera_id,
            },
        )
        .await
        .unwrap();
    }

    let current = LaserExtrinsicsRepo::find_current_for_dive(&mut db, dive_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.created_at, base + Duration::hours(5));
    assert_eq!(current.laser_position.0, vec![0.5, 0.0, 0.0]);
    assert!(LaserExtrinsicsRepo::find_current_for_dive(&mut db, dive_id + 1)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Clusters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_cluster_update_replaces_membership(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    for (id, checksum) in [(1, "a"), (2, "b"), (3, "c")] {
        seed_image(&mut db, dive_id, id, checksum).await;
    }

    let mut input = SaveDiveFrameCluster {
        data_source: DataSource::Prediction,
        updated_at: None,
        fish_id: None,
        image_ids: vec![2, 1, 2],
    };
    let cluster_id = DiveFrameClusterRepo::create(&mut db, dive_id, &input)
        .await
        .unwrap();
    let created = DiveFrameClusterRepo::find_by_id(&mut db, cluster_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.image_ids, vec![1, 2]);

    input.image_ids = vec![3, 2];
    input.data_source = DataSource::LabelStudio;
    DiveFrameClusterRepo::upsert(&mut db, dive_id, cluster_id, &input)
        .await
        .unwrap();
    let replaced = DiveFrameClusterRepo::find_by_id(&mut db, cluster_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.image_ids, vec![2, 3]);
    assert_eq!(replaced.data_source, DataSource::LabelStudio);

    let mapping_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM dive_frame_cluster_images WHERE dive_frame_cluster_id = $1",
    )
    .bind(cluster_id)
    .fetch_one(&mut *db)
    .await
    .unwrap();
    assert_eq!(mapping_rows, 2);
}

#[sqlx::test(migrations = false)]
async fn test_cluster_listing_filters_by_data_source(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    seed_image(&mut db, dive_id, 1, "a").await;

    for (source, ids) in [
        (DataSource::Prediction, vec![1]),
        (DataSource::LabelStudio, vec![]),
    ] {
        DiveFrameClusterRepo::create(
            &mut db,
            dive_id,
            &SaveDiveFrameCluster {
                data_source: source,
                updated_at: None,
                fish_id: None,
                image_ids: ids,
            },
        )
        .await
        .unwrap();
    }

    let all = DiveFrameClusterRepo::list_by_dive(&mut db, dive_id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let labelled = DiveFrameClusterRepo::list_by_dive(&mut db, dive_id, Some(DataSource::LabelStudio))
        .await
        .unwrap();
    assert_eq!(labelled.len(), 1);
    assert!(labelled[0].image_ids.is_empty());

    assert!(DiveFrameClusterRepo::list_by_dive(&mut db, dive_id + 1, None)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_missing_image_ids_are_reported(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    seed_image(&mut db, dive_id, 1, "a").await;

    let missing = ImageRepo::missing_ids(&mut db, &[1, 9, 4, 9]).await.unwrap();
    assert_eq!(missing, vec![4, 9]);
    assert!(ImageRepo::missing_ids(&mut db, &[]).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_superseded_laser_label_is_not_current(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    let image_id = seed_image(&mut db, dive_id, 1, "a").await;

    let mut active = new_laser_label(false, 0);
    active.label_studio_project_id = Some(1);
    let active_id = LaserLabelRepo::save(&mut db, image_id, &active).await.unwrap();

    // Newer, but superseded.
    let mut old = new_laser_label(true, 30);
    old.label_studio_project_id = Some(2);
    LaserLabelRepo::save(&mut db, image_id, &old).await.unwrap();

    let current = LaserLabelRepo::find_current_by_image(&mut db, image_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, active_id);
    assert!(!current.superseded);
    assert_eq!(current.label_studio_json, Some(serde_json::json!({"task": 0})));

    let for_dive = LaserLabelRepo::list_by_dive(&mut db, dive_id).await.unwrap();
    assert_eq!(for_dive.len(), 1);
    assert_eq!(for_dive[0].id, active_id);
}

#[sqlx::test(migrations = false)]
async fn test_laser_label_upsert_by_id_and_task_lookup(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    let image_id = seed_image(&mut db, dive_id, 1, "a").await;

    let mut input = new_laser_label(false, 0);
    input.id = Some(10);
    input.label_studio_task_id = Some(555);
    LaserLabelRepo::save(&mut db, image_id, &input).await.unwrap();
    input.x = Some(99.0);
    LaserLabelRepo::save(&mut db, image_id, &input).await.unwrap();

    let found = LaserLabelRepo::find_by_task_id(&mut db, 555)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, 10);
    assert_eq!(found.x, Some(99.0));

    // A second label for the same task violates the task constraint.
    input.id = None;
    let err = LaserLabelRepo::save(&mut db, image_id, &input)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_laser_task")
    );
}

#[sqlx::test(migrations = false)]
async fn test_newest_species_label_wins(pool: PgPool) {
    let mut db = session(pool).await;
    let (_, dive_id) = seed_dive(&mut db).await;
    let image_id = seed_image(&mut db, dive_id, 1, "a").await;
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    let mut newest = None;
    for (minutes, grouping) in [(10, "school"), (0, "single")] {
        let id = SpeciesLabelRepo::save(
            &mut db,
            image_id,
            &SaveSpeciesLabel {
                id: None,
                label_studio_task_id: None,
                label_studio_project_id: None,
                image_url: None,
                updated_at: Some(base + Duration::minutes(minutes)),
                completed: true,
                grouping: Some(grouping.to_string()),
                top_three_photos_of_group: None,
                slate_upside_down: None,
                laser_x: None,
                laser_y: None,
                laser_label: None,
                content_of_image: None,
                fish_measurable_category: None,
                fish_angle_category: None,
                fish_curved_category: None,
                label_studio_json: None,
                user_id: None,
            },
        )
        .await
        .unwrap();
        newest.get_or_insert(id);
    }

    let current = SpeciesLabelRepo::find_current_by_image(&mut db, image_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(current.id), newest);
    assert_eq!(current.grouping.as_deref(), Some("school"));
    assert_eq!(SpeciesLabelRepo::list_by_dive(&mut db, dive_id).await.unwrap().len(), 2);
}
