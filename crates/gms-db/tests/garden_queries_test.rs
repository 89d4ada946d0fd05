//! Integration tests for the `gardens` query functions.

use gms_db::models::GardenFields;
use gms_db::queries::gardens;
use gms_test_utils::{create_test_db, drop_test_db};

fn fields(name: &str, location: &str, description: Option<&str>) -> GardenFields {
    GardenFields {
        name: name.to_string(),
        location: location.to_string(),
        description: description.map(str::to_string),
    }
}

#[tokio::test]
async fn insert_assigns_id_and_date_created() {
    let (pool, db_name) = create_test_db().await;

    let garden = gardens::insert_garden(&pool, &fields("Back Yard", "Home", Some("veg patch")))
        .await
        .expect("insert_garden should succeed");

    assert!(garden.garden_id > 0);
    assert_eq!(garden.name, "Back Yard");
    assert_eq!(garden.location, "Home");
    assert_eq!(garden.description.as_deref(), Some("veg patch"));

    let fetched = gardens::get_garden(&pool, garden.garden_id)
        .await
        .unwrap()
        .expect("garden should exist");
    assert_eq!(fetched, garden);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_missing_garden_returns_none() {
    let (pool, db_name) = create_test_db().await;

    let missing = gardens::get_garden(&pool, 4242).await.unwrap();
    assert!(missing.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_returns_gardens_in_id_order() {
    let (pool, db_name) = create_test_db().await;

    let a = gardens::insert_garden(&pool, &fields("A", "North", None))
        .await
        .unwrap();
    let b = gardens::insert_garden(&pool, &fields("B", "South", None))
        .await
        .unwrap();

    let all = gardens::list_gardens(&pool).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|g| g.garden_id).collect();
    assert_eq!(ids, vec![a.garden_id, b.garden_id]);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_keeps_id_and_date_created() {
    let (pool, db_name) = create_test_db().await;

    let original = gardens::insert_garden(&pool, &fields("Old", "Shed", Some("before")))
        .await
        .unwrap();

    let updated = gardens::update_garden(
        &pool,
        original.garden_id,
        &fields("New", "Greenhouse", None),
    )
    .await
    .unwrap()
    .expect("row should match");

    assert_eq!(updated.garden_id, original.garden_id);
    assert_eq!(updated.date_created, original.date_created);
    assert_eq!(updated.name, "New");
    assert_eq!(updated.location, "Greenhouse");
    assert_eq!(updated.description, None);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_missing_garden_matches_nothing() {
    let (pool, db_name) = create_test_db().await;

    let result = gardens::update_garden(&pool, 999, &fields("X", "Y", None))
        .await
        .unwrap();
    assert!(result.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (pool, db_name) = create_test_db().await;

    let garden = gardens::insert_garden(&pool, &fields("Doomed", "Lot", None))
        .await
        .unwrap();

    let first = gardens::delete_garden(&pool, garden.garden_id).await.unwrap();
    assert_eq!(first, 1);
    let second = gardens::delete_garden(&pool, garden.garden_id).await.unwrap();
    assert_eq!(second, 0);

    assert!(gardens::list_gardens(&pool).await.unwrap().is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let (pool, db_name) = create_test_db().await;

    let first = gardens::insert_garden(&pool, &fields("One", "Here", None))
        .await
        .unwrap();
    gardens::delete_garden(&pool, first.garden_id).await.unwrap();

    let second = gardens::insert_garden(&pool, &fields("Two", "There", None))
        .await
        .unwrap();
    assert!(second.garden_id > first.garden_id);

    pool.close().await;
    drop_test_db(&db_name).await;
}
