//! List view controller behaviour against in-memory fake APIs.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use gms_core::list_view::{
    BANNER_CLEAR_DELAY, BannerKind, Confirm, DeleteOutcome, ListController, Listable, ResourceApi,
};
use gms_db::models::{Garden, Plant};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeApi<R> {
    items: Vec<R>,
    fail_list: bool,
    fail_delete: bool,
    delete_calls: Arc<AtomicUsize>,
}

impl<R> FakeApi<R> {
    fn new(items: Vec<R>) -> Self {
        Self {
            items,
            fail_list: false,
            fail_delete: false,
            delete_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl<R: Listable> ResourceApi<R> for FakeApi<R> {
    async fn list(&self) -> Result<Vec<R>> {
        if self.fail_list {
            bail!("connection refused");
        }
        Ok(self.items.clone())
    }

    async fn delete(&self, _id: &R::Id) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            bail!("store unavailable");
        }
        Ok(())
    }
}

/// Records the question and returns a fixed answer.
struct RecordingConfirm {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl RecordingConfirm {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Confirm for RecordingConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.asked.lock().unwrap().push(question.to_string());
        self.answer
    }
}

fn plant(id: Uuid, name: &str) -> Plant {
    Plant {
        id,
        garden_id: 1,
        name: name.to_string(),
        plant_type: "Flower".to_string(),
        status: "Planted".to_string(),
        date_planted: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
    }
}

fn garden(garden_id: i64, name: &str) -> Garden {
    Garden {
        garden_id,
        name: name.to_string(),
        location: "Home".to_string(),
        description: None,
        date_created: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn init_replaces_items() {
    let api = FakeApi::new(vec![garden(1, "Front"), garden(2, "Back")]);
    let mut controller: ListController<Garden, _> = ListController::new(api);
    assert!(controller.items().is_empty());

    controller.init().await;
    assert_eq!(controller.items().len(), 2);
    assert_eq!(controller.banner(), None);
}

#[tokio::test]
async fn init_failure_leaves_items_empty_without_banner() {
    let mut api = FakeApi::new(vec![garden(1, "Front")]);
    api.fail_list = true;
    let mut controller: ListController<Garden, _> = ListController::new(api);

    controller.init().await;
    assert!(controller.items().is_empty());
    assert_eq!(controller.banner(), None);
}

#[tokio::test]
async fn declined_delete_does_nothing() {
    let api = FakeApi::new(vec![garden(1, "Front")]);
    let delete_calls = Arc::clone(&api.delete_calls);
    let mut controller: ListController<Garden, _> = ListController::new(api);
    controller.init().await;

    let confirm = RecordingConfirm::answering(false);
    let outcome = controller.delete(&1, &confirm).await;

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(delete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.items().len(), 1);
    assert_eq!(controller.banner(), None);
    assert_eq!(
        confirm.asked.lock().unwrap().as_slice(),
        ["Are you sure you want to delete this garden?"]
    );
}

#[tokio::test(start_paused = true)]
async fn plant_delete_removes_exactly_that_id_and_banner_clears() {
    let keep = Uuid::new_v4();
    let doomed = Uuid::new_v4();
    let api = FakeApi::new(vec![plant(doomed, "Rose"), plant(keep, "Tulip")]);
    let mut controller: ListController<Plant, _> = ListController::new(api);
    controller.init().await;

    let outcome = controller.delete(&doomed, &true).await;
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let ids: Vec<Uuid> = controller.items().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![keep]);
    assert_eq!(controller.banner_kind(), Some(BannerKind::Success));
    assert_eq!(
        controller.banner_message(),
        Some(format!("Plant with ID {doomed} deleted successfully"))
    );

    tokio::time::sleep(BANNER_CLEAR_DELAY + Duration::from_millis(1)).await;
    assert_eq!(controller.banner_message(), None);
    assert_eq!(controller.banner_kind(), None);
}

#[tokio::test(start_paused = true)]
async fn failed_delete_keeps_list_and_shows_error() {
    let mut api = FakeApi::new(vec![garden(3, "Side"), garden(4, "Roof")]);
    api.fail_delete = true;
    let mut controller: ListController<Garden, _> = ListController::new(api);
    controller.init().await;

    let outcome = controller.delete(&3, &true).await;
    assert_eq!(outcome, DeleteOutcome::Failed);
    assert_eq!(controller.items().len(), 2);
    assert_eq!(controller.banner_kind(), Some(BannerKind::Error));
    assert_eq!(
        controller.banner_message().as_deref(),
        Some("Error occurred while deleting garden with ID 3. Please try again later.")
    );

    tokio::time::sleep(BANNER_CLEAR_DELAY + Duration::from_millis(1)).await;
    assert_eq!(controller.banner(), None);
}

#[tokio::test(start_paused = true)]
async fn second_delete_banner_is_not_cleared_by_first_timer() {
    let api = FakeApi::new(vec![garden(1, "A"), garden(2, "B")]);
    let mut controller: ListController<Garden, _> = ListController::new(api);
    controller.init().await;

    controller.delete(&1, &true).await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    controller.delete(&2, &true).await;

    // The first banner's clear would have fired here.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(
        controller.banner_message().as_deref(),
        Some("Garden with ID 2 deleted successfully")
    );

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(controller.banner(), None);
    assert!(controller.items().is_empty());
}

#[tokio::test]
async fn deleting_unknown_local_id_still_reports_success() {
    let api = FakeApi::new(vec![garden(1, "A")]);
    let mut controller: ListController<Garden, _> = ListController::new(api);
    controller.init().await;

    let outcome = controller.delete(&99, &true).await;
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(controller.items().len(), 1);
    assert_eq!(
        controller.banner_message().as_deref(),
        Some("Garden with ID 99 deleted successfully")
    );
}
