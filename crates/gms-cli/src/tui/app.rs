//! TUI application state.

use std::time::Duration;

use gms_core::list_view::{Banner, DeleteOutcome, ListController, ResourceApi};
use gms_db::models::{Garden, Plant};

/// Which list the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Gardens,
    Plants,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Self::Gardens => "Gardens",
            Self::Plants => "Plants",
        }
    }
}

/// Dashboard state: one list controller per tab plus cursor and modal.
pub struct App<A>
where
    A: ResourceApi<Garden> + ResourceApi<Plant>,
{
    pub gardens: ListController<Garden, A>,
    pub plants: ListController<Plant, A>,
    pub tab: Tab,
    pub selected_garden: usize,
    pub selected_plant: usize,
    /// Set while the y/n delete confirmation is open.
    pub confirming: bool,
    pub show_help: bool,
    pub tick_rate: Duration,
    pub should_quit: bool,
}

impl<A> App<A>
where
    A: ResourceApi<Garden> + ResourceApi<Plant> + Clone,
{
    pub fn new(api: A) -> Self {
        Self {
            gardens: ListController::new(api.clone()),
            plants: ListController::new(api),
            tab: Tab::Gardens,
            selected_garden: 0,
            selected_plant: 0,
            confirming: false,
            show_help: false,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
        }
    }
}

impl<A> App<A>
where
    A: ResourceApi<Garden> + ResourceApi<Plant>,
{
    /// Reload both lists.
    pub async fn refresh(&mut self) {
        self.gardens.init().await;
        self.plants.init().await;
        self.clamp_selection();
    }

    // -- Navigation --

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Gardens => Tab::Plants,
            Tab::Plants => Tab::Gardens,
        };
    }

    pub fn move_up(&mut self) {
        let selected = self.selected_mut();
        *selected = selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.current_len();
        let selected = self.selected_mut();
        if *selected + 1 < len {
            *selected += 1;
        }
    }

    pub fn selected(&self) -> usize {
        match self.tab {
            Tab::Gardens => self.selected_garden,
            Tab::Plants => self.selected_plant,
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.tab {
            Tab::Gardens => &mut self.selected_garden,
            Tab::Plants => &mut self.selected_plant,
        }
    }

    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Gardens => self.gardens.items().len(),
            Tab::Plants => self.plants.items().len(),
        }
    }

    fn clamp_selection(&mut self) {
        let gardens = self.gardens.items().len();
        let plants = self.plants.items().len();
        self.selected_garden = self.selected_garden.min(gardens.saturating_sub(1));
        self.selected_plant = self.selected_plant.min(plants.saturating_sub(1));
    }

    // -- Delete flow --

    /// Open the confirmation modal if something is selected.
    pub fn request_delete(&mut self) {
        if self.current_len() > 0 {
            self.confirming = true;
        }
    }

    /// Question shown in the modal.
    pub fn confirm_question(&self) -> String {
        let entity = match self.tab {
            Tab::Gardens => "garden",
            Tab::Plants => "plant",
        };
        format!("Are you sure you want to delete this {entity}?")
    }

    /// Close the modal and run the delete with the user's answer.
    pub async fn answer_delete(&mut self, yes: bool) -> Option<DeleteOutcome> {
        if !self.confirming {
            return None;
        }
        self.confirming = false;

        let outcome = match self.tab {
            Tab::Gardens => {
                let id = self.gardens.items().get(self.selected_garden)?.garden_id;
                self.gardens.delete(&id, &yes).await
            }
            Tab::Plants => {
                let id = self.plants.items().get(self.selected_plant)?.id;
                self.plants.delete(&id, &yes).await
            }
        };
        self.clamp_selection();
        Some(outcome)
    }

    /// Banner of the tab on screen.
    pub fn banner(&self) -> Option<Banner> {
        match self.tab {
            Tab::Gardens => self.gardens.banner(),
            Tab::Plants => self.plants.banner(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use gms_core::list_view::{BANNER_CLEAR_DELAY, BannerKind};

    use super::*;

    #[derive(Clone)]
    pub(crate) struct FakeApi {
        pub gardens: Vec<Garden>,
        pub plants: Vec<Plant>,
        pub fail_delete: bool,
    }

    impl FakeApi {
        pub(crate) fn seeded() -> Self {
            let gardens = (1..=3)
                .map(|i| Garden {
                    garden_id: i,
                    name: format!("Garden {i}"),
                    location: "Home".into(),
                    description: None,
                    date_created: Utc::now(),
                })
                .collect();
            let plants = vec![Plant {
                id: Uuid::new_v4(),
                garden_id: 1,
                name: "Rose".into(),
                plant_type: "Flower".into(),
                status: "Planted".into(),
                date_planted: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            }];
            Self {
                gardens,
                plants,
                fail_delete: false,
            }
        }
    }

    #[async_trait]
    impl ResourceApi<Garden> for FakeApi {
        async fn list(&self) -> Result<Vec<Garden>> {
            Ok(self.gardens.clone())
        }

        async fn delete(&self, _id: &i64) -> Result<()> {
            if self.fail_delete {
                bail!("HTTP 500");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResourceApi<Plant> for FakeApi {
        async fn list(&self) -> Result<Vec<Plant>> {
            Ok(self.plants.clone())
        }

        async fn delete(&self, _id: &Uuid) -> Result<()> {
            if self.fail_delete {
                bail!("HTTP 500");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn cursor_stays_in_bounds() {
        let mut app = App::new(FakeApi::seeded());
        app.refresh().await;

        app.move_up();
        assert_eq!(app.selected(), 0);
        for _ in 0..10 {
            app.move_down();
        }
        assert_eq!(app.selected(), 2);

        app.switch_tab();
        assert_eq!(app.tab, Tab::Plants);
        app.move_down();
        assert_eq!(app.selected(), 0);
    }

    #[tokio::test]
    async fn declined_modal_keeps_everything() {
        let mut app = App::new(FakeApi::seeded());
        app.refresh().await;

        app.request_delete();
        assert!(app.confirming);
        assert_eq!(app.confirm_question(), "Are you sure you want to delete this garden?");

        let outcome = app.answer_delete(false).await;
        assert_eq!(outcome, Some(DeleteOutcome::Declined));
        assert!(!app.confirming);
        assert_eq!(app.gardens.items().len(), 3);
        assert_eq!(app.banner(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_delete_removes_selected_and_banner_clears() {
        let mut app = App::new(FakeApi::seeded());
        app.refresh().await;
        app.move_down();
        app.move_down();

        app.request_delete();
        let outcome = app.answer_delete(true).await;
        assert_eq!(outcome, Some(DeleteOutcome::Deleted));

        let ids: Vec<i64> = app.gardens.items().iter().map(|g| g.garden_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(app.selected(), 1, "cursor should move back onto the list");

        let banner = app.banner().expect("banner should be set");
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.message, "Garden with ID 3 deleted successfully");

        tokio::time::sleep(BANNER_CLEAR_DELAY + Duration::from_millis(1)).await;
        assert_eq!(app.banner(), None);
    }

    #[tokio::test]
    async fn failed_plant_delete_shows_error_on_plants_tab() {
        let mut api = FakeApi::seeded();
        api.fail_delete = true;
        let plant_id = api.plants[0].id;
        let mut app = App::new(api);
        app.refresh().await;
        app.switch_tab();

        app.request_delete();
        assert_eq!(app.answer_delete(true).await, Some(DeleteOutcome::Failed));
        assert_eq!(app.plants.items().len(), 1);

        let banner = app.banner().expect("banner should be set");
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(
            banner.message,
            format!("Error occurred while deleting plant with ID {plant_id}. Please try again later.")
        );

        // Banners are per tab.
        app.switch_tab();
        assert_eq!(app.banner(), None);
    }

    #[tokio::test]
    async fn delete_on_empty_list_never_opens_modal() {
        let mut api = FakeApi::seeded();
        api.plants.clear();
        let mut app = App::new(api);
        app.refresh().await;
        app.switch_tab();

        app.request_delete();
        assert!(!app.confirming);
        assert_eq!(app.answer_delete(true).await, None);
    }
}
