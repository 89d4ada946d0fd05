use std::marker::PhantomData;
use std::time::Duration;

use tracing::{error, info};

use super::{BANNER_CLEAR_DELAY, Banner, BannerBoard, BannerKind, Confirm, Listable, ResourceApi};

/// What a call to [`ListController::delete`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user said no; nothing was sent.
    Declined,
    Deleted,
    Failed,
}

/// List/delete view model for one entity type.
pub struct ListController<R: Listable, A: ResourceApi<R>> {
    api: A,
    items: Vec<R>,
    banner: BannerBoard,
    _entity: PhantomData<fn() -> R>,
}

impl<R: Listable, A: ResourceApi<R>> ListController<R, A> {
    pub fn new(api: A) -> Self {
        Self::with_clear_delay(api, BANNER_CLEAR_DELAY)
    }

    pub fn with_clear_delay(api: A, delay: Duration) -> Self {
        Self {
            api,
            items: Vec::new(),
            banner: BannerBoard::new(delay),
            _entity: PhantomData,
        }
    }

    /// Load the collection. On failure the error is logged and the list is
    /// left empty; nothing is shown to the user.
    pub async fn init(&mut self) {
        match self.api.list().await {
            Ok(items) => {
                info!(entity = %R::ENTITY, count = items.len(), "loaded list");
                self.items = items;
            }
            Err(e) => {
                error!(entity = %R::ENTITY, error = %format!("{e:#}"), "failed to load list");
                self.items.clear();
            }
        }
    }

    /// Delete `id` after confirmation.
    ///
    /// On success the matching item is removed from the local list without a
    /// re-fetch. On failure the list is untouched. Both outcomes set a banner
    /// naming the id.
    pub async fn delete(&mut self, id: &R::Id, confirm: &dyn Confirm) -> DeleteOutcome {
        let question = format!("Are you sure you want to delete this {}?", R::ENTITY);
        if !confirm.confirm(&question) {
            return DeleteOutcome::Declined;
        }

        let title = R::ENTITY.title();
        match self.api.delete(id).await {
            Ok(()) => {
                info!(entity = %R::ENTITY, %id, "deleted");
                self.items.retain(|item| item.id() != *id);
                self.banner.show(
                    format!("{title} with ID {id} deleted successfully"),
                    BannerKind::Success,
                );
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(entity = %R::ENTITY, %id, error = %format!("{e:#}"), "delete failed");
                self.banner.show(
                    format!(
                        "Error occurred while deleting {} with ID {id}. Please try again later.",
                        R::ENTITY
                    ),
                    BannerKind::Error,
                );
                DeleteOutcome::Failed
            }
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner.current()
    }

    pub fn banner_message(&self) -> Option<String> {
        self.banner().map(|b| b.message)
    }

    pub fn banner_kind(&self) -> Option<BannerKind> {
        self.banner().map(|b| b.kind)
    }
}
