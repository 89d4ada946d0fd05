//! Client-side list views.
//!
//! A [`ListController`] loads a collection once, keeps it as a local view
//! model, and deletes items with confirmation. A successful delete drops the
//! item locally instead of re-fetching; either outcome is announced through
//! a [`BannerBoard`] that clears itself after [`BANNER_CLEAR_DELAY`].
//!
//! The controller is written once and instantiated per entity through the
//! [`Listable`] and [`ResourceApi`] traits.

mod banner;
mod controller;

pub use banner::{BANNER_CLEAR_DELAY, Banner, BannerBoard, BannerKind};
pub use controller::{DeleteOutcome, ListController};

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use gms_db::models::{Garden, Plant};

use crate::store::Entity;

/// An entity that can be listed and deleted by id.
pub trait Listable: Clone + Send + Sync + 'static {
    type Id: Clone + PartialEq + fmt::Display + Send + Sync;

    const ENTITY: Entity;

    fn id(&self) -> Self::Id;
}

impl Listable for Garden {
    type Id = i64;

    const ENTITY: Entity = Entity::Garden;

    fn id(&self) -> i64 {
        self.garden_id
    }
}

impl Listable for Plant {
    type Id = Uuid;

    const ENTITY: Entity = Entity::Plant;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// The two remote calls a list view makes.
#[async_trait]
pub trait ResourceApi<R: Listable>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>>;

    async fn delete(&self, id: &R::Id) -> Result<()>;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// A fixed answer, for callers that already asked (the TUI's y/n modal,
/// `--yes` on the command line).
impl Confirm for bool {
    fn confirm(&self, _question: &str) -> bool {
        *self
    }
}
