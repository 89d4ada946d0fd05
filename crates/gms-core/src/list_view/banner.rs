//! Transient status banner with a cancellable auto-clear timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How long a banner stays up after it was last set.
pub const BANNER_CLEAR_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
}

#[derive(Debug, Default)]
struct Slot {
    banner: Option<Banner>,
    /// Bumped on every `show`; a clear only applies to the generation that
    /// scheduled it.
    generation: u64,
}

/// Holds at most one banner and the handle of the clear scheduled for it.
///
/// Showing a banner cancels the previously scheduled clear before
/// scheduling its own, so an older timer never wipes a newer message.
/// Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct BannerBoard {
    slot: Arc<Mutex<Slot>>,
    pending_clear: Option<CancellationToken>,
    delay: Duration,
}

impl BannerBoard {
    pub fn new(delay: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            pending_clear: None,
            delay,
        }
    }

    /// Set the banner and (re)start the clear timer.
    pub fn show(&mut self, message: impl Into<String>, kind: BannerKind) {
        self.cancel_pending();

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.banner = Some(Banner {
                message: message.into(),
                kind,
            });
            slot.generation
        };

        let token = CancellationToken::new();
        self.pending_clear = Some(token.clone());

        let slot = Arc::clone(&self.slot);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let mut slot = lock(&slot);
                    if slot.generation == generation {
                        slot.banner = None;
                    }
                }
            }
        });
    }

    /// Remove the banner now and drop any pending clear.
    pub fn clear(&mut self) {
        self.cancel_pending();
        lock(&self.slot).banner = None;
    }

    pub fn current(&self) -> Option<Banner> {
        lock(&self.slot).banner.clone()
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending_clear.take() {
            token.cancel();
        }
    }
}

impl Default for BannerBoard {
    fn default() -> Self {
        Self::new(BANNER_CLEAR_DELAY)
    }
}

impl Drop for BannerBoard {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn clears_after_delay() {
        let mut board = BannerBoard::default();
        board.show("saved", BannerKind::Success);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(
            board.current(),
            Some(Banner {
                message: "saved".into(),
                kind: BannerKind::Success
            })
        );

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_banner_outlives_older_timer() {
        let mut board = BannerBoard::default();
        board.show("first", BannerKind::Success);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        board.show("second", BannerKind::Error);

        // Past the first banner's deadline.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let current = board.current().expect("second banner should still be up");
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, BannerKind::Error);

        // Past the second banner's deadline.
        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_is_immediate() {
        let mut board = BannerBoard::default();
        board.show("gone soon", BannerKind::Error);
        board.clear();
        assert_eq!(board.current(), None);
    }
}
