//! Progress and cancellation channel passed into a join run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Narrow reporting capability handed to [`PointsInPolygon::run`](crate::PointsInPolygon::run).
pub trait Feedback {
    /// Integer percentage in `0..=100`.
    fn report_progress(&mut self, percent: u32);

    fn report_status(&mut self, text: &str);

    /// Polled between polygons.
    fn is_cancelled(&self) -> bool;
}

/// Shared abort flag, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Ignores progress and status; never cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn report_progress(&mut self, _percent: u32) {}

    fn report_status(&mut self, _text: &str) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Forwards progress to the `log` facade and watches a [`CancellationToken`].
///
/// Progress lines are only emitted when the percentage changes.
#[derive(Debug, Default)]
pub struct LogFeedback {
    token: CancellationToken,
    last_percent: Option<u32>,
}

impl LogFeedback {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            last_percent: None,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Feedback for LogFeedback {
    fn report_progress(&mut self, percent: u32) {
        if self.last_percent != Some(percent) {
            log::info!("Progress: {}%", percent);
            self.last_percent = Some(percent);
        }
    }

    fn report_status(&mut self, text: &str) {
        log::debug!("{}", text);
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
