use chrono::{DateTime, Duration, Utc};

use crate::ui::transient::{Banner, Transient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Succeeded,
    Failed,
}

/// What a form should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Ready,
    Showing { banner: Banner, remaining: Duration },
    /// The success window elapsed, the caller's completion runs now.
    Completed,
}

/// Result banner of the last submission and the hand-off to the caller once
/// a success banner has been shown for its window. Driven by explicit `now`
/// values.
#[derive(Debug, Clone, Default)]
pub struct FormLifecycle {
    phase: Phase,
    banner: Transient<Banner>,
}

impl FormLifecycle {
    pub fn succeed(&mut self, banner: Banner, now: DateTime<Utc>, window: Duration) {
        self.phase = Phase::Succeeded;
        self.banner.show(banner, now, window);
    }

    pub fn fail(&mut self, banner: Banner, now: DateTime<Utc>, window: Duration) {
        self.phase = Phase::Failed;
        self.banner.show(banner, now, window);
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> FormStatus {
        let remaining = self
            .banner
            .expires_at()
            .map(|expires_at| (expires_at - now).max(Duration::zero()))
            .unwrap_or_else(Duration::zero);

        match (self.phase, self.banner.get(now)) {
            (Phase::Idle, _) => FormStatus::Ready,
            (_, Some(banner)) => FormStatus::Showing {
                banner: banner.clone(),
                remaining,
            },
            (Phase::Succeeded, None) => {
                self.phase = Phase::Idle;
                FormStatus::Completed
            }
            (Phase::Failed, None) => {
                self.phase = Phase::Idle;
                FormStatus::Ready
            }
        }
    }
}
