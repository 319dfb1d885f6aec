use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// A short feedback message ("Team Added", "Error deleting team", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Banner { kind: BannerKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Banner { kind: BannerKind::Error, message: message.into() }
    }
}

/// A value that is visible until its expiry instant. Callers pass `now`
/// explicitly; nothing here reads the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transient<T> {
    current: Option<(T, DateTime<Utc>)>,
}

impl<T> Default for Transient<T> {
    fn default() -> Self {
        Transient { current: None }
    }
}

impl<T> Transient<T> {
    pub fn show(&mut self, value: T, now: DateTime<Utc>, window: Duration) {
        self.current = Some((value, now + window));
    }

    pub fn get(&mut self, now: DateTime<Utc>) -> Option<&T> {
        if matches!(self.current, Some((_, expires_at)) if now >= expires_at) {
            self.current = None;
        }
        self.current.as_ref().map(|(value, _)| value)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|(_, expires_at)| *expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn value_disappears_once_window_elapses() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let window = Duration::milliseconds(2000);
        let mut banner = Transient::default();
        banner.show(Banner::error("Error adding team"), start, window);

        assert_eq!(banner.get(start + Duration::milliseconds(1999)), Some(&Banner::error("Error adding team")));
        assert_eq!(banner.get(start + window), None);
        assert_eq!(banner.expires_at(), None);
    }

    #[test]
    fn showing_again_restarts_the_window() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let window = Duration::seconds(2);
        let mut banner = Transient::default();
        banner.show(1, start, window);
        banner.show(2, start + Duration::seconds(1), window);

        assert_eq!(banner.get(start + Duration::milliseconds(2500)), Some(&2));
        assert_eq!(banner.expires_at(), Some(start + Duration::seconds(3)));
    }
}
