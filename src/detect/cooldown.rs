//! Time-indexed suppression of repeated announcements.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Default suppression window.
const DEFAULT_COOLDOWN_SECS: u64 = 5;

/// Class labels recently spoken, each with the instant its cooldown ends.
///
/// Expired entries are pruned whenever the set is touched, so no timer is
/// kept per label.
#[derive(Debug)]
pub struct AnnouncementCooldown {
    expires: HashMap<String, Instant>,
    window: Duration,
}

impl Default for AnnouncementCooldown {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_COOLDOWN_SECS))
    }
}

impl AnnouncementCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            expires: HashMap::new(),
            window,
        }
    }

    /// `true` if `label` was announced less than one window before `now`.
    pub fn is_cooling(&mut self, label: &str, now: Instant) -> bool {
        self.prune(now);
        self.expires.contains_key(label)
    }

    /// Record an announcement of `label` at `now`.
    pub fn mark(&mut self, label: &str, now: Instant) {
        self.prune(now);
        self.expires.insert(label.to_string(), now + self.window);
    }

    pub fn clear(&mut self) {
        self.expires.clear();
    }

    pub fn len(&self) -> usize {
        self.expires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expires.is_empty()
    }

    fn prune(&mut self, now: Instant) {
        self.expires.retain(|_, until| *until > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_label_is_suppressed_inside_window() {
        let start = Instant::now();
        let mut cd = AnnouncementCooldown::default();
        cd.mark("person", start);

        assert!(cd.is_cooling("person", start));
        assert!(cd.is_cooling("person", start + Duration::from_secs(1)));
        assert!(cd.is_cooling("person", start + Duration::from_millis(4_999)));
    }

    #[test]
    fn label_is_released_after_window() {
        let start = Instant::now();
        let mut cd = AnnouncementCooldown::default();
        cd.mark("person", start);

        assert!(!cd.is_cooling("person", start + Duration::from_secs(5)));
        assert!(cd.is_empty(), "expired entry should be pruned");
    }

    #[test]
    fn labels_are_independent() {
        let start = Instant::now();
        let mut cd = AnnouncementCooldown::default();
        cd.mark("person", start);

        assert!(!cd.is_cooling("dog", start));
        cd.mark("dog", start + Duration::from_secs(3));

        let later = start + Duration::from_secs(6);
        assert!(!cd.is_cooling("person", later));
        assert!(cd.is_cooling("dog", later));
        assert_eq!(cd.len(), 1);
    }

    #[test]
    fn re_marking_extends_the_window() {
        let start = Instant::now();
        let mut cd = AnnouncementCooldown::new(Duration::from_secs(2));
        cd.mark("cup", start);
        cd.mark("cup", start + Duration::from_secs(1));
        assert!(cd.is_cooling("cup", start + Duration::from_millis(2_500)));
    }
}
