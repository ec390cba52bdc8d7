//! One-shot status change detection.

use crate::tracking::DerivedStatus;

/// A change between two consecutive observed statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DerivedStatus,
    pub to: DerivedStatus,
}

/// Remembers the last status it was shown and reports each change exactly once.
///
/// The first observation only records; nothing is announced for the status a shopper
/// sees when the page opens.
#[derive(Debug, Clone, Default)]
pub struct StatusWatcher {
    last_notified: Option<DerivedStatus>,
}

impl StatusWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notified(&self) -> Option<DerivedStatus> {
        self.last_notified
    }

    pub fn observe(&mut self, status: DerivedStatus) -> Option<Transition> {
        match self.last_notified.replace(status) {
            Some(previous) if previous != status => Some(Transition {
                from: previous,
                to: status,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DerivedStatus::*;

    #[test]
    fn reports_each_change_once() {
        let mut watcher = StatusWatcher::new();
        let observed = [
            Placed,
            Placed,
            Confirmed,
            Confirmed,
            OutForDelivery,
            OutForDelivery,
            Delivered,
        ];
        let transitions: Vec<Transition> = observed
            .into_iter()
            .filter_map(|status| watcher.observe(status))
            .collect();

        assert_eq!(
            transitions,
            vec![
                Transition { from: Placed, to: Confirmed },
                Transition { from: Confirmed, to: OutForDelivery },
                Transition { from: OutForDelivery, to: Delivered },
            ]
        );
    }

    #[test]
    fn first_observation_is_silent() {
        let mut watcher = StatusWatcher::new();
        assert_eq!(watcher.observe(OutForDelivery), None);
        assert_eq!(watcher.last_notified(), Some(OutForDelivery));
    }
}
