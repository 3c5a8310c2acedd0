use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifies one dataset load request issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Orders overlapping loads so only the most recently issued one may commit.
///
/// A slow early request finishing after a newer one is discarded instead of
/// overwriting fresher data.
#[derive(Debug, Default, Clone)]
pub struct LoadSequencer {
    issued: u64,
    committed: Option<LoadTicket>,
}

impl LoadSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.issued += 1;
        debug!(ticket = self.issued, "issued load ticket");
        LoadTicket(self.issued)
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Marks `ticket` committed when it is still the latest; returns whether it was.
    pub fn accept(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale load result"
            );
            return false;
        }
        if self.committed == Some(ticket) {
            debug!(ticket = ticket.0, "load ticket already committed");
            return false;
        }
        self.committed = Some(ticket);
        true
    }

    #[must_use]
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.issued > 0).then_some(LoadTicket(self.issued))
    }

    #[must_use]
    pub fn committed(&self) -> Option<LoadTicket> {
        self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::LoadSequencer;

    #[test]
    fn older_ticket_cannot_commit_after_newer_one_is_issued() {
        let mut loads = LoadSequencer::new();
        let first = loads.begin();
        let second = loads.begin();
        assert!(!loads.accept(first));
        assert!(loads.accept(second));
        assert_eq!(loads.committed(), Some(second));
    }

    #[test]
    fn ticket_commits_once() {
        let mut loads = LoadSequencer::new();
        let ticket = loads.begin();
        assert!(loads.accept(ticket));
        assert!(!loads.accept(ticket));
    }
}
