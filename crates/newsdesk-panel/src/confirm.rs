//! Confirmation-gated delete intent
//!
//! A destructive call may only fire after the user explicitly confirms a
//! previously armed candidate. The armed id lives here and nowhere else,
//! so a DELETE without a prior confirmation step is unrepresentable.

use newsdesk_core::types::RecordId;

/// Pending delete intent for one collection view
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    armed: Option<RecordId>,
}

impl DeleteConfirmation {
    /// New, disarmed state
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Arm a delete for the given record; any earlier candidate is
    /// replaced
    pub fn arm(&mut self, id: impl Into<RecordId>) {
        self.armed = Some(id.into());
    }

    /// Dismiss the pending intent without deleting
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Confirm the pending intent, yielding the id to delete
    ///
    /// Disarms unconditionally: whatever the outcome of the network call,
    /// the confirmation dialog is spent.
    pub fn confirm(&mut self) -> Option<RecordId> {
        self.armed.take()
    }

    /// The armed candidate, if any
    #[must_use]
    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    /// True while a candidate awaits confirmation
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn confirm_without_arming_yields_nothing() {
        let mut confirmation = DeleteConfirmation::new();
        assert_eq!(confirmation.confirm(), None);
    }

    #[test]
    fn confirm_yields_the_armed_id_exactly_once() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.arm("a1");
        assert_eq!(confirmation.armed(), Some("a1"));
        assert_eq!(confirmation.confirm(), Some("a1".to_string()));
        assert_eq!(confirmation.confirm(), None);
        assert!(!confirmation.is_armed());
    }

    #[test]
    fn cancel_disarms_without_yielding() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.arm("a1");
        confirmation.cancel();
        assert_eq!(confirmation.confirm(), None);
    }

    #[test]
    fn rearming_replaces_the_candidate() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.arm("a1");
        confirmation.arm("b2");
        assert_eq!(confirmation.confirm(), Some("b2".to_string()));
    }
}
