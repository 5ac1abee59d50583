//! Per-operation lifecycle tracking: `Idle -> Pending -> {Success, Error}`,
//! with `Success`/`Error` re-entering `Pending` on the next submission.

use chrono::{DateTime, Utc};
use shared::error::MutationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct MutationSlot<T> {
    status: SlotStatus,
    last_result: Option<T>,
    last_error: Option<MutationError>,
    settled_at: Option<DateTime<Utc>>,
}

impl<T> Default for MutationSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MutationSlot<T> {
    pub fn new() -> Self {
        Self {
            status: SlotStatus::Idle,
            last_result: None,
            last_error: None,
            settled_at: None,
        }
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == SlotStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == SlotStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == SlotStatus::Error
    }

    /// Payload of the most recent successful attempt, kept across later failures.
    pub fn last_result(&self) -> Option<&T> {
        self.last_result.as_ref()
    }

    /// Payload to display: only present while the slot is in `Success`.
    pub fn success_value(&self) -> Option<&T> {
        if self.is_success() {
            self.last_result.as_ref()
        } else {
            None
        }
    }

    pub fn last_error(&self) -> Option<&MutationError> {
        self.last_error.as_ref()
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    /// Moves the slot to `Pending`. Returns `false` and leaves the slot
    /// untouched when a request is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        self.status = SlotStatus::Pending;
        self.last_error = None;
        true
    }

    /// Settles an in-flight attempt. Returns `false` (and ignores the result)
    /// when nothing is in flight.
    pub fn settle(&mut self, result: Result<T, MutationError>) -> bool {
        if !self.is_pending() {
            return false;
        }
        match result {
            Ok(value) => {
                self.status = SlotStatus::Success;
                self.last_result = Some(value);
            }
            Err(err) => {
                self.status = SlotStatus::Error;
                self.last_error = Some(err);
            }
        }
        self.settled_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_without_payload() {
        let slot: MutationSlot<String> = MutationSlot::new();
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert!(slot.last_result().is_none());
        assert!(slot.last_error().is_none());
        assert!(slot.settled_at().is_none());
    }

    #[test]
    fn begin_is_rejected_while_pending() {
        let mut slot: MutationSlot<()> = MutationSlot::new();
        assert!(slot.begin());
        assert!(!slot.begin());
        assert_eq!(slot.status(), SlotStatus::Pending);
    }

    #[test]
    fn settle_without_begin_is_ignored() {
        let mut slot: MutationSlot<String> = MutationSlot::new();
        assert!(!slot.settle(Ok("late".to_string())));
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert!(slot.last_result().is_none());
    }

    #[test]
    fn error_keeps_previous_success_payload() {
        let mut slot: MutationSlot<String> = MutationSlot::new();
        slot.begin();
        slot.settle(Ok("first".to_string()));

        slot.begin();
        slot.settle(Err(MutationError::server(500, "boom")));

        assert_eq!(slot.status(), SlotStatus::Error);
        assert_eq!(slot.last_result().map(String::as_str), Some("first"));
        assert!(slot.success_value().is_none());
        assert_eq!(slot.last_error().and_then(MutationError::status), Some(500));
    }

    #[test]
    fn resubmission_after_error_clears_error_detail() {
        let mut slot: MutationSlot<()> = MutationSlot::new();
        slot.begin();
        slot.settle(Err(MutationError::transport("refused")));
        assert!(slot.begin());
        assert!(slot.last_error().is_none());
        assert!(slot.settle(Ok(())));
        assert!(slot.is_success());
        assert!(slot.settled_at().is_some());
    }
}
