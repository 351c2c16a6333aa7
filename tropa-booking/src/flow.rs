use chrono::NaiveDate;
use tropa_catalog::Inventory;

use crate::allocator::{validate_selection, SelectionError, ValidatedSelection};

/// Where a booking draft sits in the two-step confirm flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Selecting,
    Validated,
    Confirming,
    Submitted,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Selecting => "SELECTING",
            FlowState::Validated => "VALIDATED",
            FlowState::Confirming => "CONFIRMING",
            FlowState::Submitted => "SUBMITTED",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Explicit state machine for the confirm-then-submit booking flow.
///
/// The draft selection only exists in `Validated` and `Confirming`, and the
/// only way in is a successful validation, so submitting an unvalidated
/// selection is unrepresentable.
#[derive(Debug)]
pub struct BookingFlow {
    state: FlowState,
    draft: Option<ValidatedSelection>,
    last_rejection: Option<String>,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Selecting,
            draft: None,
            last_rejection: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn draft(&self) -> Option<&ValidatedSelection> {
        self.draft.as_ref()
    }

    /// Message from the most recent local or remote rejection, kept for
    /// inline display while the user adjusts the selection.
    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }

    /// Transition: Selecting → Validated, via the explicit confirm action.
    /// A failed validation keeps the flow in Selecting and records the
    /// message.
    pub fn confirm_selection(
        &mut self,
        inventory: &Inventory,
        date: Option<NaiveDate>,
        category: &str,
        quantity: u32,
    ) -> Result<ValidatedSelection, FlowError> {
        if self.state != FlowState::Selecting {
            return Err(self.invalid_transition("VALIDATED"));
        }

        match validate_selection(inventory, date, category, quantity) {
            Ok(selection) => {
                self.draft = Some(selection.clone());
                self.last_rejection = None;
                self.state = FlowState::Validated;
                Ok(selection)
            }
            Err(err) => {
                self.last_rejection = Some(err.to_string());
                Err(FlowError::Selection(err))
            }
        }
    }

    /// The draft to submit; only available while Confirming.
    pub fn submission_draft(&self) -> Result<&ValidatedSelection, FlowError> {
        match (&self.state, &self.draft) {
            (FlowState::Confirming, Some(draft)) => Ok(draft),
            _ => Err(self.invalid_transition("SUBMITTED")),
        }
    }

    /// Transition: Validated → Confirming (summary panel shown).
    pub fn begin_confirmation(&mut self) -> Result<(), FlowError> {
        if self.state != FlowState::Validated {
            return Err(self.invalid_transition("CONFIRMING"));
        }
        self.state = FlowState::Confirming;
        Ok(())
    }

    /// Transition: Confirming → Submitted (the API accepted the booking).
    pub fn mark_submitted(&mut self) -> Result<(), FlowError> {
        if self.state != FlowState::Confirming {
            return Err(self.invalid_transition("SUBMITTED"));
        }
        self.state = FlowState::Submitted;
        self.draft = None;
        Ok(())
    }

    /// Return to Selecting, discarding the draft. Allowed from any state
    /// before submission; a no-op while already selecting.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        if self.state == FlowState::Submitted {
            return Err(self.invalid_transition("SELECTING"));
        }
        self.state = FlowState::Selecting;
        self.draft = None;
        Ok(())
    }

    /// Transition: Confirming → Selecting after the server rejected the
    /// submission. The server's message is kept verbatim.
    pub fn remote_rejected(&mut self, message: impl Into<String>) -> Result<(), FlowError> {
        if self.state != FlowState::Confirming {
            return Err(self.invalid_transition("SELECTING"));
        }
        self.last_rejection = Some(message.into());
        self.state = FlowState::Selecting;
        self.draft = None;
        Ok(())
    }

    fn invalid_transition(&self, to: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            from: self.state.name(),
            to,
        }
    }
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tropa_catalog::TicketSlot;
    use tropa_shared::{Currency, Money};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()
    }

    fn inventory(count: u32) -> Inventory {
        let mut inventory = Inventory::new();
        inventory.insert_slot(
            date(),
            "Standard".to_string(),
            TicketSlot {
                count,
                price: Money::from_minor(2000, Currency::Byn),
            },
        );
        inventory
    }

    #[test]
    fn test_flow_lifecycle() {
        let mut flow = BookingFlow::new();
        let inventory = inventory(5);

        // Selecting → Validated
        let selection = flow
            .confirm_selection(&inventory, Some(date()), "Standard", 3)
            .unwrap();
        assert_eq!(selection.quantity, 3);
        assert_eq!(flow.state(), FlowState::Validated);

        // Validated → Confirming
        flow.begin_confirmation().unwrap();
        assert_eq!(flow.state(), FlowState::Confirming);

        // Confirming → Submitted
        flow.mark_submitted().unwrap();
        assert_eq!(flow.state(), FlowState::Submitted);
        assert!(flow.draft().is_none());
    }

    #[test]
    fn test_invalid_transition() {
        let mut flow = BookingFlow::new();

        // Cannot submit straight from Selecting
        let err = flow.mark_submitted().unwrap_err();
        assert_eq!(
            err,
            FlowError::InvalidTransition {
                from: "SELECTING",
                to: "SUBMITTED"
            }
        );

        // Cannot re-validate once validated
        flow.confirm_selection(&inventory(5), Some(date()), "Standard", 1)
            .unwrap();
        assert!(flow
            .confirm_selection(&inventory(5), Some(date()), "Standard", 1)
            .is_err());
    }

    #[test]
    fn test_failed_validation_stays_selecting() {
        let mut flow = BookingFlow::new();
        let err = flow
            .confirm_selection(&inventory(5), Some(date()), "Standard", 6)
            .unwrap_err();

        assert_eq!(
            err,
            FlowError::Selection(SelectionError::InsufficientInventory {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(flow.state(), FlowState::Selecting);
        assert!(flow.draft().is_none());
        assert!(flow.last_rejection().is_some());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut flow = BookingFlow::new();
        flow.confirm_selection(&inventory(5), Some(date()), "Standard", 2)
            .unwrap();
        flow.begin_confirmation().unwrap();

        flow.cancel().unwrap();
        assert_eq!(flow.state(), FlowState::Selecting);
        assert!(flow.draft().is_none());
    }

    #[test]
    fn test_remote_rejection_returns_to_selecting() {
        let mut flow = BookingFlow::new();
        flow.confirm_selection(&inventory(2), Some(date()), "Standard", 2)
            .unwrap();
        flow.begin_confirmation().unwrap();

        // Local validation passed, but another client took the tickets.
        flow.remote_rejected("only 1 left").unwrap();
        assert_eq!(flow.state(), FlowState::Selecting);
        assert_eq!(flow.last_rejection(), Some("only 1 left"));
        assert!(flow.draft().is_none());
    }

    #[test]
    fn test_successful_validation_clears_previous_rejection() {
        let mut flow = BookingFlow::new();
        let inventory = inventory(5);

        flow.confirm_selection(&inventory, Some(date()), "Standard", 9)
            .unwrap_err();
        assert!(flow.last_rejection().is_some());

        flow.confirm_selection(&inventory, Some(date()), "Standard", 2)
            .unwrap();
        assert!(flow.last_rejection().is_none());
    }
}
