use chrono::NaiveDate;
use tracing::info;
use tropa_booking::{
    allocator, build_booking_payload, BookingFlow, FlowError, FlowState, ValidatedSelection,
};
use tropa_catalog::{CategoryName, Excursion};
use tropa_store::app_config::BookingRules;
use tropa_store::Session;
use uuid::Uuid;

use crate::client::{BookingConfirmation, ExcursionsApi};
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No excursion snapshot loaded")]
    NotLoaded,

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Drives the confirm-then-submit booking flow against the remote API.
///
/// Holds the inventory snapshot fetched at load time; the snapshot is
/// dropped after a successful submission because the server has decremented
/// the authoritative counts by then.
pub struct BookingService<A: ExcursionsApi> {
    api: A,
    session: Session,
    rules: BookingRules,
    flow: BookingFlow,
    excursion: Option<Excursion>,
}

impl<A: ExcursionsApi> BookingService<A> {
    pub fn new(api: A, session: Session, rules: BookingRules) -> Self {
        Self {
            api,
            session,
            rules,
            flow: BookingFlow::new(),
            excursion: None,
        }
    }

    /// Fetch a fresh inventory snapshot and reset the flow (form mount).
    pub async fn load(&mut self, excursion_id: Uuid) -> Result<&Excursion, ServiceError> {
        let excursion = self.api.get_excursion(excursion_id).await?;
        info!(
            "Loaded excursion {} with {} bookable dates",
            excursion.id,
            allocator::available_dates(&excursion.inventory).len()
        );
        self.flow = BookingFlow::new();
        Ok(self.excursion.insert(excursion))
    }

    pub fn excursion(&self) -> Option<&Excursion> {
        self.excursion.as_ref()
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    pub fn selectable_dates(&self) -> Vec<NaiveDate> {
        self.excursion
            .as_ref()
            .map(|e| allocator::available_dates(&e.inventory))
            .unwrap_or_default()
    }

    pub fn categories_for(&self, date: NaiveDate) -> Vec<CategoryName> {
        self.excursion
            .as_ref()
            .map(|e| allocator::categories_for_date(&e.inventory, date))
            .unwrap_or_default()
    }

    pub fn max_quantity(&self, date: NaiveDate, category: &str) -> u32 {
        self.excursion
            .as_ref()
            .map(|e| allocator::max_quantity(&e.inventory, date, category))
            .unwrap_or(0)
    }

    /// Quantity to pre-fill the input with, clamped to what the slot holds.
    pub fn suggested_quantity(&self, date: NaiveDate, category: &str) -> u32 {
        allocator::clamp_quantity(self.rules.default_quantity, self.max_quantity(date, category))
    }

    /// Transition: Selecting → Validated, on the user's confirm action.
    pub fn confirm_selection(
        &mut self,
        date: Option<NaiveDate>,
        category: &str,
        quantity: u32,
    ) -> Result<ValidatedSelection, ServiceError> {
        let excursion = self.excursion.as_ref().ok_or(ServiceError::NotLoaded)?;
        Ok(self
            .flow
            .confirm_selection(&excursion.inventory, date, category, quantity)?)
    }

    /// Transition: Validated → Confirming. With `refetch_before_submit`
    /// enabled, the snapshot is refreshed first and a draft that no longer
    /// fits sends the flow back to Selecting.
    pub async fn begin_confirmation(&mut self) -> Result<(), ServiceError> {
        if self.rules.refetch_before_submit {
            let excursion_id = self
                .excursion
                .as_ref()
                .map(|e| e.id)
                .ok_or(ServiceError::NotLoaded)?;
            let fresh = self.api.get_excursion(excursion_id).await?;

            if let Some(draft) = self.flow.draft().cloned() {
                if let Err(err) = allocator::validate_selection(
                    &fresh.inventory,
                    Some(draft.date),
                    &draft.category,
                    draft.quantity,
                ) {
                    self.excursion = Some(fresh);
                    self.flow.cancel()?;
                    return Err(ServiceError::Flow(FlowError::Selection(err)));
                }
            }
            self.excursion = Some(fresh);
        }

        Ok(self.flow.begin_confirmation()?)
    }

    /// Return to Selecting, discarding the draft.
    pub fn cancel(&mut self) -> Result<(), ServiceError> {
        Ok(self.flow.cancel()?)
    }

    /// Transition: Confirming → Submitted. Any API failure sends the flow
    /// back to Selecting with the message kept for display; the user
    /// retries manually.
    pub async fn submit(&mut self) -> Result<BookingConfirmation, ServiceError> {
        let excursion = self.excursion.as_ref().ok_or(ServiceError::NotLoaded)?;
        let draft = self.flow.submission_draft()?.clone();
        let payload = build_booking_payload(self.session.user_id, excursion.id, &draft);

        match self.api.create_booking(&payload).await {
            Ok(confirmation) => {
                self.flow.mark_submitted()?;
                // The server decremented the authoritative counts; our
                // snapshot is stale from here on.
                self.excursion = None;
                info!(
                    "Booking submitted: {} ({} x{})",
                    confirmation.id, draft.category, draft.quantity
                );
                Ok(confirmation)
            }
            Err(ApiError::RemoteRejection { status, message }) => {
                self.flow.remote_rejected(message.clone())?;
                Err(ServiceError::Api(ApiError::RemoteRejection {
                    status,
                    message,
                }))
            }
            Err(err) => {
                self.flow.remote_rejected(err.to_string())?;
                Err(ServiceError::Api(err))
            }
        }
    }

    /// Current flow state, for callers rendering the form.
    pub fn state(&self) -> FlowState {
        self.flow.state()
    }
}
