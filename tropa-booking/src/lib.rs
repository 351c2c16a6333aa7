pub mod allocator;
pub mod flow;
pub mod payload;

pub use allocator::{
    available_dates, categories_for_date, clamp_quantity, max_quantity, validate_selection,
    SelectionError, ValidatedSelection,
};
pub use flow::{BookingFlow, FlowError, FlowState};
pub use payload::{build_booking_payload, BookingRequest, BookingStatus};
