pub mod client;
pub mod error;
pub mod service;

pub use client::{BookingApiClient, BookingConfirmation, ExcursionsApi};
pub use error::ApiError;
pub use service::{BookingService, ServiceError};
