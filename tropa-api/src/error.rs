use tropa_catalog::NormalizeError;
use uuid::Uuid;

/// Failures talking to the remote booking API.
///
/// `RemoteRejection` carries the server's message verbatim: local
/// validation cannot prevent two clients racing for the last ticket, so the
/// server's post-hoc verdict must be displayable as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Excursion not found: {0}")]
    NotFound(Uuid),

    #[error("Booking rejected by server: {message}")]
    RemoteRejection { status: u16, message: String },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
