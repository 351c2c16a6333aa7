use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use tropa_booking::{BookingRequest, BookingStatus};
use tropa_catalog::{Excursion, ExcursionDto};
use tropa_store::app_config::ApiConfig;
use tropa_store::Session;
use uuid::Uuid;

use crate::error::ApiError;

/// Seam over the remote booking API, so the flow can be driven against an
/// in-memory fake in tests.
#[async_trait]
pub trait ExcursionsApi: Send + Sync {
    async fn get_excursion(&self, id: Uuid) -> Result<Excursion, ApiError>;
    async fn create_booking(&self, request: &BookingRequest)
        -> Result<BookingConfirmation, ApiError>;
}

/// Created booking as returned by `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub id: Uuid,
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the booking API.
#[derive(Clone)]
pub struct BookingApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BookingApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    /// Attach the session's bearer token to subsequent requests.
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = session.token.clone();
        self
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl ExcursionsApi for BookingApiClient {
    async fn get_excursion(&self, id: Uuid) -> Result<Excursion, ApiError> {
        let response = self
            .request(self.client.get(format!("{}/excursions/{}", self.base_url, id)))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let dto = response
                    .json::<ExcursionDto>()
                    .await
                    .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;
                Ok(Excursion::try_from(dto)?)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(id)),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::RequestFailed(format!("status {}: {}", status, body)))
            }
        }
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let response = self
            .request(self.client.post(format!("{}/bookings", self.base_url)))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let confirmation = response
                .json::<BookingConfirmation>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;
            info!("Booking created: {}", confirmation.id);
            return Ok(confirmation);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        // The server rejects with an `{ "message": ... }` body, e.g. when
        // the inventory changed since our snapshot. Keep it verbatim.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        Err(ApiError::RemoteRejection {
            status: status.as_u16(),
            message,
        })
    }
}
