use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use mwood_core_contact_contracts::{ContactService, SendInquiryError, SEND_INQUIRY_CONFIRMATION};

use crate::models::contact::{ApiDispatchResult, ApiInquiryPayload};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(send_inquiry))
        .with_state(service)
}

async fn send_inquiry(
    service: State<Arc<impl ContactService>>,
    Json(payload): Json<ApiInquiryPayload>,
) -> Response {
    match service.send_inquiry(payload.into()).await {
        Ok(()) => dispatched(StatusCode::OK, Ok(SEND_INQUIRY_CONFIRMATION.into())),
        Err(err @ (SendInquiryError::IncompleteInquiry | SendInquiryError::InvalidEmail)) => {
            dispatched(StatusCode::UNPROCESSABLE_ENTITY, Err(err.to_string()))
        }
        Err(err @ SendInquiryError::NotConfigured) => {
            dispatched(StatusCode::SERVICE_UNAVAILABLE, Err(err.to_string()))
        }
        Err(err @ SendInquiryError::Send) => {
            dispatched(StatusCode::BAD_GATEWAY, Err(err.to_string()))
        }
        Err(SendInquiryError::Other(err)) => {
            tracing::error!("internal server error: {err}");
            dispatched(
                StatusCode::INTERNAL_SERVER_ERROR,
                Err(SendInquiryError::Send.to_string()),
            )
        }
    }
}

fn dispatched(code: StatusCode, result: Result<String, String>) -> Response {
    let body = match result {
        Ok(message) => ApiDispatchResult {
            success: true,
            message: Some(message),
            error: None,
        },
        Err(error) => ApiDispatchResult {
            success: false,
            message: None,
            error: Some(error),
        },
    };
    (code, Json(body)).into_response()
}
