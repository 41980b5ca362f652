//! Recommendation email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::comms::{
        dialer::Dialer,
        emails::{Product, RecommendationEmailTemplate},
        mailer::{Mailer, Message},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Recommendation request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationBody {
    /// Name used in the greeting
    #[schema(example = "Ada")]
    user_name: String,

    /// The subject line
    #[schema(example = "Picked for you")]
    subject: String,

    /// Products to feature, one card each
    products: Vec<Product>,

    /// Campaign landing page, accepted for client compatibility
    #[serde(default)]
    #[schema(example = "https://shop.example.com")]
    call_to_action_url: String,

    /// Number dialled when the reader uses the "make a call" link
    #[serde(default)]
    #[schema(example = "123456789")]
    phone_number: String,

    /// Recipient of the email
    #[schema(example = "customer@example.com")]
    destination_email: String,
}

/// Recommendation response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendRecommendationsResponse {
    /// Whether the message was handed to the transport
    sent: bool,

    /// Human-readable outcome
    #[schema(example = "Recommendations email sent")]
    message: String,
}

/// Render a product recommendation email and send it
#[utoipa::path(
    post,
    operation_id = "send_recommendations",
    tag = "Emails",
    path = "/api/v1/recommendations",
    request_body = RecommendationBody,
    responses(
        (status = StatusCode::OK, description = "Email sent, or skipped when delivery is not configured", body = SendRecommendationsResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Malformed request body", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The mail transport rejected the message", body = ErrorResponse),
        (status = StatusCode::GATEWAY_TIMEOUT, description = "The delivery deadline was exceeded", body = ErrorResponse),
    )
)]
pub async fn handler<M: Mailer, D: Dialer>(
    State(state): State<AppState<M, D>>,
    request: Result<Json<RecommendationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendRecommendationsResponse>), ApiError> {
    let Json(request) = request?;

    let Some(mailer) = &state.mailer else {
        return Ok((
            StatusCode::OK,
            Json(SendRecommendationsResponse {
                sent: false,
                message: "Email delivery is not configured, nothing was sent".to_string(),
            }),
        ));
    };

    let template = RecommendationEmailTemplate::new(
        &state.config.base_url,
        &request.user_name,
        &request.phone_number,
        request.products.clone(),
    );

    let html = template.render_inlined()?;

    let message = Message::new(
        request.subject.clone(),
        html,
        vec![request.destination_email.clone()],
    );

    mailer.deliver(message).await?;

    Ok((
        StatusCode::OK,
        Json(SendRecommendationsResponse {
            sent: true,
            message: "Recommendations email sent".to_string(),
        }),
    ))
}
