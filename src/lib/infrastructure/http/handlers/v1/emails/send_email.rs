//! Plain email handler

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
        mailer::{Mailer, Message},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Send email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// Address shown in the heading of the generated email
    #[schema(example = "customer@example.com")]
    mail: String,

    /// The subject line
    #[schema(example = "Hello")]
    subject: String,

    /// Text content, wrapped in minimal HTML
    #[schema(example = "Just checking in.")]
    body: String,
}

impl SendEmailBody {
    /// The HTML document delivered for this request.
    fn to_html(&self) -> String {
        format!(
            "<h1>{}</h1>\n<h2>{}</h2>\n<p>{}</p>",
            self.mail, self.subject, self.body
        )
    }
}

/// Send email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    /// Whether the message was handed to the transport
    sent: bool,

    /// Human-readable outcome
    #[schema(example = "Email sent")]
    message: String,
}

/// Send a plain email to the configured destination address
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Emails",
    path = "/api/v1/send-email",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent, or skipped when delivery is not configured", body = SendEmailResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Malformed request body", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The mail transport rejected the message", body = ErrorResponse),
        (status = StatusCode::GATEWAY_TIMEOUT, description = "The delivery deadline was exceeded", body = ErrorResponse),
    )
)]
pub async fn handler<M: Mailer, D: Dialer>(
    State(state): State<AppState<M, D>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendEmailResponse>), ApiError> {
    let Json(request) = request?;

    let Some(mailer) = &state.mailer else {
        return Ok((
            StatusCode::OK,
            Json(SendEmailResponse {
                sent: false,
                message: "Email delivery is not configured, nothing was sent".to_string(),
            }),
        ));
    };

    let message = Message::new(
        request.subject.clone(),
        request.to_html(),
        vec![state.config.default_destination.clone()],
    );

    mailer.deliver(message).await?;

    Ok((
        StatusCode::OK,
        Json(SendEmailResponse {
            sent: true,
            message: "Email sent".to_string(),
        }),
    ))
}
