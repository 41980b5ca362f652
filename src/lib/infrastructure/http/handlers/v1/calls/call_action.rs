//! Call action handler
//!
//! The GET form is opened from the "Make a call!" link inside a delivered
//! recommendation email, so both handlers answer with a human-facing HTML
//! page rather than JSON.

use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::comms::{dialer::Dialer, mailer::Mailer},
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Phone call request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PhoneCallBody {
    /// Number to call
    #[schema(example = "123456789")]
    phone_number: String,
}

/// Query parameters for the GET form of the call action
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallActionParams {
    /// Number to call
    phone: Option<String>,
}

/// Page shown when the call was accepted
#[derive(Debug, Template)]
#[template(path = "calls/call_started.html")]
struct CallStartedPage {
    phone_number: String,
}

/// Page shown when the call could not be placed
#[derive(Debug, Template)]
#[template(path = "calls/call_failed.html")]
struct CallFailedPage {
    phone_number: String,
    error: String,
}

/// Start a phone call from an email link
#[utoipa::path(
    get,
    operation_id = "make_call_from_link",
    tag = "Calls",
    path = "/api/v1/call-action",
    params(CallActionParams),
    responses(
        (status = StatusCode::OK, description = "Call initiated", content_type = "text/html"),
        (status = StatusCode::BAD_REQUEST, description = "Missing phone number", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The calling API rejected the request", content_type = "text/html"),
    )
)]
pub async fn get_handler<M: Mailer, D: Dialer>(
    State(state): State<AppState<M, D>>,
    Query(params): Query<CallActionParams>,
) -> Result<Response, ApiError> {
    let phone_number = params.phone.unwrap_or_default();

    if phone_number.is_empty() {
        return Err(ApiError::new_400("Phone number is required"));
    }

    Ok(place_call(&state, phone_number).await)
}

/// Start a phone call
#[utoipa::path(
    post,
    operation_id = "make_call",
    tag = "Calls",
    path = "/api/v1/call-action",
    request_body = PhoneCallBody,
    responses(
        (status = StatusCode::OK, description = "Call initiated", content_type = "text/html"),
        (status = StatusCode::BAD_REQUEST, description = "Missing phone number", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The calling API rejected the request", content_type = "text/html"),
    )
)]
pub async fn post_handler<M: Mailer, D: Dialer>(
    State(state): State<AppState<M, D>>,
    request: Result<Json<PhoneCallBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;

    if request.phone_number.is_empty() {
        return Err(ApiError::new_400("Phone number is required"));
    }

    Ok(place_call(&state, request.phone_number).await)
}

async fn place_call<M: Mailer, D: Dialer>(
    state: &AppState<M, D>,
    phone_number: String,
) -> Response {
    match state.dialer.place_call(&phone_number).await {
        Ok(()) => CallStartedPage { phone_number }.into_response(),
        Err(err) => {
            warn!("failed to place call to {phone_number}: {err}");

            let page = CallFailedPage {
                phone_number,
                error: err.to_string(),
            };

            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::comms::dialer::{errors::DialError, MockDialer},
        infrastructure::http::{
            errors::ErrorResponse, handlers::v1::calls::call_action::PhoneCallBody, router,
            state::test_state,
        },
    };

    #[tokio::test]
    async fn test_call_action_get_success() -> TestResult {
        let mut dialer = MockDialer::new();

        dialer
            .expect_place_call()
            .withf(|phone| phone == "123456789")
            .returning(|_| Ok(()));

        let state = test_state(None, Some(dialer));

        let response = TestServer::new(router(state))?
            .get("/api/v1/call-action")
            .add_query_param("phone", "123456789")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let text = response.text();

        assert!(text.contains("Call started successfully"));
        assert!(text.contains("123456789"));

        Ok(())
    }

    #[tokio::test]
    async fn test_call_action_get_missing_phone() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state))?
            .get("/api/v1/call-action")
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(json.error, "Phone number is required");

        Ok(())
    }

    #[tokio::test]
    async fn test_call_action_post_success() -> TestResult {
        let mut dialer = MockDialer::new();

        dialer
            .expect_place_call()
            .withf(|phone| phone == "123456789")
            .returning(|_| Ok(()));

        let state = test_state(None, Some(dialer));

        let response = TestServer::new(router(state))?
            .post("/api/v1/call-action")
            .json(&PhoneCallBody {
                phone_number: "123456789".to_string(),
            })
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("Call started successfully"));

        Ok(())
    }

    #[tokio::test]
    async fn test_call_action_api_failure() -> TestResult {
        let mut dialer = MockDialer::new();

        dialer
            .expect_place_call()
            .returning(|_| Err(DialError::Api(500)));

        let state = test_state(None, Some(dialer));

        let response = TestServer::new(router(state))?
            .post("/api/v1/call-action")
            .json(&PhoneCallBody {
                phone_number: "123456789".to_string(),
            })
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

        let text = response.text();

        assert!(text.contains("could not be placed"));
        assert!(text.contains("status 500"));

        Ok(())
    }
}
