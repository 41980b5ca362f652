use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::comms::{dialer::Dialer, mailer::Mailer},
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod calls;
pub mod emails;
pub mod health;
pub mod stoplight;

pub fn router<M: Mailer, D: Dialer>() -> Router<AppState<M, D>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/health", get(health::handler))
        .route("/send-email", post(emails::send_email::handler))
        .route(
            "/recommendations",
            post(emails::send_recommendations::handler),
        )
        .route(
            "/call-action",
            get(calls::call_action::get_handler).post(calls::call_action::post_handler),
        )
}
