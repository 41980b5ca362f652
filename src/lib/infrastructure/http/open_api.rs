//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::comms::emails::Product,
    infrastructure::http::{errors::ErrorResponse, handlers::v1::*},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Notification Relay"),
    paths(
        emails::send_email::handler,
        emails::send_recommendations::handler,
        calls::call_action::get_handler,
        calls::call_action::post_handler,
        health::handler
    ),
    components(schemas(
        emails::send_email::SendEmailBody,
        emails::send_email::SendEmailResponse,
        emails::send_recommendations::RecommendationBody,
        emails::send_recommendations::SendRecommendationsResponse,
        calls::call_action::PhoneCallBody,
        health::HealthResponse,
        Product,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
