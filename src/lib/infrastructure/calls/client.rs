//! Calling API client

use async_trait::async_trait;
use clap::Parser;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::domain::comms::dialer::{errors::DialError, Dialer};

/// Calling API configuration
#[derive(Clone, Debug, Default, Parser)]
pub struct CallApiConfig {
    /// URL of the third-party calling endpoint
    #[clap(
        long = "call-api-url",
        env = "CALL_API_URL",
        default_value = "http://165.22.175.227:8000/api/v1/phonecalls/make_call_body"
    )]
    pub url: String,
}

/// Dialer backed by the third-party calling API.
#[derive(Clone, Debug)]
pub struct HttpDialer {
    http: Client,
    config: CallApiConfig,
}

#[derive(Debug, Serialize)]
struct CallRequest<'a> {
    phone_number: &'a str,
}

impl HttpDialer {
    /// Create a new dialer. No request is made until a call is placed.
    pub fn new(config: CallApiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Dialer for HttpDialer {
    async fn place_call(&self, phone_number: &str) -> Result<(), DialError> {
        debug!(url = %self.config.url, "forwarding call request");

        let response = self
            .http
            .post(&self.config.url)
            .json(&CallRequest { phone_number })
            .send()
            .await
            .map_err(|err| DialError::UnknownError(err.into()))?;

        if !response.status().is_success() {
            return Err(DialError::Api(response.status().as_u16()));
        }

        Ok(())
    }
}
