//! Application state module

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::domain::comms::{dialer::Dialer, mailer::Mailer};

/// Application configuration
#[derive(Clone, Debug, Parser)]
pub struct AppConfig {
    /// Public base URL, used in links embedded in outgoing emails
    #[clap(long, env = "BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Destination address for plain send-email requests
    #[clap(long, env = "DESTINATION_EMAIL", default_value = "")]
    pub default_destination: String,
}

/// Global application state
#[derive(Clone)]
pub struct AppState<M: Mailer, D: Dialer> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// Email delivery service; `None` when the sender account is not
    /// configured, in which case email endpoints answer without sending
    pub mailer: Option<Arc<M>>,

    /// Phone call service
    pub dialer: Arc<D>,
}

impl<M, D> AppState<M, D>
where
    M: Mailer,
    D: Dialer,
{
    /// Create a new application state
    pub fn new(config: AppConfig, mailer: Option<M>, dialer: D) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            mailer: mailer.map(Arc::new),
            dialer: Arc::new(dialer),
        }
    }
}

impl<M, D> fmt::Debug for AppState<M, D>
where
    M: Mailer,
    D: Dialer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("mailer", &self.mailer.is_some())
            .field("dialer", &"Dialer")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::comms::{dialer::MockDialer, mailer::MockMailer};

#[cfg(test)]
pub fn test_state(
    mailer: Option<MockMailer>,
    dialer: Option<MockDialer>,
) -> AppState<MockMailer, MockDialer> {
    let mailer = mailer
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockMailer::new()));

    let dialer = dialer
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockDialer::new()));

    let config = AppConfig {
        base_url: "https://relay.example.com".to_string(),
        default_destination: "inbox@example.com".to_string(),
    };

    AppState {
        start_time: Utc::now(),
        config,
        mailer: Some(mailer),
        dialer,
    }
}

#[cfg(test)]
pub fn test_state_without_mailer() -> AppState<MockMailer, MockDialer> {
    let mut state = test_state(None, None);
    state.mailer = None;

    state
}
