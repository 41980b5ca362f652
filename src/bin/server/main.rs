#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for the notification relay

use anyhow::Result;
use clap::Parser;
use notification_relay::infrastructure::{
    calls::{CallApiConfig, HttpDialer},
    email::{SmtpConfig, SmtpMailer},
    http::{
        state::{AppConfig, AppState},
        HttpServer, HttpServerConfig,
    },
};
use tracing::{info, warn};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The application configuration
    #[clap(flatten)]
    pub app: AppConfig,

    /// The SMTP sender configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The calling API configuration
    #[clap(flatten)]
    pub call_api: CallApiConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using the process environment");
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mailer = if args.smtp.is_configured() {
        Some(SmtpMailer::new(args.smtp))
    } else {
        warn!("email sender is not configured, emails will not be sent");
        None
    };

    let dialer = HttpDialer::new(args.call_api);

    let state = AppState::new(args.app, mailer, dialer);

    info!("starting notification relay on port {}", args.server.port);

    HttpServer::new(state, args.server)?.run().await
}
