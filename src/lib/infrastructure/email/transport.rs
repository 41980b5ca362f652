//! SMTP transport seam

use anyhow::Result;
use async_trait::async_trait;
use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use super::smtp::SmtpConfig;

/// A point-to-point channel that can push one composed email over the wire.
///
/// The delivery deadline lives above this seam, so implementations do not
/// bound their own run time.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send one composed message over a single connection.
    async fn send(&self, message: lettre::Message) -> Result<()>;
}

/// STARTTLS relay transport backed by lettre.
#[derive(Clone, Debug)]
pub struct SmtpRelay {
    config: SmtpConfig,
}

impl SmtpRelay {
    /// Create a new relay transport. No connection is opened until `send`.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(
            self.config.sender_address.clone(),
            self.config.sender_password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .credentials(creds)
                .port(self.config.port)
                .tls(Tls::Opportunistic(
                    TlsParameters::builder(self.config.host.clone())
                        .dangerous_accept_invalid_certs(!self.config.verify_tls)
                        .build()?,
                ))
                .build(),
        )
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn send(&self, message: lettre::Message) -> Result<()> {
        self.transport()?.send(message).await?;

        Ok(())
    }
}
