//! Outbound email infrastructure

mod smtp;
mod transport;

pub use smtp::{SmtpConfig, SmtpMailer};
pub use transport::{MailTransport, SmtpRelay};
