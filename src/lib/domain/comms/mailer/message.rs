//! Email message

use std::path::PathBuf;

/// A fully-formed email message, owned by the caller and handed over for a
/// single delivery attempt.
///
/// Nothing here is validated: subject and body may be empty, and recipient
/// addresses are passed through to the transport, which may reject them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// The subject line
    pub subject: String,

    /// The HTML body
    pub html_body: String,

    /// Primary recipients
    pub to: Vec<String>,

    /// Carbon-copy recipients
    pub cc: Vec<String>,

    /// Blind-copy recipients
    pub bcc: Vec<String>,

    /// Paths of files to attach
    pub attachments: Vec<PathBuf>,
}

impl Message {
    /// Create a message with the given subject, HTML body and primary
    /// recipients, and no cc, bcc or attachments.
    pub fn new(subject: impl Into<String>, html_body: impl Into<String>, to: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            html_body: html_body.into(),
            to,
            ..Self::default()
        }
    }
}
