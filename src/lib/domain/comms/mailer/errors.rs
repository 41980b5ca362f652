//! Delivery errors

use std::path::PathBuf;

use thiserror::Error;

use super::DELIVERY_TIMEOUT;

/// The failure that ended a delivery attempt. Every variant is terminal for
/// the call; retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// An attachment could not be read. Raised before any network I/O, so no
    /// connection was attempted.
    #[error("could not read attachment {}", path.display())]
    Attachment {
        /// The offending path
        path: PathBuf,

        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The transport rejected the message or the connection failed.
    #[error(transparent)]
    Transport(anyhow::Error),

    /// The delivery deadline elapsed before the transport answered. The
    /// in-flight send is detached, not cancelled.
    #[error("timeout sending email after {} seconds", DELIVERY_TIMEOUT.as_secs())]
    Timeout,
}
