//! Email delivery service module

use std::time::Duration;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub mod errors;

mod message;

pub use message::Message;

use errors::DeliveryError;

/// Wall-clock deadline for a single delivery attempt, measured from the
/// moment the attempt starts. The sole upper bound on call latency as
/// observed by the caller.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Email delivery service
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Perform one delivery attempt for `message`.
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver, owned by this single attempt.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] if the transport accepted the message
    /// before the deadline, or an [`Err`] containing the [`DeliveryError`]
    /// that ended the attempt. Nothing is retried.
    async fn deliver(&self, message: Message) -> Result<(), DeliveryError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn deliver(&self, message: Message) -> Result<(), DeliveryError>;
    }
}
