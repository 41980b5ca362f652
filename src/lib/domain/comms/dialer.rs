//! Phone call service module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub mod errors;

use errors::DialError;

/// Phone call service
#[async_trait]
pub trait Dialer: Clone + Send + Sync + 'static {
    /// Ask the calling provider to place a call to `phone_number`.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] if the provider accepted the request,
    /// or an [`Err`] containing a [`DialError`] otherwise.
    async fn place_call(&self, phone_number: &str) -> Result<(), DialError>;
}

#[cfg(test)]
mock! {
    pub Dialer {}

    impl Clone for Dialer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Dialer for Dialer {
        async fn place_call(&self, phone_number: &str) -> Result<(), DialError>;
    }
}
