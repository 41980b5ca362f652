//! Outbound communication: email delivery and phone calls.

pub mod dialer;
pub mod emails;
pub mod mailer;
