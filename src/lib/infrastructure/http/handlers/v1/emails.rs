//! Email endpoints

pub mod send_email;
pub mod send_recommendations;
