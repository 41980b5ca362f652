//! Email content rendering.

mod recommendations;

pub use recommendations::{Product, RecommendationEmailTemplate};
