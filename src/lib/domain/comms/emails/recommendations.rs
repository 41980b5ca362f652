//! Product recommendation email

use anyhow::Result;
use askama::Template;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A recommended product, rendered as one card in the email.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Product name
    #[schema(example = "Mechanical keyboard")]
    pub name: String,

    /// Short description shown under the name
    #[schema(example = "Tactile switches, compact layout")]
    pub description: String,

    /// Image URL; a placeholder block is rendered when empty
    #[serde(default)]
    #[schema(example = "https://shop.example.com/keyboard.jpg")]
    pub image: String,

    /// Link opened by the BUY NOW button
    #[schema(example = "https://shop.example.com/keyboard")]
    pub buy_url: String,
}

/// Product recommendation email template
#[derive(Debug, Template)]
#[template(path = "emails/recommendations.html")]
pub struct RecommendationEmailTemplate {
    /// Name used in the greeting
    pub user_name: String,

    /// Products to render, one card each
    pub products: Vec<Product>,

    /// Link to the relay's call-action endpoint
    pub call_link: String,
}

impl RecommendationEmailTemplate {
    /// Creates a new `RecommendationEmailTemplate`
    pub fn new(base_url: &str, user_name: &str, phone_number: &str, products: Vec<Product>) -> Self {
        Self {
            user_name: user_name.to_string(),
            products,
            call_link: format!("{base_url}/api/v1/call-action?phone={phone_number}"),
        }
    }

    /// Renders the email with the stylesheet flattened into inline styles,
    /// as most mail clients ignore `<style>` blocks.
    pub fn render_inlined(&self) -> Result<String> {
        Ok(css_inline::inline(&self.render()?)?)
    }
}
