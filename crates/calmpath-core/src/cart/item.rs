use serde::{Deserialize, Serialize};

use super::price::{parse_price, Money};
use crate::error::PriceParseError;

/// A product or service about to be put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: String,
    pub title: String,
    /// Display price, e.g. `"$47"`.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            category: None,
            description: None,
            image: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One row of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub price: String,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Parsed unit price.
    pub fn unit_price(&self) -> Result<Money, PriceParseError> {
        parse_price(&self.price)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, PriceParseError> {
        Ok(self.unit_price()?.saturating_mul(u64::from(self.quantity)))
    }
}

impl From<NewItem> for CartItem {
    fn from(item: NewItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: item.price,
            quantity: 1,
            category: item.category,
            description: item.description,
            image: item.image,
        }
    }
}
