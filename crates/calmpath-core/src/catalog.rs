//! Products and services offered on the site.
//!
//! Product and service pages look offerings up here by id and hand them to
//! the cart as [`NewItem`]s.

use serde::{Deserialize, Serialize};

use crate::cart::{parse_price, Money, NewItem};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Product,
    Service,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Product => "product",
            Category::Service => "service",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: String,
    pub title: String,
    pub price: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl Offering {
    fn new(
        id: &str,
        title: &str,
        price: &str,
        category: Category,
        description: &str,
        image: &str,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            category,
            description: description.into(),
            image: image.into(),
        }
    }

    pub fn to_new_item(&self) -> NewItem {
        let mut item = NewItem::new(&self.id, &self.title, &self.price)
            .with_category(self.category.as_str());
        if !self.description.is_empty() {
            item = item.with_description(&self.description);
        }
        if !self.image.is_empty() {
            item = item.with_image(&self.image);
        }
        item
    }

    pub fn unit_price(&self) -> Result<Money> {
        Ok(parse_price(&self.price)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub offerings: Vec<Offering>,
}

impl Catalog {
    /// Everything currently listed on the site.
    pub fn builtin() -> Self {
        use Category::{Product, Service};
        Self {
            offerings: vec![
                Offering::new(
                    "calm-journal",
                    "The Calm Journal",
                    "$24",
                    Product,
                    "A 90-day guided journal for noticing and reframing anxious thoughts.",
                    "images/calm-journal.jpg",
                ),
                Offering::new(
                    "anxiety-workbook",
                    "Anxiety Relief Workbook",
                    "$19",
                    Product,
                    "Printable CBT worksheets, grounding exercises and a worry log.",
                    "images/workbook.jpg",
                ),
                Offering::new(
                    "breathing-cards",
                    "Breathing Exercise Card Deck",
                    "$15",
                    Product,
                    "52 pocket cards with breathing and grounding techniques.",
                    "images/breathing-cards.jpg",
                ),
                Offering::new(
                    "calm-mind-course",
                    "Calm Mind Course",
                    "$47",
                    Product,
                    "Six self-paced video lessons on understanding and easing anxiety.",
                    "images/course.jpg",
                ),
                Offering::new(
                    "coaching-session",
                    "1:1 Anxiety Coaching Session",
                    "$97",
                    Service,
                    "A 50-minute video session with a certified anxiety coach.",
                    "images/coaching.jpg",
                ),
                Offering::new(
                    "coaching-package",
                    "Coaching Package (4 Sessions)",
                    "$349",
                    Service,
                    "Four weekly coaching sessions with a personalised coping plan.",
                    "images/coaching-package.jpg",
                ),
                Offering::new(
                    "group-workshop",
                    "Group Calm Workshop",
                    "$35",
                    Service,
                    "A live 90-minute small-group workshop on breathing and grounding.",
                    "images/workshop.jpg",
                ),
            ],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Offering> {
        self.offerings.iter()
    }

    pub fn find(&self, id: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    /// Like [`Catalog::find`] but with an error naming the missing id.
    pub fn require(&self, id: &str) -> Result<&Offering> {
        self.find(id)
            .ok_or_else(|| CoreError::UnknownOffering(id.to_string()))
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Offering> {
        self.offerings.iter().filter(move |o| o.category == category)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<_> = catalog.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.offerings.len());
    }

    #[test]
    fn builtin_prices_all_parse() {
        for offering in Catalog::builtin().iter() {
            assert!(offering.unit_price().is_ok(), "bad price on {}", offering.id);
        }
    }

    #[test]
    fn to_new_item_keeps_metadata() {
        let catalog = Catalog::builtin();
        let item = catalog.require("calm-mind-course").unwrap().to_new_item();
        assert_eq!(item.price, "$47");
        assert_eq!(item.category.as_deref(), Some("product"));
        assert!(item.description.is_some());
    }

    #[test]
    fn require_unknown_id_errors() {
        let err = Catalog::builtin().require("nope").unwrap_err();
        assert!(matches!(err, CoreError::UnknownOffering(id) if id == "nope"));
    }

    #[test]
    fn services_are_filterable() {
        let catalog = Catalog::builtin();
        assert!(catalog.by_category(Category::Service).count() >= 2);
    }
}
