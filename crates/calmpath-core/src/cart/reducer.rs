//! Cart state transitions.
//!
//! Every operation takes the current cart by reference and returns the next
//! one. The previous snapshot is never touched, so a hosting view can keep
//! it around for diffing or undo.

use serde::{Deserialize, Serialize};

use super::item::{CartItem, NewItem};

/// Ordered line items with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// One requested change to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartAction {
    Add(NewItem),
    SetQuantity { id: String, quantity: u32 },
    Remove { id: String },
    Clear,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Append `item` with quantity 1, or bump the quantity of the line that
    /// already carries its id. The existing line keeps its position and
    /// fields.
    pub fn add_item(&self, item: NewItem) -> Cart {
        let mut items = self.items.clone();
        match items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                tracing::debug!(id = %line.id, quantity = line.quantity, "cart line incremented");
            }
            None => {
                tracing::debug!(id = %item.id, "cart line appended");
                items.push(CartItem::from(item));
            }
        }
        Cart { items }
    }

    /// Replace the quantity of line `id`. Quantities below 1 are refused and
    /// unknown ids are ignored; both return an identical cart.
    pub fn set_quantity(&self, id: &str, quantity: u32) -> Cart {
        if quantity < 1 {
            tracing::warn!(id, quantity, "rejected cart quantity below 1");
            return self.clone();
        }
        let items = self
            .items
            .iter()
            .map(|line| {
                if line.id == id {
                    CartItem {
                        quantity,
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect();
        Cart { items }
    }

    /// Drop line `id`, keeping the others in order.
    pub fn remove_item(&self, id: &str) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|line| line.id != id)
                .cloned()
                .collect(),
        }
    }

    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    /// Apply a single action.
    pub fn apply(&self, action: CartAction) -> Cart {
        reduce(self, action)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

pub fn reduce(cart: &Cart, action: CartAction) -> Cart {
    match action {
        CartAction::Add(item) => cart.add_item(item),
        CartAction::SetQuantity { id, quantity } => cart.set_quantity(&id, quantity),
        CartAction::Remove { id } => cart.remove_item(&id),
        CartAction::Clear => cart.clear(),
    }
}

pub fn add_item(item: NewItem, cart: &Cart) -> Cart {
    cart.add_item(item)
}

pub fn set_quantity(id: &str, quantity: u32, cart: &Cart) -> Cart {
    cart.set_quantity(id, quantity)
}

pub fn remove_item(id: &str, cart: &Cart) -> Cart {
    cart.remove_item(id)
}

pub fn clear(cart: &Cart) -> Cart {
    cart.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: &str) -> NewItem {
        NewItem::new(id, id.to_uppercase(), price)
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.iter().map(|line| line.id.as_str()).collect()
    }

    #[test]
    fn add_appends_with_quantity_one() {
        let cart = Cart::new().add_item(item("a", "$1")).add_item(item("b", "$2"));
        assert_eq!(ids(&cart), ["a", "b"]);
        assert!(cart.iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn re_adding_merges_in_place() {
        let cart = Cart::new()
            .add_item(item("a", "$1"))
            .add_item(item("b", "$2"))
            .add_item(item("a", "$999"));
        assert_eq!(ids(&cart), ["a", "b"]);
        let a = cart.get("a").unwrap();
        assert_eq!(a.quantity, 2);
        assert_eq!(a.price, "$1");
    }

    #[test]
    fn add_carries_metadata_through() {
        let cart = Cart::new().add_item(
            item("journal", "$24")
                .with_category("product")
                .with_description("Guided prompts")
                .with_image("journal.png"),
        );
        let line = cart.get("journal").unwrap();
        assert_eq!(line.category.as_deref(), Some("product"));
        assert_eq!(line.description.as_deref(), Some("Guided prompts"));
        assert_eq!(line.image.as_deref(), Some("journal.png"));
    }

    #[test]
    fn set_quantity_replaces() {
        let cart = Cart::new().add_item(item("a", "$1")).set_quantity("a", 5);
        assert_eq!(cart.get("a").unwrap().quantity, 5);
    }

    #[test]
    fn set_quantity_below_one_is_refused() {
        let cart = Cart::new().add_item(item("a", "$1")).add_item(item("a", "$1"));
        let next = cart.set_quantity("a", 0);
        assert_eq!(next, cart);
        assert_eq!(next.get("a").unwrap().quantity, 2);
    }

    #[test]
    fn set_quantity_unknown_id_is_noop() {
        let cart = Cart::new().add_item(item("a", "$1"));
        assert_eq!(cart.set_quantity("zzz", 3), cart);
    }

    #[test]
    fn remove_keeps_order() {
        let cart = Cart::new()
            .add_item(item("a", "$1"))
            .add_item(item("b", "$1"))
            .add_item(item("c", "$1"));
        assert_eq!(ids(&cart.remove_item("b")), ["a", "c"]);
        assert_eq!(cart.remove_item("zzz"), cart);
    }

    #[test]
    fn transitions_leave_previous_snapshot_alone() {
        let before = Cart::new().add_item(item("a", "$1"));
        let _after = before.add_item(item("a", "$1")).remove_item("a");
        assert_eq!(before.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn reduce_dispatches_actions() {
        let cart = reduce(&Cart::new(), CartAction::Add(item("a", "$1")));
        let cart = reduce(
            &cart,
            CartAction::SetQuantity {
                id: "a".into(),
                quantity: 3,
            },
        );
        assert_eq!(cart.item_count(), 3);
        let cart = reduce(&cart, CartAction::Clear);
        assert!(cart.is_empty());
    }

    #[test]
    fn free_functions_mirror_methods() {
        let cart = add_item(item("a", "$1"), &Cart::new());
        let cart = add_item(item("a", "$1"), &cart);
        assert_eq!(cart.len(), 1);
        assert_eq!(set_quantity("a", 4, &cart).item_count(), 4);
        assert!(remove_item("a", &cart).is_empty());
        assert!(clear(&cart).is_empty());
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: CartAction =
            serde_json::from_str(r#"{"action":"remove","id":"a"}"#).unwrap();
        assert_eq!(action, CartAction::Remove { id: "a".into() });
    }
}
