//! Integration tests for the cart reducer and totals.

use calmpath_core::cart::{add_item, clear, remove_item, set_quantity};
use calmpath_core::{compute_totals, Cart, CartAction, Money, NewItem};
use proptest::prelude::*;

fn item(id: &str, price: &str) -> NewItem {
    NewItem::new(id, format!("Item {id}"), price)
}

#[test]
fn test_adding_same_id_twice_merges() {
    let cart = add_item(item("x", "$5"), &Cart::new());
    let cart = add_item(item("x", "$5"), &cart);
    assert_eq!(cart.len(), 1);
    let line = cart.get("x").unwrap();
    assert_eq!(line.id, "x");
    assert_eq!(line.quantity, 2);
}

#[test]
fn test_quantity_floor() {
    let cart = add_item(item("x", "$5"), &Cart::new());
    let cart = set_quantity("x", 3, &cart);
    let after = set_quantity("x", 0, &cart);
    assert_eq!(after.get("x").unwrap().quantity, 3);
    assert_eq!(after, cart);
}

#[test]
fn test_totals_arithmetic() {
    let cart = Cart::new()
        .add_item(item("a", "$50"))
        .add_item(item("b", "$10"))
        .set_quantity("a", 2);
    let totals = compute_totals(&cart);
    assert_eq!(totals.subtotal(), 110.00);
    assert_eq!(totals.tax(), 8.80);
    assert_eq!(totals.total(), 118.80);
    assert_eq!(totals.total.to_string(), "$118.80");
}

#[test]
fn test_removal_preserves_order() {
    let cart = ["A", "B", "C"]
        .iter()
        .fold(Cart::new(), |cart, id| add_item(item(id, "$1"), &cart));
    let cart = remove_item("B", &cart);
    let ids: Vec<_> = cart.iter().map(|line| line.id.as_str()).collect();
    assert_eq!(ids, ["A", "C"]);
}

#[test]
fn test_clear_then_totals_zero() {
    let cart = Cart::new()
        .add_item(item("a", "$50"))
        .add_item(item("b", "$10"));
    let cart = clear(&cart);
    assert!(cart.is_empty());
    let totals = compute_totals(&cart);
    assert_eq!(totals.subtotal(), 0.0);
    assert_eq!(totals.tax(), 0.0);
    assert_eq!(totals.total(), 0.0);
}

#[test]
fn test_malformed_price_line_does_not_block_totals() {
    let cart = Cart::new()
        .add_item(item("good", "$30"))
        .add_item(item("broken", "$3.0.0"))
        .add_item(item("fine", "USD 1,000"));
    let totals = compute_totals(&cart);
    assert_eq!(totals.subtotal, Money::from_cents(103_000));
    assert_eq!(totals.skipped, vec!["broken".to_string()]);
}

#[test]
fn test_cart_json_is_plain_array() {
    let cart = Cart::new().add_item(item("a", "$1"));
    let json = serde_json::to_value(&cart).unwrap();
    assert!(json.is_array());
    assert_eq!(json[0]["quantity"], 1);
}

fn action_strategy() -> impl Strategy<Value = CartAction> {
    let id = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
    prop_oneof![
        4 => id.clone().prop_map(|id| CartAction::Add(NewItem::new(id.clone(), id, "$3"))),
        2 => (id.clone(), 0u32..5).prop_map(|(id, quantity)| CartAction::SetQuantity { id, quantity }),
        1 => id.prop_map(|id| CartAction::Remove { id }),
        1 => Just(CartAction::Clear),
    ]
}

proptest! {
    #[test]
    fn ids_stay_unique_and_quantities_positive(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut cart = Cart::new();
        for action in actions {
            cart = cart.apply(action);
            let mut ids: Vec<_> = cart.iter().map(|line| line.id.clone()).collect();
            prop_assert!(cart.iter().all(|line| line.quantity >= 1));
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.len());
        }
    }

    #[test]
    fn surviving_lines_keep_relative_order(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut cart = Cart::new();
        for action in actions {
            let before: Vec<_> = cart.iter().map(|line| line.id.clone()).collect();
            cart = cart.apply(action);
            let after: Vec<_> = cart.iter().map(|line| line.id.clone()).collect();
            let kept: Vec<_> = before.iter().filter(|id| after.contains(id)).cloned().collect();
            prop_assert_eq!(&after[..kept.len()], &kept[..]);
        }
    }

    #[test]
    fn total_is_subtotal_plus_tax(quantities in prop::collection::vec(1u32..20, 1..5)) {
        let mut cart = Cart::new();
        for (i, quantity) in quantities.iter().enumerate() {
            let id = format!("item-{i}");
            cart = cart.add_item(NewItem::new(id.clone(), id.clone(), "$12.34"));
            cart = cart.set_quantity(&id, *quantity);
        }
        let totals = compute_totals(&cart);
        let expected: u64 = quantities.iter().map(|q| 1_234 * u64::from(*q)).sum();
        prop_assert_eq!(totals.subtotal.cents(), expected);
        prop_assert_eq!(totals.total.cents(), totals.subtotal.cents() + totals.tax.cents());
    }
}
