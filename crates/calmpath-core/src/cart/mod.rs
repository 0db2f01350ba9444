mod item;
mod price;
mod reducer;
mod totals;

pub use item::{CartItem, NewItem};
pub use price::{parse_price, Money};
pub use reducer::{add_item, clear, reduce, remove_item, set_quantity, Cart, CartAction};
pub use totals::{compute_totals, CartTotals, TAX_RATE};
