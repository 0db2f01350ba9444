use serde::{Deserialize, Serialize};

use super::price::Money;
use super::reducer::Cart;

/// Flat sales tax applied to every order.
pub const TAX_RATE: f64 = 0.08;

const TAX_RATE_PERCENT: u64 = 8;

/// Derived order totals. Never stored; recompute from the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    /// Ids of lines whose price could not be read. They count as zero.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl CartTotals {
    pub fn subtotal(&self) -> f64 {
        self.subtotal.as_f64()
    }

    pub fn tax(&self) -> f64 {
        self.tax.as_f64()
    }

    pub fn total(&self) -> f64 {
        self.total.as_f64()
    }
}

pub fn compute_totals(cart: &Cart) -> CartTotals {
    let mut skipped = Vec::new();
    let subtotal: Money = cart
        .iter()
        .map(|line| match line.line_total() {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(id = %line.id, "skipping cart line in totals: {e}");
                skipped.push(line.id.clone());
                Money::ZERO
            }
        })
        .sum();
    let tax = subtotal.scale(TAX_RATE_PERCENT, 100);
    CartTotals {
        subtotal,
        tax,
        total: subtotal.saturating_add(tax),
        skipped,
    }
}
