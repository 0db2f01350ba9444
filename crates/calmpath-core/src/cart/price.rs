//! Price strings and money amounts.
//!
//! Catalog prices are display strings such as `"$47"`. Totals are computed
//! in whole cents so that `$50 x 2 + $10` taxes to exactly `$8.80`.

use serde::{Deserialize, Serialize};

use crate::error::PriceParseError;

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Amount in dollars, for callers that want a plain number.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_mul(self, factor: u64) -> Money {
        Money(self.0.saturating_mul(factor))
    }

    /// Multiply by `numerator / denominator`, rounding half up to the cent.
    pub fn scale(self, numerator: u64, denominator: u64) -> Money {
        if denominator == 0 {
            return Money::ZERO;
        }
        let scaled = u128::from(self.0) * u128::from(numerator);
        let rounded = (scaled + u128::from(denominator) / 2) / u128::from(denominator);
        Money(u64::try_from(rounded).unwrap_or(u64::MAX))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("${}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

/// Parse a display price into cents.
///
/// One currency marker may lead or trail the amount: a symbol (`$`, `€`) or
/// an alphabetic code set apart by whitespace or a dot (`USD 1,200.50`,
/// `Rs. 500`, `500 EUR`). What remains must read `digits[,ddd]*[.digits]`;
/// `,` only groups thousands. Fractions finer than a cent are rounded half
/// up.
pub fn parse_price(raw: &str) -> Result<Money, PriceParseError> {
    let malformed = || PriceParseError::Malformed(raw.to_string());

    let mut body = raw.trim();
    let mut negative = false;
    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest.trim_start();
    }
    body = strip_leading_marker(body);
    if !negative {
        if let Some(rest) = body.strip_prefix('-') {
            negative = true;
            body = rest.trim_start();
        }
    }
    body = strip_trailing_marker(body);

    if body.is_empty() {
        return Err(PriceParseError::Empty(raw.to_string()));
    }

    let (whole, frac) = match body.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (body, None),
    };
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
    } else if whole.is_empty() {
        return Err(malformed());
    }
    if !is_grouped_digits(whole) {
        return Err(malformed());
    }

    let whole: u64 = match whole.replace(',', "") {
        digits if digits.is_empty() => 0,
        digits => digits.parse().map_err(|_| malformed())?,
    };

    let digits: Vec<u64> = frac
        .unwrap_or("")
        .bytes()
        .map(|b| u64::from(b - b'0'))
        .collect();
    let mut cents = digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
    if digits.get(2).is_some_and(|&d| d >= 5) {
        cents += 1;
    }

    let total = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .ok_or_else(malformed)?;

    if negative && total > 0 {
        return Err(PriceParseError::Negative(raw.to_string()));
    }
    Ok(Money(total))
}

fn is_currency_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '+')
}

/// `USD`, `Rs.`, `eur`.
fn is_currency_code(word: &str) -> bool {
    let letters = word.strip_suffix('.').unwrap_or(word);
    !letters.is_empty() && letters.chars().all(char::is_alphabetic)
}

fn strip_leading_marker(s: &str) -> &str {
    let code_len = s.find(|c: char| !c.is_alphabetic()).unwrap_or(s.len());
    let mut rest = &s[code_len..];
    if code_len > 0 {
        if let Some(after_dot) = rest.strip_prefix('.') {
            rest = after_dot;
        } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
            // Letters glued to the amount are not a currency code.
            return s;
        }
    }
    rest.trim_start().trim_start_matches(is_currency_symbol).trim_start()
}

fn strip_trailing_marker(s: &str) -> &str {
    let s = s.trim_end_matches(is_currency_symbol).trim_end();
    match s.rsplit_once(char::is_whitespace) {
        Some((head, code)) if is_currency_code(code) => head
            .trim_end()
            .trim_end_matches(is_currency_symbol)
            .trim_end(),
        _ => s,
    }
}

/// Plain digits, or `1-3 digits` followed by `,ddd` groups. Empty is allowed
/// for amounts like `.75`.
fn is_grouped_digits(s: &str) -> bool {
    if !s.contains(',') {
        return s.bytes().all(|b| b.is_ascii_digit());
    }
    let mut groups = s.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    first_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}
