//! # Calmpath Core Library
//!
//! This library provides the stateful pieces of the Calmpath anxiety-support
//! site. Everything else on the site is presentation that renders these
//! states and dispatches changes back.
//!
//! ## Architecture
//!
//! - **Breathing**: a 4-7-8 phase state machine advanced by an external
//!   `tick()`, plus a tokio driver that owns the one-second timer
//! - **Cart**: a pure reducer over ordered line items with derived totals
//! - **App**: the single controller owning the view, the cart and the
//!   checkout flag
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`BreathingSession`]: Breathing phase state machine
//! - [`Pacer`]: Recurring tick driver for a session
//! - [`Cart`]: Cart line items and their transitions
//! - [`App`]: Site controller
//! - [`Config`]: Application configuration management

pub mod app;
pub mod breathing;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod events;
pub mod storage;

pub use app::{App, AppState, Msg, View};
pub use breathing::{BreathingSession, BreathingSnapshot, Pacer, Phase, MAX_CYCLES};
pub use cart::{compute_totals, parse_price, Cart, CartAction, CartItem, CartTotals, Money, NewItem};
pub use catalog::{Catalog, Category, Offering};
pub use error::{ConfigError, CoreError, PriceParseError};
pub use events::Event;
pub use storage::Config;
