//! Site controller.
//!
//! One [`App`] owns the navigation view, the cart and the checkout flag.
//! Views read [`AppState`] through a shared reference and request changes by
//! dispatching a [`Msg`]; nothing else mutates the state.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cart::{compute_totals, Cart, CartTotals};
use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::events::Event;

/// Pages of the site.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "page", content = "id", rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Blog,
    Services,
    Resources,
    /// Detail page of one catalog offering.
    Product(String),
    Cart,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Home => f.write_str("home"),
            View::Blog => f.write_str("blog"),
            View::Services => f.write_str("services"),
            View::Resources => f.write_str("resources"),
            View::Product(id) => write!(f, "product:{id}"),
            View::Cart => f.write_str("cart"),
        }
    }
}

impl FromStr for View {
    type Err = CoreError;

    /// Accepts the names produced by `Display`; `product:<id>` selects a
    /// product page.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("product:") {
            let id = id.trim();
            if id.is_empty() {
                return Err(CoreError::UnknownView(s.to_string()));
            }
            return Ok(View::Product(id.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(View::Home),
            "blog" => Ok(View::Blog),
            "services" => Ok(View::Services),
            "resources" => Ok(View::Resources),
            "cart" => Ok(View::Cart),
            _ => Err(CoreError::UnknownView(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub view: View,
    pub cart: Cart,
    /// True while a checkout is being processed.
    pub loading: bool,
    /// Confirmation shown after an item is added.
    pub notice: Option<String>,
}

/// Requests views may make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum Msg {
    Navigate { view: View },
    AddToCart { id: String },
    /// Add, then go straight to the cart page.
    BuyNow { id: String },
    SetQuantity { id: String, quantity: u32 },
    Increment { id: String },
    /// Lowers the quantity but never below 1.
    Decrement { id: String },
    Remove { id: String },
    DismissNotice,
}

pub struct App {
    state: AppState,
    catalog: Catalog,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            state: AppState::default(),
            catalog,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.state.cart)
    }

    pub fn dispatch(&mut self, msg: Msg) -> Result<Vec<Event>> {
        tracing::debug!(?msg, "dispatch");
        let mut events = Vec::new();
        match msg {
            Msg::Navigate { view } => {
                if let View::Product(id) = &view {
                    self.catalog.require(id)?;
                }
                self.navigate(view, &mut events);
            }
            Msg::AddToCart { id } => self.add_to_cart(&id, &mut events)?,
            Msg::BuyNow { id } => {
                self.add_to_cart(&id, &mut events)?;
                self.navigate(View::Cart, &mut events);
            }
            Msg::SetQuantity { id, quantity } => self.set_quantity(&id, quantity, &mut events),
            Msg::Increment { id } => {
                if let Some(current) = self.state.cart.get(&id).map(|line| line.quantity) {
                    self.set_quantity(&id, current.saturating_add(1), &mut events);
                }
            }
            Msg::Decrement { id } => {
                if let Some(current) = self.state.cart.get(&id).map(|line| line.quantity) {
                    if current > 1 {
                        self.set_quantity(&id, current - 1, &mut events);
                    }
                }
            }
            Msg::Remove { id } => {
                if self.state.cart.get(&id).is_some() {
                    self.state.cart = self.state.cart.remove_item(&id);
                    events.push(Event::ItemRemoved { id, at: Utc::now() });
                }
            }
            Msg::DismissNotice => self.state.notice = None,
        }
        Ok(events)
    }

    /// Mark checkout as in progress. Returns nothing for an empty cart or a
    /// checkout that is already running.
    pub fn begin_checkout(&mut self) -> Option<Event> {
        if self.state.cart.is_empty() || self.state.loading {
            return None;
        }
        self.state.loading = true;
        let totals = self.totals();
        tracing::info!(total = %totals.total, "checkout started");
        Some(Event::CheckoutStarted {
            items: self.state.cart.item_count(),
            total: totals.total(),
            at: Utc::now(),
        })
    }

    /// Empty the cart and return home after processing succeeded.
    pub fn finish_checkout(&mut self) -> Vec<Event> {
        if !self.state.loading {
            return Vec::new();
        }
        let total = self.totals().total();
        let mut events = Vec::new();
        self.state.cart = self.state.cart.clear();
        self.state.loading = false;
        events.push(Event::CartCleared { at: Utc::now() });
        self.navigate(View::Home, &mut events);
        tracing::info!(total, "checkout completed");
        events.push(Event::CheckoutCompleted {
            total,
            at: Utc::now(),
        });
        events
    }

    /// Simulated checkout: wait out the processing delay, then clear the
    /// cart and navigate home.
    pub async fn checkout(&mut self, processing_delay: Duration) -> Vec<Event> {
        let Some(started) = self.begin_checkout() else {
            return Vec::new();
        };
        tokio::time::sleep(processing_delay).await;
        let mut events = vec![started];
        events.extend(self.finish_checkout());
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn navigate(&mut self, to: View, events: &mut Vec<Event>) {
        if self.state.view == to {
            return;
        }
        let from = std::mem::replace(&mut self.state.view, to.clone());
        tracing::debug!(%from, %to, "view changed");
        events.push(Event::ViewChanged {
            from,
            to,
            at: Utc::now(),
        });
    }

    fn add_to_cart(&mut self, id: &str, events: &mut Vec<Event>) -> Result<()> {
        let offering = self.catalog.require(id)?;
        let title = offering.title.clone();
        self.state.cart = self.state.cart.add_item(offering.to_new_item());
        let quantity = self.state.cart.get(id).map_or(1, |line| line.quantity);
        self.state.notice = Some(format!("{title} added to cart"));
        events.push(Event::ItemAdded {
            id: id.to_string(),
            title,
            quantity,
            at: Utc::now(),
        });
        Ok(())
    }

    fn set_quantity(&mut self, id: &str, quantity: u32, events: &mut Vec<Event>) {
        let Some(from) = self.state.cart.get(id).map(|line| line.quantity) else {
            return;
        };
        let next = self.state.cart.set_quantity(id, quantity);
        let to = next.get(id).map_or(from, |line| line.quantity);
        self.state.cart = next;
        if to != from {
            events.push(Event::QuantityChanged {
                id: id.to_string(),
                from,
                to,
                at: Utc::now(),
            });
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}
