//! Line-oriented shop front.
//!
//! Reads one command per line from stdin and dispatches it to the site
//! controller. A bad line is reported and skipped; it never ends the session.

use std::io::BufRead;
use std::time::Duration;

use calmpath_core::{App, CartTotals, Catalog, Config, Event, Msg, View};
use clap::Args;
use serde_json::json;

use super::{runtime, CmdResult};

#[derive(Args)]
pub struct ShopArgs {
    /// Print events and state as JSON lines
    #[arg(long)]
    json: bool,
    /// Override the simulated checkout delay (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Dispatch(Msg),
    ShowCart,
    Totals,
    Checkout,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  view <home|blog|services|resources|cart|product:<id>>
  add <id>        add to cart
  buy <id>        add to cart and open the cart
  qty <id> <n>    set quantity (n >= 1)
  inc <id>        quantity + 1
  dec <id>        quantity - 1 (stops at 1)
  rm <id>         remove line
  cart            show cart
  totals          show subtotal, tax and total
  checkout        pay and empty the cart
  quit";

fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let id = |usage: &str| -> Result<String, String> {
        match args.as_slice() {
            [id] => Ok((*id).to_string()),
            _ => Err(format!("usage: {usage}")),
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "view" | "go" => {
            let name = args.join(" ");
            let view: View = name.parse().map_err(|e| format!("{e}"))?;
            Command::Dispatch(Msg::Navigate { view })
        }
        "add" => Command::Dispatch(Msg::AddToCart { id: id("add <id>")? }),
        "buy" => Command::Dispatch(Msg::BuyNow { id: id("buy <id>")? }),
        "inc" => Command::Dispatch(Msg::Increment { id: id("inc <id>")? }),
        "dec" => Command::Dispatch(Msg::Decrement { id: id("dec <id>")? }),
        "rm" | "remove" => Command::Dispatch(Msg::Remove { id: id("rm <id>")? }),
        "qty" => match args.as_slice() {
            [id, n] => {
                let quantity = n
                    .parse::<u32>()
                    .map_err(|_| format!("not a quantity: {n}"))?;
                Command::Dispatch(Msg::SetQuantity {
                    id: (*id).to_string(),
                    quantity,
                })
            }
            _ => return Err("usage: qty <id> <n>".into()),
        },
        "cart" => Command::ShowCart,
        "totals" => Command::Totals,
        "checkout" => Command::Checkout,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(command))
}

pub fn run(args: ShopArgs) -> CmdResult {
    let config = Config::load_or_default();
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.checkout.processing_delay());
    let rt = runtime()?;
    let mut app = App::new(Catalog::builtin());
    let out = Output {
        json: args.json,
        confirm_add: config.shop.confirm_add,
    };

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        tracing::debug!(%line, "shop input");
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        match command {
            Command::Dispatch(msg) => match app.dispatch(msg) {
                Ok(events) => out.events(&app, &events)?,
                Err(e) => eprintln!("error: {e}"),
            },
            Command::ShowCart => out.cart(&app)?,
            Command::Totals => out.totals(&app.totals())?,
            Command::Checkout => {
                if app.state().cart.is_empty() {
                    eprintln!("error: cart is empty");
                    continue;
                }
                if !out.json {
                    println!("processing payment...");
                }
                let events = rt.block_on(app.checkout(delay));
                out.events(&app, &events)?;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}

struct Output {
    json: bool,
    confirm_add: bool,
}

impl Output {
    fn events(&self, app: &App, events: &[Event]) -> CmdResult {
        for event in events {
            if self.json {
                println!("{}", serde_json::to_string(event)?);
                continue;
            }
            match event {
                Event::ItemAdded { .. } if self.confirm_add => {
                    if let Some(notice) = &app.state().notice {
                        println!("{notice}");
                    }
                }
                Event::QuantityChanged { id, to, .. } => println!("{id}: quantity {to}"),
                Event::ItemRemoved { id, .. } => println!("removed {id}"),
                Event::ViewChanged { to, .. } => println!("view: {to}"),
                Event::CheckoutCompleted { total, .. } => {
                    println!("order complete, charged ${total:.2}")
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn cart(&self, app: &App) -> CmdResult {
        let cart = &app.state().cart;
        if self.json {
            println!("{}", serde_json::to_string(cart)?);
            return Ok(());
        }
        if cart.is_empty() {
            println!("cart is empty");
            return Ok(());
        }
        for line in cart {
            let line_total = match line.line_total() {
                Ok(amount) => amount.to_string(),
                Err(_) => "n/a".to_string(),
            };
            println!(
                "{:>3} x {:<32} {:>8} {:>10}",
                line.quantity, line.title, line.price, line_total
            );
        }
        Ok(())
    }

    fn totals(&self, totals: &CartTotals) -> CmdResult {
        if self.json {
            let value = json!({
                "subtotal": totals.subtotal(),
                "tax": totals.tax(),
                "total": totals.total(),
                "skipped": totals.skipped,
            });
            println!("{value}");
            return Ok(());
        }
        println!("Subtotal: {:>10}", totals.subtotal);
        println!("Tax (8%): {:>10}", totals.tax);
        println!("Total:    {:>10}", totals.total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cart_commands() {
        assert_eq!(
            parse_line("add calm-journal").unwrap(),
            Some(Command::Dispatch(Msg::AddToCart {
                id: "calm-journal".into()
            }))
        );
        assert_eq!(
            parse_line("qty calm-journal 3").unwrap(),
            Some(Command::Dispatch(Msg::SetQuantity {
                id: "calm-journal".into(),
                quantity: 3
            }))
        );
        assert_eq!(parse_line("  ").unwrap(), None);
        assert_eq!(parse_line("QUIT").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn parses_views() {
        assert_eq!(
            parse_line("view product:calm-journal").unwrap(),
            Some(Command::Dispatch(Msg::Navigate {
                view: View::Product("calm-journal".into())
            }))
        );
        assert!(parse_line("view shop").is_err());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_line("add").is_err());
        assert!(parse_line("qty calm-journal many").is_err());
        assert!(parse_line("dance").is_err());
    }

    #[test]
    fn negative_quantity_is_not_a_number() {
        assert_eq!(
            parse_line("qty a -1").unwrap_err(),
            "not a quantity: -1"
        );
    }
}
