use calmpath_core::{Catalog, Category};
use clap::Subcommand;

use super::CmdResult;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List offerings
    List {
        /// Only products or only services
        #[arg(long, value_parser = ["product", "service"])]
        category: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one offering as JSON
    Show {
        /// Offering id
        id: String,
    },
}

pub fn run(action: CatalogAction) -> CmdResult {
    let catalog = Catalog::builtin();
    match action {
        CatalogAction::List { category, json } => {
            let wanted = category.as_deref().map(|c| match c {
                "service" => Category::Service,
                _ => Category::Product,
            });
            let offerings: Vec<_> = catalog
                .iter()
                .filter(|o| wanted.map_or(true, |c| o.category == c))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&offerings)?);
            } else {
                for o in offerings {
                    println!("{:<20} {:>6}  {:<8} {}", o.id, o.price, o.category.as_str(), o.title);
                }
            }
        }
        CatalogAction::Show { id } => {
            let offering = catalog.require(&id)?;
            println!("{}", serde_json::to_string_pretty(offering)?);
        }
    }
    Ok(())
}
