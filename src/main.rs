//! Batch Cost Calculator
//!
//! Works out what a recipe batch costs to make, in total and per unit.

mod calculator;
mod error;
mod models;
mod report;
mod session;
mod store;

use std::convert::Infallible;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::models::{CostEntry, EntryMode, IngredientUpdate, Recipe};
use crate::report::CostReport;
use crate::session::Session;
use crate::store::RecipeStore;

#[derive(Parser)]
#[command(name = "batch-cost")]
#[command(about = "Recipe batch cost calculator")]
struct Cli {
    /// Path to the SQLite database holding the current recipe
    #[arg(short, long, env = "BATCH_COST_DB", default_value = "batch_cost.db")]
    database: PathBuf,

    /// Currency symbol used when printing amounts
    #[arg(long, env = "BATCH_COST_CURRENCY", default_value = report::DEFAULT_CURRENCY)]
    currency: String,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current recipe and its costs
    Show,

    /// Set the recipe name
    Name { name: String },

    /// Set how many units the batch yields
    Units {
        #[arg(value_parser = amount, allow_negative_numbers = true)]
        total_units: f64,
    },

    /// Add an ingredient (direct mode when --direct is given)
    Add(IngredientArgs),

    /// Edit an ingredient by id or row number
    Edit {
        ingredient: String,

        #[command(flatten)]
        fields: IngredientArgs,
    },

    /// Switch an ingredient between detailed and direct cost entry
    Mode { ingredient: String, mode: EntryMode },

    /// Remove an ingredient by id or row number
    Remove { ingredient: String },

    /// Show the cost report, optionally saving it as a text file
    Report {
        /// Directory to write <recipe>_cost_report.txt into
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Discard the current recipe and start a new one
    Reset,

    /// List the suggested unit labels
    ListUnits,
}

#[derive(Args)]
struct IngredientArgs {
    #[arg(short, long)]
    name: Option<String>,

    /// Purchase price
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    price: Option<f64>,

    /// Quantity bought for that price
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    qty: Option<f64>,

    /// Unit of the purchased quantity
    #[arg(long)]
    unit: Option<String>,

    /// Quantity used in the batch
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    used: Option<f64>,

    /// Unit of the used quantity
    #[arg(long)]
    used_unit: Option<String>,

    /// Flat cost of this ingredient for the batch
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    direct: Option<f64>,
}

impl IngredientArgs {
    fn to_update(&self) -> IngredientUpdate {
        IngredientUpdate {
            name: self.name.clone(),
            purchase_price: self.price,
            purchase_quantity: self.qty,
            purchase_unit: self.unit.clone(),
            used_quantity: self.used,
            used_unit: self.used_unit.clone(),
            direct_cost: self.direct,
        }
    }
}

/// Amounts never fail to parse; junk counts as zero
fn amount(s: &str) -> Result<f64, Infallible> {
    Ok(models::parse_amount(s))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = RecipeStore::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    let mut session = Session::open(store)?;
    let currency = cli.currency.as_str();

    match cli.command {
        Commands::Show => {
            print_recipe(session.recipe(), currency);
        }

        Commands::Name { name } => {
            session.set_name(&name)?;
            println!("Recipe name set to '{}'", name);
        }

        Commands::Units { total_units } => {
            session.set_total_units(total_units)?;
            print_totals(session.recipe(), currency);
        }

        Commands::Add(args) => {
            let mode = if args.direct.is_some() {
                EntryMode::Direct
            } else {
                EntryMode::Detailed
            };
            let id = session.add_ingredient(mode, &args.to_update())?;
            println!("Added ingredient {}", id);
            print_totals(session.recipe(), currency);
        }

        Commands::Edit { ingredient, fields } => {
            session.update_ingredient(&ingredient, &fields.to_update())?;
            print_totals(session.recipe(), currency);
        }

        Commands::Mode { ingredient, mode } => {
            session.set_entry_mode(&ingredient, mode)?;
            print_totals(session.recipe(), currency);
        }

        Commands::Remove { ingredient } => {
            let removed = session.remove_ingredient(&ingredient)?;
            println!("Removed {}", display_name(&removed.name));
            print_totals(session.recipe(), currency);
        }

        Commands::Report { save } => {
            session.generate_report()?;
            let report = CostReport::new(session.recipe(), currency);
            print!("{}", report);
            if let Some(dir) = save {
                let path = report.export(&dir)?;
                println!("\nReport saved to {}", path.display());
            }
        }

        Commands::Reset => {
            session.reset()?;
            println!("Started a new calculation.");
        }

        Commands::ListUnits => {
            println!("Suggested units:");
            for unit in models::UNIT_OPTIONS {
                println!("  {}", unit);
            }
        }
    }

    Ok(())
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "Unnamed ingredient" } else { name }
}

fn print_recipe(recipe: &Recipe, currency: &str) {
    if recipe.is_blank() {
        println!("No recipe yet. Start with 'name', 'units' or 'add'.");
        return;
    }

    let title = if recipe.name.is_empty() { "(unnamed)" } else { recipe.name.as_str() };
    println!("Recipe: {}", title);
    println!("  ID: {}", recipe.id);
    println!("  Units produced: {}", recipe.total_units);
    println!();

    if recipe.ingredients.is_empty() {
        println!("No ingredients added yet.");
    } else {
        println!("{:<4} {:<24} {:<8} {:<36} {:>10}", "#", "Ingredient", "Mode", "Details", "Cost");
        println!("{}", "-".repeat(86));
        for (row, ingredient) in recipe.ingredients.iter().enumerate() {
            let (mode, details) = match &ingredient.entry {
                CostEntry::Detailed {
                    purchase_price,
                    purchase_quantity,
                    purchase_unit,
                    used_quantity,
                    used_unit,
                } => (
                    "detailed",
                    format!(
                        "{}{} for {}{}, uses {}{}",
                        currency,
                        purchase_price,
                        purchase_quantity,
                        purchase_unit,
                        used_quantity,
                        used_unit
                    ),
                ),
                CostEntry::Direct { .. } => ("direct", String::new()),
            };
            println!(
                "{:<4} {:<24} {:<8} {:<36} {:>10}",
                row + 1,
                display_name(&ingredient.name),
                mode,
                details,
                format!("{}{:.2}", currency, ingredient.cost)
            );
        }
    }
    println!();

    if recipe.show_results && report::has_data(recipe) {
        print_totals(recipe, currency);
    } else if !recipe.show_results {
        println!("Run 'report' to see cost calculations.");
    } else {
        println!("Enter recipe details to see cost calculations.");
    }
}

/// Totals stay hidden until a report has been generated
fn print_totals(recipe: &Recipe, currency: &str) {
    if !recipe.show_results {
        return;
    }
    println!("Total batch cost: {}{:.2}", currency, recipe.total_cost);
    println!("Cost per unit:    {}{:.2}", currency, recipe.cost_per_unit);
}
