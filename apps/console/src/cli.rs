//! # Command Line
//!
//! Maps `pincorp` subcommands onto the command functions. Every command
//! prints its result as JSON on stdout; failures print an
//! [`ApiError`] as JSON on stderr.
//!
//! ```bash
//! pincorp materials save --name "Lead plate" --sku MAT-PB --price 5000 --stock 120
//! pincorp boms save --name Battery-12V --sku BAT-12V --material <plate-id>:6
//! pincorp production create --bom <bom-id> --quantity 10 --cost "Electricity=50000"
//! pincorp production status <order-id> in_progress
//! pincorp production status <order-id> completed
//! pincorp products price <product-id> 450000
//! pincorp sell --item <product-id>:2 --discount 20000 --payment cash
//! pincorp report --from 2026-03-01 --to 2026-03-31
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pincorp_core::production::OrderRequest;
use pincorp_core::{
    AdditionalCost, Bom, BomMaterial, Money, Operator, OrderStatus, PaymentMethod, Sale, Unit,
};
use pincorp_store::{MaterialInput, Store};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::commands::{boms, config, customers, materials, production, products, reports, sales};
use crate::error::ApiError;
use crate::state::{ConfigState, SalesDeskState};

#[derive(Debug, Parser)]
#[command(name = "pincorp")]
#[command(author, version, about = "PinCorp workshop back office")]
pub struct Cli {
    /// Snapshot file (overrides PINCORP_DATA_PATH)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Raw material catalog
    Materials {
        #[command(subcommand)]
        action: MaterialAction,
    },
    /// Bills of materials
    Boms {
        #[command(subcommand)]
        action: BomAction,
    },
    /// Production orders
    Production {
        #[command(subcommand)]
        action: ProductionAction,
    },
    /// Finished products and selling prices
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Registered customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Ring up and record a sale
    Sell(SellArgs),
    /// Recorded sales
    Sales {
        #[command(subcommand)]
        action: SaleAction,
    },
    /// Revenue, cost and profit over a range of days
    Report {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Show the active configuration
    Config,
}

#[derive(Debug, Subcommand)]
pub enum MaterialAction {
    /// List materials
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a material, or replace one with --id
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        sku: String,
        /// piece, meter, kg, liter or roll
        #[arg(short, long, default_value = "piece")]
        unit: Unit,
        /// Purchase price per unit
        #[arg(long, value_parser = parse_money)]
        price: Money,
        /// Stock on hand (kept as-is when omitted on update)
        #[arg(long)]
        stock: Option<Decimal>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a material
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
    /// Materials that can still be added to a BOM
    Pick {
        /// BOM being edited
        #[arg(long)]
        bom: Option<String>,
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum BomAction {
    /// List BOMs
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a BOM, or replace one with --id
    Save {
        #[arg(long)]
        id: Option<String>,
        /// Finished product name
        #[arg(short, long)]
        name: String,
        /// Finished product SKU
        #[arg(long)]
        sku: String,
        /// Material line as <material-id>:<quantity>, repeatable
        #[arg(short, long = "material", value_parser = parse_bom_line)]
        materials: Vec<BomMaterial>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a BOM
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Material requirements and cost for a quantity
    Cost {
        id: String,
        #[arg(short, long, default_value = "1")]
        quantity: Decimal,
    },
}

/// Order inputs shared by `plan` and `create`.
#[derive(Debug, clap::Args)]
pub struct OrderArgs {
    #[arg(short, long)]
    bom: String,
    #[arg(short, long)]
    quantity: i64,
    /// Extra cost as <description>=<amount>, repeatable
    #[arg(short, long = "cost", value_parser = parse_cost)]
    costs: Vec<AdditionalCost>,
    #[arg(long)]
    notes: Option<String>,
    /// Who created the order
    #[arg(long)]
    user: Option<String>,
}

impl From<OrderArgs> for OrderRequest {
    fn from(args: OrderArgs) -> Self {
        OrderRequest {
            bom_id: args.bom,
            quantity_produced: args.quantity,
            additional_costs: args.costs,
            notes: args.notes,
            user_name: args.user,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductionAction {
    /// List orders, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Check and cost an order without saving it
    Plan(OrderArgs),
    /// Create a pending order
    Create(OrderArgs),
    /// Move an order to pending, in_progress, completed or cancelled
    Status {
        id: String,
        status: OrderStatus,
        /// Confirm a cancellation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List products
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Only products in stock
        #[arg(long)]
        available: bool,
    },
    /// Set the selling price
    Price {
        id: String,
        #[arg(value_parser = parse_money)]
        price: Money,
    },
    /// Profit and margin at current prices
    Quote { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CustomerAction {
    /// List customers
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Look up customers by name or phone
    Find { term: String },
    /// Register a customer
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SaleAction {
    /// List sales, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Debug, clap::Args)]
pub struct SellArgs {
    /// Cart line as <product-id>:<quantity>, repeatable
    #[arg(short, long = "item", value_parser = parse_cart_line, required = true)]
    items: Vec<(String, i64)>,
    #[arg(short, long, value_parser = parse_money)]
    discount: Option<Money>,
    /// Registered customer id
    #[arg(short, long, conflicts_with = "walk_in")]
    customer: Option<String>,
    /// Walk-in buyer name
    #[arg(long)]
    walk_in: Option<String>,
    /// cash or bank
    #[arg(short = 'm', long)]
    payment: Option<PaymentMethod>,
    #[arg(long, default_value = "local")]
    operator_id: String,
    /// Staff member ringing up the sale
    #[arg(short, long, default_value = "Nhân viên")]
    operator: String,
}

// =============================================================================
// Argument Parsers
// =============================================================================

/// Amount in the smallest currency unit; `_` may group digits.
fn parse_money(s: &str) -> Result<Money, String> {
    s.trim()
        .replace('_', "")
        .parse::<i64>()
        .map(Money::from_minor)
        .map_err(|_| format!("invalid amount '{s}'"))
}

fn parse_cart_line(s: &str) -> Result<(String, i64), String> {
    let (id, qty) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <product-id>:<quantity>, got '{s}'"))?;
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity in '{s}'"))?;
    Ok((id.trim().to_string(), qty))
}

fn parse_bom_line(s: &str) -> Result<BomMaterial, String> {
    let (id, qty) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <material-id>:<quantity>, got '{s}'"))?;
    let quantity = qty
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("invalid quantity in '{s}'"))?;
    Ok(BomMaterial {
        material_id: id.trim().to_string(),
        quantity,
    })
}

fn parse_cost(s: &str) -> Result<AdditionalCost, String> {
    let (description, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected <description>=<amount>, got '{s}'"))?;
    Ok(AdditionalCost {
        description: description.trim().to_string(),
        amount: parse_money(amount)?,
    })
}

// =============================================================================
// Dispatch
// =============================================================================

fn json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Runs one command against the store described by `config`.
pub fn execute(command: Commands, config: &ConfigState) -> Result<Value, ApiError> {
    match command {
        Commands::Config => json(config::get_config(config)),
        command => {
            let store = Store::open(config.store_config())?;
            execute_with_store(command, &store, config)
        }
    }
}

fn execute_with_store(
    command: Commands,
    store: &Store,
    config: &ConfigState,
) -> Result<Value, ApiError> {
    match command {
        Commands::Materials { action } => match action {
            MaterialAction::List { search, page } => {
                json(materials::list_materials(store, config, &search, page)?)
            }
            MaterialAction::Save {
                id,
                name,
                sku,
                unit,
                price,
                stock,
                supplier,
                description,
            } => json(materials::save_material(
                store,
                MaterialInput {
                    id,
                    name,
                    sku,
                    unit,
                    purchase_price: price,
                    stock,
                    supplier,
                    description,
                },
            )?),
            MaterialAction::Delete { id, yes } => json(materials::delete_material(store, &id, yes)?),
            MaterialAction::Pick { bom, search } => {
                let existing = match bom {
                    Some(id) => boms::get_bom(store, &id)?.materials,
                    None => Vec::new(),
                };
                json(materials::material_candidates(store, &existing, &search)?)
            }
        },

        Commands::Boms { action } => match action {
            BomAction::List { search, page } => json(boms::list_boms(store, config, &search, page)?),
            BomAction::Save {
                id,
                name,
                sku,
                materials,
                notes,
            } => json(boms::save_bom(
                store,
                Bom {
                    id: id.unwrap_or_default(),
                    product_name: name,
                    product_sku: sku,
                    materials,
                    notes,
                },
            )?),
            BomAction::Delete { id, yes } => json(boms::delete_bom(store, &id, yes)?),
            BomAction::Cost { id, quantity } => json(boms::bom_cost(store, &id, quantity)?),
        },

        Commands::Production { action } => match action {
            ProductionAction::List { page } => json(production::list_orders(store, config, page)?),
            ProductionAction::Plan(args) => {
                json(production::plan_order(store, &OrderRequest::from(args))?)
            }
            ProductionAction::Create(args) => json(production::create_order(store, args.into())?),
            ProductionAction::Status { id, status, yes } => {
                json(production::set_order_status(store, &id, status, yes)?)
            }
        },

        Commands::Products { action } => match action {
            ProductAction::List {
                search,
                available: true,
                ..
            } => json(products::available_products(store, &search)?),
            ProductAction::List { search, page, .. } => {
                json(products::list_products(store, config, &search, page)?)
            }
            ProductAction::Price { id, price } => {
                json(products::set_selling_price(store, config, &id, price)?)
            }
            ProductAction::Quote { id } => json(products::quote_product(store, config, &id)?),
        },

        Commands::Customers { action } => match action {
            CustomerAction::List { search, page } => {
                json(customers::list_customers(store, config, &search, page)?)
            }
            CustomerAction::Find { term } => json(customers::search_customers(store, &term)?),
            CustomerAction::Add {
                name,
                phone,
                address,
            } => json(customers::register_customer(store, &name, &phone, address)?),
        },

        Commands::Sell(args) => json(sell(store, args)?),

        Commands::Sales {
            action: SaleAction::List { page },
        } => json(sales::list_sales(store, config, page)?),

        Commands::Report { from, to } => json(reports::sales_report(store, config, from, to)?),

        Commands::Config => json(config::get_config(config)),
    }
}

/// Drives the sales desk through one whole sale.
fn sell(store: &Store, args: SellArgs) -> Result<Sale, ApiError> {
    let desk = SalesDeskState::new();

    for (product_id, quantity) in &args.items {
        sales::add_to_cart(store, &desk, product_id, *quantity)?;
    }
    if let Some(discount) = args.discount {
        sales::set_discount(&desk, discount)?;
    }
    match (args.customer, args.walk_in) {
        (Some(id), _) => {
            sales::select_customer(store, &desk, &id)?;
        }
        (None, Some(name)) => {
            sales::set_walk_in_name(&desk, &name)?;
        }
        (None, None) => {}
    }
    if let Some(method) = args.payment {
        sales::set_payment_method(&desk, method)?;
    }

    let operator = Operator {
        id: args.operator_id,
        name: args.operator,
    };
    sales::checkout(store, &desk, &operator)
}
