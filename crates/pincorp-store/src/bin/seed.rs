//! # Seed Data Generator
//!
//! Populates a snapshot with a demo battery workshop for development.
//!
//! ## Usage
//! ```bash
//! # Write ./pincorp_dev.json (default)
//! cargo run -p pincorp-store --bin seed
//!
//! # Specify snapshot path
//! cargo run -p pincorp-store --bin seed -- --data ./data/pincorp.json
//!
//! # Produce more of each product
//! cargo run -p pincorp-store --bin seed -- --batches 3
//! ```
//!
//! ## Generated Data
//! - Materials bought by a battery and charger workshop, in mixed units
//! - One BOM per finished product
//! - Production orders run through to completion, so products have stock
//!   and a cost price
//! - Selling prices at a 35% markup on cost
//! - A few registered customers

use std::env;

use pincorp_core::production::OrderRequest;
use pincorp_core::{AdditionalCost, Bom, BomMaterial, Money, OrderStatus, Unit};
use pincorp_store::repository::material::MaterialInput;
use pincorp_store::{Store, StoreConfig};
use rust_decimal::Decimal;

/// (name, sku, unit, purchase price, opening stock)
const MATERIALS: &[(&str, &str, Unit, i64, i64)] = &[
    ("Lead plate", "MAT-PLATE", Unit::Piece, 5_000, 400),
    ("ABS casing 12V", "MAT-CASE12", Unit::Piece, 20_000, 60),
    ("ABS casing 24V", "MAT-CASE24", Unit::Piece, 32_000, 40),
    ("Sulfuric acid", "MAT-ACID", Unit::Liter, 18_000, 120),
    ("Copper wire 2.5mm", "MAT-CU25", Unit::Meter, 9_000, 500),
    ("Terminal clamp", "MAT-CLAMP", Unit::Piece, 3_500, 300),
    ("PCB charger board", "MAT-PCB", Unit::Piece, 45_000, 50),
    ("Insulation tape", "MAT-TAPE", Unit::Roll, 12_000, 80),
    ("Epoxy resin", "MAT-EPOXY", Unit::Kg, 95_000, 20),
];

/// (product name, sku, [(material sku, quantity in tenths)])
const BOMS: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Battery-12V",
        "BAT-12V",
        &[("MAT-PLATE", 20), ("MAT-CASE12", 10), ("MAT-ACID", 15), ("MAT-CLAMP", 20)],
    ),
    (
        "Battery-24V",
        "BAT-24V",
        &[("MAT-PLATE", 40), ("MAT-CASE24", 10), ("MAT-ACID", 30), ("MAT-CLAMP", 20)],
    ),
    (
        "Charger 12V/5A",
        "CHG-12V",
        &[("MAT-PCB", 10), ("MAT-CU25", 12), ("MAT-TAPE", 2), ("MAT-EPOXY", 1)],
    ),
];

/// (name, phone, address)
const CUSTOMERS: &[(&str, &str, Option<&str>)] = &[
    ("Anh Minh", "0901234567", Some("12 Lê Lợi, Q.1")),
    ("Chị Hoa", "0912345678", None),
    ("Garage Tân Phú", "02838123456", Some("45 Lũy Bán Bích")),
];

/// Units produced per BOM per batch.
const BATCH_SIZE: i64 = 5;

/// Selling price markup over cost, in basis points.
const MARKUP_BPS: i64 = 3_500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut data_path = String::from("./pincorp_dev.json");
    let mut batches: i64 = 1;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                if i + 1 < args.len() {
                    data_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--batches" | "-b" => {
                if i + 1 < args.len() {
                    batches = args[i + 1].parse().unwrap_or(1).max(1);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("PinCorp Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data <PATH>     Snapshot file path (default: ./pincorp_dev.json)");
                println!("  -b, --batches <N>     Production batches per product (default: 1)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 PinCorp Seed Data Generator");
    println!("==============================");
    println!("Snapshot: {}", data_path);
    println!("Batches:  {}", batches);
    println!();

    let store = Store::open(StoreConfig::new(&data_path).autosave(false))?;

    let existing = store.materials().list("")?.len();
    if existing > 0 {
        println!("⚠ Snapshot already has {} materials", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the snapshot file to regenerate.");
        return Ok(());
    }

    // Materials
    let mut material_ids = Vec::with_capacity(MATERIALS.len());
    for &(name, sku, unit, price, stock) in MATERIALS {
        let material = store.materials().save(MaterialInput {
            id: None,
            name: name.to_string(),
            sku: sku.to_string(),
            unit,
            purchase_price: Money::from_minor(price),
            stock: Some(Decimal::from(stock * batches)),
            supplier: Some("Công ty Vật tư Sài Gòn".to_string()),
            description: None,
        })?;
        material_ids.push((sku, material.id));
    }
    println!("✓ {} materials", material_ids.len());

    // BOMs
    let mut boms = Vec::with_capacity(BOMS.len());
    for &(product_name, product_sku, lines) in BOMS {
        let mut materials = Vec::with_capacity(lines.len());
        for &(sku, tenths) in lines {
            let Some((_, id)) = material_ids.iter().find(|(s, _)| *s == sku) else {
                eprintln!("Unknown material {} in BOM {}", sku, product_sku);
                continue;
            };
            materials.push(BomMaterial {
                material_id: id.clone(),
                quantity: Decimal::new(tenths, 1),
            });
        }

        let bom = store.boms().save(Bom {
            id: String::new(),
            product_name: product_name.to_string(),
            product_sku: product_sku.to_string(),
            materials,
            notes: None,
        })?;
        boms.push(bom);
    }
    println!("✓ {} BOMs", boms.len());

    // Production
    let production = store.production();
    let mut completed = 0;
    for bom in &boms {
        for _ in 0..batches {
            let request = OrderRequest {
                bom_id: bom.id.clone(),
                quantity_produced: BATCH_SIZE,
                additional_costs: vec![AdditionalCost {
                    description: "Nhân công".to_string(),
                    amount: Money::from_minor(50_000),
                }],
                notes: None,
                user_name: Some("seed".to_string()),
            };

            let order = match production.create_order(request) {
                Ok(order) => order,
                Err(e) => {
                    eprintln!("Skipping {}: {}", bom.product_sku, e);
                    continue;
                }
            };
            production.set_status(&order.id, OrderStatus::InProgress, false)?;
            production.set_status(&order.id, OrderStatus::Completed, false)?;
            completed += 1;
        }
    }
    println!("✓ {} production orders completed", completed);

    // Selling prices
    for product in store.products().list("")? {
        let markup = product.cost_price.minor() * MARKUP_BPS / 10_000;
        let price = Money::from_minor(product.cost_price.minor() + markup);
        store.products().set_selling_price(&product.id, price)?;
        println!("  {} → {}", product.sku, price);
    }

    // Customers
    for &(name, phone, address) in CUSTOMERS {
        store
            .customers()
            .register(name, phone, address.map(str::to_string))?;
    }
    println!("✓ {} customers", CUSTOMERS.len());

    store.save()?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
