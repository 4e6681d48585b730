//! Catalog backend entities as seen by the dialogue engine.
//!
//! These are read-only snapshots: the engine never mutates them locally, it
//! asks the catalog client to and re-fetches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price formatted with tax, e.g. "$12.00"
    pub price: String,
    /// File id of the main image, if the product has one
    pub image_id: Option<String>,
}

/// One line of a cart. `id` is the cart-item id used for removal, which is
/// not the product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    /// Line value in minor currency units
    pub line_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    /// Cart total formatted with tax
    pub total: String,
    /// Cart total in minor currency units
    pub total_amount: i64,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line amounts as returned by the backend.
    pub fn lines_amount(&self) -> i64 {
        self.lines.iter().map(|line| line.line_amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}
