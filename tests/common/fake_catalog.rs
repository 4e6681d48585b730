//! In-memory catalog backend for integration tests.
//!
//! Holds products and per-conversation carts, records every call and can be
//! switched into a failing mode mid-test.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use storefront::error::{Error, Result};
use storefront::models::catalog::{Cart, CartLine, Customer, Product};
use storefront::services::catalog::{CatalogClient, Credential};

/// Price per unit in cents for every product of the fake catalog.
pub const UNIT_AMOUNT: i64 = 450;

pub fn format_amount(amount: i64) -> String {
    format!("${}.{:02}", amount / 100, amount % 100)
}

pub struct FakeCatalog {
    products: Vec<Product>,
    carts: Mutex<HashMap<String, Vec<CartLine>>>,
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
    next_line: Mutex<u32>,
}

impl FakeCatalog {
    /// Catalog with products P1 (with an image) and P2.
    pub fn new() -> Self {
        Self {
            products: vec![
                Product {
                    id: "P1".to_string(),
                    name: "Salmon".to_string(),
                    description: "Atlantic salmon".to_string(),
                    price: format_amount(UNIT_AMOUNT),
                    image_id: Some("img-P1".to_string()),
                },
                Product {
                    id: "P2".to_string(),
                    name: "Tuna".to_string(),
                    description: "Yellowfin tuna".to_string(),
                    price: format_amount(UNIT_AMOUNT),
                    image_id: None,
                },
            ],
            carts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            next_line: Mutex::new(0),
        }
    }

    /// Makes every following call fail as if the backend were down.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cart_lines(&self, cart_id: &str) -> Vec<CartLine> {
        self.carts
            .lock()
            .unwrap()
            .get(cart_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::BackendUnavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn product(&self, product_id: &str) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| Error::NotFound(format!("product {product_id}")))
    }

    fn cart(&self, cart_id: &str) -> Cart {
        let lines = self.cart_lines(cart_id);
        let total_amount = lines.iter().map(|l| l.line_amount).sum();
        Cart {
            lines,
            total: format_amount(total_amount),
            total_amount,
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_products(&self, _credential: &Credential) -> Result<Vec<Product>> {
        self.record("list_products".to_string())?;
        Ok(self.products.clone())
    }

    async fn get_product(&self, _credential: &Credential, product_id: &str) -> Result<Product> {
        self.record(format!("get_product:{product_id}"))?;
        self.product(product_id).cloned()
    }

    async fn resolve_image_url(&self, _credential: &Credential, image_id: &str) -> Result<String> {
        self.record(format!("resolve_image_url:{image_id}"))?;
        Ok(format!("https://cdn.example.com/{image_id}.png"))
    }

    async fn add_cart_item(
        &self,
        _credential: &Credential,
        cart_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartLine> {
        self.record(format!("add_cart_item:{cart_id}:{product_id}:{quantity}"))?;
        let product = self.product(product_id)?.clone();

        let line_id = {
            let mut next = self.next_line.lock().unwrap();
            *next += 1;
            format!("line-{}", *next)
        };
        let line_amount = UNIT_AMOUNT * quantity as i64;
        let line = CartLine {
            id: line_id,
            product_id: product.id,
            name: product.name,
            description: product.description,
            quantity,
            unit_price: product.price,
            line_price: format_amount(line_amount),
            line_amount,
        };

        self.carts
            .lock()
            .unwrap()
            .entry(cart_id.to_string())
            .or_default()
            .push(line.clone());
        Ok(line)
    }

    async fn get_cart(&self, _credential: &Credential, cart_id: &str) -> Result<Cart> {
        self.record(format!("get_cart:{cart_id}"))?;
        Ok(self.cart(cart_id))
    }

    async fn remove_cart_item(
        &self,
        _credential: &Credential,
        cart_id: &str,
        line_id: &str,
    ) -> Result<Cart> {
        self.record(format!("remove_cart_item:{cart_id}:{line_id}"))?;
        if let Some(lines) = self.carts.lock().unwrap().get_mut(cart_id) {
            lines.retain(|l| l.id != line_id);
        }
        Ok(self.cart(cart_id))
    }

    async fn create_customer(&self, _credential: &Credential, email: &str) -> Result<Customer> {
        self.record(format!("create_customer:{email}"))?;
        Ok(Customer {
            id: "customer-1".to_string(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
        })
    }
}
