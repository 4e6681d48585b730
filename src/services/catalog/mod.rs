//! Catalog backend access.
//!
//! The dialogue engine talks to the e-commerce backend only through
//! [`CatalogClient`]. Every call takes the bearer [`Credential`] obtained
//! right before it from a [`CredentialProvider`]; the client itself holds no
//! token state and caches nothing between calls.

pub mod credentials;
pub mod moltin;

pub use credentials::{ClientCredentialsProvider, Credential, CredentialProvider, StaticCredential};
pub use moltin::MoltinCatalog;

use crate::error::Result;
use crate::models::catalog::{Cart, CartLine, Customer, Product};
use async_trait::async_trait;

/// Operations the dialogue engine needs from the catalog backend.
///
/// Carts are keyed by conversation id. Transport failures are reported as
/// `Error::BackendUnavailable`, non-success answers and unexpected payloads
/// as `Error::BackendError`. Nothing is retried.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_products(&self, credential: &Credential) -> Result<Vec<Product>>;

    /// # Errors
    ///
    /// `Error::NotFound` when the backend does not know the product.
    async fn get_product(&self, credential: &Credential, product_id: &str) -> Result<Product>;

    /// Resolves a file id (e.g. a product's main image) to a public URL.
    async fn resolve_image_url(&self, credential: &Credential, image_id: &str) -> Result<String>;

    /// Adds `quantity` units of a product and returns the resulting line.
    ///
    /// `quantity` must be positive.
    async fn add_cart_item(
        &self,
        credential: &Credential,
        cart_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartLine>;

    async fn get_cart(&self, credential: &Credential, cart_id: &str) -> Result<Cart>;

    /// Removes a cart line by its line id and returns the remaining cart.
    async fn remove_cart_item(
        &self,
        credential: &Credential,
        cart_id: &str,
        line_id: &str,
    ) -> Result<Cart>;

    async fn create_customer(&self, credential: &Credential, email: &str) -> Result<Customer>;
}
