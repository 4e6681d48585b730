//! Moltin v2 catalog client.
//!
//! Implements [`CatalogClient`] over the Moltin JSON API with `reqwest`.
//! Wire types are private to this module; only the catalog models leave it.

use super::CatalogClient;
use super::credentials::Credential;
use crate::error::{Error, Result};
use crate::models::catalog::{Cart, CartLine, Customer, Product};
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Response bodies are cut to this many characters in error messages.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize, Default)]
struct Money {
    #[serde(default)]
    amount: i64,
    #[serde(default)]
    formatted: String,
}

#[derive(Debug, Deserialize)]
struct WireProductPrice {
    with_tax: Money,
}

#[derive(Debug, Deserialize)]
struct WireProductMeta {
    display_price: WireProductPrice,
}

#[derive(Debug, Deserialize)]
struct WireRelationshipData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WireRelationship {
    data: Option<WireRelationshipData>,
}

#[derive(Debug, Deserialize, Default)]
struct WireRelationships {
    main_image: Option<WireRelationship>,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    meta: WireProductMeta,
    #[serde(default)]
    relationships: WireRelationships,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        let image_id = wire
            .relationships
            .main_image
            .and_then(|rel| rel.data)
            .map(|data| data.id);

        Product {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            price: wire.meta.display_price.with_tax.formatted,
            image_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireLink {
    href: String,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    link: WireLink,
}

#[derive(Debug, Deserialize)]
struct WireLinePrice {
    unit: Money,
    value: Money,
}

#[derive(Debug, Deserialize)]
struct WireLineDisplayPrice {
    with_tax: WireLinePrice,
}

#[derive(Debug, Deserialize)]
struct WireLineMeta {
    display_price: WireLineDisplayPrice,
}

#[derive(Debug, Deserialize)]
struct WireCartItem {
    id: String,
    #[serde(default)]
    product_id: String,
    name: String,
    #[serde(default)]
    description: String,
    quantity: u32,
    meta: WireLineMeta,
}

impl From<WireCartItem> for CartLine {
    fn from(wire: WireCartItem) -> Self {
        let price = wire.meta.display_price.with_tax;
        CartLine {
            id: wire.id,
            product_id: wire.product_id,
            name: wire.name,
            description: wire.description,
            quantity: wire.quantity,
            unit_price: price.unit.formatted,
            line_price: price.value.formatted,
            line_amount: price.value.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCartDisplayPrice {
    with_tax: Money,
}

#[derive(Debug, Deserialize)]
struct WireCartMeta {
    display_price: WireCartDisplayPrice,
}

#[derive(Debug, Deserialize)]
struct WireCartItems {
    data: Vec<WireCartItem>,
    meta: Option<WireCartMeta>,
}

impl From<WireCartItems> for Cart {
    fn from(wire: WireCartItems) -> Self {
        let total = wire
            .meta
            .map(|meta| meta.display_price.with_tax)
            .unwrap_or_default();

        Cart {
            lines: wire.data.into_iter().map(CartLine::from).collect(),
            total: total.formatted,
            total_amount: total.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCustomer {
    id: String,
    #[serde(default)]
    name: String,
    email: String,
}

/// HTTP client for the Moltin v2 API.
pub struct MoltinCatalog {
    http: reqwest::Client,
    base_url: Url,
    customer_password: SecretString,
}

impl fmt::Debug for MoltinCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoltinCatalog")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl MoltinCatalog {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `https://api.moltin.com`).
    pub fn new(base_url: &str, timeout: Duration, customer_password: SecretString) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Internal(format!("Invalid catalog base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Internal(format!(
                "Catalog base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            customer_password,
        })
    }

    /// Builds `{base}/v2/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v2").extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        credential: &Credential,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        tracing::debug!(%method, url = %url, "Catalog request");

        let mut request = self
            .http
            .request(method, url.clone())
            .header(reqwest::header::AUTHORIZATION, credential.bearer());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("{} ({})", url.path(), preview)));
        }

        Err(Error::BackendError(format!(
            "{} returned {}: {}",
            url.path(),
            status,
            preview
        )))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::BackendError(format!("Unexpected catalog response: {}", e)))
    }
}

#[async_trait]
impl CatalogClient for MoltinCatalog {
    async fn list_products(&self, credential: &Credential) -> Result<Vec<Product>> {
        let response = self
            .send(Method::GET, self.endpoint(&["products"]), credential, None)
            .await?;
        let envelope: Envelope<Vec<WireProduct>> = Self::decode(response).await?;
        Ok(envelope.data.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, credential: &Credential, product_id: &str) -> Result<Product> {
        let response = self
            .send(
                Method::GET,
                self.endpoint(&["products", product_id]),
                credential,
                None,
            )
            .await?;
        let envelope: Envelope<WireProduct> = Self::decode(response).await?;
        Ok(envelope.data.into())
    }

    async fn resolve_image_url(&self, credential: &Credential, image_id: &str) -> Result<String> {
        let response = self
            .send(Method::GET, self.endpoint(&["files", image_id]), credential, None)
            .await?;
        let envelope: Envelope<WireFile> = Self::decode(response).await?;
        Ok(envelope.data.link.href)
    }

    async fn add_cart_item(
        &self,
        credential: &Credential,
        cart_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartLine> {
        if quantity == 0 {
            return Err(Error::MalformedEvent("quantity must be positive".to_string()));
        }

        let body = serde_json::json!({
            "data": {
                "id": product_id,
                "type": "cart_item",
                "quantity": quantity,
            }
        });
        let response = self
            .send(
                Method::POST,
                self.endpoint(&["carts", cart_id, "items"]),
                credential,
                Some(body),
            )
            .await?;

        // The backend answers with every line of the cart
        let cart: Cart = Self::decode::<WireCartItems>(response).await?.into();
        cart.lines
            .into_iter()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| {
                Error::BackendError(format!(
                    "cart {} has no line for product {} after adding it",
                    cart_id, product_id
                ))
            })
    }

    async fn get_cart(&self, credential: &Credential, cart_id: &str) -> Result<Cart> {
        let response = self
            .send(
                Method::GET,
                self.endpoint(&["carts", cart_id, "items"]),
                credential,
                None,
            )
            .await?;
        Ok(Self::decode::<WireCartItems>(response).await?.into())
    }

    async fn remove_cart_item(
        &self,
        credential: &Credential,
        cart_id: &str,
        line_id: &str,
    ) -> Result<Cart> {
        let response = self
            .send(
                Method::DELETE,
                self.endpoint(&["carts", cart_id, "items", line_id]),
                credential,
                None,
            )
            .await?;
        Ok(Self::decode::<WireCartItems>(response).await?.into())
    }

    async fn create_customer(&self, credential: &Credential, email: &str) -> Result<Customer> {
        let name = email.split('@').next().unwrap_or(email);
        let body = serde_json::json!({
            "data": {
                "type": "customer",
                "name": name,
                "email": email,
                "password": self.customer_password.expose_secret(),
            }
        });
        let response = self
            .send(
                Method::POST,
                self.endpoint(&["customers"]),
                credential,
                Some(body),
            )
            .await?;
        let envelope: Envelope<WireCustomer> = Self::decode(response).await?;
        Ok(Customer {
            id: envelope.data.id,
            name: envelope.data.name,
            email: envelope.data.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> MoltinCatalog {
        MoltinCatalog::new(
            &server.uri(),
            Duration::from_secs(5),
            SecretString::from("pw".to_string()),
        )
        .unwrap()
    }

    fn credential() -> Credential {
        Credential::new("tok")
    }

    fn wire_line(id: &str, product_id: &str, quantity: u32, amount: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "cart_item",
            "product_id": product_id,
            "name": format!("Fish {product_id}"),
            "description": "Fresh",
            "quantity": quantity,
            "meta": {
                "display_price": {
                    "with_tax": {
                        "unit": {"amount": amount / quantity as i64, "formatted": "$1.00"},
                        "value": {"amount": amount, "formatted": format!("${}.00", amount / 100)}
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn test_list_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {
                        "id": "P1",
                        "name": "Salmon",
                        "description": "Atlantic",
                        "meta": {"display_price": {"with_tax": {"amount": 1200, "formatted": "$12.00"}}},
                        "relationships": {"main_image": {"data": {"type": "main_image", "id": "img-1"}}}
                    },
                    {
                        "id": "P2",
                        "name": "Tuna",
                        "meta": {"display_price": {"with_tax": {"amount": 900, "formatted": "$9.00"}}}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let products = client(&server).list_products(&credential()).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, "$12.00");
        assert_eq!(products[0].image_id.as_deref(), Some("img-1"));
        assert_eq!(products[1].description, "");
        assert!(products[1].image_id.is_none());
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/products/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "errors": [{"status": 404, "title": "Not Found"}]
            })))
            .mount(&server)
            .await;

        let result = client(&server).get_product(&credential(), "missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_image_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/files/img-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": "img-1", "link": {"href": "https://cdn.example.com/salmon.png"}}
            })))
            .mount(&server)
            .await;

        let url = client(&server)
            .resolve_image_url(&credential(), "img-1")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/salmon.png");
    }

    #[tokio::test]
    async fn test_add_cart_item_returns_the_added_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/carts/42/items"))
            .and(body_partial_json(serde_json::json!({
                "data": {"id": "P1", "type": "cart_item", "quantity": 3}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": [wire_line("line-2", "P2", 1, 900), wire_line("line-1", "P1", 3, 3600)]
            })))
            .mount(&server)
            .await;

        let line = client(&server)
            .add_cart_item(&credential(), "42", "P1", 3)
            .await
            .unwrap();
        assert_eq!(line.id, "line-1");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_amount, 3600);
    }

    #[tokio::test]
    async fn test_get_cart() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/carts/42/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [wire_line("line-1", "P1", 3, 3600), wire_line("line-2", "P2", 1, 900)],
                "meta": {"display_price": {"with_tax": {"amount": 4500, "formatted": "$45.00"}}}
            })))
            .mount(&server)
            .await;

        let cart = client(&server).get_cart(&credential(), "42").await.unwrap();
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total, "$45.00");
        assert_eq!(cart.lines_amount(), cart.total_amount);
    }

    #[tokio::test]
    async fn test_remove_cart_item() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/carts/42/items/line-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [],
                "meta": {"display_price": {"with_tax": {"amount": 0, "formatted": "$0.00"}}}
            })))
            .mount(&server)
            .await;

        let cart = client(&server)
            .remove_cart_item(&credential(), "42", "line-1")
            .await
            .unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total, "$0.00");
    }

    #[tokio::test]
    async fn test_create_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/customers"))
            .and(body_partial_json(serde_json::json!({
                "data": {"type": "customer", "name": "a", "email": "a@example.com", "password": "pw"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "cust-1", "type": "customer", "name": "a", "email": "a@example.com"}
            })))
            .mount(&server)
            .await;

        let customer = client(&server)
            .create_customer(&credential(), "a@example.com")
            .await
            .unwrap();
        assert_eq!(customer.id, "cust-1");
        assert_eq!(customer.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client(&server).list_products(&credential()).await;
        assert!(matches!(result, Err(Error::BackendError(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_unexpected_payload_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .mount(&server)
            .await;

        let result = client(&server).list_products(&credential()).await;
        assert!(matches!(result, Err(Error::BackendError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        let catalog = MoltinCatalog::new(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            SecretString::from("pw".to_string()),
        )
        .unwrap();

        let result = catalog.list_products(&credential()).await;
        assert!(matches!(result, Err(Error::BackendUnavailable(_))));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let catalog = MoltinCatalog::new(
            "https://api.example.com/",
            Duration::from_secs(1),
            SecretString::from("pw".to_string()),
        )
        .unwrap();
        assert_eq!(
            catalog.endpoint(&["carts", "a b", "items"]).as_str(),
            "https://api.example.com/v2/carts/a%20b/items"
        );
    }
}
