//! # Inventory Backend
//!
//! The three external calls the dashboard makes. [`InventoryBackend`] is the
//! seam; [`HttpBackend`] speaks to the real service over HTTP.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET  /api/clothing        200  [ {id, tipo, cor, ..., estoque}, ... ]  │
//! │                                                                         │
//! │  GET  /api/sales/monthly   200  [ {month, sales, value}, ... ]          │
//! │                                                                         │
//! │  POST /api/sell/{id}       200  { "message": "...", "item": {...} }     │
//! │                            400  { "error": "Item is out of stock" }     │
//! │                            404  { "error": "Item not found" }           │
//! │                                                                         │
//! │  The sale response carries the server's copy of the item; it is        │
//! │  merged into the store as-is.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use wardrobe_core::{Item, ItemId, MonthlySales};

use crate::config::BackendSettings;
use crate::error::{ClientError, ClientResult};

/// Source of truth for the catalog and sale confirmations.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// The full catalog, in backend order.
    async fn fetch_items(&self) -> ClientResult<Vec<Item>>;

    /// The monthly sales feed. An empty vector means "no data".
    async fn fetch_monthly_sales(&self) -> ClientResult<Vec<MonthlySales>>;

    /// Asks the backend to record one sale and returns its updated item.
    async fn sell(&self, id: ItemId) -> ClientResult<Item>;
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// [`InventoryBackend`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    settings: BackendSettings,
}

impl HttpBackend {
    pub fn new(settings: BackendSettings) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpBackend { client, settings })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    async fn get_feed<T: DeserializeOwned>(&self, url: String) -> ClientResult<T> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::fetch(&url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::fetch(&url, e))?;

        decode_feed(&url, status, &body)
    }
}

#[async_trait]
impl InventoryBackend for HttpBackend {
    async fn fetch_items(&self) -> ClientResult<Vec<Item>> {
        self.get_feed(self.settings.items_url()).await
    }

    async fn fetch_monthly_sales(&self) -> ClientResult<Vec<MonthlySales>> {
        self.get_feed(self.settings.monthly_sales_url()).await
    }

    async fn sell(&self, id: ItemId) -> ClientResult<Item> {
        let url = self.settings.sell_url(id);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::sale(id, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ClientError::sale(id, e))?;

        decode_sale(id, status, &body)
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Body of `POST /api/sell/{id}`, success or failure.
#[derive(Debug, Deserialize)]
struct SaleResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    item: Option<Item>,
    #[serde(default)]
    error: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decodes a GET feed. Any non-2xx status or malformed body is a fetch failure.
pub(crate) fn decode_feed<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &str,
) -> ClientResult<T> {
    if !is_success(status) {
        return Err(ClientError::fetch(endpoint, format!("HTTP {}", status)));
    }
    serde_json::from_str(body).map_err(|e| ClientError::fetch(endpoint, e))
}

/// Decodes a sale response into the server's copy of the item.
///
/// The item must come back with the id that was sold; anything else is a
/// sale failure rather than a silent write to another item.
pub(crate) fn decode_sale(id: ItemId, status: u16, body: &str) -> ClientResult<Item> {
    let parsed: Option<SaleResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(SaleResponse {
            item: Some(item), ..
        }) if is_success(status) => {
            if item.id != id {
                return Err(ClientError::sale(
                    id,
                    format!("backend returned item {}", item.id),
                ));
            }
            Ok(item)
        }
        Some(SaleResponse { error: Some(reason), .. }) => Err(ClientError::sale(id, reason)),
        Some(SaleResponse {
            message: Some(message),
            ..
        }) if !is_success(status) => Err(ClientError::sale(id, message)),
        _ if is_success(status) => Err(ClientError::sale(id, "response carried no item")),
        _ => Err(ClientError::sale(id, format!("HTTP {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const ITEM: &str = r#"{"id":1,"tipo":"Camiseta","cor":"Branco","tamanho":"M",
        "preco":49.9,"estacao":"Verao","genero":"Unissex","estoque":4,"vendas":11,
        "imagem":"camiseta_branca.jpg","disponibilidade":"Disponivel"}"#;

    #[test]
    fn test_decode_sale_success() {
        let body = format!(r#"{{"message":"Item sold successfully","item":{}}}"#, ITEM);
        let item = decode_sale(ItemId::new(1), 200, &body).unwrap();
        assert_eq!((item.stock, item.sold), (4, 11));
        assert_eq!(item.price.cents(), 4990);
    }

    #[test]
    fn test_decode_sale_errors() {
        let err = decode_sale(ItemId::new(2), 400, r#"{"error":"Item is out of stock"}"#)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SaleFailed);
        assert!(err.to_string().contains("Item is out of stock"));

        let err = decode_sale(ItemId::new(9), 404, r#"{"error":"Item not found"}"#).unwrap_err();
        assert!(err.to_string().contains("Item not found"));

        let err = decode_sale(ItemId::new(1), 502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_decode_sale_rejects_other_item() {
        let body = format!(r#"{{"item":{}}}"#, ITEM);
        assert!(decode_sale(ItemId::new(5), 200, &body).is_err());
    }

    #[test]
    fn test_decode_feed() {
        let body = format!("[{}]", ITEM);
        let items: Vec<Item> = decode_feed("/api/clothing", 200, &body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_type, "Camiseta");

        let err = decode_feed::<Vec<Item>>("/api/clothing", 500, "").unwrap_err();
        assert_eq!(err.code(), ErrorCode::FetchFailed);

        let err = decode_feed::<Vec<Item>>("/api/clothing", 200, "{not json").unwrap_err();
        assert!(matches!(err, ClientError::Fetch { .. }));
    }

    #[test]
    fn test_decode_empty_monthly_feed() {
        let points: Vec<MonthlySales> = decode_feed("/api/sales/monthly", 200, "[]").unwrap();
        assert!(points.is_empty());
    }
}
