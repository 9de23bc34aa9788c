//! Request and response shapes for the item and feed endpoints

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, LifecycleStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Items
// ============================================================================

/// Query for `GET /v3/items`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsQuery {
    /// Page size
    pub limit: Option<u32>,
    /// Cursor of the page to fetch; `*` is the first page
    pub next_cursor: Option<String>,
    /// Only return items in this lifecycle state
    pub lifecycle_status: Option<LifecycleStatus>,
}

impl ItemsQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the cursor
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Filter by lifecycle status
    #[must_use]
    pub fn status(mut self, status: LifecycleStatus) -> Self {
        self.lifecycle_status = Some(status);
        self
    }

    /// Query parameters in the order they are sent
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(ref cursor) = self.next_cursor {
            params.push(("nextCursor".to_string(), cursor.clone()));
        }
        if let Some(status) = self.lifecycle_status {
            params.push(("lifecycleStatus".to_string(), status.as_str().to_string()));
        }
        params
    }
}

/// One page of the item catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsPage {
    /// Items on this page, as returned
    #[serde(rename = "ItemResponse", default)]
    pub items: Vec<JsonValue>,
    /// Size of the whole listing
    #[serde(rename = "totalItems", default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    /// Cursor of the following page
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl ItemsPage {
    /// A page with no items and no cursor
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the upstream handed back a cursor to continue from
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

// ============================================================================
// Lag time feed
// ============================================================================

/// Fulfillment lag time for one SKU, in days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagTime {
    /// Seller SKU
    pub sku: String,
    /// Days between order and shipment
    pub fulfillment_lag_time: u32,
}

impl LagTime {
    /// Create a lag time entry
    pub fn new(sku: impl Into<String>, days: u32) -> Self {
        Self {
            sku: sku.into(),
            fulfillment_lag_time: days,
        }
    }
}

/// Parses `SKU=DAYS`. The split is on the last `=` so SKUs may contain one.
impl FromStr for LagTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (sku, days) = s
            .rsplit_once('=')
            .ok_or_else(|| Error::invalid_input(format!("expected SKU=DAYS, got '{s}'")))?;

        let sku = sku.trim();
        if sku.is_empty() {
            return Err(Error::invalid_input(format!("missing SKU in '{s}'")));
        }

        let days = days
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::invalid_input(format!("invalid lag time in '{s}': {e}")))?;

        Ok(Self::new(sku, days))
    }
}

/// Version block of the lag time feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagTimeHeader {
    /// Feed schema version
    pub version: String,
}

impl Default for LagTimeHeader {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
        }
    }
}

/// Body of `POST /v3/feeds?feedType=lagtime`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagTimeFeed {
    /// Envelope version
    #[serde(rename = "LagTimeHeader")]
    pub header: LagTimeHeader,
    /// Entries to update
    #[serde(rename = "lagTime")]
    pub lag_time: Vec<LagTime>,
}

impl LagTimeFeed {
    /// Wrap entries in a version 1.0 envelope
    pub fn new(entries: impl Into<Vec<LagTime>>) -> Self {
        Self {
            header: LagTimeHeader::default(),
            lag_time: entries.into(),
        }
    }
}

// ============================================================================
// Feeds
// ============================================================================

/// Acknowledgement of a submitted feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAck {
    /// Identifier to poll the feed with
    #[serde(rename = "feedId")]
    pub feed_id: String,
}

/// Processing status of a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    /// Feed identifier
    pub feed_id: String,
    /// `RECEIVED`, `INPROGRESS`, `PROCESSED` or `ERROR`
    #[serde(default)]
    pub feed_status: Option<String>,
    /// Items the feed contained
    #[serde(default)]
    pub items_received: Option<u64>,
    /// Items applied successfully
    #[serde(default)]
    pub items_succeeded: Option<u64>,
    /// Items rejected
    #[serde(default)]
    pub items_failed: Option<u64>,
    /// Items still being processed
    #[serde(default)]
    pub items_processing: Option<u64>,
    /// Everything else the upstream returned, item details included
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl FeedStatus {
    /// Statuses after which the feed no longer changes
    pub const TERMINAL: [&'static str; 2] = ["PROCESSED", "ERROR"];

    /// Whether processing has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        self.feed_status.as_deref().is_some_and(|status| {
            Self::TERMINAL
                .iter()
                .any(|terminal| status.eq_ignore_ascii_case(terminal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_items_query_params_order() {
        let query = ItemsQuery::new()
            .limit(20)
            .cursor("*")
            .status(LifecycleStatus::Active);

        assert_eq!(
            query.to_params(),
            vec![
                ("limit".to_string(), "20".to_string()),
                ("nextCursor".to_string(), "*".to_string()),
                ("lifecycleStatus".to_string(), "ACTIVE".to_string()),
            ]
        );
        assert!(ItemsQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_items_page_decode() {
        let page: ItemsPage = serde_json::from_value(json!({
            "ItemResponse": [{"sku": "A1"}, {"sku": "B2"}],
            "totalItems": 42,
            "nextCursor": "abc"
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, Some(42));
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert!(page.has_more());
    }

    #[test]
    fn test_items_page_missing_fields_default() {
        let page: ItemsPage = serde_json::from_value(json!({})).unwrap();
        assert_eq!(page, ItemsPage::empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_lag_time_feed_envelope() {
        let feed = LagTimeFeed::new(vec![LagTime::new("SKU-1", 2), LagTime::new("SKU-2", 5)]);

        assert_eq!(
            serde_json::to_value(&feed).unwrap(),
            json!({
                "LagTimeHeader": {"version": "1.0"},
                "lagTime": [
                    {"sku": "SKU-1", "fulfillmentLagTime": 2},
                    {"sku": "SKU-2", "fulfillmentLagTime": 5}
                ]
            })
        );
    }

    #[test_case("SKU-1=3", "SKU-1", 3 ; "plain")]
    #[test_case(" SKU-1 = 3 ", "SKU-1", 3 ; "whitespace trimmed")]
    #[test_case("a=b=7", "a=b", 7 ; "sku containing equals")]
    fn test_lag_time_parse(input: &str, sku: &str, days: u32) {
        assert_eq!(input.parse::<LagTime>().unwrap(), LagTime::new(sku, days));
    }

    #[test_case("SKU-1" ; "no separator")]
    #[test_case("=3" ; "empty sku")]
    #[test_case("SKU-1=soon" ; "non numeric days")]
    #[test_case("SKU-1=-1" ; "negative days")]
    fn test_lag_time_parse_rejects(input: &str) {
        let err = input.parse::<LagTime>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_feed_status_keeps_extra_fields() {
        let status: FeedStatus = serde_json::from_value(json!({
            "feedId": "F1",
            "feedStatus": "INPROGRESS",
            "itemsReceived": 3,
            "itemsSucceeded": 1,
            "itemsFailed": 0,
            "itemsProcessing": 2,
            "itemDetails": {"itemIngestionStatus": []}
        }))
        .unwrap();

        assert_eq!(status.feed_id, "F1");
        assert_eq!(status.items_processing, Some(2));
        assert!(status.extra.contains_key("itemDetails"));
        assert!(!status.is_terminal());
    }

    #[test_case(Some("PROCESSED") => true ; "processed")]
    #[test_case(Some("ERROR") => true ; "error")]
    #[test_case(Some("processed") => true ; "lowercase")]
    #[test_case(Some("RECEIVED") => false ; "received")]
    #[test_case(Some("INPROGRESS") => false ; "in progress")]
    #[test_case(None => false ; "missing")]
    fn test_feed_status_terminal(status: Option<&str>) -> bool {
        FeedStatus {
            feed_id: "F1".to_string(),
            feed_status: status.map(str::to_string),
            items_received: None,
            items_succeeded: None,
            items_failed: None,
            items_processing: None,
            extra: JsonObject::new(),
        }
        .is_terminal()
    }
}
