//! Items service.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::http::{Gateway, Request};
use crate::models::{ItemsPage, ItemsQuery};
use crate::pagination::{CursorPaginator, PageSummary, PaginationState, StopCondition};
use crate::types::JsonValue;

/// Catalog listing endpoint
pub const ITEMS_PATH: &str = "/v3/items";

/// Path of a single item, with the SKU percent-encoded once
pub fn item_path(sku: &str) -> String {
    format!("{ITEMS_PATH}/{}", urlencoding::encode(sku))
}

/// Service for catalog item operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: walmart_marketplace::MarketplaceClient) -> walmart_marketplace::Result<()> {
/// use walmart_marketplace::{ItemsQuery, LifecycleStatus};
///
/// let page = client
///     .items()
///     .search(&ItemsQuery::new().limit(20).status(LifecycleStatus::Active))
///     .await?;
///
/// client.items().delete("SKU-123").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ItemsService {
    gateway: Arc<Gateway>,
}

impl ItemsService {
    pub(crate) fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetch one page of the catalog. A 404 yields an empty page.
    pub async fn search(&self, query: &ItemsQuery) -> Result<ItemsPage> {
        let mut request = Request::get(ITEMS_PATH);
        for (key, value) in query.to_params() {
            request = request.query(key, value);
        }

        let page = self
            .gateway
            .dispatch(&request)
            .await?
            .decode::<ItemsPage>()?
            .unwrap_or_default();

        debug!(
            "Fetched {} items (total {:?})",
            page.items.len(),
            page.total_items
        );
        Ok(page)
    }

    /// Delete an item by SKU. Returns `None` when the item does not exist.
    pub async fn delete(&self, sku: &str) -> Result<Option<JsonValue>> {
        if sku.is_empty() {
            return Err(Error::invalid_input("SKU must not be empty"));
        }

        let reply = self.gateway.dispatch(&Request::delete(item_path(sku))).await?;
        if reply.is_not_found() {
            info!("Item {} not found, nothing deleted", sku);
        }
        Ok(reply.into_option())
    }

    /// Walk the catalog page by page, starting at `query`'s cursor or the first page
    pub fn pages(&self, query: ItemsQuery, stop_condition: StopCondition) -> ItemPages {
        let state = match query.next_cursor {
            Some(ref cursor) => PaginationState::starting_at(cursor.clone()),
            None => PaginationState::new(),
        };

        ItemPages {
            service: self.clone(),
            query,
            paginator: CursorPaginator::new(stop_condition),
            state,
        }
    }

    /// Fetch every item the stop condition allows.
    ///
    /// With [`StopCondition::MaxRecords`] the result is truncated to the limit.
    pub async fn collect_all(
        &self,
        query: ItemsQuery,
        stop_condition: StopCondition,
    ) -> Result<Vec<JsonValue>> {
        let mut pages = self.pages(query, stop_condition);
        let mut items = Vec::new();

        while let Some(page) = pages.next_page().await? {
            items.extend(page.items);
        }

        if let StopCondition::MaxRecords(max) = stop_condition {
            items.truncate(usize::try_from(max).unwrap_or(usize::MAX));
        }

        info!(
            "Fetched {} items over {} pages",
            items.len(),
            pages.state().pages_fetched
        );
        Ok(items)
    }
}

/// Lazily fetched pages of the catalog
#[derive(Debug)]
pub struct ItemPages {
    service: ItemsService,
    query: ItemsQuery,
    paginator: CursorPaginator,
    state: PaginationState,
}

impl ItemPages {
    /// Fetch the next page, or `None` once the listing is finished
    pub async fn next_page(&mut self) -> Result<Option<ItemsPage>> {
        if self.state.done {
            return Ok(None);
        }

        let mut query = self.query.clone();
        query.next_cursor = Some(self.state.cursor.clone());
        let page = self.service.search(&query).await?;

        let summary = PageSummary {
            records: page.items.len(),
            next_cursor: page.next_cursor.as_deref(),
            total_items: page.total_items,
        };
        if self.paginator.process_page(&summary, &mut self.state).is_done() {
            debug!("Item listing finished after {} pages", self.state.pages_fetched);
        }

        Ok(Some(page))
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }
}
