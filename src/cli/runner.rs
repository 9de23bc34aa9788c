//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::MarketplaceClient;
use crate::config::MarketplaceConfig;
use crate::error::{Result, ResultExt};
use crate::models::{ItemsQuery, LagTime};
use crate::pagination::StopCondition;
use crate::types::{JsonValue, LifecycleStatus};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.build_client().operation("load configuration")?;

        let output = match &self.cli.command {
            Commands::Token => self.token(&client).await.operation("acquire token")?,
            Commands::Items {
                limit,
                cursor,
                status,
                all,
                max_records,
            } => self
                .items(&client, *limit, cursor.as_deref(), *status, *all, *max_records)
                .await
                .operation("list items")?,
            Commands::Delete { sku } => self
                .delete(&client, sku)
                .await
                .with_operation(|| format!("delete item '{sku}'"))?,
            Commands::LagTime { entries } => self
                .lag_time(&client, entries)
                .await
                .operation("update lag time")?,
            Commands::Feed {
                feed_id,
                no_details,
                wait,
                poll_secs,
                timeout_secs,
            } => self
                .feed(&client, feed_id, !*no_details, *wait, *poll_secs, *timeout_secs)
                .await
                .with_operation(|| format!("fetch feed '{feed_id}'"))?,
        };

        self.output_message(&output)
    }

    /// Build the client from the environment and command-line overrides
    fn build_client(&self) -> Result<MarketplaceClient> {
        let mut config = MarketplaceConfig::from_env()?;
        if let Some(ref url) = self.cli.base_url {
            config = config.with_base_url(url.clone());
            config.validate()?;
        }

        info!("Using marketplace at {}", config.gateway.base_url);
        MarketplaceClient::from_config(config)
    }

    async fn token(&self, client: &MarketplaceClient) -> Result<JsonValue> {
        let token = client.acquire_token().await?;
        Ok(json!({ "access_token": token }))
    }

    async fn items(
        &self,
        client: &MarketplaceClient,
        limit: Option<u32>,
        cursor: Option<&str>,
        status: Option<LifecycleStatus>,
        all: bool,
        max_records: Option<u64>,
    ) -> Result<JsonValue> {
        let mut query = ItemsQuery::new();
        query.limit = limit;
        query.next_cursor = cursor.map(str::to_string);
        query.lifecycle_status = status;

        if all || max_records.is_some() {
            let stop = max_records.map_or(StopCondition::Exhausted, StopCondition::MaxRecords);
            let items = client.items().collect_all(query, stop).await?;
            return Ok(json!({ "count": items.len(), "items": items }));
        }

        let page = client.items().search(&query).await?;
        Ok(serde_json::to_value(page)?)
    }

    async fn delete(&self, client: &MarketplaceClient, sku: &str) -> Result<JsonValue> {
        match client.items().delete(sku).await? {
            Some(response) => Ok(json!({ "sku": sku, "deleted": true, "response": response })),
            None => {
                warn!("Item '{}' does not exist", sku);
                Ok(json!({ "sku": sku, "deleted": false }))
            }
        }
    }

    async fn lag_time(&self, client: &MarketplaceClient, entries: &[LagTime]) -> Result<JsonValue> {
        let ack = client.feeds().update_lag_time(entries).await?;
        Ok(serde_json::to_value(ack)?)
    }

    async fn feed(
        &self,
        client: &MarketplaceClient,
        feed_id: &str,
        include_details: bool,
        wait: bool,
        poll_secs: u64,
        timeout_secs: u64,
    ) -> Result<JsonValue> {
        if wait {
            let status = client
                .feeds()
                .wait_for(
                    feed_id,
                    Duration::from_secs(poll_secs),
                    Duration::from_secs(timeout_secs),
                )
                .await?;
            if !include_details {
                return Ok(serde_json::to_value(status)?);
            }
        }

        match client.feeds().status(feed_id, include_details).await? {
            Some(status) => Ok(serde_json::to_value(status)?),
            None => {
                warn!("Feed '{}' does not exist", feed_id);
                Ok(json!({ "feedId": feed_id, "found": false }))
            }
        }
    }

    /// Print a result document to stdout
    fn output_message(&self, msg: &JsonValue) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        println!("{rendered}");
        Ok(())
    }
}
