//! Feeds service.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::http::{Gateway, Request};
use crate::models::{FeedAck, FeedStatus, LagTime, LagTimeFeed};

/// Feed submission and status endpoint
pub const FEEDS_PATH: &str = "/v3/feeds";

/// Service for bulk feeds.
///
/// Feeds are processed asynchronously upstream: a submission returns a
/// [`FeedAck`] whose id is then polled with [`FeedsService::status`] or
/// [`FeedsService::wait_for`].
#[derive(Debug, Clone)]
pub struct FeedsService {
    gateway: Arc<Gateway>,
}

impl FeedsService {
    pub(crate) fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Submit a fulfillment lag time feed
    pub async fn update_lag_time(&self, entries: &[LagTime]) -> Result<FeedAck> {
        if entries.is_empty() {
            return Err(Error::invalid_input("lag time feed needs at least one entry"));
        }

        let body = serde_json::to_value(LagTimeFeed::new(entries))?;
        let request = Request::post(FEEDS_PATH)
            .query("feedType", "lagtime")
            .json(body);

        let ack = self
            .gateway
            .dispatch(&request)
            .await?
            .decode::<FeedAck>()?
            .ok_or_else(|| Error::not_found(FEEDS_PATH))?;

        info!(
            "Submitted lag time feed {} ({} SKUs)",
            ack.feed_id,
            entries.len()
        );
        Ok(ack)
    }

    /// Fetch the status of a feed. Returns `None` when the feed does not exist.
    pub async fn status(&self, feed_id: &str, include_details: bool) -> Result<Option<FeedStatus>> {
        if feed_id.is_empty() {
            return Err(Error::invalid_input("feed id must not be empty"));
        }

        let request = Request::get(feed_path(feed_id))
            .query("includeDetails", include_details.to_string());

        self.gateway.dispatch(&request).await?.decode()
    }

    /// Poll a feed until it reaches `PROCESSED` or `ERROR`.
    ///
    /// Fails with [`Error::Timeout`] once `timeout` has passed and with
    /// [`Error::NotFound`] if the feed does not exist.
    pub async fn wait_for(
        &self,
        feed_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<FeedStatus> {
        let started = Instant::now();

        loop {
            let status = self
                .status(feed_id, false)
                .await?
                .ok_or_else(|| Error::not_found(feed_path(feed_id)))?;

            if status.is_terminal() {
                info!(
                    "Feed {} finished with status {}",
                    feed_id,
                    status.feed_status.as_deref().unwrap_or_default()
                );
                return Ok(status);
            }

            if started.elapsed() + poll_interval > timeout {
                return Err(Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            debug!(
                "Feed {} is {:?}, polling again in {:?}",
                feed_id, status.feed_status, poll_interval
            );
            tokio::time::sleep(poll_interval).await;
        }
    }
}

fn feed_path(feed_id: &str) -> String {
    format!("{FEEDS_PATH}/{}", urlencoding::encode(feed_id))
}
