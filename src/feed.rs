//! Home feed loading with a time-boxed cache.
//!
//! One cache entry exists: the most-popular listing, stored as its JSON text
//! plus the epoch-millisecond time it was fetched. A failed fetch never
//! touches the entry, so a stale feed stays available for the next try.
//! Concurrent misses are not de-duplicated; each one fetches.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::error::FeedError;
use crate::settings;
use crate::storage::KeyValueStore;
use crate::youtube::VideoApi;

pub struct FeedCache<'a, S, A> {
  store: &'a mut S,
  api: &'a A,
}

impl<'a, S: KeyValueStore, A: VideoApi> FeedCache<'a, S, A> {
  pub fn new(store: &'a mut S, api: &'a A) -> Self {
    Self { store, api }
  }

  pub async fn get_feed(&mut self) -> Result<Value, FeedError> {
    self.get_feed_at(chrono::Utc::now().timestamp_millis()).await
  }

  /// Drop the cached entry and fetch again regardless of its age.
  pub async fn refresh(&mut self) -> Result<Value, FeedError> {
    self.refresh_at(chrono::Utc::now().timestamp_millis()).await
  }

  pub(crate) async fn refresh_at(&mut self, now_ms: i64) -> Result<Value, FeedError> {
    let c = constants();
    self.store.remove(&c.feed_storage_key)?;
    self.store.remove(&c.feed_time_storage_key)?;
    info!("feed: cache cleared");
    self.get_feed_at(now_ms).await
  }

  pub(crate) async fn get_feed_at(&mut self, now_ms: i64) -> Result<Value, FeedError> {
    if let Some(cached) = self.cached_at(now_ms) {
      info!("feed: using cached feed");
      return Ok(cached);
    }

    let api_key = settings::load_api_key(&*self.store).ok_or(FeedError::MissingCredential)?;

    let payload = match self.api.most_popular(&api_key).await {
      Ok(payload) => payload,
      Err(e) => {
        warn!(err = %e, "feed: fetch failed, keeping existing cache entry");
        return Err(e.into());
      }
    };

    let c = constants();
    let json = payload.to_string();
    let fetched_at = now_ms.to_string();
    self.store.set_many(&[
      (c.feed_storage_key.as_str(), json.as_str()),
      (c.feed_time_storage_key.as_str(), fetched_at.as_str()),
    ])?;
    info!(fetched_at = now_ms, "feed: fetched fresh feed");
    Ok(payload)
  }

  /// The cached payload if both parts of the entry are present, readable, and
  /// younger than the TTL.
  fn cached_at(&self, now_ms: i64) -> Option<Value> {
    let c = constants();
    let cached = self.store.get(&c.feed_storage_key)?;
    let fetched_at: i64 = self.store.get(&c.feed_time_storage_key)?.trim().parse().ok()?;

    let Some(age) = now_ms.checked_sub(fetched_at) else {
      warn!(fetched_at, "feed: cache timestamp out of range, refetching");
      return None;
    };
    if age >= c.feed_ttl_ms {
      debug!(age_ms = age, "feed: cache expired");
      return None;
    }

    match serde_json::from_str(&cached) {
      Ok(value) => Some(value),
      Err(e) => {
        warn!(err = %e, "feed: cached payload unreadable, refetching");
        None
      }
    }
  }
}
