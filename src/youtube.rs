use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::constants;
use crate::error::ApiError;

/// The two Data API listings the front end uses.
///
/// Payloads are returned as raw JSON so the feed cache can store exactly what
/// the API sent.
pub trait VideoApi {
  /// `videos?chart=mostPopular`, one page of `max_results`.
  async fn most_popular(&self, api_key: &str) -> Result<Value, ApiError>;

  /// `search?type=video` for `query`, one page of `max_results`.
  async fn search(&self, api_key: &str, query: &str) -> Result<Value, ApiError>;
}

pub struct YouTubeClient {
  http: Client,
  base: String,
}

impl YouTubeClient {
  /// A client against `base` (e.g. `https://www.googleapis.com/youtube/v3`).
  /// Without a timeout, a request that never completes never returns.
  pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
    let mut builder = Client::builder().user_agent(concat!("ytweb/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self { http: builder.build()?, base: base.trim_end_matches('/').to_string() })
  }

  fn most_popular_url(&self, api_key: &str) -> String {
    format!(
      "{}/videos?part=snippet&chart=mostPopular&maxResults={}&key={}",
      self.base,
      constants().max_results,
      urlencoding::encode(api_key)
    )
  }

  fn search_url(&self, api_key: &str, query: &str) -> String {
    format!(
      "{}/search?part=snippet&type=video&maxResults={}&q={}&key={}",
      self.base,
      constants().max_results,
      urlencoding::encode(query),
      urlencoding::encode(api_key)
    )
  }

  async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "youtube: request failed");
      return Err(ApiError::Status(status));
    }
    let body = response.bytes().await?;
    debug!(bytes = body.len(), "youtube: response received");
    Ok(serde_json::from_slice(&body)?)
  }
}

impl VideoApi for YouTubeClient {
  async fn most_popular(&self, api_key: &str) -> Result<Value, ApiError> {
    debug!("youtube: fetching most popular");
    self.get_json(&self.most_popular_url(api_key)).await
  }

  async fn search(&self, api_key: &str, query: &str) -> Result<Value, ApiError> {
    debug!(query = %query, "youtube: searching");
    self.get_json(&self.search_url(api_key, query)).await
  }
}
