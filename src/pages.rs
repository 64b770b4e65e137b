//! The three pages of the front end and their loaders.
//!
//! Loaders never fail: every problem ends up as an indicator inside the
//! results container, with the cause also returned so the shell can report it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{info, warn};

use crate::constants::constants;
use crate::error::FeedError;
use crate::feed::FeedCache;
use crate::intent::Route;
use crate::render::{Container, Indicator, Page, render_results};
use crate::settings;
use crate::storage::KeyValueStore;
use crate::youtube::VideoApi;

/// Id of the results container on both listing pages.
pub const RESULTS_CONTAINER_ID: &str = "homeFeed";

/// A rendered results container, plus what went wrong if anything did.
#[derive(Debug)]
pub struct Loaded {
  pub container: Container,
  pub problem: Option<String>,
}

pub async fn load_home<S: KeyValueStore, A: VideoApi>(store: &mut S, api: &A, refresh: bool) -> Loaded {
  let mut container = Container::new(RESULTS_CONTAINER_ID);

  let mut cache = FeedCache::new(store, api);
  let result = if refresh { cache.refresh().await } else { cache.get_feed().await };

  let problem = match result {
    Ok(data) => {
      render_results(&mut container, Some(&data), Page::Home);
      None
    }
    Err(e) => {
      warn!(err = %e, "home: could not load feed");
      render_results(&mut container, None, Page::Home);
      Some(describe_feed_error(&e))
    }
  };

  info!(cards = container.cards().count(), "home: rendered");
  Loaded { container, problem }
}

pub async fn load_search<S: KeyValueStore, A: VideoApi>(store: &S, api: &A, query: &str) -> Loaded {
  let mut container = Container::new(RESULTS_CONTAINER_ID);
  container.show(Indicator::Loading);

  let Some(api_key) = settings::load_api_key(store) else {
    container.show(Indicator::MissingCredential);
    return Loaded { container, problem: Some(FeedError::MissingCredential.to_string()) };
  };

  info!(query = %query, "search: fetching");
  let problem = match api.search(&api_key, query).await {
    Ok(data) => {
      render_results(&mut container, Some(&data), Page::Search);
      None
    }
    Err(e) => {
      warn!(err = %e, query = %query, "search: request failed");
      render_results(&mut container, None, Page::Search);
      Some(e.to_string())
    }
  };

  info!(cards = container.cards().count(), "search: rendered");
  Loaded { container, problem }
}

fn describe_feed_error(e: &FeedError) -> String {
  match e {
    FeedError::MissingCredential => e.to_string(),
    other => format!("Error fetching feed: {other}"),
  }
}

// --- Documents ---

fn document(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body style=\"background:#111;color:white;font-family:sans-serif\">\n{}\n</body>\n</html>\n",
    encode_text(title),
    body
  )
}

fn back_link() -> String {
  format!(r#"<a href="{}" style="color:#aaa">&larr; Back</a>"#, encode_double_quoted_attribute(&Route::Home.href()))
}

pub fn home_document(container: &Container) -> String {
  document("Home", &format!("<h1>Popular</h1>\n{}", container.to_html()))
}

pub fn search_document(query: &str, container: &Container) -> String {
  let body = format!(
    "{}\n<h1>Search</h1>\n<input id=\"inputbox\" type=\"text\" value=\"{}\" readonly>\n{}",
    back_link(),
    encode_double_quoted_attribute(query),
    container.to_html()
  );
  document(&format!("Search: {query}"), &body)
}

pub fn watch_document(id: &str) -> String {
  let src = format!("{}{}", constants().embed_base, urlencoding::encode(id));
  let body = format!(
    "{}\n<div>\n<iframe width=\"960\" height=\"540\" src=\"{}\" title=\"Video player\" frameborder=\"0\" allow=\"autoplay; encrypted-media; picture-in-picture\" allowfullscreen></iframe>\n</div>",
    back_link(),
    encode_double_quoted_attribute(&src)
  );
  document(&format!("Watch {id}"), &body)
}

/// Write a route's document into `out_dir`, returning the file path.
pub fn write_page(out_dir: &Path, route: &Route, html: &str) -> Result<PathBuf> {
  std::fs::create_dir_all(out_dir).with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
  let path = out_dir.join(route.page());
  std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
  info!(path = %path.display(), href = %route.href(), "page written");
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ApiError;
  use crate::render::Element;
  use crate::storage::MemoryStore;
  use serde_json::{Value, json};
  use std::cell::RefCell;

  /// Records the queries it was asked for and answers with a fixed payload.
  struct CannedApi {
    answer: fn() -> Result<Value, ApiError>,
    queries: RefCell<Vec<String>>,
  }

  impl CannedApi {
    fn new(answer: fn() -> Result<Value, ApiError>) -> Self {
      Self { answer, queries: RefCell::new(Vec::new()) }
    }
  }

  impl VideoApi for CannedApi {
    async fn most_popular(&self, _api_key: &str) -> Result<Value, ApiError> {
      self.queries.borrow_mut().push(String::new());
      (self.answer)()
    }

    async fn search(&self, _api_key: &str, query: &str) -> Result<Value, ApiError> {
      self.queries.borrow_mut().push(query.to_string());
      (self.answer)()
    }
  }

  fn two_results() -> Result<Value, ApiError> {
    Ok(json!({"items": [
      {"id": {"videoId": "aaaaaaaaaaa"}, "snippet": {"title": "First"}},
      {"id": {"videoId": "bbbbbbbbbbb"}, "snippet": {"title": "Second"}}
    ]}))
  }

  fn no_results() -> Result<Value, ApiError> {
    Ok(json!({"items": []}))
  }

  fn items_missing() -> Result<Value, ApiError> {
    Ok(json!({"kind": "youtube#searchListResponse", "pageInfo": {"totalResults": 0}}))
  }

  fn server_error() -> Result<Value, ApiError> {
    Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY))
  }

  fn keyed_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    settings::save_api_key(&mut store, "KEY").unwrap();
    store
  }

  #[tokio::test]
  async fn search_renders_results() {
    let store = keyed_store();
    let api = CannedApi::new(two_results);
    let loaded = load_search(&store, &api, "hello world").await;

    assert_eq!(loaded.problem, None);
    assert_eq!(api.queries.borrow().as_slice(), ["hello world"]);
    let ids: Vec<&str> = loaded.container.cards().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["aaaaaaaaaaa", "bbbbbbbbbbb"]);
  }

  #[tokio::test]
  async fn search_without_key_does_not_call_api() {
    let store = MemoryStore::default();
    let api = CannedApi::new(two_results);
    let loaded = load_search(&store, &api, "cats").await;

    assert!(api.queries.borrow().is_empty());
    assert_eq!(loaded.container.children(), [Element::Notice(Indicator::MissingCredential)]);
    assert_eq!(loaded.problem.as_deref(), Some("No API key saved!"));
  }

  #[tokio::test]
  async fn search_empty_and_failed_are_distinct() {
    let store = keyed_store();

    let empty = load_search(&store, &CannedApi::new(no_results), "zzz").await;
    assert_eq!(empty.container.children(), [Element::Notice(Indicator::NoResults)]);
    assert_eq!(empty.problem, None);

    let no_items = load_search(&store, &CannedApi::new(items_missing), "zzz").await;
    assert_eq!(no_items.container.children(), [Element::Notice(Indicator::NoResults)]);
    assert_eq!(no_items.problem, None);

    let failed = load_search(&store, &CannedApi::new(server_error), "zzz").await;
    assert_eq!(failed.container.children(), [Element::Notice(Indicator::LoadFailed(Page::Search))]);
    assert!(failed.problem.is_some());
  }

  #[tokio::test]
  async fn every_search_refetches() {
    let store = keyed_store();
    let api = CannedApi::new(two_results);
    load_search(&store, &api, "q").await;
    load_search(&store, &api, "q").await;
    assert_eq!(api.queries.borrow().len(), 2);
  }

  #[tokio::test]
  async fn home_uses_feed_cache() {
    let mut store = keyed_store();
    let api = CannedApi::new(two_results);

    let first = load_home(&mut store, &api, false).await;
    let second = load_home(&mut store, &api, false).await;
    assert_eq!(api.queries.borrow().len(), 1);
    assert_eq!(first.container, second.container);

    load_home(&mut store, &api, true).await;
    assert_eq!(api.queries.borrow().len(), 2);
  }

  #[tokio::test]
  async fn home_failure_shows_could_not_load() {
    let mut store = MemoryStore::default();
    let api = CannedApi::new(two_results);
    let loaded = load_home(&mut store, &api, false).await;

    assert_eq!(loaded.container.children(), [Element::Notice(Indicator::LoadFailed(Page::Home))]);
    assert_eq!(loaded.problem.as_deref(), Some("No API key saved!"));
  }

  #[test]
  fn search_document_prefills_query() {
    let mut container = Container::new(RESULTS_CONTAINER_ID);
    container.show(Indicator::NoResults);
    let html = search_document("a \"quoted\" <query>", &container);

    assert!(html.contains(r#"value="a &quot;quoted&quot; &lt;query&gt;""#));
    assert!(html.contains(r#"href="index.html""#));
    assert!(html.contains("<p>No results found.</p>"));
  }

  #[test]
  fn watch_document_embeds_player() {
    let html = watch_document("dQw4w9WgXcQ");
    assert!(html.contains(r#"src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
    assert!(html.contains(r#"href="index.html""#));
  }

  #[test]
  fn write_page_uses_route_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let route = Route::Search { text: "x".to_string() };
    let path = write_page(&dir.path().join("site"), &route, "<html></html>").unwrap();
    assert_eq!(path, dir.path().join("site").join("search.html"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
  }
}
