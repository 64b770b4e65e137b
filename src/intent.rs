//! Free-form input classification.
//!
//! Whatever the user types into the search box is either a pointer to one
//! video (a watch URL, a short link, or a bare 11-character id) or a search
//! query. [`resolve`] decides which, and [`NavigationIntent::route`] turns the
//! decision into the page the shell should open next.

use url::Url;

use crate::constants::constants;

/// Length of a platform-assigned video id.
const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
  VideoReference { id: String },
  SearchQuery { text: String },
}

/// A page of the front end, with its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home,
  Watch { id: String },
  Search { text: String },
}

impl NavigationIntent {
  pub fn route(self) -> Route {
    match self {
      NavigationIntent::VideoReference { id } => Route::Watch { id },
      NavigationIntent::SearchQuery { text } => Route::Search { text },
    }
  }
}

impl Route {
  /// File name of the page this route renders into.
  pub fn page(&self) -> &'static str {
    let c = constants();
    match self {
      Route::Home => &c.home_page,
      Route::Watch { .. } => &c.watch_page,
      Route::Search { .. } => &c.search_page,
    }
  }

  /// Relative link to this route, e.g. `watch.html?v=dQw4w9WgXcQ`.
  pub fn href(&self) -> String {
    match self {
      Route::Home => self.page().to_string(),
      Route::Watch { id } => format!("{}?v={}", self.page(), urlencoding::encode(id)),
      Route::Search { text } => format!("{}?search={}", self.page(), urlencoding::encode(text)),
    }
  }
}

/// Classify raw user input. Returns `None` for blank input, in which case the
/// caller must not navigate anywhere.
///
/// Order, first match wins:
/// 1. an absolute URL on the primary domain carrying a non-empty `v` parameter
/// 2. an absolute URL on the short-link domain (id is the first path segment)
/// 3. a bare 11-character id from `[A-Za-z0-9_-]`
/// 4. anything else is a search for the input as given
///
/// A URL that parses but matches neither domain is not rejected; it ends up as
/// a search for the full URL text.
pub fn resolve(raw: &str) -> Option<NavigationIntent> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  let id = match Url::parse(trimmed) {
    Ok(url) => video_id_from_url(&url),
    Err(_) => None,
  }
  .or_else(|| is_video_id(trimmed).then(|| trimmed.to_string()));

  Some(match id {
    Some(id) => NavigationIntent::VideoReference { id },
    None => NavigationIntent::SearchQuery { text: raw.to_string() },
  })
}

fn video_id_from_url(url: &Url) -> Option<String> {
  let c = constants();
  let host = url.host_str()?;

  if host.contains(c.primary_domain.as_str())
    && let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v")
    && !v.is_empty()
  {
    return Some(v.into_owned());
  }

  if host.contains(c.short_link_domain.as_str()) {
    return url.path_segments().and_then(|mut segments| segments.next()).filter(|s| !s.is_empty()).map(str::to_string);
  }

  None
}

/// Exactly 11 characters from `[A-Za-z0-9_-]`.
pub fn is_video_id(s: &str) -> bool {
  s.len() == VIDEO_ID_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
