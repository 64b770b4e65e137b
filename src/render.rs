//! Turning API result records into page elements.
//!
//! Home and search pages share one renderer; [`Page`] selects the few places
//! where they differ (id fallback, empty-list handling, failure text).

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use crate::constants::constants;
use crate::intent::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
  Home,
  Search,
}

/// A single-line status message shown in place of (or before) results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
  Loading,
  NoResults,
  LoadFailed(Page),
  MissingCredential,
}

impl Indicator {
  pub fn text(self) -> &'static str {
    match self {
      Indicator::Loading => "Loading...",
      Indicator::NoResults => "No results found.",
      Indicator::LoadFailed(Page::Home) => "Could not load feed :(",
      Indicator::LoadFailed(Page::Search) => "Error fetching search results.",
      Indicator::MissingCredential => "No API key saved!",
    }
  }
}

/// One result as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCard {
  pub id: String,
  pub title: String,
  pub thumbnail_url: String,
}

impl VideoCard {
  /// Project a raw API record. Never fails: a missing title becomes the
  /// placeholder, a missing thumbnail an empty URL, a missing id an empty id.
  pub fn from_record(record: &Value, page: Page) -> Self {
    let id = record.pointer("/id/videoId").and_then(Value::as_str).or_else(|| match page {
      Page::Home => record.get("id").and_then(Value::as_str),
      Page::Search => None,
    });
    let title = record.pointer("/snippet/title").and_then(Value::as_str).filter(|t| !t.is_empty());
    let thumbnail_url = record.pointer("/snippet/thumbnails/medium/url").and_then(Value::as_str);

    Self {
      id: id.unwrap_or_default().to_string(),
      title: title.unwrap_or(&constants().untitled_placeholder).to_string(),
      thumbnail_url: thumbnail_url.unwrap_or_default().to_string(),
    }
  }

  pub fn href(&self) -> String {
    Route::Watch { id: self.id.clone() }.href()
  }

  pub fn to_html(&self) -> String {
    let title_attr = encode_double_quoted_attribute(&self.title);
    format!(
      concat!(
        r#"<div style="display:inline-block;margin:8px;text-align:center;vertical-align:top">"#,
        r#"<a href="{href}" title="{title_attr}">"#,
        r#"<img src="{src}" alt="{title_attr}" style="border-radius:8px;cursor:pointer;max-width:200px">"#,
        r#"</a>"#,
        r#"<div style="margin-top:4px;color:white;font-size:14px;max-width:200px;overflow:hidden;text-overflow:ellipsis;white-space:nowrap">{title}</div>"#,
        r#"</div>"#
      ),
      href = encode_double_quoted_attribute(&self.href()),
      title_attr = title_attr,
      src = encode_double_quoted_attribute(&self.thumbnail_url),
      title = encode_text(&self.title),
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
  Video(VideoCard),
  Notice(Indicator),
}

impl Element {
  pub fn to_html(&self) -> String {
    match self {
      Element::Video(card) => card.to_html(),
      Element::Notice(indicator) => format!("<p>{}</p>", encode_text(indicator.text())),
    }
  }
}

/// The element that holds a page's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
  id: &'static str,
  children: Vec<Element>,
}

impl Container {
  pub fn new(id: &'static str) -> Self {
    Self { id, children: Vec::new() }
  }

  pub fn children(&self) -> &[Element] {
    &self.children
  }

  pub fn cards(&self) -> impl Iterator<Item = &VideoCard> {
    self.children.iter().filter_map(|e| match e {
      Element::Video(card) => Some(card),
      Element::Notice(_) => None,
    })
  }

  pub fn clear(&mut self) {
    self.children.clear();
  }

  /// Replace the contents with a single indicator.
  pub fn show(&mut self, indicator: Indicator) {
    self.children = vec![Element::Notice(indicator)];
  }

  pub fn push(&mut self, element: Element) {
    self.children.push(element);
  }

  pub fn to_html(&self) -> String {
    let mut html = format!(r#"<div id="{}">"#, encode_double_quoted_attribute(self.id));
    for child in &self.children {
      html.push('\n');
      html.push_str(&child.to_html());
    }
    html.push_str("\n</div>");
    html
  }
}

/// Replace `container`'s contents with the result of a listing call.
///
/// `None` (the call failed) shows the failure indicator. A payload without an
/// `items` array is a failure on the home page and "no results" on the search
/// page. An empty list shows "no results" on the search page and nothing on
/// the home page. Otherwise one card per item, in API order.
pub fn render_results(container: &mut Container, data: Option<&Value>, page: Page) {
  container.clear();

  let Some(data) = data else {
    container.show(Indicator::LoadFailed(page));
    return;
  };

  let Some(items) = data.get("items").and_then(Value::as_array) else {
    container.show(match page {
      Page::Home => Indicator::LoadFailed(page),
      Page::Search => Indicator::NoResults,
    });
    return;
  };

  if items.is_empty() && page == Page::Search {
    container.show(Indicator::NoResults);
    return;
  }

  for record in items {
    container.push(Element::Video(VideoCard::from_record(record, page)));
  }
}
