//! Blog models: raw WordPress REST shapes and the lean post we serve.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A rendered-content wrapper as WordPress returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpRendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpAuthor {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpMedia {
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpTerm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub taxonomy: String,
}

/// `_embedded` payload requested with `_embed=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpEmbedded {
    #[serde(default)]
    pub author: Vec<WpAuthor>,
    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<WpMedia>,
    /// Outer vec is per-taxonomy, inner vec the terms themselves
    #[serde(default, rename = "wp:term")]
    pub terms: Vec<Vec<WpTerm>>,
}

/// Raw post from the WordPress REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct WpPost {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: WpRendered,
    #[serde(default)]
    pub excerpt: WpRendered,
    #[serde(default)]
    pub content: WpRendered,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<WpEmbedded>,
}

/// Blog post in the shape the web client consumes.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub author: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub read_time: String,
}
