// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the WordPress-compatible blog content API.
//!
//! The blog API is optional: when no base URL is configured, every lookup
//! returns empty rather than failing the page.

use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

use crate::models::blog::{WpPost, WpTerm};
use crate::models::BlogPost;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const WORDS_PER_MINUTE: usize = 200;

#[derive(Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: String,
}

impl BlogClient {
    pub fn new(base_url: Option<String>, api_key: String) -> Self {
        if base_url.is_none() {
            tracing::warn!("BLOG_API_URL is not configured; blog content will be empty");
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Paginated post listing. Returns the posts and the total page count
    /// from the `X-WP-TotalPages` header.
    pub async fn list_posts(&self, page: u32, per_page: u32) -> (Vec<BlogPost>, u32) {
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("_embed", "1".to_string()),
        ];

        match self.wp_fetch_with_meta::<Vec<WpPost>>("/posts", &params).await {
            Some((posts, total_pages)) => {
                (posts.iter().map(map_post).collect(), total_pages)
            }
            None => (Vec::new(), 0),
        }
    }

    /// Fetch a single post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        let params = [
            ("slug", slug.to_string()),
            ("_embed", "1".to_string()),
        ];

        let posts: Vec<WpPost> = self.wp_fetch("/posts", &params).await?;
        posts.first().map(map_post)
    }

    async fn wp_fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Option<T> {
        self.wp_fetch_with_meta(endpoint, params)
            .await
            .map(|(data, _)| data)
    }

    async fn wp_fetch_with_meta<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Option<(T, u32)> {
        let base_url = self.base_url.as_ref()?;
        let url = format!("{base_url}{endpoint}");

        let response = self
            .http
            .get(&url)
            .query(params)
            .header("X-API-KEY", header_value(&self.api_key))
            .send()
            .await
            .inspect_err(|err| tracing::warn!(endpoint, error = %err, "Blog API request failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::debug!(endpoint, status = %response.status(), "Blog API returned error");
            return None;
        }

        let total_pages = response
            .headers()
            .get("X-WP-TotalPages")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let data = response
            .json()
            .await
            .inspect_err(|err| tracing::warn!(endpoint, error = %err, "Blog API returned bad JSON"))
            .ok()?;

        Some((data, total_pages))
    }
}

fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Map a raw WordPress post to the shape the client consumes.
fn map_post(post: &WpPost) -> BlogPost {
    let embedded = post.embedded.as_ref();

    let author = embedded
        .and_then(|e| e.author.first())
        .map(|a| a.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());

    let image = embedded
        .and_then(|e| e.featured_media.first())
        .map(|m| m.source_url.clone())
        .filter(|url| !url.is_empty());

    let terms_of = |taxonomy: &str| -> Vec<String> {
        embedded
            .map(|e| {
                e.terms
                    .iter()
                    .flatten()
                    .filter(|t| t.taxonomy == taxonomy)
                    .map(|t: &WpTerm| t.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    };

    BlogPost {
        id: post.id,
        slug: post.slug.clone(),
        title: post.title.rendered.clone(),
        excerpt: post.excerpt.rendered.clone(),
        content: post.content.rendered.clone(),
        date: post.date.clone(),
        author,
        image,
        categories: terms_of("category"),
        tags: terms_of("post_tag"),
        read_time: calculate_read_time(&post.content.rendered),
    }
}

/// Estimated reading time of rendered HTML content at 200 wpm.
pub fn calculate_read_time(content: &str) -> String {
    let text = strip_tags(content);
    let word_count = text.split_whitespace().count();
    let minutes = word_count.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// Drop everything between `<` and `>`; good enough for word counting.
fn strip_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;

    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Keep words on both sides of a tag separated
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}
