// src/lookup/catalog.rs — Token and fuzzy scored product search

use serde::{Deserialize, Serialize};

/// Default number of results, sized for a search-box dropdown.
pub const DEFAULT_LIMIT: usize = 8;

const FUZZY_MAX_QUERY_LEN: usize = 20;
const FUZZY_MIN_SIMILARITY: f64 = 0.8;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub legacy_id: serde_json::Value,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub default_image: Option<String>,
}

#[derive(Debug, Clone)]
struct IndexedProduct {
    legacy_id: String,
    name: String,
    name_lower: String,
    name_words: Vec<String>,
    slug: String,
    image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: u32,
    pub legacy_id: String,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<IndexedProduct>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| {
                let legacy_id = match &p.legacy_id {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let name_lower = p.name.to_lowercase();
                IndexedProduct {
                    legacy_id,
                    name_words: name_lower.split_whitespace().map(String::from).collect(),
                    name_lower,
                    slug: p.slug.to_lowercase(),
                    name: p.name,
                    image: p.default_image,
                }
            })
            .collect();
        Self { products }
    }

    /// Load a JSON product array from a local path or an http(s) URL.
    pub async fn load(source: &str) -> anyhow::Result<Self> {
        let is_url = source.starts_with("http://") || source.starts_with("https://");
        let products: Vec<Product> = if is_url {
            reqwest::get(source).await?.error_for_status()?.json().await?
        } else {
            serde_json::from_str(&tokio::fs::read_to_string(source).await?)?
        };
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Rank products against `query`. Queries under two characters match nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let tokens: Vec<&str> = query.split_whitespace().collect();
        let fuzzy = query.chars().count() <= FUZZY_MAX_QUERY_LEN;
        let mut hits = Vec::new();

        for product in &self.products {
            let score = score_product(product, &query, &tokens, fuzzy);
            if score > 0 {
                hits.push(SearchHit {
                    score,
                    legacy_id: product.legacy_id.clone(),
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    image: product.image.clone(),
                });
            }
            if hits.len() > limit.saturating_mul(5) {
                break;
            }
        }

        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}

fn score_product(product: &IndexedProduct, query: &str, tokens: &[&str], fuzzy: bool) -> u32 {
    let mut score = 0;

    if query == product.legacy_id {
        score += 200;
    }
    if query == product.slug {
        score += 180;
    }
    if query == product.name_lower {
        score += 150;
    }

    let matched = tokens
        .iter()
        .filter(|q| product.name_words.iter().any(|w| w.starts_with(**q)))
        .count();
    score += 20 * matched as u32;
    if matched == tokens.len() {
        score += 40;
    }

    if fuzzy {
        let close = tokens
            .iter()
            .filter(|q| {
                product
                    .name_words
                    .iter()
                    .any(|w| strsim::normalized_levenshtein(q, w) >= FUZZY_MIN_SIMILARITY)
            })
            .count();
        score += 6 * close as u32;
    }

    if product.slug.contains(query) {
        score += 10;
    }

    score
}
