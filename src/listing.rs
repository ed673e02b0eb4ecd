//! Rule-based product listing optimisation.
//!
//! Normalises the title casing and returns a fixed set of copywriting
//! suggestions. Description and price pass through with placeholders when
//! absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DESCRIPTION_PLACEHOLDER: &str = "Write a benefit-led description for this listing";
const PRICE_PLACEHOLDER: &str = "Market research recommended";
const NOTE: &str = "Rule-based optimization; suggestions are generic";

const SUGGESTIONS: [&str; 4] = [
    "Add specific keywords for SEO",
    "Include brand name if applicable",
    "Highlight unique selling points",
    "Use power words (premium, exclusive, limited)",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form; clients send numbers or strings.
    #[serde(default)]
    pub price: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedListing {
    pub title: String,
    pub description: String,
    pub price: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingOptimization {
    pub success: bool,
    pub original: ListingRequest,
    pub optimized: OptimizedListing,
    pub suggestions: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("Title is required")]
    MissingTitle,
}

/// Optimise a listing. Fails only when the title is missing or blank.
pub fn optimize_listing(request: ListingRequest) -> Result<ListingOptimization, ListingError> {
    let title = match request.title.as_deref() {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ListingError::MissingTitle),
    };

    let description = request
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string());

    let price = match &request.price {
        None | Some(Value::Null) => Value::String(PRICE_PLACEHOLDER.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Value::String(PRICE_PLACEHOLDER.to_string())
        }
        Some(v) => v.clone(),
    };

    let optimized = OptimizedListing {
        title: title_case(title),
        description,
        price,
    };

    Ok(ListingOptimization {
        success: true,
        original: request,
        optimized,
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        note: NOTE.to_string(),
    })
}

/// Upper-case the first character of every space-separated word and
/// lower-case the rest. Runs of spaces are preserved.
pub fn title_case(title: &str) -> String {
    title
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
