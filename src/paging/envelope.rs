//! Page envelope decoding
//!
//! The API wraps every list response in a HATEOAS envelope whose list
//! field is named after the entity (`_embedded.orders`, `_embedded.products`,
//! ...) and whose pagination metadata lives in a `page` block. Decoding is
//! fail-safe: missing pieces yield defaults, never errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

const EMBEDDED_FIELD: &str = "_embedded";
const PAGE_FIELD: &str = "page";

/// Ordered candidate field names that may hold an entity's list.
///
/// The first candidate present in a response wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionKeys(Vec<String>);

impl CollectionKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated override such as `"orders, orderList"`.
    pub fn parse_list(value: &str) -> Self {
        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty()),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the list for the first candidate key present in `response`.
    ///
    /// Each candidate is looked up under `_embedded` first, then at the top
    /// level. A candidate whose value is not an array does not match.
    pub fn locate<'a>(&self, response: &'a Value) -> Option<(&'a str, &'a [Value])> {
        let embedded = response.get(EMBEDDED_FIELD);
        self.0.iter().find_map(|key| {
            embedded
                .and_then(|e| field_entry(e, key))
                .or_else(|| field_entry(response, key))
                .and_then(|(name, value)| value.as_array().map(|a| (name, a.as_slice())))
        })
    }
}

fn field_entry<'a>(value: &'a Value, key: &str) -> Option<(&'a str, &'a Value)> {
    value
        .as_object()
        .and_then(|map| map.get_key_value(key))
        .map(|(name, value)| (name.as_str(), value))
}

/// Pagination metadata as sent by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u32,
    pub size: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
}

impl PageMeta {
    /// Read the `page` block, defaulting each unusable field to 0.
    fn from_response(response: &Value) -> Self {
        let Some(block) = response.get(PAGE_FIELD).filter(|b| b.is_object()) else {
            return Self::default();
        };
        let field = |name: &str| block.get(name).and_then(Value::as_u64).unwrap_or(0);
        Self {
            number: clamp_u32(field("number")),
            size: clamp_u32(field("size")),
            total_pages: clamp_u32(field("totalPages")),
            total_elements: field("totalElements"),
        }
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// One page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl<T> PageEnvelope<T> {
    /// An empty, final page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_number: 0,
            page_size: 0,
            total_pages: 0,
            total_items: 0,
        }
    }

    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.page_number >= self.total_pages - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: DeserializeOwned> PageEnvelope<T> {
    /// Decode a raw list response into a normalized envelope.
    ///
    /// Without a `page` object the page is treated as empty and last, even
    /// if a list was found. Items that do not deserialize into `T` degrade
    /// the page to empty.
    pub fn decode(response: &Value, keys: &CollectionKeys) -> Self {
        if response.get(PAGE_FIELD).filter(|b| b.is_object()).is_none() {
            return Self::empty();
        }
        let meta = PageMeta::from_response(response);

        let items = match keys.locate(response) {
            Some((key, raw)) => match decode_items::<T>(raw) {
                Ok(items) => items,
                Err(error) => {
                    warn!(
                        collection = key,
                        page = meta.number,
                        %error,
                        "Discarding page with malformed items"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            items,
            page_number: meta.number,
            page_size: meta.size,
            total_pages: meta.total_pages,
            total_items: meta.total_elements,
        }
    }
}

fn decode_items<T: DeserializeOwned>(raw: &[Value]) -> Result<Vec<T>, serde_json::Error> {
    raw.iter().cloned().map(serde_json::from_value).collect()
}
