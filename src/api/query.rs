//! Best-effort readers over the request query string.
//!
//! Every value that fails to convert is skipped silently; a malformed client
//! value therefore behaves like an absent one instead of producing a 400.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::Infallible;
use tracing::debug;

/// Which converted value [`QueryCollection::get`] keeps when a key repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterPick {
    #[default]
    First,
    Last,
}

/// Scalar conversion from a single query value
pub trait FromQueryValue: Sized {
    fn from_query_value(value: &str) -> Option<Self>;
}

macro_rules! from_query_value_trimmed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromQueryValue for $ty {
                fn from_query_value(value: &str) -> Option<Self> {
                    value.trim().parse().ok()
                }
            }
        )*
    };
}

from_query_value_trimmed!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, uuid::Uuid,
);

impl FromQueryValue for bool {
    fn from_query_value(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromQueryValue for char {
    fn from_query_value(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromQueryValue for String {
    fn from_query_value(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

/// Ordered, multi-valued view of the query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCollection {
    pairs: Vec<(String, String)>,
}

impl QueryCollection {
    /// Parses a raw `a=1&a=2&b=x` query string (form-urlencoded)
    pub fn from_query_str(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(
            query.trim_start_matches('?').as_bytes(),
        ))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Raw values under `key`, in source order
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value under `key` that converts to `T`
    pub fn all<T: FromQueryValue>(&self, key: &str) -> Vec<T> {
        self.values(key).filter_map(T::from_query_value).collect()
    }

    /// First or last convertible value under `key`, `default` if there is none
    pub fn get<T: FromQueryValue>(&self, key: &str, default: T, pick: ParameterPick) -> T {
        let mut values = self.all::<T>(key);
        let value = match pick {
            ParameterPick::First if !values.is_empty() => Some(values.swap_remove(0)),
            ParameterPick::First => None,
            ParameterPick::Last => values.pop(),
        };
        value.unwrap_or(default)
    }

    /// Collects every value under `key`, accepting JSON arrays/objects as well as
    /// scalars. Returns `default` only when the key is entirely absent.
    pub fn get_collection<T>(&self, key: &str, default: Vec<T>) -> Vec<T>
    where
        T: FromQueryValue + DeserializeOwned,
    {
        if !self.contains_key(key) {
            return default;
        }

        let mut collected = Vec::new();
        for raw in self.values(key) {
            if is_valid_json(raw) {
                if let Some(items) = from_json::<T>(raw) {
                    collected.extend(items);
                    continue;
                }
            }

            if let Some(value) = T::from_query_value(raw) {
                collected.push(value);
            }
        }
        collected
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryCollection
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(QueryCollection::from_query_str)
            .unwrap_or_default())
    }
}

fn from_json<T: DeserializeOwned>(raw: &str) -> Option<Vec<T>> {
    let json: Value = serde_json::from_str(raw.trim()).ok()?;
    if json.is_array() {
        if let Ok(items) = serde_json::from_value::<Vec<T>>(json.clone()) {
            return Some(items);
        }
    }
    serde_json::from_value::<T>(json).ok().map(|item| vec![item])
}

/// True when `value` is delimited like a JSON object or array and parses
pub fn is_valid_json(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }

    let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !delimited {
        return false;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(_) => true,
        Err(err) => {
            debug!("Query value looks like JSON but does not parse: {}", err);
            false
        }
    }
}
