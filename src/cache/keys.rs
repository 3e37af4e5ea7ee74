//! Cache key derivation.
//!
//! A key is `prefix:identity`. The identity is the full request URL with its query
//! pairs in canonical order, so `?a=1&b=2` and `?b=2&a=1` share one entry while any
//! differing parameter value yields a distinct key.

use std::fmt;

use url::form_urlencoded;

use super::CacheError;

/// Canonical description of the request whose result is being cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity(String);

impl RequestIdentity {
    pub fn new(identity: impl Into<String>) -> Result<Self, CacheError> {
        let identity = identity.into();
        if identity.trim().is_empty() {
            return Err(CacheError::MissingIdentity);
        }
        Ok(Self(identity))
    }

    /// Build `{scheme}://{host}{path}` plus the canonical query, when there is one.
    pub fn from_parts(
        scheme: &str,
        host: &str,
        path: &str,
        query: Option<&str>,
    ) -> Result<Self, CacheError> {
        let mut identity = format!("{scheme}://{host}{path}");
        let query = query.map(canonical_query).unwrap_or_default();
        if !query.is_empty() {
            identity.push('?');
            identity.push_str(&query);
        }
        Self::new(identity)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode the query pairs, sort them by key then value and re-encode.
pub fn canonical_query(raw: &str) -> String {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect();
    pairs.sort();
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(prefix: &str, identity: &RequestIdentity) -> Self {
        Self(format!("{prefix}:{}", identity.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
