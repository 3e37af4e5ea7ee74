//! Mapping from raw search hits to catalogue entities.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::{error::ServiceError, repos::SearchHit};

/// Decode a hit's `_source`, falling back to the hit id when the document omits its own.
pub fn decode_hit<T: DeserializeOwned>(
    entity: &'static str,
    hit: SearchHit,
) -> Result<T, ServiceError> {
    let SearchHit { id, mut source, .. } = hit;
    if let Value::Object(fields) = &mut source {
        fields.entry("id").or_insert(Value::String(id));
    }
    serde_json::from_value(source).map_err(|source| ServiceError::Decode { entity, source })
}

pub fn decode_hits<T: DeserializeOwned>(
    entity: &'static str,
    hits: Vec<SearchHit>,
) -> Result<Vec<T>, ServiceError> {
    hits.into_iter().map(|hit| decode_hit(entity, hit)).collect()
}
