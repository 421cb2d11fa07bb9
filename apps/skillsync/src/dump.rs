use serde_json::{Map, Value};
use tracing::info;

use crate::store::{statements, QueryStore, StoreError};

/// Fetches every known collection into one JSON object
/// (`skills`, `candidates`, `candidate_skills`, `ads`, `ad_skills`).
pub async fn fetch_all(store: &dyn QueryStore, bucket: &str) -> Result<Value, StoreError> {
    let mut data = Map::new();
    for (collection, field) in statements::DUMP_COLLECTIONS {
        let rows = store
            .execute(&statements::select_all(bucket, collection))
            .await?;
        info!("Fetched {} rows from {}", rows.len(), collection);
        data.insert(field.to_string(), Value::Array(rows));
    }
    Ok(Value::Object(data))
}
