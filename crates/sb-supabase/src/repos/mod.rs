//! Store operations on [`SupabaseStore`](crate::SupabaseStore), one module per
//! table.

mod certificates;
mod personnel;
mod sites;
mod stats;

use chrono::Utc;
use serde::Serialize;

use crate::error::SupabaseError;

/// Serialize an update struct and stamp `updated_at`.
pub(crate) fn patch_body<T: Serialize>(update: &T) -> Result<serde_json::Value, SupabaseError> {
    let mut body =
        serde_json::to_value(update).map_err(|e| SupabaseError::Parse(e.to_string()))?;
    if let Some(map) = body.as_object_mut() {
        map.insert(
            "updated_at".to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );
    }
    Ok(body)
}

/// PostgREST reports unique violations as 409.
pub(crate) const fn is_unique_violation(err: &SupabaseError) -> bool {
    matches!(err, SupabaseError::Api { status: 409, .. })
}
