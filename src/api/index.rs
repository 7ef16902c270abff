use serde_json::{json, Value};

use super::minimal::VersionedApiDescriptor;

/// Builds the index document listing the service routes and every mapped API
pub fn index_document(apis: &[VersionedApiDescriptor]) -> Value {
    json!({
        "endpoints": [
            {
                "path": "/",
                "method": "GET",
                "description": "API endpoint documentation"
            },
            {
                "path": "/health",
                "method": "GET",
                "description": "Database and cache connectivity"
            }
        ],
        "apis": apis
    })
}
