//! Revision information for change detection.

use serde::{Deserialize, Serialize};

/// Datastore revision counter, bumped on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
