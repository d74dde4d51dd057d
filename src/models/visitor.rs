//! Visitor records and the resolved read-model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::VisitorCategory;

/// Identifier used by the sentinel view of an unregistered code
pub const UNREGISTERED_ID: &str = "new";

/// A registered person within one category table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisitorRecord {
    /// Unique within its category table only
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub qr_code: String,
    #[serde(default)]
    pub badge_downloaded: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Category-specific columns (organization, position, booth number...)
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Visitor profile with scan counts, as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedVisitorView {
    #[serde(flatten)]
    pub visitor: VisitorRecord,
    pub visitor_type: VisitorCategory,
    pub total_scans: i64,
    pub today_scans: i64,
    pub last_scan: Option<DateTime<Utc>>,
}

impl ResolvedVisitorView {
    /// Synthetic view for a code that matched no category. Never persisted.
    pub fn unregistered(code: &str, category: VisitorCategory) -> Self {
        Self {
            visitor: VisitorRecord {
                id: UNREGISTERED_ID.to_string(),
                full_name: "Unregistered User".to_string(),
                email: String::new(),
                phone: None,
                qr_code: code.to_string(),
                badge_downloaded: false,
                created_at: None,
                extra: serde_json::Map::new(),
            },
            visitor_type: category,
            total_scans: 0,
            today_scans: 0,
            last_scan: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.visitor.id != UNREGISTERED_ID
    }
}
