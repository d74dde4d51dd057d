//! Registry overview (dashboard of recent registrations)

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{category::VisitorCategory, visitor::VisitorRecord};

/// A registration listed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegisteredVisitor {
    #[serde(flatten)]
    pub visitor: VisitorRecord,
    pub visitor_type: VisitorCategory,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RegistryOverview {
    /// Newest registrations across all categories
    pub recent: Vec<RegisteredVisitor>,
    /// General and professional visitors only
    pub total_visitors: i64,
    pub registered_today: i64,
    pub badges_downloaded: i64,
    pub total_scans: i64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema, Validate)]
pub struct RegistryQuery {
    /// Registrations fetched per category
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// Result of the store connectivity probe
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreHealth {
    pub is_healthy: bool,
    pub tables_accessible: bool,
    pub error: Option<String>,
}
