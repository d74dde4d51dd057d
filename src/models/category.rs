//! Visitor categories
//!
//! Every category is backed by its own table. The declaration order is the
//! search priority used when resolving a scan code.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// One of the fixed visitor classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitorCategory {
    #[serde(rename = "visitors")]
    General,
    #[serde(rename = "professional_visitors")]
    Professional,
    Press,
    #[serde(rename = "exhibitors")]
    Exhibitor,
    Staff,
    Conference,
    #[serde(rename = "organisateurs")]
    Organizer,
    Vip,
}

impl VisitorCategory {
    /// All categories in search order
    pub const ALL: [VisitorCategory; 8] = [
        VisitorCategory::General,
        VisitorCategory::Professional,
        VisitorCategory::Press,
        VisitorCategory::Exhibitor,
        VisitorCategory::Staff,
        VisitorCategory::Conference,
        VisitorCategory::Organizer,
        VisitorCategory::Vip,
    ];

    /// Tag stored in `visitor_scans.visitor_type`; also the backing table name
    pub fn tag(self) -> &'static str {
        match self {
            VisitorCategory::General => "visitors",
            VisitorCategory::Professional => "professional_visitors",
            VisitorCategory::Press => "press",
            VisitorCategory::Exhibitor => "exhibitors",
            VisitorCategory::Staff => "staff",
            VisitorCategory::Conference => "conference",
            VisitorCategory::Organizer => "organisateurs",
            VisitorCategory::Vip => "vip",
        }
    }

    pub fn table(self) -> &'static str {
        self.tag()
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            VisitorCategory::General => "General Visitors",
            VisitorCategory::Professional => "Professional Visitors",
            VisitorCategory::Press => "Press",
            VisitorCategory::Exhibitor => "Exhibitors",
            VisitorCategory::Staff => "Staff",
            VisitorCategory::Conference => "Conference Attendees",
            VisitorCategory::Organizer => "Organizers",
            VisitorCategory::Vip => "VIP",
        }
    }

    /// Categories counted as registered visitors on the dashboard
    pub fn counts_as_attendee(self) -> bool {
        matches!(self, VisitorCategory::General | VisitorCategory::Professional)
    }
}

impl std::fmt::Display for VisitorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for VisitorCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisitorCategory::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown visitor category: {}", s)))
    }
}

/// Category tag and label, as listed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryInfo {
    pub tag: VisitorCategory,
    pub label: String,
}

impl From<VisitorCategory> for CategoryInfo {
    fn from(c: VisitorCategory) -> Self {
        Self {
            tag: c,
            label: c.label().to_string(),
        }
    }
}
