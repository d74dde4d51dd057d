//! Data models for the check-in server

pub mod category;
pub mod registry;
pub mod scan;
pub mod scan_code;
pub mod visitor;

// Re-export commonly used types
pub use category::VisitorCategory;
pub use registry::{RegisteredVisitor, RegistryOverview, StoreHealth};
pub use scan::{DailyRecap, ScanEvent, ScanStats};
pub use visitor::{ResolvedVisitorView, VisitorRecord};
