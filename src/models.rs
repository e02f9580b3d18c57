// Re-export core model types so code using crate::models::* keeps working
pub use alinea_core::models::*;
pub use alinea_core::models::write::{AccountPatch, NewAccount, NewReport, ReportDraft, ReportPatch};
