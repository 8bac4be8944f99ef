// src/extractors/mod.rs
pub mod contact;
pub mod role;
pub mod row;

// Re-export key extraction types for convenience
pub use role::RoleClassifier;
pub use row::{collect_rows, RowDraft};
