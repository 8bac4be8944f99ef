// src/directory/models.rs
use serde::{Deserialize, Serialize};

/// One staff member harvested from a directory page row.
///
/// Equality and hashing cover every field, present or absent. That full
/// structural identity is what deduplication keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffRecord {
    pub name: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<u64>,
}

/// A school and the directory pages registered for it, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub school: String,
    pub urls: Vec<String>,
}

impl PageGroup {
    pub fn new(school: impl Into<String>) -> Self {
        Self {
            school: school.into(),
            urls: Vec::new(),
        }
    }
}
