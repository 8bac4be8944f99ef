// src/directory/mod.rs
pub mod client;
pub mod models;

pub use client::{ClientSettings, DirectoryClient};
pub use models::{PageGroup, StaffRecord};
