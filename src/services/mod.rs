//! Core services for version resolution, flag injection, and post-build archival

pub mod archive;
pub mod hooks;
pub mod inject;
pub mod version;
