//! Command modules - one file per CLI command

pub mod completions;
pub mod link;
pub mod list;
pub mod manifest;
pub mod serve;
