// GrepMark - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, serde, regex.
// Must NOT depend on: ui, platform, app, or touch the filesystem.

pub mod export;
pub mod filter;
pub mod highlight;
pub mod model;
