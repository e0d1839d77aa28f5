// GrepMark - app/mod.rs
//
// Application layer: orchestration and persistence.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod orchestrator;
pub mod session;
pub mod store;
