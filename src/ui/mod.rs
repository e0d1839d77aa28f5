// GrepMark - ui/mod.rs
//
// Presentation layer: highlight palettes and the HTML result page.
// Dependencies: core model types only.

pub mod page;
pub mod theme;
