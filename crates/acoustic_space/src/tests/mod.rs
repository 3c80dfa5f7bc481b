//! Cross-module tests
//!
//! Worked scenarios over the whole crate, and properties checked over small
//! grids of shapes and boxes.

mod scenarios;
