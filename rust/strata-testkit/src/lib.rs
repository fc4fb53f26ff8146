//! Test utilities for the Strata crates.
//!
//! This crate provides:
//! - Random type descriptor generation
//! - Slot factories that count slot creation and decoding
//! - Builders for raw columns and text-encoded collection values

pub mod columns;
pub mod counting;
pub mod descriptor_gen;
