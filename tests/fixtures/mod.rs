//! Test fixtures for homecare-route-optimizer.
//!
//! Provides realistic test data including:
//! - Real Lisbon addresses with their coordinates (from OpenStreetMap)
//! - Fake geocoding and routing backends that record their calls

#![allow(dead_code)]

pub mod fakes;
pub mod lisbon_addresses;

pub use fakes::*;
pub use lisbon_addresses::*;
