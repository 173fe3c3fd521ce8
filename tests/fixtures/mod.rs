//! Test fixtures for delivery-router.
//!
//! Provides:
//! - Small synthetic road networks with known distances
//! - Real Bengaluru coordinates for network-backed tests

#![allow(dead_code)]

pub mod bengaluru_locations;
pub mod road_networks;

#[allow(unused_imports)]
pub use road_networks::*;
