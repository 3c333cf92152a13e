//! Core abstractions: tracked metals, price fetching and the price board

pub mod board;
pub mod config;
pub mod currency;
pub mod log;
pub mod metal;
pub mod price;

// Re-export main types for cleaner imports
pub use board::{BoardOptions, BoardSnapshot, FetchState, MetalBoard, MetalDetail, Phase};
pub use metal::{TRACKED_METALS, TrackedMetal};
pub use price::{FetchError, PriceFetchClient, SpotQuote};
