//! Data adapters that implement the navigation capability traits.

mod tilemap;

pub use tilemap::{GridLayer, GridTilemap};
