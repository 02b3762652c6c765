//! Adapters - concrete implementations of the ports plus the HTTP surface.

pub mod cart;
pub mod http;
pub mod order;
