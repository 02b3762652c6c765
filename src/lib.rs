//! Unitpay Gateway - payment notification service
//!
//! Implements the Unitpay payment protocol for an online shop: signed
//! outbound payment forms, fiscal receipts, and the callback endpoint that
//! verifies provider notifications and reconciles order state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
