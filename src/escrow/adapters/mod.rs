//! Adapter implementations for escrow ports.

pub mod memory;
