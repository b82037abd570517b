//! Bountyboard: escrow-backed micro-task marketplace.
//!
//! This crate implements the task registry and escrow lifecycle controller
//! of a marketplace in which clients lock funds against a task, freelancers
//! claim and complete it, and the escrow is released exactly once on
//! approval or refund.
//!
//! # Architecture
//!
//! Bountyboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the ledger runtime and event sink
//! - **Adapters**: Concrete implementations of ports (in-memory ledger, etc.)
//!
//! # Modules
//!
//! - [`escrow`]: Task records, the escrow state machine, and its services

pub mod escrow;
