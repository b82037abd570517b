//! Escrow-backed task lifecycle.
//!
//! A client posts a task whose reward is locked in a custody account in the
//! same atomic unit that creates the record. A freelancer claims the task and
//! submits proof of work; the client approves (paying the freelancer) or
//! rejects (sending the task back for resubmission). Open or claimed tasks
//! can be refunded by the client at any time and by anyone after the
//! deadline. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Runtime settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
