//! Host-facing command contract and stdio bridge.

pub mod channel;
pub mod contract;
pub mod stdio;
pub mod tasks;
