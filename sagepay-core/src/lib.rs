//! SagePay core library.
//!
//! Protocol types for the SagePay Direct API with no I/O of their own:
//! environments and endpoints, merchant configuration, field mappings and
//! their wire encoding, response parsing and outcome classification.

pub mod config;
pub mod environment;
pub mod errors;
pub mod outcome;
pub mod transport;
pub mod types;
