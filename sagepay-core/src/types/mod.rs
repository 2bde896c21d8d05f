//! Core types exchanged with the SagePay gateway.

mod amount;
mod fields;
mod response;

pub use amount::*;
pub use fields::*;
pub use response::*;
