//! # SagePay Kit
//!
//! Server-to-server card payments against the SagePay Direct API, including
//! completion of 3-D Secure challenges.
//!
//! The kit builds requests, sends them through a [`transport::Transport`],
//! and classifies the gateway's answer into an [`outcome::Outcome`]. It does
//! not render forms, store sessions or route requests: those stay with the
//! web framework, which receives plain values to persist.
//!
//! ## Core Components Overview
//!
//! - **[`field_mapper`]**: Normalizes a submitted checkout form into gateway
//!   field names and stamps it with a fresh `VendorTxCode`.
//! - **[`transaction`]**: [`TransactionRequest`](transaction::TransactionRequest)
//!   registers a card payment.
//! - **[`secure_auth`]**: [`SecureAuthCompletion`](secure_auth::SecureAuthCompletion)
//!   forwards the bank's 3-D Secure answer.
//! - **[`gateway_client`]**: The default HTTPS transport, backed by `reqwest`.
//!
//! Protocol types are re-exported from `sagepay-core`: [`config`],
//! [`environment`], [`errors`], [`outcome`], [`transport`] and [`types`].
//!
//! ## Checkout Flow
//!
//! ```no_run
//! use sagepay_kit::{
//!     config::MerchantConfig,
//!     environment::Environment,
//!     field_mapper::FieldMapper,
//!     gateway_client::GatewayClient,
//!     outcome::Outcome,
//!     secure_auth::SecureAuthCompletion,
//!     transaction::TransactionRequest,
//! };
//!
//! # async fn checkout(form: Vec<(String, String)>, pa_res: String) -> Result<(), Box<dyn std::error::Error>> {
//! let config = MerchantConfig::builder()
//!     .environment(Environment::Test)
//!     .vendor("teashop")
//!     .build();
//! let client = GatewayClient::from_config(&config)?;
//!
//! let fields = FieldMapper::from_config(&config).map(form)?;
//! let request = TransactionRequest::new(&config, fields)?;
//! let result = request.execute(&client).await;
//!
//! match &result.outcome {
//!     Outcome::Authorised(_) => {
//!         let record = result.session_record();
//!         // Store `record` with the order.
//!     }
//!     Outcome::ThreeDSecureRequired(challenge) => {
//!         // Redirect the browser to `challenge.acs_url` with PaReq and MD;
//!         // the bank posts back PaRes, then:
//!         let completion =
//!             SecureAuthCompletion::from_challenge(config.environment, challenge, pa_res)?;
//!         let completed = completion.execute(&client).await;
//!         if let Some(error) = completed.surfaced_error {
//!             // Keep `error` for the next page.
//!         }
//!     }
//!     other => {
//!         println!("{}: {}", other.status(), other.error_message().unwrap_or_default());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config {
    pub use sagepay_core::config::*;
}

pub mod environment {
    pub use sagepay_core::environment::*;
}

pub mod errors {
    pub use sagepay_core::errors::*;
}

pub mod outcome {
    pub use sagepay_core::outcome::*;
}

pub mod transport {
    pub use sagepay_core::transport::*;
}

pub mod types {
    pub use sagepay_core::types::*;
}

mod exchange;

pub mod field_mapper;
pub mod secure_auth;
pub mod transaction;

#[cfg(feature = "gateway-client")]
pub mod gateway_client;

#[cfg(test)]
mod mock;
