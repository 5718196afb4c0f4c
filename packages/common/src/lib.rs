//! Common - Shared Types for the Gateway and Destination Contracts
//!
//! Destination contracts depend on this package instead of the gateway crate:
//! it carries the capability they must implement (`ExecutableMsg`) and the
//! subset of gateway messages they send back to consume an approval.

pub mod executable;

pub use executable::{ExecutableMsg, GatewayValidateMsg, ValidateResponse};
