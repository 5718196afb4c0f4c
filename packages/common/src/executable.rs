//! Destination contract interface.
//!
//! The relayer (or any operator tooling) calls `ExecutableMsg` on the
//! destination contract after it has seen the approval on the gateway. The
//! destination contract then pulls the approval with one of the
//! `GatewayValidateMsg` variants, which the gateway consumes exactly once.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, HexBinary, Uint128};

/// Messages a destination contract accepts from relayer tooling.
#[cw_serde]
pub enum ExecutableMsg {
    /// Receive an approved plain contract call.
    Execute {
        /// Id of the approving command on the gateway (for tracing only)
        command_id: HexBinary,
        source_chain: String,
        source_address: String,
        /// Full payload; its keccak256 must match the approved payload hash
        payload: Binary,
    },

    /// Receive an approved contract call that carries freshly minted tokens.
    ExecuteWithToken {
        command_id: HexBinary,
        source_chain: String,
        source_address: String,
        payload: Binary,
        symbol: String,
        amount: Uint128,
    },
}

/// Gateway messages a destination contract sends to consume its approval.
///
/// Serializes identically to the matching gateway `ExecuteMsg` variants.
#[cw_serde]
pub enum GatewayValidateMsg {
    ValidateContractCall {
        source_chain: String,
        source_address: String,
        payload_hash: HexBinary,
    },
    ValidateContractCallAndMint {
        source_chain: String,
        source_address: String,
        payload_hash: HexBinary,
        symbol: String,
        amount: Uint128,
    },
}

/// Response data of both validate messages.
///
/// `approved: false` means no matching approval existed. It is not an error,
/// so destination contracts can probe speculatively.
#[cw_serde]
pub struct ValidateResponse {
    pub approved: bool,
}
