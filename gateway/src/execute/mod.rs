//! Execute handlers for the gateway contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `batch` - Signed batch execution, command dispatch and token replies
//! - `tokens` - deployToken and mintToken commands
//! - `approvals` - Approval commands and their one-time consumption
//! - `freeze` - Freeze commands and the freeze gate
//! - `outgoing` - CallContract and CallContractWithToken
//! - `admin` - Signer rotation and admin transfer

mod admin;
mod approvals;
mod batch;
mod freeze;
mod outgoing;
mod tokens;

pub use admin::*;
pub use approvals::{
    execute_validate_contract_call, execute_validate_contract_call_and_mint,
    is_contract_call_and_mint_approved, is_contract_call_approved,
};
pub use batch::*;
pub use outgoing::*;
pub use tokens::predict_token_address;

use cosmwasm_std::{CosmosMsg, Event};

use crate::state::Undo;

/// What a successful command handler did.
#[derive(Debug)]
pub struct CommandEffect {
    /// Durable records of the command
    pub events: Vec<Event>,
    /// Token message the command depends on, with the writes to undo if it fails
    pub token_msg: Option<(CosmosMsg, Undo)>,
}

impl CommandEffect {
    pub fn done(events: Vec<Event>) -> Self {
        Self {
            events,
            token_msg: None,
        }
    }

    pub fn pending(msg: CosmosMsg, undo: Undo, events: Vec<Event>) -> Self {
        Self {
            events,
            token_msg: Some((msg, undo)),
        }
    }
}
