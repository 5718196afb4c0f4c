//! Admin operations handlers.
//!
//! This module handles:
//! - Signer set rotation
//! - Admin transfer

use cosmwasm_std::{DepsMut, Event, HexBinary, MessageInfo, Response};

use crate::auth::{validate_signer_set, Role};
use crate::error::ContractError;
use crate::state::{CONFIG, SIGNER_SETS};

/// Replace the signer set of a role.
pub fn execute_rotate_signers(
    deps: DepsMut,
    info: MessageInfo,
    role: u8,
    members: Vec<HexBinary>,
    threshold: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    let role = Role::from_value(role.into())?;
    let set = validate_signer_set(members, threshold)?;
    SIGNER_SETS.save(deps.storage, role.as_u8(), &set)?;

    Ok(Response::new()
        .add_attribute("method", "rotate_signers")
        .add_event(
            Event::new("signers_rotated")
                .add_attribute("role", role.as_str())
                .add_attribute("members", set.members.len().to_string())
                .add_attribute("threshold", set.threshold.to_string()),
        ))
}

/// Hand the admin role to `new_admin`.
pub fn execute_update_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    config.admin = deps.api.addr_validate(&new_admin)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_admin")
        .add_attribute("new_admin", config.admin))
}
