//! Signer roles and quorum verification
//!
//! Signers are identified by their 20-byte Ethereum address. A batch is
//! authorized when the distinct valid signatures over its signing hash cover
//! at least `threshold` members of the role's signer set. Signatures that fail
//! to parse or recover are ignored rather than rejected, and a signer that
//! signs twice is counted once.

use std::collections::BTreeSet;

use cosmwasm_std::{Api, Binary, HexBinary};

use crate::error::ContractError;
use crate::hash::eth_address;
use crate::state::SignerSet;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Length of an Ethereum address.
pub const ADDRESS_LENGTH: usize = 20;

// ============================================================================
// Roles
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Owner,
    Operator,
}

impl Role {
    /// Role for a wire value; anything but 1 and 2 is `UnknownRole`.
    pub fn from_value(value: u32) -> Result<Role, ContractError> {
        match value {
            1 => Ok(Role::Owner),
            2 => Ok(Role::Operator),
            role => Err(ContractError::UnknownRole { role }),
        }
    }

    /// Storage key and wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            Role::Owner => 1,
            Role::Operator => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Operator => "operator",
        }
    }
}

// ============================================================================
// Signature Recovery
// ============================================================================

/// Recovers the signer address of a 65-byte signature over a 32-byte hash.
pub trait SignatureRecovery {
    /// `None` when the signature is malformed or does not recover.
    fn recover_address(&self, message_hash: &[u8; 32], signature: &[u8]) -> Option<[u8; 20]>;
}

/// Recovery through the chain's secp256k1 host function.
pub struct ApiRecovery<'a> {
    api: &'a dyn Api,
}

impl<'a> ApiRecovery<'a> {
    pub fn new(api: &'a dyn Api) -> Self {
        Self { api }
    }
}

impl SignatureRecovery for ApiRecovery<'_> {
    fn recover_address(&self, message_hash: &[u8; 32], signature: &[u8]) -> Option<[u8; 20]> {
        if signature.len() != SIGNATURE_LENGTH {
            return None;
        }
        let recovery_param = match signature[64] {
            0 | 27 => 0,
            1 | 28 => 1,
            _ => return None,
        };
        let pubkey = self
            .api
            .secp256k1_recover_pubkey(message_hash, &signature[..64], recovery_param)
            .ok()?;
        eth_address(&pubkey)
    }
}

/// Distinct addresses behind the valid signatures.
pub fn recover_signers(
    recovery: &dyn SignatureRecovery,
    message_hash: &[u8; 32],
    signatures: &[Binary],
) -> BTreeSet<[u8; 20]> {
    signatures
        .iter()
        .filter_map(|signature| recovery.recover_address(message_hash, signature.as_slice()))
        .collect()
}

/// Check that enough members of `set` signed. Returns the number of member signers.
pub fn verify_quorum(
    role: Role,
    set: &SignerSet,
    recovered: &BTreeSet<[u8; 20]>,
) -> Result<u32, ContractError> {
    let got = recovered
        .iter()
        .filter(|signer| set.contains(signer.as_slice()))
        .count() as u32;

    if got < set.threshold {
        return Err(ContractError::QuorumNotMet {
            role: role.as_str().to_string(),
            got,
            required: set.threshold,
        });
    }
    Ok(got)
}

/// Build a signer set, rejecting malformed or duplicate members and
/// thresholds outside `1..=members`.
pub fn validate_signer_set(
    members: Vec<HexBinary>,
    threshold: u32,
) -> Result<SignerSet, ContractError> {
    if members.is_empty() {
        return Err(ContractError::InvalidSignerSet {
            reason: "at least one signer required".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for member in &members {
        if member.len() != ADDRESS_LENGTH {
            return Err(ContractError::InvalidSignerSet {
                reason: format!(
                    "signer {} must be {} bytes, got {}",
                    member.to_hex(),
                    ADDRESS_LENGTH,
                    member.len()
                ),
            });
        }
        if !seen.insert(member.as_slice()) {
            return Err(ContractError::InvalidSignerSet {
                reason: format!("duplicate signer {}", member.to_hex()),
            });
        }
    }

    if threshold == 0 || threshold as usize > members.len() {
        return Err(ContractError::InvalidSignerSet {
            reason: format!(
                "threshold {} outside 1..={}",
                threshold,
                members.len()
            ),
        });
    }

    Ok(SignerSet { members, threshold })
}
