//! Hash computation for batch signing, approval keys and token salts
//!
//! # Batch signing hash
//! Signers sign the Ethereum personal-message digest of the raw batch bytes:
//! ```text
//! keccak256("\x19Ethereum Signed Message:\n32" ++ keccak256(data))
//! ```
//!
//! # Approval keys
//! Keys are keccak256 over a 32-byte domain prefix followed by each field.
//! Variable-length fields are length-prefixed (u32, big-endian) so that
//! `("ab", "c")` and `("a", "bc")` never collide. The command id is not part of
//! the key: an approval is identified by what it authorizes.

use cosmwasm_std::Uint128;
use tiny_keccak::{Hasher, Keccak};

const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

const CONTRACT_CALL_APPROVED: &[u8] = b"contract-call-approved";
const CONTRACT_CALL_APPROVED_WITH_MINT: &[u8] = b"contract-call-approved-with-mint";
const TOKEN_SALT: &[u8] = b"gateway-token";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Digest the signers of a batch sign over.
pub fn batch_signing_hash(data: &[u8]) -> [u8; 32] {
    let mut buffer = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    buffer.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    buffer.extend_from_slice(&keccak256(data));
    keccak256(&buffer)
}

/// Ethereum address of an uncompressed secp256k1 public key (65 bytes, 0x04 prefix).
pub fn eth_address(uncompressed_pubkey: &[u8]) -> Option<[u8; 20]> {
    if uncompressed_pubkey.len() != 65 || uncompressed_pubkey[0] != 0x04 {
        return None;
    }
    let digest = keccak256(&uncompressed_pubkey[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Some(address)
}

/// Key of a plain contract-call approval.
pub fn contract_call_approval_key(
    source_chain: &str,
    source_address: &str,
    contract_address: &str,
    payload_hash: &[u8; 32],
) -> [u8; 32] {
    let mut encoded = Vec::new();
    encoded.extend_from_slice(&keccak256(CONTRACT_CALL_APPROVED));
    encode_length_prefixed(&mut encoded, source_chain.as_bytes());
    encode_length_prefixed(&mut encoded, source_address.as_bytes());
    encode_length_prefixed(&mut encoded, contract_address.as_bytes());
    encoded.extend_from_slice(payload_hash);
    keccak256(&encoded)
}

/// Key of a mint-carrying contract-call approval.
///
/// Symbol and amount are part of the key, so an approval only matches the exact
/// mint it was created for.
pub fn mint_approval_key(
    source_chain: &str,
    source_address: &str,
    contract_address: &str,
    payload_hash: &[u8; 32],
    symbol: &str,
    amount: Uint128,
) -> [u8; 32] {
    let mut encoded = Vec::new();
    encoded.extend_from_slice(&keccak256(CONTRACT_CALL_APPROVED_WITH_MINT));
    encode_length_prefixed(&mut encoded, source_chain.as_bytes());
    encode_length_prefixed(&mut encoded, source_address.as_bytes());
    encode_length_prefixed(&mut encoded, contract_address.as_bytes());
    encoded.extend_from_slice(payload_hash);
    encode_length_prefixed(&mut encoded, symbol.as_bytes());
    encoded.extend_from_slice(&amount.u128().to_be_bytes());
    keccak256(&encoded)
}

/// Instantiate2 salt of a gateway-deployed token.
pub fn token_salt(symbol: &str, decimals: u8, cap: Uint128) -> [u8; 32] {
    let mut encoded = Vec::new();
    encoded.extend_from_slice(TOKEN_SALT);
    encode_length_prefixed(&mut encoded, symbol.as_bytes());
    encoded.push(decimals);
    encoded.extend_from_slice(&cap.u128().to_be_bytes());
    keccak256(&encoded)
}

/// Encode data with length prefix (u32 length + data bytes)
fn encode_length_prefixed(buffer: &mut Vec<u8>, data: &[u8]) {
    buffer.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buffer.extend_from_slice(data);
}

/// Convert 32-byte hash to hex string (for attributes)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Interpret a byte slice as a 32-byte hash.
pub fn to_bytes32(bytes: &[u8]) -> Option<[u8; 32]> {
    bytes.try_into().ok()
}
