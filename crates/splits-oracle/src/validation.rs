//! Input validation performed before any network call.

use alloy::primitives::Address;

use crate::abi::ORACLE_CHAIN_IDS;
use crate::error::{OracleError, Result};

/// Parse a user-supplied address.
///
/// Requires a `0x` prefix and 40 hex digits. All-lowercase input is accepted
/// as-is; any uppercase letter means the input must carry a valid EIP-55
/// checksum.
pub fn validate_address(input: &str) -> Result<Address> {
    let invalid = || OracleError::InvalidAddress(input.to_string());

    let hex = input.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    if hex.bytes().any(|b| b.is_ascii_uppercase()) {
        return Address::parse_checksummed(input, None).map_err(|_| invalid());
    }

    input.parse::<Address>().map_err(|_| invalid())
}

/// Fail unless the oracle is deployed on `chain_id`.
pub fn require_supported_chain(chain_id: u64) -> Result<()> {
    if ORACLE_CHAIN_IDS.contains(&chain_id) {
        Ok(())
    } else {
        Err(OracleError::UnsupportedChainId {
            chain_id,
            supported: ORACLE_CHAIN_IDS.to_vec(),
        })
    }
}
