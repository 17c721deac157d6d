//! Error type returned by the oracle client.

use alloy::transports::TransportError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = OracleError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle is not deployed on the requested chain.
    #[error("unsupported chain id {chain_id}, supported chain ids: {supported:?}")]
    UnsupportedChainId { chain_id: u64, supported: Vec<u64> },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A read was attempted on a client built without a provider.
    #[error("public client required to perform this action, please update your call to the constructor")]
    MissingPublicClient,

    #[error("multicall eth_call failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },

    /// The multicall returned a different number of results than calls sent.
    #[error("multicall returned {got} results for {expected} calls")]
    ResultLengthMismatch { expected: usize, got: usize },
}
