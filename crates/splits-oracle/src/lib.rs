//! splits-oracle: read-only client for the Splits Uniswap V3 oracle.
//!
//! Batches quote lookups into a single Multicall3 `aggregate3` round trip
//! over any alloy [`Provider`](alloy::providers::Provider). A pair the oracle
//! cannot price yields zero at its position instead of failing the batch.

pub mod abi;
pub mod client;
pub mod error;
pub mod types;
pub mod validation;

pub use client::{OracleClient, SplitsClientConfig};
pub use error::{OracleError, Result};
pub use types::{BlockTag, GetQuoteAmountsRequest, QuoteAmounts, QuotePair, QuoteParam};
