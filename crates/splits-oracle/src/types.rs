//! Request and response types for oracle quotes.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::eth::{BlockId, BlockNumberOrTag};
use serde::{Deserialize, Serialize};

use crate::abi;

/// Base/quote token address pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotePair {
    /// Token being priced.
    pub base: Address,
    /// Token the price is denominated in.
    pub quote: Address,
}

/// One quote request: a pair, an amount of the base token and optional
/// oracle-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteParam {
    pub quote_pair: QuotePair,
    /// Amount of `base` to quote, in base token units (`uint128` on chain).
    pub base_amount: u128,
    /// Auxiliary data forwarded to the oracle. `None` is sent as `0x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl QuoteParam {
    pub fn new(base: Address, quote: Address, base_amount: u128) -> Self {
        Self {
            quote_pair: QuotePair { base, quote },
            base_amount,
            data: None,
        }
    }

    /// Attach oracle-specific data.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }
}

impl From<&QuoteParam> for abi::QuoteParams {
    fn from(param: &QuoteParam) -> Self {
        abi::QuoteParams {
            quotePair: abi::QuotePair {
                base: param.quote_pair.base,
                quote: param.quote_pair.quote,
            },
            baseAmount: param.base_amount,
            data: param.data.clone().unwrap_or_default(),
        }
    }
}

/// Block the reads are executed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    #[default]
    Latest,
    Number(u64),
}

impl From<BlockTag> for BlockId {
    fn from(tag: BlockTag) -> Self {
        match tag {
            BlockTag::Latest => BlockId::Number(BlockNumberOrTag::Latest),
            BlockTag::Number(n) => BlockId::Number(BlockNumberOrTag::Number(n)),
        }
    }
}

/// Arguments to [`crate::OracleClient::get_quote_amounts`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetQuoteAmountsRequest {
    /// Oracle contract address as supplied by the caller; validated before use.
    pub oracle_address: String,
    pub quote_params: Vec<QuoteParam>,
    #[serde(default)]
    pub block: BlockTag,
}

/// Quote results, one per requested [`QuoteParam`] and in the same order.
///
/// Pairs the oracle failed to price are reported as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteAmounts {
    pub quote_amounts: Vec<U256>,
}
