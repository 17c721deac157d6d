//! Compile-time ABI bindings for the Uniswap V3 oracle.
//!
//! Multicall3 bindings come from `alloy::providers::bindings`.

use alloy::sol;

/// Ethereum mainnet.
pub const CHAIN_ID_MAINNET: u64 = 1;
/// Goerli testnet.
pub const CHAIN_ID_GOERLI: u64 = 5;

/// Chains the Uniswap V3 oracle is deployed on.
pub const ORACLE_CHAIN_IDS: &[u64] = &[CHAIN_ID_MAINNET, CHAIN_ID_GOERLI];

sol! {
    /// Base/quote token pair as laid out in the oracle ABI.
    struct QuotePair {
        address base;
        address quote;
    }

    /// A single quote request.
    struct QuoteParams {
        QuotePair quotePair;
        uint128 baseAmount;
        bytes data;
    }

    interface IUniV3Oracle {
        function getQuoteAmounts(QuoteParams[] calldata quoteParams_)
            external
            view
            returns (uint256[] memory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_oracle_signature() {
        assert_eq!(
            IUniV3Oracle::getQuoteAmountsCall::SIGNATURE,
            "getQuoteAmounts(((address,address),uint128,bytes)[])"
        );
    }

    #[test]
    fn test_oracle_chains_are_unique() {
        let mut ids = ORACLE_CHAIN_IDS.to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ORACLE_CHAIN_IDS.len());
    }
}
