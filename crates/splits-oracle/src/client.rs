//! Read client for the Splits Uniswap V3 oracle.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::bindings::IMulticall3;
use alloy::providers::{Provider, MULTICALL3_ADDRESS};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;

use crate::abi::{self, IUniV3Oracle};
use crate::error::{OracleError, Result};
use crate::types::{GetQuoteAmountsRequest, QuoteAmounts, QuoteParam};
use crate::validation::{require_supported_chain, validate_address};

/// Construction parameters for [`OracleClient`].
#[derive(Debug, Clone)]
pub struct SplitsClientConfig<P> {
    pub chain_id: u64,
    /// Provider used for reads. A client without one can be built but every
    /// read fails with [`OracleError::MissingPublicClient`].
    pub public_client: Option<P>,
    /// Multicall3 deployment to batch through. Defaults to
    /// [`MULTICALL3_ADDRESS`].
    pub multicall_address: Option<Address>,
}

impl<P> SplitsClientConfig<P> {
    pub fn new(chain_id: u64, public_client: P) -> Self {
        Self {
            chain_id,
            public_client: Some(public_client),
            multicall_address: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OracleClient<P> {
    chain_id: u64,
    public_client: Option<P>,
    multicall_address: Address,
}

impl<P: Provider> OracleClient<P> {
    /// Build a client for `config.chain_id`.
    ///
    /// # Errors
    /// [`OracleError::UnsupportedChainId`] if the oracle is not deployed on
    /// that chain.
    pub fn new(config: SplitsClientConfig<P>) -> Result<Self> {
        require_supported_chain(config.chain_id)?;

        Ok(Self {
            chain_id: config.chain_id,
            public_client: config.public_client,
            multicall_address: config.multicall_address.unwrap_or(MULTICALL3_ADDRESS),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn require_public_client(&self) -> Result<&P> {
        self.public_client
            .as_ref()
            .ok_or(OracleError::MissingPublicClient)
    }

    /// Quote every pair in `request.quote_params` in one multicall.
    ///
    /// Each pair becomes its own `getQuoteAmounts` sub-call so a revert on
    /// one pair does not hide the others. Failed sub-calls are reported as
    /// zero; the output has one entry per input, in input order.
    ///
    /// # Errors
    /// - [`OracleError::InvalidAddress`] before any network call.
    /// - [`OracleError::MissingPublicClient`] if the client has no provider.
    /// - Transport and decode errors of the multicall itself.
    #[tracing::instrument(
        skip(self, request),
        fields(
            chain_id = self.chain_id,
            oracle = %request.oracle_address,
            quotes = request.quote_params.len(),
        )
    )]
    pub async fn get_quote_amounts(&self, request: GetQuoteAmountsRequest) -> Result<QuoteAmounts> {
        let oracle = validate_address(&request.oracle_address)?;
        let provider = self.require_public_client()?;

        if request.quote_params.is_empty() {
            return Ok(QuoteAmounts::default());
        }

        // MulticallBuilder::add_dynamic pins allowFailure to false, which
        // would revert the whole batch on a single unpriceable pair.
        let tx = TransactionRequest::default()
            .with_to(self.multicall_address)
            .with_input(encode_aggregate3(oracle, &request.quote_params));

        let raw = provider.call(tx).block(request.block.into()).await?;

        let results = IMulticall3::aggregate3Call::abi_decode_returns(&raw, false)
            .map_err(|source| OracleError::Decode {
                what: "aggregate3 return data",
                source,
            })?
            .returnData;

        if results.len() != request.quote_params.len() {
            return Err(OracleError::ResultLengthMismatch {
                expected: request.quote_params.len(),
                got: results.len(),
            });
        }

        let quote_amounts: Vec<U256> = results.iter().map(first_quote_amount).collect();

        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            tracing::debug!(failed, "oracle sub-calls failed, reported as zero");
        }

        Ok(QuoteAmounts { quote_amounts })
    }
}

/// Build `aggregate3` calldata with one single-pair `getQuoteAmounts` call
/// per quote param, all allowed to fail.
fn encode_aggregate3(oracle: Address, quote_params: &[QuoteParam]) -> Bytes {
    let calls = quote_params
        .iter()
        .map(|param| IMulticall3::Call3 {
            target: oracle,
            allowFailure: true,
            callData: IUniV3Oracle::getQuoteAmountsCall {
                quoteParams_: vec![abi::QuoteParams::from(param)],
            }
            .abi_encode()
            .into(),
        })
        .collect();

    IMulticall3::aggregate3Call { calls }.abi_encode().into()
}

/// First amount of a successful sub-call, zero otherwise.
fn first_quote_amount(result: &IMulticall3::Result) -> U256 {
    if !result.success {
        return U256::ZERO;
    }

    match IUniV3Oracle::getQuoteAmountsCall::abi_decode_returns(&result.returnData, false) {
        Ok(decoded) => decoded._0.first().copied().unwrap_or(U256::ZERO),
        Err(e) => {
            tracing::debug!(error = %e, "undecodable oracle return data, reported as zero");
            U256::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockTag;
    use alloy::primitives::address;
    use alloy::providers::RootProvider;

    const ORACLE: Address = address!("0000000000000000000000000000000000000a11");
    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    fn config_without_provider(chain_id: u64) -> SplitsClientConfig<RootProvider> {
        SplitsClientConfig {
            chain_id,
            public_client: None,
            multicall_address: None,
        }
    }

    fn success(amounts: Vec<U256>) -> IMulticall3::Result {
        IMulticall3::Result {
            success: true,
            returnData: IUniV3Oracle::getQuoteAmountsCall::abi_encode_returns(&(amounts,)).into(),
        }
    }

    #[test]
    fn test_encode_aggregate3_one_call_per_param() {
        let params = vec![
            QuoteParam::new(WETH, USDC, 1),
            QuoteParam::new(USDC, WETH, 2).with_data(vec![0x01]),
        ];
        let calldata = encode_aggregate3(ORACLE, &params);
        let decoded = IMulticall3::aggregate3Call::abi_decode(&calldata, true).unwrap();

        assert_eq!(decoded.calls.len(), 2);
        for (call, param) in decoded.calls.iter().zip(&params) {
            assert_eq!(call.target, ORACLE);
            assert!(call.allowFailure, "every sub-call must be allowed to fail");
            let inner = IUniV3Oracle::getQuoteAmountsCall::abi_decode(&call.callData, true).unwrap();
            assert_eq!(inner.quoteParams_.len(), 1);
            assert_eq!(inner.quoteParams_[0].baseAmount, param.base_amount);
            assert_eq!(inner.quoteParams_[0].quotePair.base, param.quote_pair.base);
        }
    }

    #[test]
    fn test_first_quote_amount_takes_first_element() {
        let result = success(vec![U256::from(42u64), U256::from(7u64)]);
        assert_eq!(first_quote_amount(&result), U256::from(42u64));
    }

    #[test]
    fn test_first_quote_amount_zero_on_failure() {
        let result = IMulticall3::Result {
            success: false,
            returnData: Bytes::from_static(&[0x08, 0xc3, 0x79, 0xa0]),
        };
        assert_eq!(first_quote_amount(&result), U256::ZERO);
    }

    #[test]
    fn test_first_quote_amount_zero_on_empty_or_garbage() {
        assert_eq!(first_quote_amount(&success(vec![])), U256::ZERO);

        let garbage = IMulticall3::Result {
            success: true,
            returnData: Bytes::from_static(&[0xff; 3]),
        };
        assert_eq!(first_quote_amount(&garbage), U256::ZERO);
    }

    #[test]
    fn test_new_rejects_unsupported_chain() {
        let err = OracleClient::new(config_without_provider(137)).unwrap_err();
        assert!(matches!(err, OracleError::UnsupportedChainId { chain_id: 137, .. }));
    }

    #[test]
    fn test_default_multicall_address() {
        let client = OracleClient::new(config_without_provider(1)).unwrap();
        assert_eq!(client.multicall_address, MULTICALL3_ADDRESS);
        assert_eq!(client.chain_id(), 1);
    }

    #[test]
    fn test_custom_multicall_address() {
        let custom = address!("00000000000000000000000000000000000c0ffe");
        let client = OracleClient::new(SplitsClientConfig {
            multicall_address: Some(custom),
            ..config_without_provider(5)
        })
        .unwrap();
        assert_eq!(client.multicall_address, custom);
    }

    #[tokio::test]
    async fn test_missing_provider_is_an_error() {
        let client = OracleClient::new(config_without_provider(1)).unwrap();
        let err = client
            .get_quote_amounts(GetQuoteAmountsRequest {
                oracle_address: format!("{ORACLE:#x}"),
                quote_params: vec![QuoteParam::new(WETH, USDC, 1)],
                block: BlockTag::Latest,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::MissingPublicClient));
    }

    #[tokio::test]
    async fn test_invalid_oracle_checked_before_provider() {
        let client = OracleClient::new(config_without_provider(1)).unwrap();
        let err = client
            .get_quote_amounts(GetQuoteAmountsRequest {
                oracle_address: "0x1234".to_string(),
                quote_params: vec![QuoteParam::new(WETH, USDC, 1)],
                block: BlockTag::Latest,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::InvalidAddress(_)));
    }
}
