use alloy::primitives::Bytes;
use alloy::providers::{Provider, ProviderBuilder, MULTICALL3_ADDRESS};
use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use splits_oracle::abi::ORACLE_CHAIN_IDS;
use splits_oracle::validation::validate_address;
use splits_oracle::{
    BlockTag, GetQuoteAmountsRequest, OracleClient, QuoteParam, SplitsClientConfig,
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct AppContext {
    rpc_url: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "splits-oracle")]
#[command(about = "Query price quotes from the Splits Uniswap V3 oracle")]
#[command(version)]
struct Cli {
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Quote one or more token pairs in a single multicall.
    Quote(QuoteArgs),
    /// List chain ids the oracle is deployed on.
    Chains,
}

/// Arguments for the `quote` subcommand.
#[derive(Args, Debug)]
struct QuoteArgs {
    /// Oracle contract address.
    #[arg(long)]
    oracle: String,

    /// Pair to quote as `base:quote:amount[:hexdata]`. Repeatable.
    #[arg(long = "pair", required = true, value_parser = parse_quote_param)]
    pairs: Vec<QuoteParam>,

    /// Chain id; read from the RPC endpoint when omitted.
    #[arg(long)]
    chain_id: Option<u64>,

    /// Block number to quote at (default: latest).
    #[arg(long)]
    block: Option<u64>,

    /// Output format: table (default) or json.
    #[arg(long, default_value = "table")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let ctx = AppContext {
        rpc_url: std::env::var("SPLITS_RPC_URL").ok(),
    };

    match cli.command {
        Commands::Quote(args) => handle_quote(&ctx, args).await,
        Commands::Chains => handle_chains(),
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Parse `base:quote:amount[:hexdata]` into a [`QuoteParam`].
fn parse_quote_param(input: &str) -> Result<QuoteParam, String> {
    let parts: Vec<&str> = input.split(':').collect();
    let (base, quote, amount, data) = match parts.as_slice() {
        [base, quote, amount] => (*base, *quote, *amount, None),
        [base, quote, amount, data] => (*base, *quote, *amount, Some(*data)),
        _ => return Err(format!("expected base:quote:amount[:hexdata], got {input:?}")),
    };

    let base = validate_address(base).map_err(|e| e.to_string())?;
    let quote = validate_address(quote).map_err(|e| e.to_string())?;
    let amount: u128 = amount
        .parse()
        .map_err(|e| format!("invalid base amount {amount:?}: {e}"))?;

    let mut param = QuoteParam::new(base, quote, amount);
    if let Some(data) = data {
        let data: Bytes = data
            .parse()
            .map_err(|e| format!("invalid hex data {data:?}: {e}"))?;
        param = param.with_data(data);
    }
    Ok(param)
}

async fn handle_quote(ctx: &AppContext, args: QuoteArgs) -> Result<()> {
    if !matches!(args.output.as_str(), "table" | "json") {
        return Err(eyre!(
            "invalid output format {:?}: expected table or json",
            args.output
        ));
    }

    let rpc_url = ctx
        .rpc_url
        .as_deref()
        .ok_or_else(|| eyre!("SPLITS_RPC_URL is required for quote command"))?;

    let provider =
        ProviderBuilder::new().on_http(rpc_url.parse().wrap_err("invalid RPC URL format")?);
    let chain_id = match args.chain_id {
        Some(id) => id,
        None => provider
            .get_chain_id()
            .await
            .wrap_err("failed to read chain id with eth_chainId")?,
    };

    let client = OracleClient::new(SplitsClientConfig::new(chain_id, provider))?;

    let block = args.block.map_or(BlockTag::Latest, BlockTag::Number);
    info!(
        chain_id,
        oracle = %args.oracle,
        pairs = args.pairs.len(),
        block = ?block,
        "requesting quotes"
    );

    let amounts = client
        .get_quote_amounts(GetQuoteAmountsRequest {
            oracle_address: args.oracle.clone(),
            quote_params: args.pairs.clone(),
            block,
        })
        .await
        .wrap_err("failed to fetch quote amounts")?;

    if args.output == "json" {
        let output = serde_json::json!({
            "chain_id": chain_id,
            "oracle": args.oracle,
            "block": block,
            "quotes": args.pairs.iter().zip(&amounts.quote_amounts).map(|(param, amount)| {
                serde_json::json!({
                    "param": param,
                    "quote_amount": amount.to_string(),
                })
            }).collect::<Vec<_>>(),
        });
        let json_str = serde_json::to_string_pretty(&output).wrap_err("failed to serialize JSON")?;
        println!("{}", json_str);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Base", "Quote", "Base Amount", "Quote Amount"]);
    for (param, amount) in args.pairs.iter().zip(&amounts.quote_amounts) {
        table.add_row(vec![
            format!("{:#x}", param.quote_pair.base),
            format!("{:#x}", param.quote_pair.quote),
            param.base_amount.to_string(),
            if amount.is_zero() {
                "0 (no quote)".to_string()
            } else {
                amount.to_string()
            },
        ]);
    }
    println!("{table}");

    Ok(())
}

fn handle_chains() -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Chain ID", "Multicall3"]);
    for chain_id in ORACLE_CHAIN_IDS {
        table.add_row(vec![chain_id.to_string(), format!("{MULTICALL3_ADDRESS:#x}")]);
    }
    println!("{table}");
    Ok(())
}
