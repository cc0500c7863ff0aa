//! Command-line interface definitions and dispatch.

pub mod diagnostic;
pub mod orders;
pub mod output;
pub mod quote;
pub mod submit;
pub mod tokens;

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::app::{Config, OrderDesk, Services};
use crate::domain::{OrderDraft, TokenList};
use crate::error::{ConfigError, Error, Result};
use diagnostic::ConfigDiagnostic;

/// Limit order desk: quote, place and review limit orders.
#[derive(Parser, Debug)]
#[command(name = "limit-desk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when absent)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the market rate and minimum return for an order
    Quote(OrderArgs),

    /// Place a limit order
    Submit(SubmitArgs),

    /// List orders placed by an account
    Orders(OrdersArgs),

    /// List known tokens
    Tokens,
}

/// Order inputs shared by `quote` and `submit`.
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Token to sell (symbol or address)
    #[arg(long)]
    pub from: Option<String>,

    /// Token to buy (symbol or address)
    #[arg(long)]
    pub to: Option<String>,

    /// Amount to sell, in whole tokens
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Desired rate (destination per source); overrides the market rate
    #[arg(short, long)]
    pub rate: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub order: OrderArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct OrdersArgs {
    /// Account to list (defaults to the configured wallet)
    #[arg(long)]
    pub account: Option<Address>,
}

impl OrderArgs {
    /// Draft from these arguments over the configured defaults.
    pub fn draft(&self, config: &Config, tokens: &TokenList) -> Result<OrderDraft> {
        let defaults = &config.defaults;
        let source = resolve_token(tokens, self.from.as_deref(), defaults.source_token)?;
        let destination = resolve_token(tokens, self.to.as_deref(), defaults.destination_token)?;

        let mut draft = OrderDraft::new(source, destination, defaults.amount.clone());
        if let Some(amount) = &self.amount {
            draft.set_amount(amount.clone());
        }
        draft.set_desired_rate(self.rate.clone());
        Ok(draft)
    }

    /// Desk for these arguments, with its market rate resolved.
    pub async fn desk(&self, services: &Services, tokens: &TokenList) -> Result<OrderDesk> {
        let desk = services.desk(self.draft(&services.config, tokens)?);

        let pb = output::spinner("Fetching market rate...");
        let outcome = desk.refresh().await;
        match outcome.error() {
            Some(message) => output::spinner_fail(&pb, &format!("Market rate unavailable: {message}")),
            None => output::spinner_success(&pb, "Fetched market rate"),
        }
        Ok(desk)
    }
}

fn resolve_token(tokens: &TokenList, given: Option<&str>, default: Address) -> Result<Address> {
    match given {
        Some(value) => tokens
            .resolve(value)
            .ok_or_else(|| Error::UnknownToken(value.to_string())),
        None => Ok(default),
    }
}

/// Load configuration, rendering TOML errors against the file.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Config::load_or_default(path);
    }
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    match Config::from_toml(&content) {
        Err(Error::Config(ConfigError::Parse(parse))) => {
            let report = miette::Report::new(ConfigDiagnostic::from_toml(
                &path.display().to_string(),
                &content,
                &parse,
            ));
            eprintln!("{report:?}");
            Err(ConfigError::Parse(parse).into())
        }
        other => other,
    }
}

/// Run the parsed command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    let config = load_config(&cli.config)?;
    config.init_logging();
    let tokens = config.tokens.load()?;

    match cli.command {
        Commands::Tokens => tokens::execute(&tokens),
        Commands::Quote(args) => {
            let services = Services::from_config(config);
            quote::execute(&services, &tokens, &args).await
        }
        Commands::Submit(args) => {
            let services = Services::from_config(config);
            submit::execute(&services, &tokens, &args).await
        }
        Commands::Orders(args) => {
            let services = Services::from_config(config);
            orders::execute(&services, &tokens, &args).await
        }
    }
}
