//! Application layer - configuration, services and their wiring.

mod builder;
pub mod config;
mod desk;
mod history;
mod resolver;
mod session;
mod submitter;

pub use builder::Services;
pub use config::{
    Config, DefaultsConfig, ExecutionConfig, LoggingConfig, NetworkConfig, QuoteConfig,
    TokensConfig, WalletConfig,
};
pub use desk::OrderDesk;
pub use history::OrderHistoryReader;
pub use resolver::{RateResolver, Resolution};
pub use session::Session;
pub use submitter::{NotReadyReason, OrderSubmitter, SubmitOutcome, SubmittedOrder};

pub use crate::domain::RateOutcome;
