//! Exchange-agnostic domain logic: amounts, rates, drafts and history.

pub mod amount;
pub mod error;
pub mod history;
pub mod order;
pub mod rate;
pub mod token;

pub use amount::TOKEN_DECIMALS;
pub use history::{HistoricalOrder, OrderLine};
pub use order::{compose_order, ComposedOrder, LimitOrderParams, OrderDraft, DEFAULT_AMOUNT};
pub use rate::{market_rate, QuoteRequest, RateOutcome};
pub use token::{TokenList, TokenRef, NATIVE_TOKEN};
