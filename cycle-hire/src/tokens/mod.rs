//! Token reuse: the session cache and the fallback chain that feeds it.

mod cache;
mod strategy;

pub use cache::{ActiveTokenState, Provenance, TokenCache};
pub use strategy::{Clock, Selected, StrategyPolicy, Tier, TokenStrategySelector};
