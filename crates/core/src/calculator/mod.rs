//! Calculator module - the profit/loss engine and its input/output models.

mod calculator_engine;
mod calculator_model;

pub use calculator_engine::{calculate, round3};
pub use calculator_model::{
    CalculationInput, CalculationResult, FeeBreakdown, FeeItem, MarketValueSource,
};
