use crate::entities::trades_summary::{SequenceFailure, TradesSummary};
use crate::entities::transaction_table::MarketTable;
use crate::value_objects::trade_summary::{TradeOutcome, TradeRow, TradeSummary};
use crate::value_objects::transaction::MarketTransaction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum TradeError {
    EmptySequence { sequence: u64 },
    NoBuyBeforeSell { sequence: u64 },
}

impl std::fmt::Display for TradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeError::EmptySequence { sequence } => {
                write!(f, "sequence {sequence}: no market transactions")
            }
            TradeError::NoBuyBeforeSell { sequence } => {
                write!(f, "sequence {sequence}: no buy to open the position")
            }
        }
    }
}

impl std::error::Error for TradeError {}

/// How commissions enter realized PnL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionPolicy {
    /// `Σ(sell notional - fee) - Σ(buy notional - fee)`.
    #[default]
    Offset,
    /// `Σ sell notional - Σ buy notional - Σ fee`.
    Deduct,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionConfig {
    /// Largest `|bought - sold|` still treated as a closed position.
    pub share_epsilon: f64,
    pub pnl_decimals: u32,
    pub commission_policy: CommissionPolicy,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            share_epsilon: 0.0,
            pnl_decimals: 2,
            commission_policy: CommissionPolicy::Offset,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TradeShape {
    #[default]
    Record,
    Row,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TradeDetails {
    Record(TradeSummary),
    Row(TradeRow),
}

pub fn trade_details(
    table: &MarketTable,
    sequence: u64,
    shape: TradeShape,
) -> Result<TradeDetails, TradeError> {
    trade_details_with(table, sequence, shape, &ReconstructionConfig::default())
}

pub fn trade_details_with(
    table: &MarketTable,
    sequence: u64,
    shape: TradeShape,
    config: &ReconstructionConfig,
) -> Result<TradeDetails, TradeError> {
    let summary = trade_summary_with(table, sequence, config)?;
    Ok(match shape {
        TradeShape::Record => TradeDetails::Record(summary),
        TradeShape::Row => TradeDetails::Row(summary.to_row()),
    })
}

pub fn trade_summary(table: &MarketTable, sequence: u64) -> Result<TradeSummary, TradeError> {
    trade_summary_with(table, sequence, &ReconstructionConfig::default())
}

/// Rebuilds the trade for `sequence` from its fills, in table order.
///
/// Entry time is the first fill of the sequence whatever its direction; entry
/// price is the first buy. The position counts as closed once bought and sold
/// shares match within `share_epsilon` and at least one sell exists.
pub fn trade_summary_with(
    table: &MarketTable,
    sequence: u64,
    config: &ReconstructionConfig,
) -> Result<TradeSummary, TradeError> {
    let fills: Vec<&MarketTransaction> = table.by_sequence(sequence).collect();
    let (Some(first), Some(last)) = (fills.first(), fills.last()) else {
        return Err(TradeError::EmptySequence { sequence });
    };

    let (sells, buys): (Vec<&MarketTransaction>, Vec<&MarketTransaction>) =
        fills.iter().copied().partition(|fill| fill.direction.is_sell());
    let Some(first_buy) = buys.first() else {
        return Err(TradeError::NoBuyBeforeSell { sequence });
    };

    let shares_purchased = sum_by(&buys, |fill| fill.shares);
    let shares_sold = sum_by(&sells, |fill| fill.shares);
    let commission_total = sum_by(&fills, |fill| fill.commission);

    let balanced = (shares_purchased - shares_sold).abs() <= config.share_epsilon;
    let outcome = match sells.last() {
        Some(last_sell) if balanced => {
            let pnl = realized_pnl(&buys, &sells, config.commission_policy);
            TradeOutcome::Closed {
                exit_time: last.time,
                exit_price: last_sell.price,
                pnl: round_half_even(pnl, config.pnl_decimals),
                holding_period: last.time.saturating_sub(first.time),
            }
        }
        _ => TradeOutcome::Open,
    };

    Ok(TradeSummary {
        sequence,
        ticker: first.ticker.clone(),
        enter_time: first.time,
        enter_price: first_buy.price,
        shares_purchased,
        shares_sold,
        avg_buy_price: mean_price(&buys).unwrap_or(f64::NAN),
        avg_sell_price: mean_price(&sells),
        num_of_trades: fills.len(),
        commission_total,
        outcome,
    })
}

/// Single ticker or list of tickers; always handled as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSelection(Vec<String>);

impl TickerSelection {
    pub fn tickers(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TickerSelection {
    fn from(ticker: &str) -> Self {
        Self(vec![ticker.to_string()])
    }
}

impl From<String> for TickerSelection {
    fn from(ticker: String) -> Self {
        Self(vec![ticker])
    }
}

impl From<Vec<String>> for TickerSelection {
    fn from(tickers: Vec<String>) -> Self {
        Self(tickers)
    }
}

impl From<Vec<&str>> for TickerSelection {
    fn from(tickers: Vec<&str>) -> Self {
        Self(tickers.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TickerSelection {
    fn from(tickers: &[&str]) -> Self {
        Self(tickers.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TickerSelection {
    fn from(tickers: [&str; N]) -> Self {
        Self(tickers.iter().map(|t| t.to_string()).collect())
    }
}

impl From<&TickerSelection> for TickerSelection {
    fn from(selection: &TickerSelection) -> Self {
        selection.clone()
    }
}

/// Which tickers of a [`TickerSelection`] get summarized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerScope {
    /// Every ticker, accumulated in list order.
    #[default]
    All,
    /// Only the first ticker of the list (legacy report behavior).
    #[serde(rename = "first")]
    FirstOnly,
}

pub fn trades_summary(
    table: &MarketTable,
    tickers: impl Into<TickerSelection>,
    scope: TickerScope,
) -> TradesSummary {
    trades_summary_with(table, tickers, scope, &ReconstructionConfig::default())
}

/// One summary per distinct sequence id of the selected tickers, in order of
/// first appearance. A sequence that cannot be rebuilt is recorded as a
/// failure and the rest still get summarized.
pub fn trades_summary_with(
    table: &MarketTable,
    tickers: impl Into<TickerSelection>,
    scope: TickerScope,
    config: &ReconstructionConfig,
) -> TradesSummary {
    let selection = tickers.into();
    let processed = match scope {
        TickerScope::All => selection.tickers(),
        TickerScope::FirstOnly => &selection.tickers()[..selection.tickers().len().min(1)],
    };

    let mut summary = TradesSummary::default();
    let mut seen = HashSet::new();
    for ticker in processed {
        for sequence in table.sequences_for(ticker) {
            if !seen.insert(sequence) {
                continue;
            }
            match trade_summary_with(table, sequence, config) {
                Ok(trade) => summary.trades.push(trade),
                Err(error) => summary.failures.push(SequenceFailure {
                    ticker: ticker.clone(),
                    sequence,
                    error,
                }),
            }
        }
    }
    summary
}

fn sum_by(fills: &[&MarketTransaction], value: impl Fn(&MarketTransaction) -> f64) -> f64 {
    fills.iter().map(|fill| value(fill)).sum()
}

fn mean_price(fills: &[&MarketTransaction]) -> Option<f64> {
    if fills.is_empty() {
        return None;
    }
    Some(sum_by(fills, |fill| fill.price) / fills.len() as f64)
}

fn realized_pnl(
    buys: &[&MarketTransaction],
    sells: &[&MarketTransaction],
    policy: CommissionPolicy,
) -> f64 {
    match policy {
        CommissionPolicy::Offset => {
            sum_by(sells, MarketTransaction::net_notional)
                - sum_by(buys, MarketTransaction::net_notional)
        }
        CommissionPolicy::Deduct => {
            sum_by(sells, MarketTransaction::notional)
                - sum_by(buys, MarketTransaction::notional)
                - sum_by(sells, |fill| fill.commission)
                - sum_by(buys, |fill| fill.commission)
        }
    }
}

pub(crate) fn round_half_even(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}
