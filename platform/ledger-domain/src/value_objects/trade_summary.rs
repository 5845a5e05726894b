use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TradeOutcome {
    Open,
    Closed {
        exit_time: i64,
        exit_price: f64,
        pnl: f64,
        holding_period: i64,
    },
}

impl TradeOutcome {
    pub fn is_closed(&self) -> bool {
        matches!(self, TradeOutcome::Closed { .. })
    }

    pub fn pnl(&self) -> Option<f64> {
        match self {
            TradeOutcome::Closed { pnl, .. } => Some(*pnl),
            TradeOutcome::Open => None,
        }
    }

    pub fn holding_period(&self) -> Option<i64> {
        match self {
            TradeOutcome::Closed { holding_period, .. } => Some(*holding_period),
            TradeOutcome::Open => None,
        }
    }
}

/// Lifecycle of one position (all fills sharing a sequence id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub sequence: u64,
    pub ticker: String,
    pub enter_time: i64,
    pub enter_price: f64,
    pub shares_purchased: f64,
    pub shares_sold: f64,
    pub avg_buy_price: f64,
    pub avg_sell_price: Option<f64>,
    pub num_of_trades: usize,
    pub commission_total: f64,
    pub outcome: TradeOutcome,
}

impl TradeSummary {
    pub fn completed(&self) -> bool {
        self.outcome.is_closed()
    }

    pub fn to_row(&self) -> TradeRow {
        let (exit_time, exit_price, pnl, holding_period) = match self.outcome {
            TradeOutcome::Closed {
                exit_time,
                exit_price,
                pnl,
                holding_period,
            } => (
                Some(exit_time),
                Some(exit_price),
                Some(pnl),
                Some(holding_period),
            ),
            TradeOutcome::Open => (None, None, None, None),
        };

        TradeRow {
            ticker: self.ticker.clone(),
            enter_time: self.enter_time,
            exit_time,
            enter_price: self.enter_price,
            exit_price,
            shares_purchased: self.shares_purchased,
            shares_sold: self.shares_sold,
            avg_buy_price: self.avg_buy_price,
            avg_sell_price: self.avg_sell_price,
            num_of_trades: self.num_of_trades,
            pnl,
            commission_total: self.commission_total,
            holding_period,
            completed: self.completed(),
        }
    }
}

/// Flat rendition of a [`TradeSummary`]; absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub ticker: String,
    pub enter_time: i64,
    pub exit_time: Option<i64>,
    pub enter_price: f64,
    pub exit_price: Option<f64>,
    pub shares_purchased: f64,
    pub shares_sold: f64,
    pub avg_buy_price: f64,
    pub avg_sell_price: Option<f64>,
    pub num_of_trades: usize,
    pub pnl: Option<f64>,
    pub commission_total: f64,
    pub holding_period: Option<i64>,
    pub completed: bool,
}

impl TradeRow {
    pub const COLUMNS: [&'static str; 14] = [
        "ticker",
        "enter_time",
        "exit_time",
        "enter_price",
        "exit_price",
        "shares_purchased",
        "shares_sold",
        "avg_buy_price",
        "avg_sell_price",
        "num_of_trades",
        "pnl",
        "commission_total",
        "holding_period",
        "completed",
    ];

    /// Key-value view in [`TradeRow::COLUMNS`] order.
    pub fn to_map(&self) -> Map<String, Value> {
        let values = [
            Value::from(self.ticker.as_str()),
            Value::from(self.enter_time),
            Value::from(self.exit_time),
            Value::from(self.enter_price),
            Value::from(self.exit_price),
            Value::from(self.shares_purchased),
            Value::from(self.shares_sold),
            Value::from(self.avg_buy_price),
            Value::from(self.avg_sell_price),
            Value::from(self.num_of_trades),
            Value::from(self.pnl),
            Value::from(self.commission_total),
            Value::from(self.holding_period),
            Value::from(self.completed),
        ];
        Self::COLUMNS
            .iter()
            .map(|column| column.to_string())
            .zip(values)
            .collect()
    }
}
