use kairos_ledger_application::config::{parse_config, Config};
use kairos_ledger_application::summarizing::{summarize_transactions, summarize_transactions_json};
use kairos_ledger_domain::aggregates::transaction_log::TransactionLog;
use kairos_ledger_domain::services::trades::TickerSelection;
use kairos_ledger_domain::value_objects::direction::Direction;
use kairos_ledger_domain::value_objects::trade_summary::TradeOutcome;
use kairos_ledger_domain::value_objects::transaction::{
    CashTransaction, MarketTransaction, TransactionRecord,
};
use serde_json::json;

fn fill(
    time: i64,
    ticker: &str,
    sequence: u64,
    direction: Direction,
    shares: f64,
    price: f64,
) -> TransactionRecord {
    MarketTransaction::new(time, ticker, sequence, direction, shares, price, 1.0).into()
}

fn sample_log() -> TransactionLog {
    TransactionLog::new()
        .with(
            "2024-01-02",
            vec![
                CashTransaction::new(60)
                    .with_field("amount", json!(-1001.0))
                    .into(),
                fill(60, "AAPL", 1, Direction::Buy, 10.0, 100.0),
                fill(120, "MSFT", 2, Direction::Buy, 4.0, 250.0),
            ],
        )
        .with(
            "2024-01-03",
            vec![
                fill(180, "AAPL", 1, Direction::Sell, 10.0, 110.0),
                CashTransaction::new(180)
                    .with_field("amount", json!(1099.0))
                    .into(),
                fill(240, "MSFT", 2, Direction::Sell, 2.0, 260.0),
                TransactionRecord::Unrecognized {
                    kind: "dividend".to_string(),
                },
            ],
        )
}

#[test]
fn summarize_reports_every_ticker_by_default() {
    let result = summarize_transactions(
        &sample_log(),
        &TickerSelection::from(vec!["AAPL", "MSFT"]),
        &Config::default(),
    )
    .expect("summarize");

    assert_eq!(result.cash.len(), 2);
    assert_eq!(result.cash.rows()[1].fields.get("amount"), Some(&json!(1099.0)));
    assert_eq!(result.market.len(), 4);
    assert_eq!(result.counts.unrecognized, 1);
    assert_eq!(result.summary.trades.len(), 2);

    let aapl = &result.summary.trades[0];
    assert_eq!(aapl.ticker, "AAPL");
    assert_eq!(
        aapl.outcome,
        TradeOutcome::Closed {
            exit_time: 180,
            exit_price: 110.0,
            pnl: 100.0,
            holding_period: 120,
        }
    );

    let msft = &result.summary.trades[1];
    assert_eq!(msft.ticker, "MSFT");
    assert!(!msft.completed());

    assert_eq!(result.stats.completed, 1);
    assert_eq!(result.stats.open, 1);
    assert_eq!(result.stats.total_pnl, 100.0);
    assert_eq!(
        result.config_snapshot["summary"]["ticker_scope"],
        json!("all")
    );
}

#[test]
fn first_scope_keeps_legacy_single_ticker_report() {
    let config = parse_config("[summary]\nticker_scope = \"first\"\n").expect("config");
    let result = summarize_transactions(
        &sample_log(),
        &TickerSelection::from(vec!["MSFT", "AAPL"]),
        &config,
    )
    .expect("summarize");

    assert_eq!(result.summary.trades.len(), 1);
    assert_eq!(result.summary.trades[0].ticker, "MSFT");
}

#[test]
fn empty_selection_covers_all_tickers_in_order() {
    let result = summarize_transactions(
        &sample_log(),
        &TickerSelection::default(),
        &Config::default(),
    )
    .expect("summarize");

    assert_eq!(
        result.tickers.tickers(),
        &["AAPL".to_string(), "MSFT".to_string()]
    );
    assert_eq!(result.summary.trades.len(), 2);
}

#[test]
fn deduct_policy_is_applied_from_config() {
    let config = parse_config("[summary]\ncommission_policy = \"deduct\"\n").expect("config");
    let result = summarize_transactions(&sample_log(), &TickerSelection::from("AAPL"), &config)
        .expect("summarize");

    assert_eq!(result.summary.trades[0].outcome.pnl(), Some(98.0));
}

#[test]
fn invalid_config_is_reported() {
    let config = parse_config("[summary]\nshare_epsilon = -1.0\n").expect("config");
    let err = summarize_transactions(&sample_log(), &TickerSelection::from("AAPL"), &config)
        .err()
        .expect("invalid epsilon");
    assert!(err.contains("share_epsilon"));
}

#[test]
fn failed_sequences_are_isolated() {
    let log = TransactionLog::new().with(
        "k",
        vec![
            fill(1, "AAPL", 1, Direction::Sell, 1.0, 10.0),
            fill(2, "AAPL", 2, Direction::Buy, 1.0, 10.0),
            fill(3, "AAPL", 2, Direction::Sell, 1.0, 11.0),
        ],
    );

    let result = summarize_transactions(&log, &TickerSelection::from("AAPL"), &Config::default())
        .expect("summarize");
    assert_eq!(result.summary.trades.len(), 1);
    assert_eq!(result.summary.failures.len(), 1);
    assert_eq!(result.summary.failures[0].sequence, 1);
}

#[test]
fn json_log_is_validated_and_summarized() {
    let raw = json!({
        "fills": [
            { "kind": "market_transaction", "time": 0, "ticker": "ETH", "sequence": 7,
              "direction": "BUY", "shares": 2, "price": 1500.0, "commission": 0.5 },
            { "kind": "cash_transaction", "time": 0, "amount": -3000.5 },
            { "kind": "market_transaction", "time": 3600, "ticker": "ETH", "sequence": 7,
              "direction": "SELL", "shares": 2, "price": 1600.0, "commission": 0.5 },
        ],
    });

    let result = summarize_transactions_json(raw, &TickerSelection::from("ETH"), &Config::default())
        .expect("summarize");
    let row = result.summary.rows().remove(0);
    assert!(row.completed);
    assert_eq!(row.pnl, Some(200.0));
    assert_eq!(row.holding_period, Some(3600));
    assert_eq!(result.cash.len(), 1);
}

#[test]
fn json_log_with_other_directions_keeps_them_on_the_buy_side() {
    let raw = json!({
        "k": [
            { "kind": "market_transaction", "time": 0, "ticker": "ETH", "sequence": 1,
              "direction": "COVER", "shares": 1, "price": 10.0, "commission": 0.0 },
            { "kind": "market_transaction", "time": 60, "ticker": "ETH", "sequence": 1,
              "direction": "SELL", "shares": 1, "price": 11.0, "commission": 0.0 },
        ],
    });

    let result = summarize_transactions_json(raw, &TickerSelection::from("ETH"), &Config::default())
        .expect("summarize");
    assert!(result.summary.failures.is_empty());
    assert_eq!(result.summary.trades[0].outcome.pnl(), Some(1.0));
}

#[test]
fn json_log_missing_time_is_rejected() {
    let raw = json!({
        "fills": [
            { "kind": "market_transaction", "ticker": "ETH", "sequence": 7,
              "direction": "BUY", "shares": 2, "price": 1500.0, "commission": 0.5 },
        ],
    });

    let err = summarize_transactions_json(raw, &TickerSelection::from("ETH"), &Config::default())
        .err()
        .expect("missing time");
    assert_eq!(err, "invalid transaction log: fills[0]: missing field `time`");
}
