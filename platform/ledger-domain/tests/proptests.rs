use kairos_ledger_domain::aggregates::transaction_log::TransactionLog;
use kairos_ledger_domain::entities::transaction_table::MarketTable;
use kairos_ledger_domain::services::returns::log_returns;
use kairos_ledger_domain::services::trades::{trade_summary, trades_summary, TickerScope};
use kairos_ledger_domain::services::transaction_log::parse_transaction_log;
use kairos_ledger_domain::value_objects::direction::Direction;
use kairos_ledger_domain::value_objects::trade_summary::TradeOutcome;
use kairos_ledger_domain::value_objects::transaction::{
    CashTransaction, MarketTransaction, TransactionRecord,
};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = TransactionRecord> {
    prop_oneof![
        (0i64..1_000).prop_map(|time| TransactionRecord::from(CashTransaction::new(time))),
        (0i64..1_000, 1u64..5).prop_map(|(time, sequence)| {
            TransactionRecord::from(MarketTransaction::new(
                time,
                "AAPL",
                sequence,
                Direction::Buy,
                1.0,
                10.0,
                0.0,
            ))
        }),
        "[a-z]{3,8}".prop_map(|kind| TransactionRecord::Unrecognized { kind }),
    ]
}

/// Buys then sells of whole shares at cent prices, all in sequence 1.
fn balanced_fills() -> impl Strategy<Value = Vec<MarketTransaction>> {
    prop::collection::vec((1u32..50, 100u32..20_000, 0u32..300), 1..6)
        .prop_flat_map(|buys| {
            let total: u32 = buys.iter().map(|(shares, _, _)| shares).sum();
            (Just(buys), Just(total), 100u32..20_000, 0u32..300)
        })
        .prop_map(|(buys, total, exit_cents, exit_fee_cents)| {
            let mut fills: Vec<MarketTransaction> = buys
                .iter()
                .enumerate()
                .map(|(idx, (shares, cents, fee))| {
                    MarketTransaction::new(
                        idx as i64 * 60,
                        "AAPL",
                        1,
                        Direction::Buy,
                        f64::from(*shares),
                        f64::from(*cents) / 100.0,
                        f64::from(*fee) / 100.0,
                    )
                })
                .collect();
            fills.push(MarketTransaction::new(
                fills.len() as i64 * 60,
                "AAPL",
                1,
                Direction::Sell,
                f64::from(total),
                f64::from(exit_cents) / 100.0,
                f64::from(exit_fee_cents) / 100.0,
            ));
            fills
        })
}

fn net_flow(fills: &[MarketTransaction], sells: bool) -> f64 {
    fills
        .iter()
        .filter(|fill| fill.direction.is_sell() == sells)
        .map(|fill| fill.price * fill.shares - fill.commission)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn log_returns_match_circular_definition(
        prices in prop::collection::vec(0.01f64..10_000.0, 1..80),
    ) {
        let returns = log_returns(&prices);
        let n = prices.len();
        prop_assert_eq!(returns.len(), n);
        for (i, r) in returns.iter().enumerate() {
            let expected = (prices[(i + 1) % n] / prices[i]).ln();
            prop_assert!((r - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn partition_counts_match_record_kinds(
        batches in prop::collection::vec(prop::collection::vec(record_strategy(), 0..10), 0..5),
    ) {
        let mut log = TransactionLog::new();
        for (idx, batch) in batches.iter().enumerate() {
            log.insert(&format!("batch{idx}"), batch.clone());
        }

        let expected_cash = log
            .records()
            .filter(|r| matches!(r, TransactionRecord::Cash(_)))
            .count();
        let expected_market = log
            .records()
            .filter(|r| matches!(r, TransactionRecord::Market(_)))
            .count();

        let (cash, market) = parse_transaction_log(&log);
        prop_assert_eq!(cash.len(), expected_cash);
        prop_assert_eq!(market.len(), expected_market);
    }

    #[test]
    fn balanced_sequences_close_at_last_fill(fills in balanced_fills()) {
        let last_time = fills.last().map(|fill| fill.time).unwrap_or_default();
        let proceeds = net_flow(&fills, true);
        let cost = net_flow(&fills, false);
        let table: MarketTable = fills.into_iter().collect();

        let trade = trade_summary(&table, 1).expect("balanced trade");
        prop_assert!(trade.completed());
        match trade.outcome {
            TradeOutcome::Closed { exit_time, pnl, holding_period, .. } => {
                prop_assert_eq!(exit_time, last_time);
                prop_assert_eq!(holding_period, last_time);
                prop_assert!((pnl - (proceeds - cost)).abs() <= 0.005 + 1e-9);
            }
            TradeOutcome::Open => prop_assert!(false, "expected closed trade"),
        }
    }

    #[test]
    fn summary_has_one_entry_per_sequence(sequences in prop::collection::vec(1u64..20, 1..40)) {
        let table: MarketTable = sequences
            .iter()
            .enumerate()
            .map(|(idx, &sequence)| {
                MarketTransaction::new(idx as i64, "AAPL", sequence, Direction::Buy, 1.0, 10.0, 0.0)
            })
            .collect();

        let mut unique = sequences.clone();
        unique.sort_unstable();
        unique.dedup();

        let summary = trades_summary(&table, "AAPL", TickerScope::All);
        prop_assert_eq!(summary.trades.len() + summary.failures.len(), unique.len());
        prop_assert!(summary.failures.is_empty());
    }
}
