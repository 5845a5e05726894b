use crate::config::Config;
use crate::shared::{
    config_snapshot_json, format_timestamp, resolve_reconstruction_config, resolve_ticker_scope,
};
use kairos_ledger_domain::aggregates::transaction_log::TransactionLog;
use kairos_ledger_domain::entities::trades_summary::TradesSummary;
use kairos_ledger_domain::entities::transaction_table::{CashTable, MarketTable};
use kairos_ledger_domain::services::trade_stats::TradeStats;
use kairos_ledger_domain::services::trades::{trades_summary_with, TickerScope, TickerSelection};
use kairos_ledger_domain::services::transaction_log::{partition_transaction_log, PartitionCounts};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

pub struct SummarizeResult {
    pub cash: CashTable,
    pub market: MarketTable,
    pub counts: PartitionCounts,
    pub tickers: TickerSelection,
    pub summary: TradesSummary,
    pub stats: TradeStats,
    pub config_snapshot: serde_json::Value,
}

/// Splits the log, rebuilds every trade of `tickers` and aggregates the
/// outcome. An empty selection means every ticker present in the market table.
pub fn summarize_transactions(
    log: &TransactionLog,
    tickers: &TickerSelection,
    config: &Config,
) -> Result<SummarizeResult, String> {
    let _span = info_span!("summarize_transactions", tickers = tickers.len()).entered();

    let stage_start = Instant::now();
    let reconstruction = resolve_reconstruction_config(config)?;
    let scope = resolve_ticker_scope(config);

    let (cash, market, counts) = partition_transaction_log(log);
    record_partition_metrics(&counts);
    if counts.unrecognized > 0 {
        debug!(
            dropped = counts.unrecognized,
            "dropped transaction records of unrecognized kind"
        );
    }

    let tickers = if tickers.is_empty() {
        TickerSelection::from(market.tickers())
    } else {
        tickers.clone()
    };
    if scope == TickerScope::FirstOnly && tickers.len() > 1 {
        warn!(
            ignored = tickers.len() - 1,
            "ticker_scope = \"first\": only the first ticker is summarized"
        );
    }

    let summary = trades_summary_with(&market, &tickers, scope, &reconstruction);
    for failure in &summary.failures {
        warn!(
            ticker = %failure.ticker,
            sequence = failure.sequence,
            error = %failure.error,
            "skipping sequence that cannot be reconstructed"
        );
    }

    let stats = summary.stats();
    metrics::counter!("kairos.ledger.sequences_total", "result" => "ok")
        .increment(summary.trades.len() as u64);
    metrics::counter!("kairos.ledger.sequences_total", "result" => "err")
        .increment(summary.failures.len() as u64);
    metrics::gauge!("kairos.ledger.closed_trades").set(stats.completed as f64);
    metrics::gauge!("kairos.ledger.open_trades").set(stats.open as f64);
    metrics::histogram!("kairos.ledger.summarize_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    info!(
        first_fill = %market.first_time().map(format_timestamp).unwrap_or_default(),
        last_fill = %market.last_time().map(format_timestamp).unwrap_or_default(),
        trades = stats.trades,
        completed = stats.completed,
        failures = summary.failures.len(),
        total_pnl = stats.total_pnl,
        "trades summarized"
    );

    Ok(SummarizeResult {
        cash,
        market,
        counts,
        tickers,
        summary,
        stats,
        config_snapshot: config_snapshot_json(scope, &reconstruction),
    })
}

/// Same as [`summarize_transactions`] for a log still in its JSON form.
pub fn summarize_transactions_json(
    raw: serde_json::Value,
    tickers: &TickerSelection,
    config: &Config,
) -> Result<SummarizeResult, String> {
    let log = TransactionLog::from_json(raw)
        .map_err(|err| format!("invalid transaction log: {err}"))?;
    summarize_transactions(&log, tickers, config)
}

fn record_partition_metrics(counts: &PartitionCounts) {
    metrics::counter!("kairos.ledger.records_total", "kind" => "cash")
        .increment(counts.cash as u64);
    metrics::counter!("kairos.ledger.records_total", "kind" => "market")
        .increment(counts.market as u64);
    metrics::counter!("kairos.ledger.records_total", "kind" => "unrecognized")
        .increment(counts.unrecognized as u64);
}
