use crate::config::Config;
use kairos_ledger_domain::services::trades::{ReconstructionConfig, TickerScope};

const MAX_PNL_DECIMALS: u32 = 12;

pub fn resolve_reconstruction_config(config: &Config) -> Result<ReconstructionConfig, String> {
    let defaults = ReconstructionConfig::default();
    let summary = &config.summary;

    let share_epsilon = summary.share_epsilon.unwrap_or(defaults.share_epsilon);
    if !share_epsilon.is_finite() || share_epsilon < 0.0 {
        return Err("summary.share_epsilon must be finite and >= 0".to_string());
    }

    let pnl_decimals = summary.pnl_decimals.unwrap_or(defaults.pnl_decimals);
    if pnl_decimals > MAX_PNL_DECIMALS {
        return Err(format!("summary.pnl_decimals must be <= {MAX_PNL_DECIMALS}"));
    }

    Ok(ReconstructionConfig {
        share_epsilon,
        pnl_decimals,
        commission_policy: summary
            .commission_policy
            .unwrap_or(defaults.commission_policy),
    })
}

pub fn resolve_ticker_scope(config: &Config) -> TickerScope {
    config.summary.ticker_scope.unwrap_or_default()
}

pub fn config_snapshot_json(
    scope: TickerScope,
    reconstruction: &ReconstructionConfig,
) -> serde_json::Value {
    serde_json::json!({
        "summary": {
            "ticker_scope": scope,
            "pnl_decimals": reconstruction.pnl_decimals,
            "share_epsilon": reconstruction.share_epsilon,
            "commission_policy": reconstruction.commission_policy,
        }
    })
}

pub fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}
