// Analytics Operations
// Pure aggregate queries over a loaded ledger. No mutation, no I/O: each
// function takes the ledger and returns a value for the presentation sink.
// Sums keep full f64 precision; two-decimal rounding is display-only.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::model::Ledger;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Whole-ledger totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// Sum of positive amounts.
    pub inflow: f64,
    /// Sum of absolute negative amounts.
    pub outflow: f64,
    /// inflow - outflow
    pub net: f64,
}

/// Inflow/outflow pair without count or net.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetFlow {
    pub inflow: f64,
    pub outflow: f64,
}

/// Trend bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Monthly,
}

impl Period {
    pub fn name(&self) -> &str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
        }
    }

    /// Truncate a timestamp to its bucket key: the day, or the first of
    /// the month.
    pub fn truncate(&self, timestamp: NaiveDateTime) -> NaiveDate {
        let day = timestamp.date();
        match self {
            Period::Daily => day,
            Period::Monthly => {
                NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day)
            }
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!("unknown period '{}' (use daily or monthly)", other)),
        }
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Count plus inflow/outflow/net totals. Empty ledger yields all zeros.
pub fn summary(ledger: &Ledger) -> Summary {
    let inflow: f64 = ledger
        .iter()
        .filter(|tx| tx.amount > 0.0)
        .map(|tx| tx.amount)
        .sum();
    let outflow: f64 = ledger
        .iter()
        .filter(|tx| tx.amount < 0.0)
        .map(|tx| tx.amount.abs())
        .sum();

    Summary {
        count: ledger.len(),
        inflow,
        outflow,
        net: inflow - outflow,
    }
}

/// The inflow/outflow sums of `summary`, on their own.
pub fn net_flow(ledger: &Ledger) -> NetFlow {
    let totals = summary(ledger);
    NetFlow {
        inflow: totals.inflow,
        outflow: totals.outflow,
    }
}

/// Occurrence count per exact description, descending by count.
/// Ties keep first-encountered order (stable sort over encounter order).
pub fn frequency(ledger: &Ledger) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for tx in ledger.iter() {
        let entry = counts.entry(tx.description.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(tx.description.as_str());
        }
        *entry += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|description| (description.to_string(), counts[description]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The k transactions with the largest signed amount, descending.
/// Ties keep original row order; k beyond the ledger size returns all rows.
pub fn top_by_amount(ledger: &Ledger, k: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<_> = ledger.iter().collect();
    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    ranked
        .into_iter()
        .take(k)
        .map(|tx| (tx.description.clone(), tx.amount))
        .collect()
}

/// The frequency ranking truncated to k entries.
pub fn top_by_frequency(ledger: &Ledger, k: usize) -> Vec<(String, usize)> {
    let mut ranked = frequency(ledger);
    ranked.truncate(k);
    ranked
}

/// Amount sums per calendar bucket, ascending by bucket date.
/// Net-zero buckets are real buckets and stay in the output.
pub fn trend(ledger: &Ledger, period: Period) -> Vec<(NaiveDate, f64)> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in ledger.iter() {
        *buckets.entry(period.truncate(tx.date)).or_insert(0.0) += tx.amount;
    }
    buckets.into_iter().collect()
}
