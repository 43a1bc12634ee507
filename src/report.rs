// Presentation Sink
// Turns computed analytics results into terminal text. All display rounding
// happens here; the analytics layer hands over full-precision values.

use chrono::NaiveDate;

use crate::analytics::{NetFlow, Period, Summary};
use crate::model::Ledger;

/// Widest bar drawn for chart-style output.
const BAR_WIDTH: usize = 40;

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

fn bar(value: f64, max_abs: f64) -> String {
    if max_abs <= 0.0 {
        return String::new();
    }
    let len = ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.max(1))
}

/// First `rows` ledger rows, source order.
pub fn render_preview(ledger: &Ledger, rows: usize) -> String {
    if ledger.is_empty() {
        return "Ledger is empty (no transactions).".to_string();
    }

    let mut out = String::from("Date                 Description                      Amount\n");
    for tx in ledger.iter().take(rows) {
        out.push_str(&format!(
            "{:<20} {:<32} {:>10}\n",
            tx.date.format("%Y-%m-%d %H:%M:%S"),
            tx.description,
            money(tx.amount),
        ));
    }
    if ledger.len() > rows {
        out.push_str(&format!("... {} more rows\n", ledger.len() - rows));
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Summary:\n\
         Total Transactions: {}\n\
         Total Inflow: {}\n\
         Total Outflow: {}\n\
         Net Balance: {}",
        summary.count,
        money(summary.inflow),
        money(summary.outflow),
        money(summary.net),
    )
}

pub fn render_net_flow(net_flow: &NetFlow) -> String {
    format!(
        "Net Flow:\n\
         Inflow: {}\n\
         Outflow: {}",
        money(net_flow.inflow),
        money(net_flow.outflow),
    )
}

pub fn render_frequency(entries: &[(String, usize)]) -> String {
    if entries.is_empty() {
        return "No transactions.".to_string();
    }
    let mut out = String::from("Transaction Frequency by Description:\n");
    for (description, count) in entries {
        out.push_str(&format!("{:<32} {:>6}\n", description, count));
    }
    out
}

pub fn render_top_by_amount(entries: &[(String, f64)], k: usize) -> String {
    if entries.is_empty() {
        return "No transactions.".to_string();
    }
    let mut out = format!("Top {} Transactions by Amount:\n", k);
    for (description, amount) in entries {
        out.push_str(&format!("{:<32} {:>12}\n", description, money(*amount)));
    }
    out
}

pub fn render_top_by_frequency(entries: &[(String, usize)], k: usize) -> String {
    if entries.is_empty() {
        return "No transactions.".to_string();
    }
    let mut out = format!("Top {} Transactions by Frequency:\n", k);
    for (description, count) in entries {
        out.push_str(&format!("{:<32} {:>6}\n", description, count));
    }
    out
}

/// Bucketed trend series as a dated bar chart.
pub fn render_trend(points: &[(NaiveDate, f64)], period: Period) -> String {
    if points.is_empty() {
        return "No transactions.".to_string();
    }

    let max_abs = points
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    let mut out = format!("Transaction Trend ({}):\n", period.name());
    for (bucket, total) in points {
        out.push_str(&format!(
            "{}  {:>12}  {}\n",
            bucket.format("%Y-%m-%d"),
            money(*total),
            bar(*total, max_abs),
        ));
    }
    out
}

/// Histogram of raw transaction amounts.
///
/// The sink receives the raw amount list and a bin count; binning itself is
/// a display concern. All-equal amounts collapse into a single bin.
pub fn render_histogram(amounts: &[f64], bins: usize) -> String {
    if amounts.is_empty() || bins == 0 {
        return "No transactions.".to_string();
    }

    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut out = String::from("Histogram of Transaction Amounts:\n");
    if min == max {
        out.push_str(&format!(
            "[{}, {}]  {:>6}  {}\n",
            money(min),
            money(max),
            amounts.len(),
            "#".repeat(BAR_WIDTH),
        ));
        return out;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &amount in amounts {
        let mut index = ((amount - min) / width) as usize;
        if index >= bins {
            index = bins - 1; // max lands in the last bin
        }
        counts[index] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);
    for (i, count) in counts.iter().enumerate() {
        let lo = min + width * i as f64;
        let hi = lo + width;
        let bar = if *count == 0 {
            String::new()
        } else {
            "#".repeat(((*count as f64 / max_count as f64) * BAR_WIDTH as f64).round() as usize)
        };
        out.push_str(&format!(
            "[{}, {})  {:>6}  {}\n",
            money(lo),
            money(hi),
            count,
            bar,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;
    use crate::model::Transaction;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, description: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description,
            amount,
        )
    }

    fn sample_ledger() -> Ledger {
        Ledger::new(vec![
            tx(2024, 1, 1, "Coffee", -4.50),
            tx(2024, 1, 2, "Salary", 2000.00),
            tx(2024, 1, 2, "Coffee", -4.50),
        ])
    }

    #[test]
    fn test_render_summary_rounds_to_two_decimals() {
        let text = render_summary(&analytics::summary(&sample_ledger()));
        assert!(text.contains("Total Transactions: 3"));
        assert!(text.contains("Total Inflow: $2000.00"));
        assert!(text.contains("Total Outflow: $9.00"));
        assert!(text.contains("Net Balance: $1991.00"));
    }

    #[test]
    fn test_render_net_flow() {
        let text = render_net_flow(&analytics::net_flow(&sample_ledger()));
        assert!(text.contains("Inflow: $2000.00"));
        assert!(text.contains("Outflow: $9.00"));
    }

    #[test]
    fn test_render_preview_truncates() {
        let text = render_preview(&sample_ledger(), 2);
        assert!(text.contains("Coffee"));
        assert!(text.contains("... 1 more rows"));
    }

    #[test]
    fn test_render_preview_empty_ledger() {
        let text = render_preview(&Ledger::default(), 5);
        assert!(text.contains("empty"));
    }

    #[test]
    fn test_render_frequency_lists_in_rank_order() {
        let text = render_frequency(&analytics::frequency(&sample_ledger()));
        let coffee = text.find("Coffee").unwrap();
        let salary = text.find("Salary").unwrap();
        assert!(coffee < salary);
    }

    #[test]
    fn test_render_trend_has_one_line_per_bucket() {
        let points = analytics::trend(&sample_ledger(), Period::Daily);
        let text = render_trend(&points, Period::Daily);
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("daily"));
    }

    #[test]
    fn test_render_histogram_counts_every_amount() {
        let amounts = [-4.50, 2000.00, -4.50];
        let text = render_histogram(&amounts, 4);
        let total: usize = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().rev().find_map(|w| w.parse::<usize>().ok()))
            .sum();
        assert_eq!(total, amounts.len());
    }

    #[test]
    fn test_render_histogram_single_value() {
        let text = render_histogram(&[5.0, 5.0], 20);
        assert!(text.contains("2"));
    }

    #[test]
    fn test_render_histogram_empty() {
        assert!(render_histogram(&[], 20).contains("No transactions"));
    }
}
