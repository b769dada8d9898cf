//! Histogram buckets over a ledger view.
//!
//! Band boundaries are fixed so that charts stay comparable with reports
//! produced earlier. Each band includes its upper bound; only the first
//! amount band also includes its lower bound.

use std::collections::HashMap;

use crate::models::{Bucket, CounterpartyCount, LedgerView};

/// Number of counterparties shown in the "top" chart.
pub const TOP_COUNTERPARTIES: usize = 10;

#[derive(Clone, Copy)]
enum Lower {
    Inclusive(i64),
    Exclusive(i64),
}

struct Band {
    label: &'static str,
    lower: Lower,
    up_to: Option<i64>,
}

impl Band {
    fn contains(&self, value: i64) -> bool {
        let above = match self.lower {
            Lower::Inclusive(min) => value >= min,
            Lower::Exclusive(min) => value > min,
        };
        above && self.up_to.map_or(true, |max| value <= max)
    }
}

const FREQUENCY_BANDS: &[Band] = &[
    Band { label: "1 Transaction", lower: Lower::Exclusive(0), up_to: Some(1) },
    Band { label: "1-5 Transactions", lower: Lower::Exclusive(1), up_to: Some(5) },
    Band { label: "5-10 Transactions", lower: Lower::Exclusive(5), up_to: Some(10) },
    Band { label: "10-35 Transactions", lower: Lower::Exclusive(10), up_to: Some(35) },
    Band { label: "35-50 Transactions", lower: Lower::Exclusive(35), up_to: Some(50) },
    Band { label: "More than 50", lower: Lower::Exclusive(50), up_to: None },
];

// In cents. The first band is [0, 50].
const AMOUNT_BANDS: &[Band] = &[
    Band { label: "0-50", lower: Lower::Inclusive(0), up_to: Some(5_000) },
    Band { label: "50-100", lower: Lower::Exclusive(5_000), up_to: Some(10_000) },
    Band { label: "100-500", lower: Lower::Exclusive(10_000), up_to: Some(50_000) },
    Band { label: "500-1000", lower: Lower::Exclusive(50_000), up_to: Some(100_000) },
    Band { label: "1000-5000", lower: Lower::Exclusive(100_000), up_to: Some(500_000) },
    Band { label: "5000-10000", lower: Lower::Exclusive(500_000), up_to: Some(1_000_000) },
    Band { label: "10000+", lower: Lower::Exclusive(1_000_000), up_to: None },
];

fn tally(bands: &[Band], values: impl Iterator<Item = i64>) -> Vec<Bucket> {
    let mut counts = vec![0usize; bands.len()];
    for value in values {
        if let Some(idx) = bands.iter().position(|band| band.contains(value)) {
            counts[idx] += 1;
        }
    }

    bands
        .iter()
        .zip(counts)
        .map(|(band, count)| Bucket {
            label: band.label,
            count,
        })
        .collect()
}

/// Transactions per counterparty, in first-seen order.
fn counterparty_counts<'a>(view: &LedgerView<'a>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for transaction in view.iter() {
        let key = transaction.counterparty_key();
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// Count distinct counterparties by how often they appear in the view.
pub fn classify_by_frequency(view: &LedgerView<'_>) -> Vec<Bucket> {
    let counts = counterparty_counts(view);
    tally(FREQUENCY_BANDS, counts.iter().map(|(_, n)| *n as i64))
}

/// Count transactions by debit amount. Rows whose debit cell was blank are
/// skipped; an explicit zero debit lands in the first band.
pub fn classify_by_amount(view: &LedgerView<'_>) -> Vec<Bucket> {
    tally(
        AMOUNT_BANDS,
        view.iter()
            .filter(|t| !t.debit_blank)
            .map(|t| t.debit_cents),
    )
}

/// The `n` most frequent counterparties, most frequent first. Ties keep the
/// order in which the counterparties first appear.
pub fn top_counterparties(view: &LedgerView<'_>, n: usize) -> Vec<CounterpartyCount> {
    let mut counts = counterparty_counts(view);
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(n)
        .map(|(key, count)| CounterpartyCount {
            counterparty: key.to_string(),
            count,
        })
        .collect()
}
