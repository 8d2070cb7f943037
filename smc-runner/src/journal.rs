//! Daily top-picks journal.
//!
//! An append-only store keyed by date. The caller owns the journal and hands
//! it to whatever records or reads picks; nothing here touches the
//! filesystem.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smc_core::Signal;

use crate::scan::ScanPick;

/// What is remembered about one pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPick {
    pub symbol: String,
    pub score: u32,
    pub signal: Signal,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl From<&ScanPick> for JournalPick {
    fn from(pick: &ScanPick) -> Self {
        let setup = pick.evaluation.setup;
        Self {
            symbol: pick.symbol.clone(),
            score: pick.score(),
            signal: pick.evaluation.signal,
            entry: setup.entry,
            stop_loss: setup.stop_loss,
            take_profit: setup.take_profit,
        }
    }
}

pub trait PickJournal {
    /// Append `picks` under `date`. Earlier entries for the date are kept.
    fn record(&mut self, date: NaiveDate, picks: Vec<JournalPick>);

    /// Picks recorded on `date`, in insertion order.
    fn picks_on(&self, date: NaiveDate) -> &[JournalPick];

    /// Up to `days` recorded dates strictly before `date`, most recent first.
    fn previous_days(&self, date: NaiveDate, days: usize) -> Vec<(NaiveDate, &[JournalPick])>;

    /// Number of the previous `days` recorded dates on which `symbol` appeared.
    fn appearances(&self, symbol: &str, date: NaiveDate, days: usize) -> usize {
        self.previous_days(date, days)
            .iter()
            .filter(|(_, picks)| picks.iter().any(|p| p.symbol == symbol))
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryJournal {
    entries: BTreeMap<NaiveDate, Vec<JournalPick>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PickJournal for InMemoryJournal {
    fn record(&mut self, date: NaiveDate, picks: Vec<JournalPick>) {
        self.entries.entry(date).or_default().extend(picks);
    }

    fn picks_on(&self, date: NaiveDate) -> &[JournalPick] {
        self.entries.get(&date).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn previous_days(&self, date: NaiveDate, days: usize) -> Vec<(NaiveDate, &[JournalPick])> {
        self.entries
            .range(..date)
            .rev()
            .take(days)
            .map(|(d, picks)| (*d, picks.as_slice()))
            .collect()
    }
}
