//! Bounded signal history with derived statistics.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::types::{HistoryEntry, HistoryStats, TradeSignal};

/// Win probability used when the configured one is not a finite number.
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.8;

fn sanitize_probability(probability: f64) -> f64 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        DEFAULT_WIN_PROBABILITY
    }
}

/// Decides whether a recorded trade counts as won.
///
/// The history does not track real trade outcomes. Implementations are
/// placeholders for an outcome-verification step that does not exist yet.
pub trait OutcomeSampler: Send + Sync {
    fn won(&mut self, entry: &HistoryEntry) -> bool;
}

/// Placeholder sampler: every trade is independently marked won with a fixed
/// probability on each statistics recomputation.
pub struct RandomOutcome {
    probability: f64,
    rng: StdRng,
}

impl RandomOutcome {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: sanitize_probability(probability),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sampler.
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self {
            probability: sanitize_probability(probability),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl OutcomeSampler for RandomOutcome {
    fn won(&mut self, _entry: &HistoryEntry) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

/// Sampler with a constant answer.
pub struct FixedOutcome(pub bool);

impl OutcomeSampler for FixedOutcome {
    fn won(&mut self, _entry: &HistoryEntry) -> bool {
        self.0
    }
}

/// Newest-first sequence of history entries bounded to `capacity`.
///
/// Not synchronized; see [`SignalHistory`] for the shared version.
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    stats: HistoryStats,
    sampler: Box<dyn OutcomeSampler>,
}

impl HistoryLedger {
    pub fn new(capacity: usize, sampler: Box<dyn OutcomeSampler>) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            stats: HistoryStats::default(),
            sampler,
        }
    }

    /// Insert an entry at the front, evicting the oldest beyond capacity.
    ///
    /// Statistics for the resulting contents are drawn before anything is
    /// mutated, so a failing sampler leaves the ledger untouched.
    pub fn push(&mut self, entry: HistoryEntry) {
        let survivors = self.entries.iter().take(self.capacity - 1);
        let mut trades = 0u32;
        let mut wins = 0u32;
        for e in std::iter::once(&entry).chain(survivors).filter(|e| e.is_trade()) {
            trades += 1;
            if self.sampler.won(e) {
                wins += 1;
            }
        }
        let stats = HistoryStats::from_counts(trades, wins);

        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                debug!("Evicted history entry {} for {}", evicted.id, evicted.instrument);
            }
        }
        self.stats = stats;
    }

    pub fn stats(&self) -> HistoryStats {
        self.stats
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shared signal history.
///
/// Inserts are serialized behind a write lock so eviction and statistics
/// recomputation are atomic per insertion; readers clone a consistent
/// snapshot.
pub struct SignalHistory {
    ledger: RwLock<HistoryLedger>,
}

impl SignalHistory {
    /// History using the placeholder random win draw.
    pub fn new(capacity: usize, win_probability: f64) -> Arc<Self> {
        Self::with_sampler(capacity, Box::new(RandomOutcome::new(win_probability)))
    }

    pub fn with_sampler(capacity: usize, sampler: Box<dyn OutcomeSampler>) -> Arc<Self> {
        Arc::new(Self {
            ledger: RwLock::new(HistoryLedger::new(capacity, sampler)),
        })
    }

    /// Record a signal for an instrument, stamped with the current time.
    ///
    /// Returns the inserted entry and the statistics right after the insert.
    pub fn record(&self, instrument: &str, signal: TradeSignal) -> (HistoryEntry, HistoryStats) {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        let entry = HistoryEntry::new(instrument, signal);
        ledger.push(entry.clone());
        let stats = ledger.stats();
        debug!(
            "Recorded {} signal for {} ({} entries, {}% win rate)",
            entry.signal.bias,
            instrument,
            ledger.len(),
            stats.win_rate_percent
        );
        (entry, stats)
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> HistoryStats {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Entries and statistics from the same point in time.
    pub fn snapshot(&self) -> (Vec<HistoryEntry>, HistoryStats) {
        let ledger = self.ledger.read().unwrap_or_else(PoisonError::into_inner);
        (ledger.iter().cloned().collect(), ledger.stats())
    }

    pub fn capacity(&self) -> usize {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bias;

    fn signal(bias: Bias) -> TradeSignal {
        match bias {
            Bias::Buy | Bias::Sell => TradeSignal {
                bias,
                entry_price: Some(1.0),
                stop_loss: Some(1.0),
                take_profits: vec![1.0, 1.0, 1.0],
            },
            _ => TradeSignal {
                bias,
                entry_price: None,
                stop_loss: None,
                take_profits: Vec::new(),
            },
        }
    }

    /// Wins every other draw.
    struct Alternating(bool);

    impl OutcomeSampler for Alternating {
        fn won(&mut self, _entry: &HistoryEntry) -> bool {
            self.0 = !self.0;
            self.0
        }
    }

    #[test]
    fn test_empty_history() {
        let history = SignalHistory::new(20, 0.8);
        assert!(history.entries().is_empty());
        assert_eq!(history.statistics(), HistoryStats::default());
        assert_eq!(history.capacity(), 20);
    }

    #[test]
    fn test_record_returns_inserted_entry() {
        let history = SignalHistory::with_sampler(5, Box::new(FixedOutcome(true)));
        let (entry, stats) = history.record("EUR/USD", signal(Bias::Buy));

        assert_eq!(entry.instrument, "EUR/USD");
        assert_eq!(entry.signal.bias, Bias::Buy);
        assert_eq!(history.entries()[0], entry);
        assert_eq!(stats, history.statistics());
        assert_eq!(stats.trade_count, 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_record_reports_stats_of_its_own_insert() {
        let history = SignalHistory::with_sampler(2, Box::new(FixedOutcome(true)));
        let (_, first) = history.record("A", signal(Bias::Buy));
        let (_, second) = history.record("B", signal(Bias::NoTrade));
        let (_, third) = history.record("C", signal(Bias::NoTrade));

        assert_eq!(first.trade_count, 1);
        assert_eq!(second.trade_count, 1);
        // "A" has been evicted
        assert_eq!(third.trade_count, 0);
    }

    #[test]
    fn test_non_finite_probability_uses_default() {
        let history = SignalHistory::new(20, f64::NAN);
        let (_, stats) = history.record("EUR/USD", signal(Bias::Buy));
        assert_eq!(stats.trade_count, 1);
        assert!(stats.win_count <= 1);

        let entry = HistoryEntry::new("EUR/USD", signal(Bias::Sell));
        let mut infinite = RandomOutcome::seeded(f64::INFINITY, 3);
        let mut negative = RandomOutcome::seeded(f64::NEG_INFINITY, 3);
        infinite.won(&entry);
        negative.won(&entry);
    }

    /// Fails on every draw.
    struct Exploding;

    impl OutcomeSampler for Exploding {
        fn won(&mut self, _entry: &HistoryEntry) -> bool {
            panic!("sampler failure");
        }
    }

    #[test]
    fn test_failing_sampler_leaves_ledger_consistent() {
        let history = SignalHistory::with_sampler(5, Box::new(Exploding));
        history.record("A", signal(Bias::NoTrade));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            history.record("B", signal(Bias::Buy));
        }));
        assert!(result.is_err());

        let (entries, stats) = history.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].instrument, "A");
        assert_eq!(stats, HistoryStats::default());
        assert_eq!(
            stats.trade_count as usize,
            entries.iter().filter(|e| e.is_trade()).count()
        );
    }

    #[test]
    fn test_newest_first() {
        let history = SignalHistory::with_sampler(5, Box::new(FixedOutcome(true)));
        history.record("EUR/USD", signal(Bias::Buy));
        history.record("GBP/USD", signal(Bias::Sell));

        let pairs: Vec<String> = history.entries().into_iter().map(|e| e.instrument).collect();
        assert_eq!(pairs, vec!["GBP/USD", "EUR/USD"]);
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let history = SignalHistory::with_sampler(3, Box::new(FixedOutcome(false)));
        for i in 0..5 {
            history.record(&format!("P{}", i), signal(Bias::NoTrade));
        }

        let pairs: Vec<String> = history.entries().into_iter().map(|e| e.instrument).collect();
        assert_eq!(pairs, vec!["P4", "P3", "P2"]);
    }

    #[test]
    fn test_trade_count_excludes_abstentions() {
        let history = SignalHistory::with_sampler(10, Box::new(FixedOutcome(true)));
        history.record("A", signal(Bias::Buy));
        history.record("B", signal(Bias::NoTrade));
        history.record("C", signal(Bias::NoData));
        history.record("D", signal(Bias::Sell));

        let stats = history.statistics();
        assert_eq!(stats.trade_count, 2);
        assert_eq!(stats.win_count, 2);
        assert_eq!(stats.win_rate_percent, 100);
    }

    #[test]
    fn test_stats_follow_evictions() {
        let history = SignalHistory::with_sampler(2, Box::new(FixedOutcome(true)));
        history.record("A", signal(Bias::Buy));
        history.record("B", signal(Bias::NoTrade));
        assert_eq!(history.statistics().trade_count, 1);

        history.record("C", signal(Bias::NoTrade));
        assert_eq!(history.statistics().trade_count, 0);
        assert_eq!(history.statistics().win_rate_percent, 0);
    }

    #[test]
    fn test_win_rate_rounding() {
        let history = SignalHistory::with_sampler(10, Box::new(Alternating(false)));
        for _ in 0..3 {
            history.record("EUR/USD", signal(Bias::Buy));
        }
        // Each recompute draws per trade; the last pass saw three draws
        let stats = history.statistics();
        assert_eq!(stats.trade_count, 3);
        assert!(stats.win_count == 1 || stats.win_count == 2);
        assert!(stats.win_rate_percent == 33 || stats.win_rate_percent == 67);
    }

    #[test]
    fn test_random_outcome_bounds() {
        let mut always = RandomOutcome::seeded(1.0, 7);
        let mut never = RandomOutcome::seeded(0.0, 7);
        let entry = HistoryEntry::new("EUR/USD", signal(Bias::Buy));
        assert!((0..50).all(|_| always.won(&entry)));
        assert!((0..50).all(|_| !never.won(&entry)));

        // Out of range probabilities are clamped rather than panicking
        let mut clamped = RandomOutcome::seeded(3.0, 1);
        assert!(clamped.won(&entry));
    }

    #[test]
    fn test_random_win_count_never_exceeds_trades() {
        let history = SignalHistory::new(20, 0.8);
        for i in 0..40 {
            let bias = if i % 3 == 0 { Bias::NoTrade } else { Bias::Buy };
            history.record("EUR/USD", signal(bias));
            let (entries, stats) = history.snapshot();
            assert!(stats.win_count <= stats.trade_count);
            assert_eq!(
                stats.trade_count as usize,
                entries.iter().filter(|e| e.is_trade()).count()
            );
        }
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let ledger = HistoryLedger::new(0, Box::new(FixedOutcome(true)));
        assert_eq!(ledger.capacity(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_concurrent_records_respect_capacity() {
        let history = SignalHistory::with_sampler(20, Box::new(FixedOutcome(true)));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let history = history.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        history.record(&format!("T{}-{}", t, i), signal(Bias::Buy));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (entries, stats) = history.snapshot();
        assert_eq!(entries.len(), 20);
        assert_eq!(stats.trade_count, 20);
        // Newest first by timestamp as well as by insertion
        assert!(entries
            .windows(2)
            .all(|w| w[0].recorded_at >= w[1].recorded_at));
    }
}
