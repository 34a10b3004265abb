//! Round monitors consulted between boosting rounds.
//!
//! Every round leaves a complete, usable ensemble behind, so a monitor may
//! end boosting after any round without losing work.

use crate::core::types::IterationIndex;
use std::time::{Duration, Instant};

/// What the trainer reports to a monitor after each round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// 1-based boosting round just completed
    pub round: IterationIndex,
    /// Mean training loss after the round
    pub training_loss: f64,
    /// Number of rules in the tree fitted this round
    pub num_rules: usize,
    /// Time spent since fitting started
    pub elapsed: Duration,
}

/// Whether boosting should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundDecision {
    Continue,
    Stop,
}

/// Observer of boosting progress with the power to stop it.
pub trait BoostingMonitor {
    fn after_round(&mut self, summary: &RoundSummary) -> RoundDecision;
}

impl<F> BoostingMonitor for F
where
    F: FnMut(&RoundSummary) -> RoundDecision,
{
    fn after_round(&mut self, summary: &RoundSummary) -> RoundDecision {
        self(summary)
    }
}

/// Monitor that never stops boosting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMonitor;

impl BoostingMonitor for NoMonitor {
    fn after_round(&mut self, _summary: &RoundSummary) -> RoundDecision {
        RoundDecision::Continue
    }
}

/// Stops once the training loss has not improved by more than `min_delta`
/// for `patience` consecutive rounds.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f64,
    best_loss: f64,
    best_round: IterationIndex,
    patience_counter: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f64) -> Self {
        EarlyStopping {
            patience: patience.max(1),
            min_delta: min_delta.max(0.0),
            best_loss: f64::INFINITY,
            best_round: 0,
            patience_counter: 0,
        }
    }

    /// Lowest training loss seen so far.
    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }

    /// Round at which the best loss was seen (0 before any round).
    pub fn best_round(&self) -> IterationIndex {
        self.best_round
    }
}

impl BoostingMonitor for EarlyStopping {
    fn after_round(&mut self, summary: &RoundSummary) -> RoundDecision {
        if summary.training_loss < self.best_loss - self.min_delta {
            self.best_loss = summary.training_loss;
            self.best_round = summary.round;
            self.patience_counter = 0;
            return RoundDecision::Continue;
        }

        self.patience_counter += 1;
        if self.patience_counter >= self.patience {
            log::warn!(
                "Early stopping at round {} (best loss {} at round {})",
                summary.round,
                self.best_loss,
                self.best_round
            );
            RoundDecision::Stop
        } else {
            RoundDecision::Continue
        }
    }
}

/// Stops once a wall-clock budget is spent.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    budget: Duration,
    started: Instant,
}

impl TimeBudget {
    /// The budget starts counting now.
    pub fn new(budget: Duration) -> Self {
        TimeBudget {
            budget,
            started: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl BoostingMonitor for TimeBudget {
    fn after_round(&mut self, summary: &RoundSummary) -> RoundDecision {
        if self.started.elapsed() >= self.budget {
            log::warn!(
                "Time budget of {:?} spent after round {}",
                self.budget,
                summary.round
            );
            RoundDecision::Stop
        } else {
            RoundDecision::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(round: usize, training_loss: f64) -> RoundSummary {
        RoundSummary {
            round,
            training_loss,
            num_rules: 3,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_early_stopping_patience() {
        let mut monitor = EarlyStopping::new(2, 0.0);
        assert_eq!(monitor.after_round(&summary(1, 1.0)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(2, 0.5)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(3, 0.5)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(4, 0.6)), RoundDecision::Stop);
        assert_eq!(monitor.best_round(), 2);
        assert_eq!(monitor.best_loss(), 0.5);
    }

    #[test]
    fn test_early_stopping_min_delta() {
        let mut monitor = EarlyStopping::new(1, 0.1);
        assert_eq!(monitor.after_round(&summary(1, 1.0)), RoundDecision::Continue);
        // Improvement of 0.05 does not count.
        assert_eq!(monitor.after_round(&summary(2, 0.95)), RoundDecision::Stop);
    }

    #[test]
    fn test_improvement_resets_patience() {
        let mut monitor = EarlyStopping::new(2, 0.0);
        monitor.after_round(&summary(1, 1.0));
        monitor.after_round(&summary(2, 1.0));
        assert_eq!(monitor.after_round(&summary(3, 0.9)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(4, 0.9)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(5, 0.9)), RoundDecision::Stop);
    }

    #[test]
    fn test_time_budget() {
        let mut exhausted = TimeBudget::new(Duration::ZERO);
        assert_eq!(exhausted.after_round(&summary(1, 1.0)), RoundDecision::Stop);

        let mut generous = TimeBudget::new(Duration::from_secs(3600));
        assert_eq!(generous.after_round(&summary(1, 1.0)), RoundDecision::Continue);
    }

    #[test]
    fn test_closure_monitor() {
        let mut seen = Vec::new();
        let mut monitor = |s: &RoundSummary| {
            seen.push(s.round);
            if s.round >= 2 {
                RoundDecision::Stop
            } else {
                RoundDecision::Continue
            }
        };
        assert_eq!(monitor.after_round(&summary(1, 1.0)), RoundDecision::Continue);
        assert_eq!(monitor.after_round(&summary(2, 1.0)), RoundDecision::Stop);
        drop(monitor);
        assert_eq!(seen, vec![1, 2]);
    }
}
