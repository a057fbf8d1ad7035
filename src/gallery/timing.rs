//! Frame-polled timers: a readiness gate and a debouncer
//!
//! Nothing here sleeps. Both are advanced by the frame clock's timestamps,
//! so waiting never blocks a frame.

use log::debug;

/// One resource wait: done when marked ready or when its timeout elapses
#[derive(Debug, Clone)]
struct WaitStage {
    name: &'static str,
    timeout_ms: f64,
    ready: bool,
    started_at: Option<f64>,
}

/// How a stage finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Ready,
    TimedOut,
}

/// Sequence of waits that opens exactly once
///
/// Stages run one after the other; each races its resource against its own
/// timeout, so the gate always opens within the sum of the timeouts.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    stages: Vec<WaitStage>,
    outcomes: Vec<StageOutcome>,
    open: bool,
}

impl ReadinessGate {
    pub fn new(stages: impl IntoIterator<Item = (&'static str, f64)>) -> Self {
        Self {
            stages: stages
                .into_iter()
                .map(|(name, timeout_ms)| WaitStage {
                    name,
                    timeout_ms,
                    ready: false,
                    started_at: None,
                })
                .collect(),
            outcomes: Vec::new(),
            open: false,
        }
    }

    /// Mark a resource as settled. Unknown names are ignored.
    pub fn mark_ready(&mut self, name: &str) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.name == name) {
            stage.ready = true;
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// How each finished stage ended, in order
    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// Advance to `now_ms`. Returns true on the one call where the gate opens.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.open {
            return false;
        }

        while let Some(stage) = self.stages.get_mut(self.outcomes.len()) {
            let started = *stage.started_at.get_or_insert(now_ms);
            let outcome = if stage.ready {
                StageOutcome::Ready
            } else if now_ms - started >= stage.timeout_ms {
                StageOutcome::TimedOut
            } else {
                return false;
            };
            debug!("readiness: {} {:?} after {:.0}ms", stage.name, outcome, now_ms - started);
            self.outcomes.push(outcome);
        }

        self.open = true;
        true
    }
}

/// Coalesces bursts of triggers into one firing `delay_ms` after the last
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    due_at: Option<f64>,
}

impl Debouncer {
    pub const fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            due_at: None,
        }
    }

    /// (Re)start the timer; a pending firing is superseded
    pub fn trigger(&mut self, now_ms: f64) {
        self.due_at = Some(now_ms + self.delay_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// True once the timer has elapsed; the timer is then cleared
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            },
            _ => false,
        }
    }
}
