//! Share-prompt milestones
//!
//! Every Nth success surfaces a share report, but only while the player is
//! looking at a crisis (not mid-reveal, not on a result screen). The watcher
//! is re-run after every state change; raising an already-raised flag is a
//! no-op, and once the player closes the prompt it stays closed for that
//! count.

use super::GameState;
use serde::{Deserialize, Serialize};

/// What the player is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Picking a solution
    Active,
    /// Solution chosen, outcome not yet revealed
    Loading,
    ShowingResult,
    /// Result shown and the run is over
    Terminal,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Active => "Active",
            Phase::Loading => "Loading",
            Phase::ShowingResult => "Showing result",
            Phase::Terminal => "Game over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneWatcher {
    interval: u32,
    /// Count at which the player last closed the prompt
    acknowledged: Option<u32>,
}

impl MilestoneWatcher {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            acknowledged: None,
        }
    }

    pub fn is_milestone(&self, saved: u32) -> bool {
        saved > 0 && saved % self.interval == 0
    }

    /// `state` with the share flag raised if a milestone is due
    pub fn evaluate(&self, state: GameState, phase: Phase) -> GameState {
        let count = state.today_saved_count;
        let due = phase == Phase::Active
            && self.is_milestone(count)
            && self.acknowledged != Some(count);

        if due && !state.show_share_report {
            tracing::info!(target: "milestone", saved = count, "Share report raised");
            GameState {
                show_share_report: true,
                ..state
            }
        } else {
            state
        }
    }

    /// Player dismissed the prompt. No-op unless it is showing.
    pub fn close(&mut self, state: GameState) -> GameState {
        if !state.show_share_report {
            return state;
        }
        self.acknowledged = Some(state.today_saved_count);
        GameState {
            show_share_report: false,
            ..state
        }
    }

    /// Forget acknowledgements, for a fresh run
    pub fn reset(&mut self) {
        self.acknowledged = None;
    }
}
