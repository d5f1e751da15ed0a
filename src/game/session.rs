//! A play session: the state machine plus everything the front-end needs
//! around it.
//!
//! Choosing a solution doesn't reveal the outcome straight away. The session
//! hands back a `Ticket` and holds the choice as pending until the reveal
//! delay passes. Anything that moves the player elsewhere (skip, continue,
//! reset) drops the pending choice, and `reset` also starts a new epoch, so a
//! ticket issued before the reset can never be applied to the new run.

use super::{GameEngine, GameState, MilestoneWatcher, Phase, ShareReport};
use crate::config::GameConfig;
use crate::data::{Outcome, Solution};
use crate::GameError;
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Claim on a pending outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: Uuid,
    serial: u64,
}

impl Ticket {
    pub fn epoch(&self) -> Uuid {
        self.epoch
    }
}

/// What happened when a ticket was cashed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Applied {
        outcome: Outcome,
        terminal: bool,
        plan_b_activated: bool,
    },
    /// The ticket was superseded, cancelled, or issued before a reset
    Discarded,
}

#[derive(Debug, Clone)]
struct PendingOutcome {
    ticket: Ticket,
    solution: Solution,
    due: Instant,
}

#[derive(Debug)]
pub struct Session {
    engine: GameEngine,
    state: GameState,
    phase: Phase,
    watcher: MilestoneWatcher,
    epoch: Uuid,
    next_serial: u64,
    pending: Option<PendingOutcome>,
    last_solution: Option<Solution>,
    reveal_delay: Duration,
}

impl Session {
    pub fn new(mut engine: GameEngine) -> Self {
        let balance = &engine.config().balance;
        let watcher = MilestoneWatcher::new(balance.milestone_interval);
        let reveal_delay = Duration::from_millis(balance.reveal_delay_ms);
        let state = engine.reset();
        let epoch = Uuid::new_v4();
        info!(target: "session", %epoch, crisis = %state.current_crisis.id, "Session started");

        Self {
            engine,
            state,
            phase: Phase::Active,
            watcher,
            epoch,
            next_serial: 0,
            pending: None,
            last_solution: None,
            reveal_delay,
        }
    }

    pub fn from_config(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self::new(GameEngine::from_config(config)?))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn epoch(&self) -> Uuid {
        self.epoch
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn last_solution(&self) -> Option<&Solution> {
        self.last_solution.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Skipping is offered only while the player is picking a solution
    pub fn can_skip(&self) -> bool {
        self.phase == Phase::Active && !self.is_loading()
    }

    /// Pick a solution of the current crisis. The outcome is revealed by
    /// `poll` once the reveal delay has passed, or by `reveal` directly.
    /// A newer choice supersedes any still-pending one.
    pub fn select_solution(&mut self, solution_id: &str, now: Instant) -> Result<Ticket, GameError> {
        let solution = self
            .state
            .current_crisis
            .solution(solution_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownSolution {
                crisis: self.state.current_crisis.id.clone(),
                solution: solution_id.to_string(),
            })?;

        let ticket = Ticket {
            epoch: self.epoch,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        let superseded = self.pending.replace(PendingOutcome {
            ticket,
            solution: solution.clone(),
            due: now + self.reveal_delay,
        });
        if let Some(old) = superseded {
            debug!(target: "session", serial = old.ticket.serial, "Pending outcome superseded");
        }

        debug!(target: "session", solution = %solution.id, serial = ticket.serial, "Solution selected");
        self.last_solution = Some(solution);
        self.set_phase(Phase::Loading);
        Ok(ticket)
    }

    /// Reveal the pending outcome if it is due
    pub fn poll(&mut self, now: Instant) -> Result<Option<Reveal>, GameError> {
        let ticket = match &self.pending {
            Some(pending) if now >= pending.due => pending.ticket,
            _ => return Ok(None),
        };
        self.reveal(ticket).map(Some)
    }

    /// Apply the outcome behind `ticket`, if it is still the live one
    pub fn reveal(&mut self, ticket: Ticket) -> Result<Reveal, GameError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket && ticket.epoch == self.epoch => pending,
            other => {
                self.pending = other;
                warn!(target: "session", serial = ticket.serial, "Stale ticket discarded");
                return Ok(Reveal::Discarded);
            }
        };

        let transition = match self.engine.apply_outcome(&self.state, &pending.solution) {
            Ok(transition) => transition,
            Err(err) => {
                self.set_phase(Phase::Active);
                return Err(err);
            }
        };

        self.state = transition.state;
        let phase = if transition.terminal {
            Phase::Terminal
        } else {
            Phase::ShowingResult
        };
        self.set_phase(phase);

        Ok(Reveal::Applied {
            outcome: transition.outcome,
            terminal: transition.terminal,
            plan_b_activated: transition.plan_b_activated,
        })
    }

    /// Drop a pending choice without applying it
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(target: "session", serial = pending.ticket.serial, "Pending outcome cancelled");
            if self.phase == Phase::Loading {
                self.last_solution = None;
                self.set_phase(Phase::Active);
            }
        }
    }

    /// Leave the result screen: next crisis, or a fresh run if this one ended
    pub fn continue_game(&mut self) {
        self.pending = None;
        let restart = self.engine.is_terminal(&self.state);
        self.state = self.engine.advance_to_new_crisis(&self.state);
        if restart {
            self.start_epoch();
        }
        self.last_solution = None;
        self.set_phase(Phase::Active);
    }

    pub fn skip_crisis(&mut self) {
        self.pending = None;
        self.state = self.engine.skip_crisis(&self.state);
        self.last_solution = None;
        self.set_phase(Phase::Active);
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.state = self.engine.reset();
        self.start_epoch();
        self.last_solution = None;
        self.set_phase(Phase::Active);
    }

    pub fn close_share_report(&mut self) {
        self.state = self.watcher.close(self.state.clone());
    }

    pub fn share_report(&self, date: NaiveDate) -> Option<ShareReport> {
        self.state
            .show_share_report
            .then(|| ShareReport::from_state(&self.state, date))
    }

    /// "Saved N times today" banner, shown while picking a solution
    pub fn saved_banner(&self) -> Option<String> {
        let count = self.state.today_saved_count;
        (count > 0 && self.phase == Phase::Active && !self.is_loading())
            .then(|| format!("Saved the world {} times today!", count))
    }

    fn start_epoch(&mut self) {
        self.epoch = Uuid::new_v4();
        self.watcher.reset();
        info!(target: "session", epoch = %self.epoch, "New epoch");
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.state = self.watcher.evaluate(self.state.clone(), phase);
    }
}
