//! Core game logic: the crisis/outcome state machine
//!
//! `GameEngine` owns the catalog, the balance config and the crisis selector.
//! Every operation takes the current `GameState` by reference and returns a
//! brand new one; nothing is patched in place. `apply_outcome` is pure and
//! reports whether the run has ended as part of its return value, so callers
//! never have to re-derive terminal status from a state they captured
//! before the update.

pub mod milestone;
pub mod report;
pub mod selector;
pub mod session;

pub use milestone::{MilestoneWatcher, Phase};
pub use report::ShareReport;
pub use selector::CrisisSelector;
pub use session::{Reveal, Session, Ticket};

use crate::config::{GameConfig, MAX_HOPE};
use crate::data::{Crisis, CrisisCatalog, Outcome, Solution};
use crate::GameError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The whole game, as one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub current_crisis: Crisis,

    /// 0-100
    pub hope_value: u8,

    pub message: String,
    pub show_share_report: bool,
    pub is_daily_challenge: bool,

    /// Successes since the last reset
    pub today_saved_count: u32,

    /// Set by the last `apply_outcome` when it ended the run
    pub game_over: bool,
}

/// Result of applying a chosen solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub outcome: Outcome,
    pub terminal: bool,
    pub plan_b_activated: bool,
}

pub struct GameEngine {
    config: GameConfig,
    catalog: CrisisCatalog,
    selector: CrisisSelector,
}

impl GameEngine {
    pub fn new(config: GameConfig, catalog: CrisisCatalog, selector: CrisisSelector) -> Self {
        Self {
            config,
            catalog,
            selector,
        }
    }

    /// Engine from config alone: catalog and selector as the config says
    pub fn from_config(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let catalog = config.catalog()?;
        let selector = if config.daily_challenge {
            CrisisSelector::daily(chrono::Local::now().date_naive())
        } else {
            CrisisSelector::from_entropy()
        };
        Ok(Self::new(config, catalog, selector))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CrisisCatalog {
        &self.catalog
    }

    pub fn random_crisis(&mut self) -> Crisis {
        self.selector.pick(&self.catalog).clone()
    }

    /// A run is over once the last outcome said so or hope hit the floor
    pub fn is_terminal(&self, state: &GameState) -> bool {
        state.game_over || state.hope_value <= self.config.balance.game_over_floor
    }

    /// Resolve `solution` against `state`.
    ///
    /// The solution has to be one of the current crisis's options; anything
    /// else is a caller bug and comes back as `GameError::UnknownSolution`.
    pub fn apply_outcome(
        &self,
        state: &GameState,
        solution: &Solution,
    ) -> Result<Transition, GameError> {
        if !state.current_crisis.has_solution(solution) {
            return Err(GameError::UnknownSolution {
                crisis: state.current_crisis.id.clone(),
                solution: solution.id.clone(),
            });
        }

        let balance = &self.config.balance;
        let messages = &self.config.messages;

        let mut current_crisis = state.current_crisis.clone();
        let mut today_saved_count = state.today_saved_count;
        let mut terminal = false;
        let mut plan_b_activated = false;
        let mut hope_value;
        let mut message;

        match solution.outcome {
            Outcome::Success => {
                hope_value = state
                    .hope_value
                    .saturating_add(balance.success_increment)
                    .min(MAX_HOPE);
                message = solution
                    .success_message
                    .clone()
                    .unwrap_or_else(|| messages.default_success.clone());
                today_saved_count = today_saved_count.saturating_add(1);
            }
            Outcome::Failure => {
                hope_value = state
                    .hope_value
                    .saturating_sub(balance.failure_decrement)
                    .min(MAX_HOPE);
                message = solution
                    .failure_message
                    .clone()
                    .unwrap_or_else(|| messages.default_failure.clone());

                if let Some(plan_b) = state.current_crisis.plan_b() {
                    current_crisis = plan_b.clone();
                    plan_b_activated = true;
                    message = format!("{} {}", message, messages.plan_b_activated);
                } else if hope_value <= balance.warning_threshold {
                    terminal = true;
                    message = format!("{} {}", message, messages.low_hope);
                }
            }
        }

        // The floor wins over everything except the crisis we've moved to
        if hope_value <= balance.game_over_floor {
            terminal = true;
            message = messages.hope_exhausted.clone();
        }

        info!(
            target: "game",
            crisis = %state.current_crisis.id,
            solution = %solution.id,
            outcome = %solution.outcome,
            hope_before = state.hope_value,
            hope_after = hope_value,
            plan_b_activated,
            terminal,
            "Outcome applied"
        );

        Ok(Transition {
            state: GameState {
                current_crisis,
                hope_value,
                message,
                show_share_report: state.show_share_report,
                is_daily_challenge: state.is_daily_challenge,
                today_saved_count,
                game_over: terminal,
            },
            outcome: solution.outcome,
            terminal,
            plan_b_activated,
        })
    }

    /// Move on after a result. Restarts if the run is over.
    pub fn advance_to_new_crisis(&mut self, state: &GameState) -> GameState {
        if self.is_terminal(state) {
            debug!(target: "game", hope = state.hope_value, "Run over, restarting");
            return self.reset();
        }

        let current_crisis = self.random_crisis();
        debug!(target: "game", crisis = %current_crisis.id, "Advanced to new crisis");
        GameState {
            current_crisis,
            message: self.config.messages.new_crisis.clone(),
            game_over: false,
            ..state.clone()
        }
    }

    /// Swap the crisis out without touching hope or the saved count
    pub fn skip_crisis(&mut self, state: &GameState) -> GameState {
        let current_crisis = self.random_crisis();
        debug!(
            target: "game",
            from = %state.current_crisis.id,
            to = %current_crisis.id,
            "Crisis skipped"
        );
        GameState {
            current_crisis,
            message: self.config.messages.skipped.clone(),
            game_over: false,
            ..state.clone()
        }
    }

    /// A fresh run
    pub fn reset(&mut self) -> GameState {
        let current_crisis = self.random_crisis();
        info!(target: "game", crisis = %current_crisis.id, "New run started");
        GameState {
            current_crisis,
            hope_value: self.config.balance.initial_hope,
            message: self.config.messages.welcome.clone(),
            show_share_report: false,
            is_daily_challenge: self.config.daily_challenge,
            today_saved_count: 0,
            game_over: false,
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("crises", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Balance;

    fn balance(inc: u8, dec: u8) -> GameConfig {
        GameConfig {
            balance: Balance {
                success_increment: inc,
                failure_decrement: dec,
                ..Balance::default()
            },
            ..GameConfig::default()
        }
    }

    fn crisis_with_plan_b() -> Crisis {
        Crisis::new("flood", "Flood", "Water everywhere")
            .with_solution(Solution::new("dam", "Build a dam", Outcome::Success))
            .with_solution(
                Solution::new("sponge", "Giant sponge", Outcome::Failure)
                    .failure_message("The sponge is full."),
            )
            .with_plan_b(
                Crisis::new("flood-b", "Plan B: Boats", "")
                    .with_solution(Solution::new("ark", "Build an ark", Outcome::Success)),
            )
    }

    fn crisis_without_plan_b() -> Crisis {
        Crisis::new("fog", "Fog", "")
            .with_solution(
                Solution::new("fan", "Blow it away", Outcome::Success)
                    .success_message("Visibility restored."),
            )
            .with_solution(Solution::new("squint", "Squint harder", Outcome::Failure))
    }

    fn engine(config: GameConfig) -> GameEngine {
        let catalog =
            CrisisCatalog::new(vec![crisis_with_plan_b(), crisis_without_plan_b()], 4).unwrap();
        GameEngine::new(config, catalog, CrisisSelector::seeded(1))
    }

    fn state(crisis: Crisis, hope: u8) -> GameState {
        GameState {
            current_crisis: crisis,
            hope_value: hope,
            message: String::new(),
            show_share_report: false,
            is_daily_challenge: false,
            today_saved_count: 0,
            game_over: false,
        }
    }

    #[test]
    fn success_raises_hope_and_counts_a_save() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_without_plan_b();
        let before = state(crisis.clone(), 50);

        let t = engine.apply_outcome(&before, &crisis.solutions[0]).unwrap();

        assert_eq!(t.state.hope_value, 65);
        assert_eq!(t.state.today_saved_count, 1);
        assert!(!t.terminal);
        assert_eq!(t.state.current_crisis, crisis);
        assert_eq!(t.state.message, "Visibility restored.");
    }

    #[test]
    fn success_clamps_at_max() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_with_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 95), &crisis.solutions[0]).unwrap();
        assert_eq!(t.state.hope_value, 100);
        assert_eq!(t.state.message, GameConfig::default().messages.default_success);
    }

    #[test]
    fn success_never_moves_to_plan_b() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_with_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 50), &crisis.solutions[0]).unwrap();
        assert_eq!(t.state.current_crisis.id, "flood");
        assert!(!t.plan_b_activated);
    }

    #[test]
    fn failure_with_plan_b_moves_to_it() {
        let engine = engine(balance(15, 10));
        let crisis = crisis_with_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 100), &crisis.solutions[1]).unwrap();

        assert_eq!(t.state.hope_value, 90);
        assert_eq!(t.state.current_crisis.id, "flood-b");
        assert!(t.plan_b_activated);
        assert!(!t.terminal);
        assert_eq!(t.state.message, "The sponge is full. Activating Plan B!");
        assert_eq!(t.state.today_saved_count, 0);
    }

    #[test]
    fn plan_b_keeps_a_low_hope_run_alive() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_with_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 25), &crisis.solutions[1]).unwrap();
        assert_eq!(t.state.hope_value, 5);
        assert!(!t.terminal);
        assert!(t.plan_b_activated);
    }

    #[test]
    fn failure_without_plan_b_under_warning_threshold_ends_the_run() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_without_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 30), &crisis.solutions[1]).unwrap();

        assert_eq!(t.state.hope_value, 10);
        assert!(t.terminal);
        assert!(t.state.game_over);
        assert_eq!(t.state.current_crisis, crisis);
        let messages = GameConfig::default().messages;
        assert_eq!(
            t.state.message,
            format!("{} {}", messages.default_failure, messages.low_hope)
        );
    }

    #[test]
    fn failure_without_plan_b_above_threshold_continues() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_without_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 50), &crisis.solutions[1]).unwrap();
        assert_eq!(t.state.hope_value, 30);
        assert!(!t.terminal);
    }

    #[test]
    fn hitting_the_floor_overrides_the_message() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_without_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 15), &crisis.solutions[1]).unwrap();

        assert_eq!(t.state.hope_value, 0);
        assert!(t.terminal);
        assert_eq!(t.state.message, GameConfig::default().messages.hope_exhausted);
    }

    #[test]
    fn floor_keeps_the_plan_b_transition() {
        let engine = engine(balance(15, 20));
        let crisis = crisis_with_plan_b();

        let t = engine.apply_outcome(&state(crisis.clone(), 10), &crisis.solutions[1]).unwrap();

        assert_eq!(t.state.hope_value, 0);
        assert!(t.terminal);
        assert_eq!(t.state.current_crisis.id, "flood-b");
        assert_eq!(t.state.message, GameConfig::default().messages.hope_exhausted);
    }

    #[test]
    fn foreign_solution_is_rejected() {
        let engine = engine(balance(15, 20));
        let stranger = Solution::new("dam", "Build a dam", Outcome::Success);

        let err = engine
            .apply_outcome(&state(crisis_without_plan_b(), 50), &stranger)
            .unwrap_err();
        assert!(matches!(err, GameError::UnknownSolution { .. }));
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert_eq!(state.hope_value, 50);
        assert_eq!(state.today_saved_count, 0);
        assert!(!state.show_share_report);
        assert!(!state.game_over);
        assert_eq!(state.message, GameConfig::default().messages.welcome);
    }

    #[test]
    fn advance_keeps_counters_unless_terminal() {
        let mut engine = engine(GameConfig::default());
        let mut live = state(crisis_without_plan_b(), 40);
        live.today_saved_count = 4;

        let next = engine.advance_to_new_crisis(&live);
        assert_eq!(next.hope_value, 40);
        assert_eq!(next.today_saved_count, 4);
        assert_eq!(next.message, GameConfig::default().messages.new_crisis);

        let mut dead = live.clone();
        dead.game_over = true;
        dead.hope_value = 8;
        let restarted = engine.advance_to_new_crisis(&dead);
        assert_eq!(restarted.hope_value, 50);
        assert_eq!(restarted.today_saved_count, 0);
    }

    #[test]
    fn skip_leaves_hope_and_saves_alone() {
        let mut engine = engine(GameConfig::default());
        let mut before = state(crisis_with_plan_b(), 35);
        before.today_saved_count = 2;

        let once = engine.skip_crisis(&before);
        let twice = engine.skip_crisis(&once);

        assert_eq!(twice.hope_value, 35);
        assert_eq!(twice.today_saved_count, 2);
        assert_eq!(twice.message, GameConfig::default().messages.skipped);
    }
}
