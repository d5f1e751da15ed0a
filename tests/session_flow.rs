use crisis_response::config::{Balance, GameConfig};
use crisis_response::game::{CrisisSelector, GameEngine, Phase, Reveal, Session};
use crisis_response::{Crisis, CrisisCatalog, GameError, Outcome, Solution};
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(1500);

fn catalog() -> CrisisCatalog {
    let heat = Crisis::new("heat", "Heatwave", "")
        .with_solution(Solution::new("trees", "Plant trees", Outcome::Success))
        .with_solution(Solution::new("fan", "Giant fan", Outcome::Failure))
        .with_plan_b(
            Crisis::new("heat-b", "Plan B: Blackouts", "")
                .with_solution(Solution::new("candles", "Candles", Outcome::Success))
                .with_solution(Solution::new("panic", "Panic", Outcome::Failure)),
        );
    CrisisCatalog::new(vec![heat], 4).unwrap()
}

fn session(balance: Balance) -> Session {
    let config = GameConfig {
        balance,
        ..GameConfig::default()
    };
    Session::new(GameEngine::new(config, catalog(), CrisisSelector::seeded(2024)))
}

/// Choose, wait out the reveal delay, and return what happened
fn play(session: &mut Session, solution: &str) -> Reveal {
    let now = Instant::now();
    session.select_solution(solution, now).unwrap();
    session.poll(now + DELAY).unwrap().expect("outcome due")
}

#[test]
fn three_successes_raise_the_share_prompt_after_the_third() {
    let mut session = session(Balance::default());

    for round in 1..=3 {
        play(&mut session, "trees");
        assert!(
            !session.state().show_share_report,
            "no prompt on the result screen (round {})",
            round
        );
        session.continue_game();
        assert_eq!(session.state().show_share_report, round == 3);
    }

    assert_eq!(session.state().today_saved_count, 3);
    let report = session
        .share_report(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .expect("report available while the prompt is up");
    assert_eq!(report.saved, 3);

    session.close_share_report();
    assert!(!session.state().show_share_report);

    session.skip_crisis();
    assert!(!session.state().show_share_report, "closed prompt stays closed");
}

#[test]
fn dismissing_on_the_result_screen_does_not_swallow_the_milestone() {
    let mut session = session(Balance::default());

    for _ in 0..2 {
        play(&mut session, "trees");
        session.continue_game();
    }
    play(&mut session, "trees");
    assert_eq!(session.phase(), Phase::ShowingResult);

    session.close_share_report();
    session.continue_game();

    assert_eq!(session.state().today_saved_count, 3);
    assert!(session.state().show_share_report);
}

#[test]
fn failure_walks_into_plan_b_then_game_over() {
    let mut session = session(Balance {
        initial_hope: 30,
        ..Balance::default()
    });

    let reveal = play(&mut session, "fan");
    assert_eq!(
        reveal,
        Reveal::Applied {
            outcome: Outcome::Failure,
            terminal: false,
            plan_b_activated: true,
        }
    );
    assert_eq!(session.state().hope_value, 10);
    assert_eq!(session.state().current_crisis.id, "heat-b");
    assert_eq!(session.phase(), Phase::ShowingResult);

    // Plan B has no fallback of its own: 10 - 20 hits the floor
    let reveal = play(&mut session, "panic");
    assert!(matches!(reveal, Reveal::Applied { terminal: true, .. }));
    assert_eq!(session.state().hope_value, 0);
    assert_eq!(session.phase(), Phase::Terminal);
    assert_eq!(
        session.state().message,
        GameConfig::default().messages.hope_exhausted
    );

    session.continue_game();
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.state().hope_value, 30);
    assert_eq!(session.state().today_saved_count, 0);
}

#[test]
fn low_hope_failure_without_plan_b_ends_the_run() {
    let mut session = session(Balance {
        initial_hope: 25,
        failure_decrement: 10,
        ..Balance::default()
    });

    play(&mut session, "fan");
    assert_eq!(session.state().current_crisis.id, "heat-b");
    assert_eq!(session.state().hope_value, 15);

    let reveal = play(&mut session, "panic");
    assert!(matches!(reveal, Reveal::Applied { terminal: true, .. }));
    assert_eq!(session.state().hope_value, 5);
    assert!(session.state().message.ends_with(&GameConfig::default().messages.low_hope));
}

#[test]
fn ticket_from_before_a_reset_is_never_applied() {
    let mut session = session(Balance::default());
    let now = Instant::now();
    let stale = session.select_solution("fan", now).unwrap();

    session.reset();
    let fresh = session.select_solution("trees", now).unwrap();
    assert_ne!(stale.epoch(), fresh.epoch());

    assert_eq!(session.reveal(stale).unwrap(), Reveal::Discarded);
    assert!(session.is_loading(), "fresh choice is still pending");
    assert_eq!(session.state().hope_value, 50);

    assert!(matches!(
        session.reveal(fresh).unwrap(),
        Reveal::Applied { outcome: Outcome::Success, .. }
    ));
    assert_eq!(session.state().hope_value, 65);
}

#[test]
fn solutions_from_another_crisis_are_refused() {
    let mut session = session(Balance::default());
    let err = session.select_solution("candles", Instant::now()).unwrap_err();
    assert!(matches!(err, GameError::UnknownSolution { .. }));
}

#[test]
fn builtin_config_starts_a_session() {
    let session = Session::from_config(GameConfig::default()).unwrap();
    assert_eq!(session.state().hope_value, 50);
    assert!(session
        .engine()
        .catalog()
        .contains(&session.state().current_crisis));
}

#[test]
fn daily_challenge_is_reported_in_state() {
    let config = GameConfig {
        daily_challenge: true,
        ..GameConfig::default()
    };
    let session = Session::from_config(config).unwrap();
    assert!(session.state().is_daily_challenge);
}
