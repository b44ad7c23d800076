//! Tests for the tournament controller: series scoring, events and the
//! session clock.

use bluey_tictactoe::{
    Difficulty, EndReason, GameOutcome, Mark, ManualClock, MoveErrorKind, RandomSource,
    TimerCheck, TournamentConfig, TournamentController, TournamentError, TournamentEvent,
    TournamentResult, TournamentStatus, WinningLine,
};
use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;
use tokio::sync::mpsc;

/// Never takes an Easy-mode shortcut and always picks the first candidate.
#[derive(Debug)]
struct FirstChoice;

impl RandomSource for FirstChoice {
    fn chance(&mut self, _p: f64) -> bool {
        false
    }

    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

// Player moves that produce a known result against Hard mode with FirstChoice.
const COMPUTER_WINS: &[usize] = &[0, 1, 3];
const PLAYER_WINS: &[usize] = &[0, 8, 6, 7];
const DRAW: &[usize] = &[4, 2, 3, 1, 8];

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

fn controller(clock: &ManualClock) -> TournamentController {
    TournamentController::new(TournamentConfig::default(), clock.clone(), FirstChoice)
}

fn started(clock: &ManualClock) -> TournamentController {
    let mut c = controller(clock);
    c.start_tournament("Bingo", Difficulty::Hard).unwrap();
    c
}

/// Plays the player's moves, answering each with the computer, until the
/// game ends.
fn play(c: &mut TournamentController, moves: &[usize]) -> GameOutcome {
    for &index in moves {
        let outcome = c.submit_player_move(index).unwrap();
        if outcome.is_terminal() {
            return outcome;
        }
        let turn = c.play_computer_move().unwrap();
        if turn.outcome.is_terminal() {
            return turn.outcome;
        }
    }
    panic!("scripted game did not finish");
}

#[test]
fn test_scripted_games_produce_expected_outcomes() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    assert_eq!(
        play(&mut c, COMPUTER_WINS),
        GameOutcome::ComputerWin(WinningLine::ALL[7])
    );
    assert_eq!(
        play(&mut c, PLAYER_WINS),
        GameOutcome::PlayerWin(WinningLine::ALL[2])
    );
    assert_eq!(play(&mut c, DRAW), GameOutcome::Draw);
}

#[test]
fn test_three_computer_wins_end_tournament_at_game_three() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    for _ in 0..3 {
        play(&mut c, COMPUTER_WINS);
    }

    let state = c.state().unwrap();
    assert_eq!(*state.computer_wins(), 3);
    assert_eq!(*state.player_wins(), 0);
    assert_eq!(*state.current_game_number(), 3);
    assert_eq!(state.history().len(), 3);
    assert!(matches!(
        c.status(),
        TournamentStatus::Ended {
            result: TournamentResult::ComputerWins,
            reason: EndReason::Completed,
            ..
        }
    ));
    assert!(!c.is_active());
}

#[test]
fn test_two_all_then_draw_is_a_tie_at_game_five() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    play(&mut c, PLAYER_WINS);
    play(&mut c, COMPUTER_WINS);
    play(&mut c, PLAYER_WINS);
    play(&mut c, COMPUTER_WINS);
    assert!(c.is_active());
    assert_eq!(*c.state().unwrap().current_game_number(), 5);

    play(&mut c, DRAW);

    let state = c.state().unwrap();
    assert_eq!(*state.current_game_number(), 5);
    assert_eq!((*state.player_wins(), *state.computer_wins()), (2, 2));
    assert_eq!(state.standing(), TournamentResult::Tie);
    assert!(matches!(
        c.status(),
        TournamentStatus::Ended {
            result: TournamentResult::Tie,
            reason: EndReason::Completed,
            ..
        }
    ));
}

#[test]
fn test_game_numbers_increase_across_history() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    play(&mut c, DRAW);
    play(&mut c, PLAYER_WINS);
    play(&mut c, DRAW);
    play(&mut c, PLAYER_WINS);
    play(&mut c, PLAYER_WINS);

    let numbers: Vec<u32> = c
        .state()
        .unwrap()
        .history()
        .iter()
        .map(|r| *r.game_number())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    assert!(matches!(
        c.status(),
        TournamentStatus::Ended {
            result: TournamentResult::PlayerWins,
            ..
        }
    ));
}

#[test]
fn test_game_duration_comes_from_clock() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    clock.advance(Duration::from_millis(4_250));
    c.submit_player_move(0).unwrap();
    c.play_computer_move().unwrap();
    clock.advance(Duration::from_millis(8_000));
    c.submit_player_move(1).unwrap();
    c.play_computer_move().unwrap();
    c.submit_player_move(3).unwrap();
    c.play_computer_move().unwrap();

    let record = &c.state().unwrap().history()[0];
    assert_eq!(*record.duration_ms(), 12_250);
    assert_eq!(*record.timestamp(), clock_now(&clock));
}

fn clock_now(clock: &ManualClock) -> DateTime<Utc> {
    use bluey_tictactoe::Clock;
    clock.now()
}

#[test]
fn test_operations_require_active_tournament() {
    let clock = ManualClock::new(start());
    let mut c = controller(&clock);

    assert_eq!(c.submit_player_move(4), Err(TournamentError::NotActive));
    assert_eq!(c.play_computer_move().unwrap_err(), TournamentError::NotActive);
    assert_eq!(c.start_new_game(), Err(TournamentError::NotActive));
    assert_eq!(c.force_end_tournament(), Err(TournamentError::NotActive));
    assert_eq!(c.tick(), None);
    assert_eq!(c.status(), TournamentStatus::Idle);
}

#[test]
fn test_blank_player_name_rejected() {
    let clock = ManualClock::new(start());
    let mut c = controller(&clock);

    assert_eq!(
        c.start_tournament("   ", Difficulty::Easy),
        Err(TournamentError::EmptyPlayerName)
    );
    assert!(c.state().is_none());

    c.start_tournament("  Bingo ", Difficulty::Easy).unwrap();
    assert_eq!(c.state().unwrap().player_name(), "Bingo");
}

#[test]
fn test_move_errors_leave_state_untouched() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);

    let err = c.play_computer_move().unwrap_err();
    match err {
        TournamentError::Move(move_err) => assert_eq!(move_err.kind(), MoveErrorKind::IllegalMove),
        other => panic!("unexpected error: {other}"),
    }

    c.submit_player_move(4).unwrap();
    c.play_computer_move().unwrap();
    let before = c.game().clone();

    let err = c.submit_player_move(4).unwrap_err();
    match err {
        TournamentError::Move(move_err) => assert_eq!(move_err.kind(), MoveErrorKind::InvalidMove),
        other => panic!("unexpected error: {other}"),
    }
    let err = c.submit_player_move(9).unwrap_err();
    assert!(matches!(err, TournamentError::Move(_)));
    assert_eq!(c.game(), &before);
}

#[test]
fn test_start_new_game_keeps_game_number_and_records_nothing() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);
    play(&mut c, PLAYER_WINS);

    c.submit_player_move(0).unwrap();
    c.play_computer_move().unwrap();
    c.start_new_game().unwrap();

    let state = c.state().unwrap();
    assert_eq!(*state.current_game_number(), 2);
    assert_eq!(state.history().len(), 1);
    assert!(c.game().history().is_empty());
    assert_eq!(c.game().board().empty_cells().len(), 9);
}

#[test]
fn test_force_end_keeps_state_readable() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);
    play(&mut c, PLAYER_WINS);
    c.submit_player_move(4).unwrap();

    assert_eq!(c.force_end_tournament(), Ok(TournamentResult::PlayerWins));
    assert!(matches!(
        c.status(),
        TournamentStatus::Ended {
            reason: EndReason::Abandoned,
            ..
        }
    ));
    assert_eq!(c.state().unwrap().history().len(), 1);
    assert_eq!(c.submit_player_move(0), Err(TournamentError::NotActive));
}

#[test]
fn test_new_tournament_replaces_previous() {
    let clock = ManualClock::new(start());
    let mut c = started(&clock);
    for _ in 0..3 {
        play(&mut c, COMPUTER_WINS);
    }

    c.start_tournament("Bandit", Difficulty::Easy).unwrap();
    let state = c.state().unwrap();
    assert_eq!(state.player_name(), "Bandit");
    assert_eq!(*state.difficulty(), Difficulty::Easy);
    assert_eq!(*state.current_game_number(), 1);
    assert!(state.history().is_empty());
    assert!(c.is_active());
}

#[test]
fn test_time_warnings_then_timeout() {
    let clock = ManualClock::new(start());
    let config = TournamentConfig::default().with_session_time_limit_secs(600);
    let mut c = TournamentController::new(config, clock.clone(), FirstChoice);
    c.start_tournament("Bingo", Difficulty::Hard).unwrap();

    assert!(matches!(c.tick(), Some(TimerCheck::Running { .. })));

    clock.advance(Duration::from_secs(301));
    assert_eq!(
        c.tick(),
        Some(TimerCheck::Warning {
            threshold: Duration::from_secs(300),
            remaining: Duration::from_secs(299),
        })
    );
    assert!(matches!(c.tick(), Some(TimerCheck::Running { .. })));

    clock.advance(Duration::from_secs(240));
    assert!(matches!(
        c.tick(),
        Some(TimerCheck::Warning { threshold, .. }) if threshold == Duration::from_secs(60)
    ));

    clock.advance(Duration::from_secs(59));
    assert_eq!(c.tick(), Some(TimerCheck::Expired));
    assert!(matches!(
        c.status(),
        TournamentStatus::Ended {
            reason: EndReason::TimedOut,
            ..
        }
    ));
    assert_eq!(c.tick(), None);
    assert_eq!(c.submit_player_move(0), Err(TournamentError::NotActive));
}

#[test]
fn test_events_for_first_game() {
    let clock = ManualClock::new(start());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut c = controller(&clock).with_events(tx);
    c.start_tournament("Bingo", Difficulty::Hard).unwrap();
    play(&mut c, COMPUTER_WINS);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert_eq!(events[0], TournamentEvent::GameStarted { game_number: 1 });
    assert_eq!(
        events[1],
        TournamentEvent::CellMarked {
            index: 0,
            mark: Mark::Player
        }
    );
    assert_eq!(
        events[2],
        TournamentEvent::CellMarked {
            index: 4,
            mark: Mark::Computer
        }
    );
    let marks = events
        .iter()
        .filter(|e| matches!(e, TournamentEvent::CellMarked { .. }))
        .count();
    assert_eq!(marks, 6);

    let tail = &events[events.len() - 3..];
    assert!(matches!(
        &tail[0],
        TournamentEvent::GameEnded {
            game_number: 1,
            outcome: GameOutcome::ComputerWin(_),
            ..
        }
    ));
    assert!(matches!(
        &tail[1],
        TournamentEvent::TournamentAdvanced(state) if *state.current_game_number() == 2
    ));
    assert_eq!(tail[2], TournamentEvent::GameStarted { game_number: 2 });
}

#[test]
fn test_tournament_end_event_carries_result() {
    let clock = ManualClock::new(start());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut c = controller(&clock).with_events(tx);
    c.start_tournament("Bingo", Difficulty::Hard).unwrap();
    for _ in 0..3 {
        play(&mut c, COMPUTER_WINS);
    }

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event);
    }
    match last {
        Some(TournamentEvent::TournamentEnded {
            state,
            result,
            reason,
        }) => {
            assert_eq!(result, TournamentResult::ComputerWins);
            assert_eq!(reason, EndReason::Completed);
            assert_eq!(*state.computer_wins(), 3);
        }
        other => panic!("expected TournamentEnded, got {other:?}"),
    }
}

#[test]
fn test_dropped_receiver_is_not_an_error() {
    let clock = ManualClock::new(start());
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut c = controller(&clock).with_events(tx);
    c.start_tournament("Bingo", Difficulty::Hard).unwrap();

    assert_eq!(play(&mut c, DRAW), GameOutcome::Draw);
    assert_eq!(*c.state().unwrap().current_game_number(), 2);
}
