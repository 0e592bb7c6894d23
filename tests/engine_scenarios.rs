//! Workout scenarios driven through the public engine API.
//!
//! These tests run full sessions with a manual scheduler and mock
//! capabilities:
//! - Phase sequences for single and multi-exercise presets
//! - Exercise/rest phase counts across preset shapes
//! - Reset, pause/resume and double-start behavior
//! - Side-effect failures never disturbing the countdown

use std::sync::Arc;

use tokio::sync::mpsc;

use interval_trainer::completion::MockCompletionSink;
use interval_trainer::cue::{Cue, MockCueEmitter};
use interval_trainer::engine::{
    Capabilities, ManualScheduler, TickScheduler, TimerEngine, TimerError, TimerEvent,
};
use interval_trainer::types::{Exercise, ExercisePreset, Phase, TimerConfig};
use interval_trainer::wakelock::MockWakeLock;

// ============================================================================
// Test Helpers
// ============================================================================

struct Fixture {
    engine: TimerEngine,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    scheduler: ManualScheduler,
    cues: Arc<MockCueEmitter>,
    wake_lock: Arc<MockWakeLock>,
    sink: Arc<MockCompletionSink>,
}

fn create_fixture(preset: ExercisePreset, prep_seconds: u32) -> Fixture {
    let (tx, events) = mpsc::unbounded_channel();
    let scheduler = ManualScheduler::new();
    let cues = Arc::new(MockCueEmitter::new());
    let wake_lock = Arc::new(MockWakeLock::new());
    let sink = Arc::new(MockCompletionSink::new());

    let caps = Capabilities::new(scheduler.clone())
        .with_cues(cues.clone())
        .with_wake_lock(wake_lock.clone())
        .with_sink(sink.clone());
    let config = TimerConfig::default().with_prep_seconds(prep_seconds);

    Fixture {
        engine: TimerEngine::new(preset, config, caps, tx),
        events,
        scheduler,
        cues,
        wake_lock,
        sink,
    }
}

/// Ticks until the session completes, returning the number of ticks.
fn run_to_completion(fixture: &mut Fixture) -> usize {
    let mut ticks = 0;
    while !fixture.engine.is_complete() {
        fixture.engine.tick();
        ticks += 1;
        assert!(ticks < 100_000, "session did not complete");
    }
    ticks
}

/// Phases entered, in order, as reported by the engine.
fn phase_sequence(events: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<(Phase, u32)> {
    let mut phases = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            TimerEvent::PhaseStarted { phase, seconds, .. } => phases.push((phase, seconds)),
            TimerEvent::Completed { .. } => phases.push((Phase::Complete, 0)),
            _ => {}
        }
    }
    phases
}

fn preset_of(rounds: u32, exercises: &[(u32, u32)]) -> ExercisePreset {
    let exercises = exercises
        .iter()
        .enumerate()
        .map(|(i, (work, rest))| Exercise::new(format!("Ex{}", i + 1), *work, *rest))
        .collect();
    ExercisePreset::new("Scenario", rounds, exercises)
}

// ============================================================================
// Phase Sequence Scenarios
// ============================================================================

#[test]
fn test_single_exercise_two_rounds_without_preparation() {
    let preset = ExercisePreset::new("A-only", 2, vec![Exercise::new("A", 3, 2)]);
    let mut f = create_fixture(preset, 0);

    f.engine.start().unwrap();
    let ticks = run_to_completion(&mut f);

    assert_eq!(ticks, 3 + 2 + 3);
    assert_eq!(
        phase_sequence(&mut f.events),
        vec![
            (Phase::Exercising, 3),
            (Phase::Resting, 2),
            (Phase::Exercising, 3),
            (Phase::Complete, 0),
        ]
    );
}

#[test]
fn test_two_exercises_one_round_with_preparation() {
    let preset = ExercisePreset::new(
        "Pair",
        1,
        vec![Exercise::new("Squat", 20, 10), Exercise::new("Plank", 30, 15)],
    );
    let mut f = create_fixture(preset, 5);

    f.engine.start().unwrap();
    let ticks = run_to_completion(&mut f);

    assert_eq!(ticks, 5 + 20 + 10 + 30);
    assert_eq!(
        phase_sequence(&mut f.events),
        vec![
            (Phase::Preparing, 5),
            (Phase::Exercising, 20),
            (Phase::Resting, 10),
            (Phase::Exercising, 30),
            (Phase::Complete, 0),
        ]
    );
}

#[test]
fn test_invalid_preset_rejected() {
    let mut f = create_fixture(ExercisePreset::new("Empty", 1, vec![]), 5);

    let result = f.engine.start();
    assert!(matches!(result, Err(TimerError::InvalidPreset(_))));
    assert_eq!(f.engine.phase(), Phase::Ready);
    assert!(!f.scheduler.is_active());
}

#[test]
fn test_zero_duration_exercise_rejected() {
    let preset = ExercisePreset::new("Broken", 1, vec![Exercise::new("A", 0, 5)]);
    let mut f = create_fixture(preset, 5);

    assert!(f.engine.start().is_err());
    assert_eq!(f.engine.phase(), Phase::Ready);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_phase_counts_for_all_preset_shapes() {
    // rest_step 0 gives zero-second rests, 1 gives 1s, 2s, ...
    for rest_step in 0..=1 {
        for rounds in 1..=4 {
            for exercise_count in 1..=4 {
                let shape: Vec<(u32, u32)> = (0..exercise_count)
                    .map(|i| (2 + i as u32, rest_step * (1 + i as u32)))
                    .collect();
                let mut f = create_fixture(preset_of(rounds, &shape), 2);

                f.engine.start().unwrap();
                run_to_completion(&mut f);
                let phases = phase_sequence(&mut f.events);

                let exercising = phases.iter().filter(|(p, _)| *p == Phase::Exercising).count();
                let resting = phases.iter().filter(|(p, _)| *p == Phase::Resting).count();
                let expected = rounds as usize * exercise_count;
                let label = format!("rounds={rounds} exercises={exercise_count} rest_step={rest_step}");

                assert_eq!(exercising, expected, "{label}");
                assert_eq!(resting, expected - 1, "{label}");
                assert_eq!(f.sink.count(), 1);
            }
        }
    }
}

#[test]
fn test_zero_rests_announce_without_spending_ticks() {
    let preset = ExercisePreset::new(
        "Circuit",
        2,
        vec![Exercise::new("A", 2, 0), Exercise::new("B", 2, 0)],
    );
    let mut f = create_fixture(preset, 0);

    f.engine.start().unwrap();
    assert_eq!(run_to_completion(&mut f), 8);
    assert_eq!(
        phase_sequence(&mut f.events),
        vec![
            (Phase::Exercising, 2),
            (Phase::Resting, 0),
            (Phase::Exercising, 2),
            (Phase::Resting, 0),
            (Phase::Exercising, 2),
            (Phase::Resting, 0),
            (Phase::Exercising, 2),
            (Phase::Complete, 0),
        ]
    );
    assert_eq!(
        f.cues.spoken(),
        vec!["次はB", "次はA", "次はB", "お疲れ様でした"]
    );
}

#[test]
fn test_total_ticks_match_preset_length() {
    let preset = preset_of(3, &[(4, 2), (5, 3), (6, 1)]);
    let expected = 2 + preset.total_seconds(true) as usize;
    let mut f = create_fixture(preset, 2);

    f.engine.start().unwrap();
    assert_eq!(run_to_completion(&mut f), expected);
}

#[test]
fn test_reset_from_every_phase() {
    let preset = preset_of(2, &[(3, 2), (4, 1)]);
    let total = 2 + preset.total_seconds(true) as usize;

    for ticks_before_reset in 0..=total {
        let mut f = create_fixture(preset.clone(), 2);
        f.engine.start().unwrap();
        for _ in 0..ticks_before_reset {
            f.engine.tick();
        }

        f.engine.reset();
        let session = f.engine.session();
        assert_eq!(session.phase, Phase::Ready, "after {ticks_before_reset} ticks");
        assert_eq!(session.current_round, 1);
        assert_eq!(session.current_exercise_index, 0);
        assert!(!session.running);
        assert_eq!(session.remaining_seconds, 3);
        assert!(!f.scheduler.is_active());
        assert!(!f.wake_lock.is_held());
    }
}

#[test]
fn test_pause_resume_loses_no_time() {
    let preset = preset_of(2, &[(5, 3), (4, 2)]);
    let uninterrupted = {
        let mut f = create_fixture(preset.clone(), 3);
        f.engine.start().unwrap();
        run_to_completion(&mut f)
    };

    let mut f = create_fixture(preset, 3);
    f.engine.start().unwrap();
    let mut ticks = 0;
    while !f.engine.is_complete() {
        if ticks % 4 == 3 {
            let before = f.engine.session().remaining_seconds;
            let phase = f.engine.phase();
            f.engine.pause();
            f.engine.tick(); // stale tick while paused
            f.engine.start().unwrap();
            assert_eq!(f.engine.session().remaining_seconds, before);
            assert_eq!(f.engine.phase(), phase);
        }
        f.engine.tick();
        ticks += 1;
    }
    assert_eq!(ticks, uninterrupted);
}

#[test]
fn test_progress_stays_in_bounds() {
    let preset = preset_of(2, &[(3, 2), (5, 4)]);
    let mut f = create_fixture(preset, 2);
    f.engine.start().unwrap();

    while !f.engine.is_complete() {
        let progress = f.engine.progress();
        assert!((0.0..1.0).contains(&progress), "progress {progress}");
        f.engine.tick();
    }
    assert_eq!(f.engine.progress(), 1.0);
}

#[test]
fn test_double_start_single_callback() {
    let mut f = create_fixture(preset_of(1, &[(10, 0)]), 0);
    f.engine.start().unwrap();
    f.engine.start().unwrap();
    assert_eq!(f.scheduler.start_count(), 1);

    f.engine.tick();
    assert_eq!(f.engine.session().remaining_seconds, 9);
}

// ============================================================================
// Side Effects
// ============================================================================

#[test]
fn test_cue_counts_for_full_session() {
    let preset = ExercisePreset::new("A-only", 2, vec![Exercise::new("A", 3, 2)]);
    let mut f = create_fixture(preset, 0);
    f.engine.start().unwrap();
    run_to_completion(&mut f);

    // Exercise 3s: ticks at 2, 1; rest 2s: tick at 1
    assert_eq!(f.cues.count(Cue::ShortTone), 2 + 1 + 2);
    assert_eq!(f.cues.count(Cue::LongTone), 3);
    assert_eq!(f.cues.count(Cue::CompletionChime), 1);
    assert_eq!(f.cues.spoken(), vec!["次はA".to_string(), "お疲れ様でした".to_string()]);
}

#[test]
fn test_every_side_effect_failing() {
    let preset = preset_of(2, &[(3, 2), (4, 1)]);
    let expected = preset.total_seconds(true) as usize;
    let mut f = create_fixture(preset, 0);
    f.cues.set_should_fail(true);
    f.wake_lock.set_should_fail(true);
    f.sink.set_should_fail(true);

    f.engine.start().unwrap();
    assert_eq!(run_to_completion(&mut f), expected);
    assert!(f.engine.is_complete());
    assert_eq!(f.sink.count(), 1);
}

#[test]
fn test_wake_lock_lifecycle() {
    let mut f = create_fixture(preset_of(1, &[(2, 0)]), 0);

    f.engine.start().unwrap();
    assert!(f.wake_lock.is_held());
    f.engine.pause();
    assert!(!f.wake_lock.is_held());
    f.engine.start().unwrap();
    f.engine.set_visibility(true);
    assert_eq!(f.wake_lock.acquire_count(), 3);

    run_to_completion(&mut f);
    assert!(!f.wake_lock.is_held());
}
