//! End-to-end tests driving the application context with a manual clock.
//!
//! Covers the full pomodoro cycle, time attribution, task progress, the
//! HHMMSS edit protocol and persistence across reloads.

use std::sync::{Arc, Mutex};

use pomotrack_core::board::TimeLedger;
use pomotrack_core::notify::{AudioCue, Notifier, NotifyError, Tone};
use pomotrack_core::storage::{load_json, PROJECTS_KEY, SETTINGS_KEY, TASKS_KEY};
use pomotrack_core::{
    App, CoreError, Database, EditKey, Event, ManualClock, MemoryStore, Mode, NewTask, Project,
    Settings, Task, TimerState, ValidationError,
};

const T0: u64 = 1_700_000_000_000;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Clone, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.log.lock().unwrap().push(format!("{title} {body}"));
        Ok(())
    }
}

impl AudioCue for Recorder {
    fn play(&self, tone: &Tone) {
        self.log.lock().unwrap().push(format!("tone {}", tone.frequency_hz));
    }
}

struct Refusing;

impl Notifier for Refusing {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::PermissionDenied)
    }
}

fn memory_app() -> (App<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new(T0);
    (App::load(MemoryStore::new(), clock.clone()), clock)
}

fn type_digits<S: pomotrack_core::Store, C: pomotrack_core::Clock>(
    app: &mut App<S, C>,
    digits: &str,
) {
    app.begin_edit();
    for c in digits.chars() {
        let key = EditKey::parse(&c.to_string()).unwrap();
        app.edit_key(key).unwrap();
    }
}

fn run_out<S: pomotrack_core::Store>(app: &mut App<S, ManualClock>, clock: &ManualClock) -> Vec<Event> {
    app.start().unwrap();
    clock.advance(app.engine().remaining_secs() * 1000 + 250);
    app.tick().unwrap()
}

// ============================================================================
// Edit protocol
// ============================================================================

#[test]
fn edit_commits_exact_seconds_and_rounded_minutes() {
    let (mut app, _) = memory_app();
    type_digits(&mut app, "013059");
    let events = app.edit_key(EditKey::Enter).unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        Event::EditCommitted { total_secs: 5459, minutes: 91, .. }
    )));
    assert_eq!(app.engine().remaining_secs(), 5459);
    assert_eq!(app.engine().settings().pomodoro, 91);

    let stored: Settings = load_json(app.store(), SETTINGS_KEY).unwrap();
    assert_eq!(stored.pomodoro, 91);
}

#[test]
fn edit_rejects_minutes_over_59() {
    let (mut app, _) = memory_app();
    type_digits(&mut app, "006100");
    let err = app.edit_key(EditKey::Enter).unwrap_err();

    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::InvalidTimeField { minutes: 61, seconds: 0 })
    ));
    assert_eq!(app.state(), TimerState::Idle);
    assert_eq!(app.engine().remaining_secs(), 1500);
    assert!(load_json::<Settings>(app.store(), SETTINGS_KEY).is_none());
}

#[test]
fn edit_rejects_more_than_three_hours() {
    let (mut app, _) = memory_app();
    type_digits(&mut app, "030001");
    let err = app.edit_key(EditKey::Enter).unwrap_err();

    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::DurationTooLong { total_secs: 10_801 })
    ));
    assert_eq!(app.engine().remaining_secs(), 1500);
}

#[test]
fn escape_discards_edit() {
    let (mut app, _) = memory_app();
    type_digits(&mut app, "0500");
    app.edit_key(EditKey::Escape).unwrap();
    assert_eq!(app.state(), TimerState::Idle);
    assert_eq!(app.engine().remaining_secs(), 1500);
    assert_eq!(app.engine().settings().pomodoro, 25);
}

#[test]
fn start_commits_pending_edit() {
    let (mut app, clock) = memory_app();
    type_digits(&mut app, "1000");
    let events = app.start().unwrap();

    assert!(events.iter().any(|e| matches!(e, Event::EditCommitted { total_secs: 600, .. })));
    assert_eq!(app.state(), TimerState::Running);
    clock.advance(1_000);
    app.tick().unwrap();
    assert_eq!(app.engine().remaining_secs(), 599);
}

// ============================================================================
// Cycle and attribution
// ============================================================================

#[test]
fn pomodoro_credits_task_and_project() {
    let recorder = Recorder::default();
    let (app, clock) = memory_app();
    let mut app = app
        .with_notifier(recorder.clone())
        .with_audio_cue(recorder.clone());

    let pid = app.add_project("Thesis", None).unwrap().id;
    app.select_project(Some(pid)).unwrap();
    let tid = app.add_task(NewTask::new("Outline", 2)).unwrap().id;

    type_digits(&mut app, "000010");
    app.edit_key(EditKey::Enter).unwrap();
    let events = run_out(&mut app, &clock);

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::PomodoroCompleted { task_id: Some(t), .. } if *t == tid)));
    assert_eq!(app.engine().mode(), Mode::ShortBreak);
    assert_eq!(app.engine().session_count(), 2);
    assert_eq!(app.state(), TimerState::Idle);

    let task = app.board().task(tid).unwrap();
    assert_eq!(task.completed_pomodoros, 1);
    assert!(!task.completed);
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 10);

    assert_eq!(
        recorder.entries(),
        vec!["tone 880".to_string(), "Time's up! Take a break!".to_string()]
    );
}

#[test]
fn breaks_never_accrue_time() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("P", None).unwrap().id;
    app.select_project(Some(pid)).unwrap();
    app.switch_mode(Mode::ShortBreak).unwrap();

    let events = run_out(&mut app, &clock);
    assert!(!events.iter().any(|e| matches!(e, Event::TimeAccrued { .. })));
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 0);
    assert_eq!(app.engine().mode(), Mode::Pomodoro);
    assert_eq!(app.engine().session_count(), 1);
}

#[test]
fn third_pomodoro_leads_to_long_break() {
    let (mut app, clock) = memory_app();
    let mut modes = Vec::new();
    for _ in 0..3 {
        run_out(&mut app, &clock);
        modes.push(app.engine().mode());
        if app.engine().mode() == Mode::ShortBreak {
            run_out(&mut app, &clock);
        }
    }
    assert_eq!(modes, vec![Mode::ShortBreak, Mode::ShortBreak, Mode::LongBreak]);
    assert_eq!(app.engine().session_count(), 4);

    run_out(&mut app, &clock);
    assert_eq!(app.engine().mode(), Mode::Pomodoro);
}

#[test]
fn pause_flushes_whole_seconds() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("P", None).unwrap().id;
    app.select_project(Some(pid)).unwrap();

    app.start().unwrap();
    clock.advance(2_700);
    let events = app.pause().unwrap();

    assert!(events.contains(&Event::TimeAccrued { project_id: pid, seconds: 2 }));
    assert_eq!(app.engine().remaining_secs(), 1498);
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 2);

    let stored: Vec<Project> = load_json(app.store(), PROJECTS_KEY).unwrap();
    assert_eq!(stored[0].accumulated_time, 2);
}

#[test]
fn late_pause_still_completes_pomodoro() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("P", None).unwrap().id;
    let tid = app.add_task(NewTask::new("T", 2).in_project(pid)).unwrap().id;

    app.start().unwrap();
    clock.advance(1_499_950);
    app.tick().unwrap();
    clock.advance(80);
    let events = app.pause().unwrap();

    assert!(events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })));
    assert_eq!(app.engine().mode(), Mode::ShortBreak);
    assert_eq!(app.board().task(tid).unwrap().completed_pomodoros, 1);
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 1500);
}

#[test]
fn mode_switch_while_running_gives_no_completion_credit() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("P", None).unwrap().id;
    let tid = app.add_task(NewTask::new("T", 1).in_project(pid)).unwrap().id;

    app.start().unwrap();
    clock.advance(5_000);
    let events = app.switch_mode(Mode::LongBreak).unwrap();

    assert!(events.iter().any(|e| matches!(e, Event::TimerStopped { .. })));
    assert!(!events.iter().any(|e| matches!(e, Event::PomodoroCompleted { .. })));
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 5);
    assert_eq!(app.board().task(tid).unwrap().completed_pomodoros, 0);
    assert_eq!(app.engine().remaining_secs(), 15 * 60);
    assert_eq!(app.engine().session_count(), 1);
}

#[test]
fn failing_notifier_does_not_break_cycle() {
    let (app, clock) = memory_app();
    let mut app = app.with_notifier(Refusing);
    run_out(&mut app, &clock);
    assert_eq!(app.engine().mode(), Mode::ShortBreak);
}

// ============================================================================
// Projects
// ============================================================================

#[test]
fn deleted_project_leaves_tasks_unattributed() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("Gone", None).unwrap().id;
    let tid = app.add_task(NewTask::new("Orphan", 3).in_project(pid)).unwrap().id;

    app.delete_project(pid).unwrap();
    assert!(app.board().tasks_in(Some(pid)).is_empty());
    assert_eq!(app.visible_tasks().len(), 1);
    assert!(!app.board().clone().accrue(pid, 1));

    let events = app.start().unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::TimerStarted { task_id: Some(t), project_id: None, .. } if *t == tid
    )));
    clock.advance(3_000);
    let events = app.pause().unwrap();
    assert!(!events.iter().any(|e| matches!(e, Event::TimeAccrued { .. })));
}

#[test]
fn reset_project_time_zeroes_total() {
    let (mut app, clock) = memory_app();
    let pid = app.add_project("P", None).unwrap().id;
    app.select_project(Some(pid)).unwrap();
    app.start().unwrap();
    clock.advance(4_000);
    app.pause().unwrap();

    app.reset_project_time(pid).unwrap();
    assert_eq!(app.board().project(pid).unwrap().accumulated_time, 0);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn state_survives_reopening_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotrack.db");
    let clock = ManualClock::new(T0);

    let (pid, tid) = {
        let mut app = App::load(Database::open_at(&path).unwrap(), clock.clone());
        let pid = app.add_project("Thesis", Some("#2196F3")).unwrap().id;
        let tid = app.add_task(NewTask::new("Draft", 4).in_project(pid)).unwrap().id;
        type_digits(&mut app, "4500");
        app.edit_key(EditKey::Enter).unwrap();
        run_out(&mut app, &clock);
        (pid, tid)
    };

    let app = App::load(Database::open_at(&path).unwrap(), clock);
    assert_eq!(app.engine().settings().pomodoro, 45);
    assert_eq!(app.engine().mode(), Mode::Pomodoro);
    assert_eq!(app.engine().remaining_secs(), 45 * 60);
    assert_eq!(app.engine().session_count(), 1);

    let project = app.board().project(pid).unwrap();
    assert_eq!(project.color, "#2196F3");
    assert_eq!(project.accumulated_time, 45 * 60);
    assert_eq!(app.board().task(tid).unwrap().completed_pomodoros, 1);

    let tasks: Vec<Task> = load_json(app.store(), TASKS_KEY).unwrap();
    assert_eq!(tasks.len(), 1);
}

#[test]
fn malformed_records_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    pomotrack_core::Store::set(&mut store, SETTINGS_KEY, r#"{"pomodoro":0,"shortBreak":500}"#)
        .unwrap();
    pomotrack_core::Store::set(&mut store, TASKS_KEY, "not json").unwrap();
    pomotrack_core::Store::set(
        &mut store,
        PROJECTS_KEY,
        r##"[{"id":"project-7","name":"Legacy","color":"#fff","accumulatedTime":90}]"##,
    )
    .unwrap();

    let app = App::load(store, ManualClock::new(T0));
    assert_eq!(*app.engine().settings(), Settings::default());
    assert!(app.board().tasks().is_empty());
    assert_eq!(app.board().projects()[0].id.0, 7);

    let mut app = app;
    let next = app.add_project("Fresh", None).unwrap();
    assert_eq!(next.id.0, 8);
}
