//! Integration tests for the flapping penalty walk.
//!
//! These run the calculator against a recording store to check both the
//! penalty and which ancestors were read.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use berth_model::ScheduleStatus::{self, *};
use berth_model::TaskRecord;
use berth_reschedule::{
    BackoffStrategy, ConstantBackoff, RescheduleCalculator, RescheduleSettings,
    TruncatedBinaryBackoff,
};
use berth_storage::MemTaskStore;
use berth_testing::{
    init_tracing, make_flappy_task, make_task, task_id, with_events, RecordingTaskStore,
};
use proptest::prelude::*;

const FLAPPING_THRESHOLD: Duration = Duration::from_secs(60);
const MAX_STARTUP_DELAY: Duration = Duration::from_secs(600);

/// Backoff that replays a fixed script and fails on any unexpected input.
struct ScriptedBackoff {
    steps: Mutex<Vec<(u64, u64)>>,
}

impl ScriptedBackoff {
    fn new(steps: &[(u64, u64)]) -> Self {
        let mut steps = steps.to_vec();
        steps.reverse();
        Self {
            steps: Mutex::new(steps),
        }
    }

    fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

impl BackoffStrategy for ScriptedBackoff {
    fn calculate_backoff_ms(&self, last_backoff_ms: u64) -> u64 {
        let (expected, next) = self
            .steps
            .lock()
            .unwrap()
            .pop()
            .expect("backoff called more often than scripted");
        assert_eq!(last_backoff_ms, expected, "unexpected backoff input");
        next
    }
}

fn settings(backoff: Arc<dyn BackoffStrategy>) -> RescheduleSettings {
    RescheduleSettings::new(backoff, FLAPPING_THRESHOLD, MAX_STARTUP_DELAY).unwrap()
}

fn calculator(store: Arc<RecordingTaskStore>, backoff: Arc<dyn BackoffStrategy>) -> RescheduleCalculator {
    init_tracing();
    RescheduleCalculator::new(store, settings(backoff))
}

#[test]
fn test_no_penalty_for_no_ancestor() {
    let store = Arc::new(RecordingTaskStore::default());
    let calc = calculator(store.clone(), Arc::new(ScriptedBackoff::new(&[])));

    assert_eq!(calc.flapping_penalty_ms(&make_task("a", Init)), 0);
    assert_eq!(store.lookup_count(), 0);
}

#[test]
fn test_no_penalty_for_deleted_ancestor() {
    let store = Arc::new(RecordingTaskStore::default());
    let calc = calculator(store.clone(), Arc::new(ScriptedBackoff::new(&[])));

    let task = make_task("b", Init).with_ancestor(task_id("a"));
    assert_eq!(calc.flapping_penalty_ms(&task), 0);
    assert_eq!(store.lookups(), vec![task_id("a")]);
}

#[test]
fn test_flapping_task() {
    let store = Arc::new(RecordingTaskStore::with_tasks([make_flappy_task("a")]));
    let backoff = Arc::new(ScriptedBackoff::new(&[(0, 1000)]));
    let calc = calculator(store.clone(), backoff.clone());

    let task = make_task("b", Init).with_ancestor(task_id("a"));
    assert_eq!(calc.flapping_penalty_ms(&task), 1000);
    assert_eq!(backoff.remaining(), 0);
}

#[test]
fn test_flapping_tasks_backoff_truncation() {
    let a = make_flappy_task("a").with_ancestor(task_id("bugIfQueried"));
    let b = make_flappy_task("b").with_ancestor(task_id("a"));
    let c = make_flappy_task("c").with_ancestor(task_id("b"));
    let d = make_flappy_task("d").with_ancestor(task_id("c"));

    let store = Arc::new(RecordingTaskStore::with_tasks([a, b, c, d]).forbid("bugIfQueried"));
    let backoff = Arc::new(ScriptedBackoff::new(&[
        (0, 100),
        (100, 200),
        (200, 300),
        (300, 300),
    ]));
    let calc = calculator(store.clone(), backoff.clone());

    let new_task = make_flappy_task("newTask").with_ancestor(task_id("d"));
    assert_eq!(calc.flapping_penalty_ms(&new_task), 300);
    assert_eq!(
        store.lookups(),
        vec![task_id("d"), task_id("c"), task_id("b"), task_id("a")]
    );
    assert_eq!(backoff.remaining(), 0);
}

#[test]
fn test_no_penalty_for_interrupted_tasks() {
    let ancestor = with_events(
        make_task("a", Killed),
        &[
            (Init, 0),
            (Pending, 100),
            (Running, 200),
            (Killing, 300),
            (Killed, 400),
        ],
    );
    let store = Arc::new(RecordingTaskStore::with_tasks([ancestor]));
    let calc = calculator(store, Arc::new(ScriptedBackoff::new(&[])));

    let task = make_task("b", Init).with_ancestor(task_id("a"));
    assert_eq!(calc.flapping_penalty_ms(&task), 0);
}

#[test]
fn test_slow_ancestor_stops_walk() {
    let slow = with_events(
        make_task("slow", Failed),
        &[(Init, 0), (Running, 1_000), (Failed, 120_000)],
    )
    .with_ancestor(task_id("older"));
    let flappy = make_flappy_task("flappy").with_ancestor(task_id("slow"));

    let store = Arc::new(RecordingTaskStore::with_tasks([slow, flappy]).forbid("older"));
    let calc = calculator(store.clone(), Arc::new(ScriptedBackoff::new(&[(0, 500)])));

    let task = make_task("new", Pending).with_ancestor(task_id("flappy"));
    assert_eq!(calc.flapping_penalty_ms(&task), 500);
    assert_eq!(store.lookup_count(), 2);
}

#[test]
fn test_chain_ends_at_missing_ancestor() {
    let a = make_flappy_task("a").with_ancestor(task_id("pruned"));
    let b = make_flappy_task("b").with_ancestor(task_id("a"));
    let store = Arc::new(RecordingTaskStore::with_tasks([a, b]));
    let backoff =
        TruncatedBinaryBackoff::new(Duration::from_millis(100), Duration::from_secs(10)).unwrap();
    let calc = calculator(store.clone(), Arc::new(backoff));

    let task = make_task("c", Pending).with_ancestor(task_id("b"));
    assert_eq!(calc.flapping_penalty_ms(&task), 200);
    assert_eq!(store.lookup_count(), 3);
}

#[test]
fn test_custom_interrupted_statuses() {
    let restarted = with_events(
        make_task("a", Finished),
        &[(Init, 0), (Running, 100), (Restarting, 200), (Finished, 300)],
    );
    let store = Arc::new(MemTaskStore::with_tasks([restarted]));
    let backoff = Arc::new(ConstantBackoff::new(Duration::from_secs(1)));
    let task = make_task("b", Init).with_ancestor(task_id("a"));

    let default_calc = RescheduleCalculator::new(store.clone(), settings(backoff.clone()));
    assert_eq!(default_calc.flapping_penalty_ms(&task), 1000);

    let custom_calc = RescheduleCalculator::new(
        store,
        settings(backoff).with_interrupted_statuses([Killing, Restarting]),
    );
    assert_eq!(custom_calc.flapping_penalty_ms(&task), 0);
}

#[test]
fn test_truncation_bound_with_constant_backoff() {
    // A constant strategy converges on the second flapping ancestor.
    let chain: Vec<TaskRecord> = (0..10)
        .map(|i| {
            let task = make_flappy_task(&format!("t{i}"));
            if i == 0 {
                task
            } else {
                task.with_ancestor(task_id(&format!("t{}", i - 1)))
            }
        })
        .collect();
    let store = Arc::new(RecordingTaskStore::with_tasks(chain).forbid("t7"));
    let calc = calculator(
        store.clone(),
        Arc::new(ConstantBackoff::new(Duration::from_millis(250))),
    );

    let task = make_task("new", Init).with_ancestor(task_id("t9"));
    assert_eq!(calc.flapping_penalty_ms(&task), 250);
    assert_eq!(store.lookups(), vec![task_id("t9"), task_id("t8")]);
}

#[test]
fn test_concurrent_calls_agree() {
    let a = make_flappy_task("a");
    let b = make_flappy_task("b").with_ancestor(task_id("a"));
    let store = Arc::new(MemTaskStore::with_tasks([a, b]));
    let backoff =
        TruncatedBinaryBackoff::new(Duration::from_millis(100), Duration::from_secs(10)).unwrap();
    let calc = RescheduleCalculator::new(store, settings(Arc::new(backoff)));
    let task = make_task("c", Pending).with_ancestor(task_id("b"));
    let (calc, task) = (&calc, &task);

    let results: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(move || calc.flapping_penalty_ms(task)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| *r == 200));
}

fn arb_status() -> impl Strategy<Value = ScheduleStatus> {
    proptest::sample::select(ScheduleStatus::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_penalty_is_idempotent(
        lifetimes in proptest::collection::vec(0i64..120_000, 0..8),
        terminal in arb_status(),
        initial_ms in 1u64..1_000,
    ) {
        let tasks: Vec<TaskRecord> = lifetimes
            .iter()
            .enumerate()
            .map(|(i, lifetime)| {
                let task = with_events(
                    make_task(&format!("t{i}"), terminal),
                    &[(Init, 0), (terminal, 1 + lifetime)],
                );
                if i == 0 { task } else { task.with_ancestor(task_id(&format!("t{}", i - 1))) }
            })
            .collect();
        let head = tasks.len().checked_sub(1).map(|i| format!("t{i}"));
        let store = Arc::new(MemTaskStore::with_tasks(tasks));
        let backoff = TruncatedBinaryBackoff::new(
            Duration::from_millis(initial_ms),
            Duration::from_millis(initial_ms * 16),
        ).unwrap();
        let calc = RescheduleCalculator::new(store, settings(Arc::new(backoff)));

        let mut task = make_task("new", Pending);
        if let Some(head) = head {
            task = task.with_ancestor(task_id(&head));
        }

        let first = calc.flapping_penalty_ms(&task);
        let second = calc.flapping_penalty_ms(&task);
        prop_assert_eq!(first, second);
        prop_assert!(first <= initial_ms * 16);
    }

    #[test]
    fn prop_interrupted_ancestor_never_penalized(
        gap in 1i64..1_000,
        initial_ms in 1u64..10_000,
    ) {
        let ancestor = with_events(
            make_task("a", Killed),
            &[(Init, 0), (Running, gap), (Killing, 2 * gap), (Killed, 3 * gap)],
        );
        let store = Arc::new(MemTaskStore::with_tasks([ancestor]));
        let calc = RescheduleCalculator::new(
            store,
            settings(Arc::new(ConstantBackoff::new(Duration::from_millis(initial_ms)))),
        );

        let task = make_task("b", Init).with_ancestor(task_id("a"));
        prop_assert_eq!(calc.flapping_penalty_ms(&task), 0);
    }
}
