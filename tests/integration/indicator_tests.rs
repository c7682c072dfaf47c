//! End-to-end priority indicator scenarios driven by a simulated clock.

use std::sync::Arc;

use robokit::adapters::SimClock;
use robokit::config::IndicatorConfig;
use robokit::indicator::PriorityIndicator;
use robokit::scheduler::{TaskManager, TaskType};

use crate::mock_hw::{MockIndicator, Pattern, WriteLog};

type Indicator = PriorityIndicator<MockIndicator, SimClock>;

struct Rig {
    indicator: Arc<Indicator>,
    clock: SimClock,
    tasks: TaskManager,
    log: WriteLog,
}

impl Rig {
    fn new(priorities: &[Pattern]) -> Self {
        let clock = SimClock::new();
        let tasks = TaskManager::new();
        let (device, log) = MockIndicator::new();
        let indicator = PriorityIndicator::new(
            "status",
            device,
            clock.clone(),
            &tasks,
            IndicatorConfig::default(),
        )
        .unwrap();
        indicator.set_pattern_priorities(Some(priorities)).unwrap();
        Self {
            indicator,
            clock,
            tasks,
            log,
        }
    }

    /// Advance one 50 ms refresh period and reconcile.
    fn tick(&self) -> Option<Pattern> {
        self.clock.advance_ms(50);
        self.indicator.refresh().unwrap();
        self.indicator.current_pattern()
    }

    /// Tick until the clock reaches `secs`, returning the shown pattern per tick.
    fn run_until(&self, secs: f64) -> Vec<Option<Pattern>> {
        let mut shown = Vec::new();
        while self.clock_now() < secs - 1e-9 {
            shown.push(self.tick());
        }
        shown
    }

    fn clock_now(&self) -> f64 {
        use robokit::ports::Clock;
        self.clock.now()
    }
}

// ── Scenario 1: indefinite high priority wins ─────────────────

#[test]
fn indefinite_high_priority_wins() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state_with(&"B", true, 0.0, 0.0);
    rig.indicator.set_pattern_state_with(&"A", true, 0.0, 0.0);
    assert_eq!(rig.tick(), Some("A"));
    assert_eq!(rig.log.writes(), vec![Some("A")], "B must never reach the device");
}

// ── Scenario 2: one-shot expiry ───────────────────────────────

#[test]
fn one_shot_expires_and_disables() {
    let rig = Rig::new(&["A"]);
    rig.indicator.set_pattern_state_for(&"A", true, 1.0);
    assert_eq!(rig.tick(), Some("A"));
    rig.run_until(0.95);
    assert!(rig.indicator.pattern_state(&"A"));
    assert_eq!(rig.indicator.current_pattern(), Some("A"));

    rig.run_until(1.05);
    assert_eq!(rig.indicator.current_pattern(), None);
    assert!(!rig.indicator.pattern_state(&"A"));
    assert_eq!(rig.log.writes(), vec![Some("A"), None]);
}

#[test]
fn expired_one_shot_reveals_lower_priority() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state(&"B", true);
    rig.indicator.set_pattern_state_for(&"A", true, 0.5);
    assert_eq!(rig.tick(), Some("A"));
    rig.run_until(0.6);
    assert_eq!(rig.indicator.current_pattern(), Some("B"));
    assert_eq!(rig.log.writes(), vec![Some("A"), Some("B")]);
}

// ── Scenario 3: blink cycle ───────────────────────────────────

#[test]
fn blink_cycle_alternates_on_and_off() {
    let rig = Rig::new(&["A"]);
    rig.indicator.set_pattern_state_with(&"A", true, 0.2, 0.3);

    let mut shown = Vec::new();
    while rig.clock_now() < 2.0 - 1e-9 {
        shown.push(rig.tick());
        assert!(rig.indicator.pattern_state(&"A"), "blink must stay enabled");
    }

    assert_eq!(shown.len(), 40);
    assert!(shown.iter().all(|p| *p == Some("A") || p.is_none()));

    // ON for 0.2 s out of every 0.5 s: 16 of 40 ticks, give or take a tick per phase.
    let on_ticks = shown.iter().filter(|p| p.is_some()).count();
    assert!((12..=20).contains(&on_ticks), "on_ticks={on_ticks}");

    let writes = rig.log.writes();
    assert!(writes.len() >= 6, "expected several toggles, got {writes:?}");
    assert!(writes.windows(2).all(|w| w[0] != w[1]), "redundant write in {writes:?}");
}

// ── Scenario 4: priority preemption ───────────────────────────

#[test]
fn higher_priority_preempts() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state(&"B", true);
    let before = rig.run_until(0.5);
    assert!(before.iter().all(|p| *p == Some("B")));

    rig.indicator.set_pattern_state(&"A", true);
    let after = rig.run_until(1.0);
    assert!(after.iter().all(|p| *p == Some("A")));
    assert_eq!(rig.log.writes(), vec![Some("B"), Some("A")]);

    rig.indicator.set_pattern_state(&"A", false);
    assert_eq!(rig.tick(), Some("B"));
}

// ── Scenario 5: blink OFF phase hides lower priorities ────────

#[test]
fn blink_off_phase_does_not_reveal_lower_priority() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state_with(&"A", true, 0.2, 0.3);
    rig.indicator.set_pattern_state(&"B", true);

    let shown = rig.run_until(2.0);
    assert!(shown.iter().all(|p| *p != Some("B")), "B leaked through: {shown:?}");
    assert!(shown.contains(&None));
    assert!(shown.contains(&Some("A")));
    assert!(rig.indicator.pattern_state(&"B"));
}

// ── Scenario 6: list replacement ──────────────────────────────

#[test]
fn replacing_list_keeps_enabled_patterns() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state(&"A", true);
    rig.indicator.set_pattern_state_with(&"B", true, 0.0, 0.0);
    assert_eq!(rig.tick(), Some("A"));

    rig.indicator
        .set_pattern_priorities(Some(&["B", "C"]))
        .unwrap();

    // The install-time refresh already switched the device.
    assert_eq!(rig.indicator.current_pattern(), Some("B"));
    assert!(rig.indicator.pattern_state(&"B"));
    assert_eq!(rig.indicator.pattern_priority(&"A"), None);
    assert_eq!(rig.indicator.pattern_priority(&"B"), Some(0));
    assert_eq!(rig.indicator.pattern_priority(&"C"), Some(1));
    assert_eq!(rig.tick(), Some("B"));
}

#[test]
fn reinstalling_same_list_restarts_timed_phases() {
    let rig = Rig::new(&["A", "B"]);
    rig.indicator.set_pattern_state_for(&"A", true, 1.0);
    rig.indicator.set_pattern_state_with(&"B", true, 0.2, 0.3);
    rig.run_until(0.5);

    rig.indicator
        .set_pattern_priorities(Some(&["A", "B"]))
        .unwrap();
    assert!(rig.indicator.pattern_state(&"A"));
    assert!(rig.indicator.pattern_state(&"B"));

    // A's one-second ON phase restarted at t=0.5.
    rig.run_until(1.2);
    assert_eq!(rig.indicator.current_pattern(), Some("A"));
    rig.run_until(1.6);
    assert!(!rig.indicator.pattern_state(&"A"));
    assert!(rig.indicator.pattern_state(&"B"), "blink persists across reinstall");
}

// ── Name-based access ─────────────────────────────────────────

#[test]
fn named_access_resolves_display_names() {
    let rig = Rig::new(&["Fault", "Idle"]);
    rig.indicator.set_named_pattern_state("Idle", true).unwrap();
    assert_eq!(rig.indicator.named_pattern_state("Idle"), Ok(true));
    assert_eq!(rig.tick(), Some("Idle"));

    rig.indicator
        .set_named_pattern_state_for("Fault", true, 0.1)
        .unwrap();
    assert_eq!(rig.tick(), Some("Fault"));
    rig.run_until(0.3);
    assert_eq!(rig.indicator.current_pattern(), Some("Idle"));
    assert!(rig.indicator.set_named_pattern_state("Missing", true).is_err());
}

// ── Periodic task ─────────────────────────────────────────────

#[test]
fn periodic_task_drives_one_shot_to_completion() {
    let rig = Rig::new(&["A"]);
    assert!(rig.indicator.is_task_registered());
    rig.indicator.set_pattern_state_for(&"A", true, 0.3);

    for _ in 0..10 {
        rig.clock.advance_ms(60);
        rig.tasks.run_tasks(TaskType::Output);
    }

    assert_eq!(rig.log.writes(), vec![Some("A"), None]);
    assert!(!rig.indicator.pattern_state(&"A"));
}

#[test]
fn periodic_task_survives_device_failure() {
    let rig = Rig::new(&["A"]);
    rig.indicator.set_pattern_state(&"A", true);
    rig.log.set_failing(true);
    rig.clock.advance_ms(60);
    rig.tasks.run_tasks(TaskType::Output);
    assert_eq!(rig.log.count(), 0);
    assert!(rig.indicator.is_task_registered());

    rig.log.set_failing(false);
    rig.clock.advance_ms(60);
    rig.tasks.run_tasks(TaskType::Output);
    assert_eq!(rig.log.writes(), vec![Some("A")]);
}

#[test]
fn uninstall_stops_refreshing() {
    let rig = Rig::new(&["A"]);
    rig.indicator.set_pattern_state(&"A", true);
    rig.indicator.set_pattern_priorities(None).unwrap();
    assert!(!rig.indicator.is_task_registered());
    assert_eq!(rig.tasks.registered_count(), 0);

    rig.clock.advance_ms(60);
    rig.tasks.run_tasks(TaskType::Output);
    assert_eq!(rig.log.writes(), vec![None]);
}

// ── Concurrency ───────────────────────────────────────────────

#[test]
fn concurrent_callers_never_cause_redundant_writes() {
    let rig = Rig::new(&["A", "B", "C"]);

    std::thread::scope(|s| {
        for (i, pattern) in ["A", "B", "C"].into_iter().enumerate() {
            let indicator = Arc::clone(&rig.indicator);
            s.spawn(move || {
                for n in 0..200 {
                    indicator.set_pattern_state(&pattern, (n + i) % 3 != 0);
                }
            });
        }
        s.spawn(|| {
            for _ in 0..200 {
                rig.clock.advance_ms(50);
                rig.tasks.run_tasks(TaskType::Output);
            }
        });
    });

    let writes = rig.log.writes();
    assert!(writes.windows(2).all(|w| w[0] != w[1]), "redundant write in {writes:?}");
    assert_ne!(writes.first(), Some(&None));
}
