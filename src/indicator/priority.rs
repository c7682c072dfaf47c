//! Priority indicator controller.
//!
//! Drives an [`IndicatorDevice`] so it shows the highest-priority enabled
//! pattern from a caller-supplied priority list (index 0 is highest).
//! Each pattern can be ON indefinitely, ON for a while (one-shot) or
//! blinking; see [`super::state`].
//!
//! A periodic output task refreshes the device every
//! `refresh_interval_secs` while a priority list is installed. A refresh
//! writes to the device only when the selected pattern differs from what
//! the device reports.
//!
//! ## Selection rules
//!
//! 1. Walk the list from highest priority down, advancing every enabled
//!    entry whose phase has expired.
//! 2. The first entry still enabled after its advance wins.
//! 3. The winner's pattern is shown while it is in its ON phase. During
//!    its OFF phase the device is off; lower priorities are not revealed.
//!
//! All public operations and the periodic task share one lock.

use core::fmt::{self, Write as _};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, info, warn};

use super::state::{PatternState, PhaseChange};
use crate::config::IndicatorConfig;
use crate::error::{DeviceError, Error, Result};
use crate::ports::{Clock, IndicatorDevice};
use crate::scheduler::{TaskManager, TaskObject, TaskType};

pub struct PriorityIndicator<D: IndicatorDevice, C> {
    name: String,
    clock: C,
    config: IndicatorConfig,
    task: TaskObject,
    inner: Mutex<Inner<D>>,
}

struct Inner<D: IndicatorDevice> {
    device: D,
    priorities: Option<Vec<PatternState<D::Pattern>>>,
    named: HashMap<String, D::Pattern>,
    task_enabled: bool,
    next_task_run_time: f64,
}

impl<D, C> PriorityIndicator<D, C>
where
    D: IndicatorDevice + Send + 'static,
    D::Pattern: Send + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Create an indicator around `device`. Its refresh task is created on
    /// `tasks` but stays unregistered until a priority list is installed.
    pub fn new(
        name: impl Into<String>,
        device: D,
        clock: C,
        tasks: &TaskManager,
        config: IndicatorConfig,
    ) -> Result<Arc<Self>> {
        config.validate()?;
        let name = name.into();

        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = Weak::clone(weak);
            let task = tasks.create_task(name.as_str(), move |_| {
                if let Some(indicator) = weak.upgrade() {
                    indicator.indicator_task();
                }
            });

            Self {
                name,
                clock,
                config,
                task,
                inner: Mutex::new(Inner {
                    device,
                    priorities: None,
                    named: HashMap::new(),
                    task_enabled: false,
                    next_task_run_time: 0.0,
                }),
            }
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install a new priority list (highest priority first), or uninstall
    /// the current one with `None`.
    ///
    /// Installing keeps the enable state and durations of every enabled
    /// pattern that is also in the new list; the others are dropped. It
    /// then refreshes the device once and registers the periodic task.
    /// Pattern names must be unique within the list.
    ///
    /// Uninstalling unregisters the task, forgets all state and turns the
    /// device off.
    pub fn set_pattern_priorities(&self, priorities: Option<&[D::Pattern]>) -> Result<()> {
        let mut inner = self.lock();

        let Some(list) = priorities else {
            debug!("{}: priorityList=None", self.name);
            self.set_task_enabled(&mut inner, false)?;
            inner.priorities = None;
            inner.named.clear();
            inner.device.set_pattern(None)?;
            return Ok(());
        };

        debug!("{}: priorityList=[{}]", self.name, ListDisplay(list));
        let named = self.name_map(list)?;
        self.set_task_enabled(&mut inner, true)?;

        let old = inner
            .priorities
            .replace(list.iter().cloned().map(PatternState::new).collect());
        inner.named = named;

        let now = self.clock.now();
        if let Some(old) = old {
            for state in old.iter().filter(|s| s.enabled) {
                // Silently skipped when the pattern is not in the new list.
                inner.set_state(&state.pattern, true, state.on_duration, state.off_duration, now);
            }
        }

        if let Err(e) = inner.update_indicator(now, &self.name) {
            warn!("{}: refresh after install failed: {e}", self.name);
        }
        info!("{}: installed {} pattern priorities", self.name, list.len());
        Ok(())
    }

    /// Enable or disable `pattern` with no timing (ON indefinitely).
    pub fn set_pattern_state(&self, pattern: &D::Pattern, enabled: bool) {
        self.set_pattern_state_with(pattern, enabled, 0.0, 0.0);
    }

    /// Enable `pattern` for `on_duration` seconds, then disable it.
    /// Zero means ON indefinitely.
    pub fn set_pattern_state_for(&self, pattern: &D::Pattern, enabled: bool, on_duration: f64) {
        self.set_pattern_state_with(pattern, enabled, on_duration, 0.0);
    }

    /// Enable or disable `pattern`.
    ///
    /// * `on_duration`: seconds the pattern stays ON, zero for indefinitely.
    /// * `off_duration`: seconds the pattern then stays OFF before turning
    ///   back ON; zero disables it once the ON phase expires. Ignored when
    ///   `on_duration` is zero.
    ///
    /// A pattern that is not in the installed priority list is ignored, so
    /// subsystems can be wired up before the list is known.
    pub fn set_pattern_state_with(
        &self,
        pattern: &D::Pattern,
        enabled: bool,
        on_duration: f64,
        off_duration: f64,
    ) {
        let now = self.clock.now();
        let mut inner = self.lock();
        let index = inner.set_state(pattern, enabled, on_duration, off_duration, now);
        debug!(
            "{}: [{:?}] pattern={}, enabled={}, onDuration={:.3}, offDuration={:.3}",
            self.name, index, pattern, enabled, on_duration, off_duration
        );
    }

    pub fn set_named_pattern_state(&self, name: &str, enabled: bool) -> Result<()> {
        self.set_named_pattern_state_with(name, enabled, 0.0, 0.0)
    }

    pub fn set_named_pattern_state_for(&self, name: &str, enabled: bool, on_duration: f64) -> Result<()> {
        self.set_named_pattern_state_with(name, enabled, on_duration, 0.0)
    }

    /// Name-based [`set_pattern_state_with`](Self::set_pattern_state_with).
    /// Fails with [`Error::PatternNotFound`] for an unknown name.
    pub fn set_named_pattern_state_with(
        &self,
        name: &str,
        enabled: bool,
        on_duration: f64,
        off_duration: f64,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let pattern = inner.resolve(name, &self.name)?;
        inner.set_state(&pattern, enabled, on_duration, off_duration, now);
        debug!(
            "{}: name={}, enabled={}, onDuration={:.3}, offDuration={:.3}",
            self.name, name, enabled, on_duration, off_duration
        );
        Ok(())
    }

    /// Whether `pattern` is enabled; `false` if it is not in the list.
    pub fn pattern_state(&self, pattern: &D::Pattern) -> bool {
        let inner = self.lock();
        let state = inner.state(pattern).is_some_and(|s| s.enabled);
        debug!("{}: pattern={}, state={}", self.name, pattern, state);
        state
    }

    /// Name-based [`pattern_state`](Self::pattern_state).
    /// Fails with [`Error::PatternNotFound`] for an unknown name.
    pub fn named_pattern_state(&self, name: &str) -> Result<bool> {
        let inner = self.lock();
        let pattern = inner.resolve(name, &self.name)?;
        Ok(inner.state(&pattern).is_some_and(|s| s.enabled))
    }

    /// Disable every pattern in the list and turn the device off.
    /// Configured durations are kept. No-op without a list.
    pub fn reset_all_pattern_states(&self) -> Result<()> {
        let mut inner = self.lock();
        let Some(states) = inner.priorities.as_mut() else {
            return Ok(());
        };
        states.iter_mut().for_each(PatternState::clear);
        inner.device.set_pattern(None)?;
        Ok(())
    }

    /// Position of `pattern` in the priority list (0 is highest), or
    /// `None` if it is not listed.
    pub fn pattern_priority(&self, pattern: &D::Pattern) -> Option<usize> {
        let priority = self.lock().priority(pattern);
        debug!("{}: pattern={}, priority={:?}", self.name, pattern, priority);
        priority
    }

    /// Turn the device off. Pattern states are untouched, so the next
    /// refresh shows the selected pattern again.
    pub fn reset(&self) -> Result<()> {
        self.lock().device.set_pattern(None)?;
        Ok(())
    }

    /// Run one reconciliation pass now, outside the task cadence.
    pub fn refresh(&self) -> Result<()> {
        let now = self.clock.now();
        self.lock().update_indicator(now, &self.name)?;
        Ok(())
    }

    /// Periodic task body: refresh at most once per refresh interval.
    /// Device errors are logged and swallowed.
    pub fn indicator_task(&self) {
        let mut inner = self.lock();
        if !inner.task_enabled {
            return;
        }

        let now = self.clock.now();
        if now >= inner.next_task_run_time {
            inner.next_task_run_time = now + self.config.refresh_interval_secs;
            if let Err(e) = inner.update_indicator(now, &self.name) {
                warn!("{}: indicator refresh failed: {e}", self.name);
            }
        }
    }

    /// The pattern the device currently reports.
    pub fn current_pattern(&self) -> Option<D::Pattern> {
        self.lock().device.pattern().cloned()
    }

    pub fn is_task_registered(&self) -> bool {
        self.task.is_registered()
    }

    /// One line per pattern, highest priority first. Empty without a list.
    pub fn priority_table(&self) -> String {
        let inner = self.lock();
        let mut table = String::new();
        if let Some(states) = inner.priorities.as_ref() {
            table.push_str("PatternPriorities=");
            for state in states {
                let _ = write!(table, "\n\t{state}");
            }
        }
        table
    }

    pub fn log_priority_table(&self) {
        let table = self.priority_table();
        if !table.is_empty() {
            info!("{}: {}", self.name, table);
        }
    }

    fn set_task_enabled(&self, inner: &mut Inner<D>, enabled: bool) -> Result<()> {
        if enabled && !inner.task_enabled {
            self.task.register(TaskType::Output)?;
            inner.next_task_run_time = self.clock.now();
        } else if !enabled && inner.task_enabled {
            self.task.unregister();
        }
        inner.task_enabled = enabled;
        Ok(())
    }

    fn name_map(&self, list: &[D::Pattern]) -> Result<HashMap<String, D::Pattern>> {
        let mut named = HashMap::with_capacity(list.len());
        for pattern in list {
            let key = pattern.to_string();
            if named.insert(key, pattern.clone()).is_some() {
                warn!("{}: pattern name '{}' is not unique", self.name, pattern);
                return Err(Error::DuplicatePatternName);
            }
        }
        Ok(named)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: IndicatorDevice> Inner<D> {
    fn priority(&self, pattern: &D::Pattern) -> Option<usize> {
        self.priorities
            .as_ref()?
            .iter()
            .position(|s| &s.pattern == pattern)
    }

    fn state(&self, pattern: &D::Pattern) -> Option<&PatternState<D::Pattern>> {
        let index = self.priority(pattern)?;
        self.priorities.as_ref().map(|states| &states[index])
    }

    fn resolve(&self, name: &str, owner: &str) -> Result<D::Pattern> {
        self.named.get(name).cloned().ok_or_else(|| {
            warn!("{owner}: unknown pattern name '{name}'");
            Error::PatternNotFound
        })
    }

    /// Returns the pattern's priority, or `None` when it is not listed.
    fn set_state(
        &mut self,
        pattern: &D::Pattern,
        enabled: bool,
        on_duration: f64,
        off_duration: f64,
        now: f64,
    ) -> Option<usize> {
        let index = self.priority(pattern)?;
        let state = &mut self.priorities.as_mut()?[index];
        if enabled {
            state.enable(now, on_duration, off_duration);
        } else {
            state.disable();
        }
        Some(index)
    }

    fn update_indicator(&mut self, now: f64, owner: &str) -> core::result::Result<(), DeviceError> {
        let mut winner = None;

        if let Some(states) = self.priorities.as_mut() {
            for (index, state) in states.iter_mut().enumerate() {
                if !state.enabled {
                    continue;
                }

                match state.advance(now) {
                    PhaseChange::OnExpired => {
                        debug!("{owner}: pattern {} ON has expired", state.pattern);
                    }
                    PhaseChange::Finished => {
                        debug!("{owner}: pattern {} ON has expired, disabled", state.pattern);
                    }
                    PhaseChange::OffExpired => {
                        debug!("{owner}: pattern {} OFF has expired", state.pattern);
                    }
                    PhaseChange::None => {}
                }

                // A one-shot that just finished must not win.
                if winner.is_none() && state.enabled {
                    winner = Some(index);
                }
            }
        }

        let pattern = winner
            .and_then(|index| self.priorities.as_ref().map(|states| &states[index]))
            .filter(|state| state.on)
            .map(|state| &state.pattern);

        if self.device.pattern() != pattern {
            debug!("{owner}: pattern={}", OrOff(pattern));
            self.device.set_pattern(pattern)?;
        }
        Ok(())
    }
}

/// Formats an optional pattern, `off` for `None`.
struct OrOff<'a, P>(Option<&'a P>);

impl<P: fmt::Display> fmt::Display for OrOff<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => p.fmt(f),
            None => f.write_str("off"),
        }
    }
}

struct ListDisplay<'a, P>(&'a [P]);

impl<P: fmt::Display> fmt::Display for ListDisplay<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            p.fmt(f)?;
        }
        Ok(())
    }
}
