//! Periodic task manager.
//!
//! Components create a [`TaskObject`] with a callback, then register it
//! under a [`TaskType`] while they need periodic service. The robot's
//! main loop calls [`TaskManager::run_tasks`] once per category per loop
//! iteration; every registered callback of that category runs once.
//!
//! ```text
//!   main loop ──▶ run_tasks(Input)  ──▶ sensor tasks
//!             ──▶ robot logic
//!             ──▶ run_tasks(Output) ──▶ indicator / actuator tasks
//! ```
//!
//! No manager lock is held while a callback runs, so callbacks may
//! register or unregister tasks themselves.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::error::{Error, Result};

/// Maximum number of concurrently registered tasks (stack-allocated).
pub const MAX_TASKS: usize = 16;

/// Category a task is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Runs before robot logic; reads sensors.
    Input,
    /// Runs after robot logic; drives actuators and indicators.
    Output,
}

type Callback = Arc<dyn Fn(TaskType) + Send + Sync>;

/// Internal bookkeeping for a registered task.
struct TaskEntry {
    id: u32,
    name: Arc<str>,
    task_type: TaskType,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    tasks: heapless::Vec<TaskEntry, MAX_TASKS>,
}

/// Shared handle to the task registry. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct TaskManager {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU32>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unregistered task. Nothing runs until
    /// [`TaskObject::register`] is called.
    pub fn create_task<F>(&self, name: impl Into<Arc<str>>, callback: F) -> TaskObject
    where
        F: Fn(TaskType) + Send + Sync + 'static,
    {
        TaskObject {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            callback: Arc::new(callback),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Run every task registered under `task_type` once, in registration order.
    pub fn run_tasks(&self, task_type: TaskType) {
        let due: heapless::Vec<Callback, MAX_TASKS> = lock(&self.registry)
            .tasks
            .iter()
            .filter(|t| t.task_type == task_type)
            .map(|t| Arc::clone(&t.callback))
            .collect();

        for callback in due {
            callback(task_type);
        }
    }

    /// Number of currently registered tasks.
    pub fn registered_count(&self) -> usize {
        lock(&self.registry).tasks.len()
    }

    /// Names of the tasks registered under `task_type`.
    pub fn registered_names(&self, task_type: TaskType) -> Vec<Arc<str>> {
        lock(&self.registry)
            .tasks
            .iter()
            .filter(|t| t.task_type == task_type)
            .map(|t| Arc::clone(&t.name))
            .collect()
    }
}

/// A task that can be registered with, and removed from, its [`TaskManager`].
///
/// Dropping the object unregisters it.
pub struct TaskObject {
    id: u32,
    name: Arc<str>,
    callback: Callback,
    registry: Arc<Mutex<Registry>>,
}

impl TaskObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register the task under `task_type`. Registering an already
    /// registered task moves it to the new category.
    pub fn register(&self, task_type: TaskType) -> Result<()> {
        let mut registry = lock(&self.registry);
        if let Some(entry) = registry.tasks.iter_mut().find(|t| t.id == self.id) {
            if entry.task_type != task_type {
                debug!("Task '{}': moved to {:?}", self.name, task_type);
                entry.task_type = task_type;
            }
            return Ok(());
        }

        registry
            .tasks
            .push(TaskEntry {
                id: self.id,
                name: Arc::clone(&self.name),
                task_type,
                callback: Arc::clone(&self.callback),
            })
            .map_err(|_| Error::TaskSlotsFull)?;
        info!("Task '{}': registered as {:?}", self.name, task_type);
        Ok(())
    }

    /// Remove the task from the registry. No-op when not registered.
    pub fn unregister(&self) {
        let mut registry = lock(&self.registry);
        if let Some(pos) = registry.tasks.iter().position(|t| t.id == self.id) {
            registry.tasks.remove(pos);
            info!("Task '{}': unregistered", self.name);
        }
    }

    pub fn is_registered(&self) -> bool {
        lock(&self.registry).tasks.iter().any(|t| t.id == self.id)
    }
}

impl Drop for TaskObject {
    fn drop(&mut self) {
        self.unregister();
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
