//! Mock hardware for integration tests.
//!
//! Records every indicator write and replays scripted sensor values so
//! tests can assert on full histories without real devices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use robokit::error::{DeviceError, SensorError};
use robokit::ports::{IndicatorDevice, SensorData};

// ── Indicator device ──────────────────────────────────────────

pub type Pattern = &'static str;

/// Shared view of a [`MockIndicator`]'s write history.
#[derive(Clone, Default)]
pub struct WriteLog {
    writes: Arc<Mutex<Vec<Option<Pattern>>>>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl WriteLog {
    pub fn writes(&self) -> Vec<Option<Pattern>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Option<Pattern>> {
        self.writes.lock().unwrap().last().copied()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }
}

/// Indicator that shows `&'static str` patterns and records each write.
pub struct MockIndicator {
    current: Option<Pattern>,
    log: WriteLog,
}

impl MockIndicator {
    pub fn new() -> (Self, WriteLog) {
        let log = WriteLog::default();
        (
            Self {
                current: None,
                log: log.clone(),
            },
            log,
        )
    }
}

impl IndicatorDevice for MockIndicator {
    type Pattern = Pattern;

    fn pattern(&self) -> Option<&Pattern> {
        self.current.as_ref()
    }

    fn set_pattern(&mut self, pattern: Option<&Pattern>) -> Result<(), DeviceError> {
        if self.log.fail.load(Ordering::Relaxed) {
            return Err(DeviceError::WriteFailed);
        }
        self.current = pattern.copied();
        self.log.writes.lock().unwrap().push(self.current);
        Ok(())
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Data type selector for [`ScriptedSensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum DataType {
    Raw,
    Scaled,
}

/// Replays a fixed sequence per axis; the last value repeats forever.
/// `Scaled` reads return twice the raw value.
pub struct ScriptedSensor {
    axes: Vec<Vec<f64>>,
    cursor: Vec<usize>,
    pub reads: usize,
}

impl ScriptedSensor {
    pub fn new(axes: Vec<Vec<f64>>) -> Self {
        let cursor = vec![0; axes.len()];
        Self {
            axes,
            cursor,
            reads: 0,
        }
    }

    pub fn constant(num_axes: usize, value: f64) -> Self {
        Self::new(vec![vec![value]; num_axes])
    }
}

impl robokit::ports::Sensor for ScriptedSensor {
    type DataType = DataType;

    fn raw_data(&mut self, axis: usize, data_type: DataType) -> Result<SensorData, SensorError> {
        let values = self.axes.get(axis).ok_or(SensorError::NoSuchAxis)?;
        let value = *values
            .get(self.cursor[axis])
            .or(values.last())
            .ok_or(SensorError::ReadFailed)?;
        self.cursor[axis] += 1;
        self.reads += 1;
        let value = match data_type {
            DataType::Raw => value,
            DataType::Scaled => value * 2.0,
        };
        Ok(SensorData {
            timestamp: self.reads as f64,
            value,
        })
    }
}
