//! Named RGB patterns for the status LED.
//!
//! A pattern is a colour with a name; the name is what priority lists are
//! looked up by, so it must be unique within a list. Blinking and
//! one-shot timing come from the priority indicator, not the pattern.
//!
//! ## Suggested priority order (highest first)
//!
//! 1. **Fault**: red
//! 2. **Warning**: yellow
//! 3. **Target locked**: green
//! 4. **Intake running**: blue
//! 5. **Idle**: teal

use core::fmt;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedPattern {
    pub name: &'static str,
    pub colour: Rgb,
}

impl LedPattern {
    pub const fn new(name: &'static str, colour: Rgb) -> Self {
        Self { name, colour }
    }
}

impl fmt::Display for LedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ── Well-known colour constants ─────────────────────────────

pub const COLOUR_FAULT: Rgb = (255, 0, 0); // Red
pub const COLOUR_WARNING: Rgb = (255, 200, 0); // Yellow
pub const COLOUR_TARGET_LOCKED: Rgb = (0, 255, 50); // Green
pub const COLOUR_INTAKE: Rgb = (0, 100, 255); // Blue
pub const COLOUR_IDLE: Rgb = (0, 180, 148); // Teal

pub const FAULT: LedPattern = LedPattern::new("Fault", COLOUR_FAULT);
pub const WARNING: LedPattern = LedPattern::new("Warning", COLOUR_WARNING);
pub const TARGET_LOCKED: LedPattern = LedPattern::new("TargetLocked", COLOUR_TARGET_LOCKED);
pub const INTAKE: LedPattern = LedPattern::new("Intake", COLOUR_INTAKE);
pub const IDLE: LedPattern = LedPattern::new("Idle", COLOUR_IDLE);

/// The well-known patterns in suggested priority order.
pub const DEFAULT_PRIORITIES: [LedPattern; 5] = [FAULT, WARNING, TARGET_LOCKED, INTAKE, IDLE];
