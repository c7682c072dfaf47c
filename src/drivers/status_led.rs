//! RGB status LED driver.
//!
//! Three PWM channels drive discrete R/G/B LEDs (or a common-cathode RGB
//! LED). Implements [`IndicatorDevice`] so a priority indicator can drive
//! it with [`LedPattern`]s; `None` turns all channels off.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::drivers::led_patterns::{LedPattern, Rgb};
use crate::error::DeviceError;
use crate::ports::IndicatorDevice;

pub struct RgbStatusLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: Option<LedPattern>,
}

impl<R, G, B> RgbStatusLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    /// Wrap three channels. The LED is assumed off until the first write.
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            current: None,
        }
    }

    pub fn set_colour(&mut self, (r, g, b): Rgb) -> Result<(), DeviceError> {
        write_channel(&mut self.red, r)?;
        write_channel(&mut self.green, g)?;
        write_channel(&mut self.blue, b)?;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), DeviceError> {
        self.set_pattern(None)
    }

    pub fn into_channels(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R, G, B> IndicatorDevice for RgbStatusLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    type Pattern = LedPattern;

    fn pattern(&self) -> Option<&LedPattern> {
        self.current.as_ref()
    }

    fn set_pattern(&mut self, pattern: Option<&LedPattern>) -> Result<(), DeviceError> {
        // On failure `current` keeps the old pattern so the next refresh retries.
        self.set_colour(pattern.map_or((0, 0, 0), |p| p.colour))?;
        self.current = pattern.copied();
        Ok(())
    }
}

fn write_channel<P: SetDutyCycle>(channel: &mut P, value: u8) -> Result<(), DeviceError> {
    channel
        .set_duty_cycle_fraction(u16::from(value), u16::from(u8::MAX))
        .map_err(|e| {
            warn!("Status LED: PWM write failed ({:?})", e.kind());
            DeviceError::WriteFailed
        })
}
