//! Telemetry sampling cadence and ADC-to-engineering-unit conversion
//! (§4.9). The main loop owns the timer/ADC peripherals; this module
//! only decides *when* a sample is due and *how* a raw reading maps
//! to volts/degrees Celsius.

use crate::state::DeviceState;

/// Sampling period, in main-loop ticks (§4.9 point 2: sampled every
/// 100 ms). The caller's tick period times this constant must equal
/// 100 ms — `stage-b::consts::TICK_MS` is 10 ms, so this is 10 ticks.
pub const SAMPLE_INTERVAL_TICKS: u32 = 10;

/// ADC full-scale code (12-bit).
const ADC_MAX: u16 = 4095;

/// Reference voltage corresponding to `ADC_MAX`.
const VREF: f32 = 3.3;

/// Counts elapsed ticks and reports when a new ADC sample is due.
#[derive(Debug, Default)]
pub struct Cadence {
    ticks: u32,
}

impl Cadence {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Advances by one tick; returns `true` on ticks where a sample
    /// should be taken (every [`SAMPLE_INTERVAL_TICKS`], starting with
    /// the first tick after construction).
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= SAMPLE_INTERVAL_TICKS {
            self.ticks = 0;
            true
        } else {
            false
        }
    }
}

/// Converts a raw 12-bit ADC code to volts.
pub fn adc_to_volts(raw: u16) -> f32 {
    (raw.min(ADC_MAX) as f32) * VREF / (ADC_MAX as f32)
}

/// Folds one new raw ADC reading into `state`: updates `adc_raw` and
/// the derived `voltage`. Temperature is left to the caller's own
/// sensor path (§4.9 treats them as independent channels); this
/// function only owns the ADC/voltage pair.
pub fn apply_adc_sample(state: &mut DeviceState, raw: u16) {
    state.adc_raw = raw;
    state.voltage = adc_to_volts(raw);
}
