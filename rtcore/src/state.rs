//! Process-wide device state (§3). Mutated only by the main loop and
//! the command dispatcher — single-threaded, so plain fields suffice;
//! `rx_count` is the one field an interrupt context would otherwise
//! race on, and in this design only the parser ever touches it.

/// Measured/derived device state. Created once at boot and never torn
/// down.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct DeviceState {
    pub temperature_c: f32,
    pub voltage: f32,
    pub adc_raw: u16,
    pub pwm_duty: u8,
    pub led_on: bool,
    pub uptime_s: u32,
    pub rx_count: u32,
}

impl DeviceState {
    /// Boot state: temperature defaults to 25.0, everything else zero.
    pub const fn new() -> Self {
        Self {
            temperature_c: 25.0,
            voltage: 0.0,
            adc_raw: 0,
            pwm_duty: 0,
            led_on: false,
            uptime_s: 0,
            rx_count: 0,
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}
