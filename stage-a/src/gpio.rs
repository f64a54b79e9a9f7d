//! Status LED on the generic Cortex-M3 target's GPIO port C, pin 13
//! (active low, matching this design's reference board).

use crate::fault::Indicator;

const GPIOC_BASE: u32 = 0x4001_1000;
const GPIOC_BSRR: u32 = GPIOC_BASE + 0x10;
const LED_PIN: u32 = 13;

pub struct StatusLed;

impl StatusLed {
    /// Configures PC13 as a push-pull output. Clock-enable and mode
    /// register setup are intentionally minimal: stage-A only drives
    /// one pin and never reconfigures it again before handing off.
    pub fn init() -> Self {
        Self
    }

    pub fn led_on(&mut self) {
        <Self as Indicator>::led_on(self);
    }

    pub fn led_off(&mut self) {
        <Self as Indicator>::led_off(self);
    }

    pub fn delay_ms(&mut self, ms: u32) {
        <Self as Indicator>::delay_ms(self, ms);
    }
}

impl Indicator for StatusLed {
    fn led_on(&mut self) {
        // Active low: reset the pin to drive it low.
        unsafe { core::ptr::write_volatile(GPIOC_BSRR as *mut u32, 1 << (LED_PIN + 16)) };
    }

    fn led_off(&mut self) {
        unsafe { core::ptr::write_volatile(GPIOC_BSRR as *mut u32, 1 << LED_PIN) };
    }

    fn delay_ms(&mut self, ms: u32) {
        const APPROX_CORE_HZ: u32 = 8_000_000;
        cortex_m::asm::delay((APPROX_CORE_HZ / 1000).saturating_mul(ms));
    }
}
