//! Fault indication (§4.5): a distinct blink pattern per verification
//! failure, looping forever since there is nothing safe left to jump
//! to. Pattern numbers are the ones a technician reads off the board;
//! they must stay stable across firmware revisions.

use fwcore::VerifyError;

use crate::consts::{FAULT_BLINK_FAST_MS, FAULT_BLINK_SLOW_OFF_MS, FAULT_BLINK_SLOW_ON_MS, FAULT_PATTERN_PAUSE_MS};

/// The indicator LED, abstracted so the blink sequencing can be
/// exercised on the host against a recording mock.
pub trait Indicator {
    fn led_on(&mut self);
    fn led_off(&mut self);
    fn delay_ms(&mut self, ms: u32);
}

/// Maps a verification failure to its blink pattern number.
pub fn pattern_for(err: VerifyError) -> u32 {
    match err {
        VerifyError::BadMagic => 1,
        VerifyError::BadSize => 2,
        VerifyError::BadCrc => 2,
        VerifyError::BadHash => 3,
        VerifyError::BadStackPointer => 5,
    }
}

/// Blinks `count` times, leaving the LED on between successive runs of
/// the outer fault loop (mirrors the original pre-handoff success
/// blink helper, reused here for fault patterns 3, 4, and above).
fn blink(ind: &mut impl Indicator, count: u32, on_ms: u32, off_ms: u32) {
    for i in 0..count {
        ind.led_on();
        ind.delay_ms(on_ms);
        ind.led_off();
        if i + 1 < count {
            ind.delay_ms(off_ms);
        }
    }
}

/// Runs one full cycle of the fault pattern. The caller loops this
/// forever — there is no recovery from a verification failure short
/// of a re-flash.
pub fn run_fault_pattern_once(ind: &mut impl Indicator, pattern: u32) {
    match pattern {
        1 => {
            ind.led_on();
            ind.delay_ms(FAULT_BLINK_SLOW_ON_MS);
            ind.led_off();
            ind.delay_ms(FAULT_BLINK_SLOW_OFF_MS);
        }
        2 => {
            ind.led_on();
            ind.delay_ms(1000);
            ind.led_off();
            ind.delay_ms(200);
            ind.led_on();
            ind.delay_ms(300);
            ind.led_off();
            ind.delay_ms(FAULT_BLINK_SLOW_OFF_MS);
        }
        n => {
            blink(ind, n, FAULT_BLINK_FAST_MS, FAULT_BLINK_FAST_MS);
            ind.delay_ms(FAULT_PATTERN_PAUSE_MS);
        }
    }
}
