// SPDX-License-Identifier: GPL-3.0-or-later

//! Stage-A: reads the metadata record, verifies the candidate image
//! against it, and either hands off to the image or blinks the fault
//! pattern for the failure forever.

#![no_std]
#![no_main]

mod consts;
mod fault;
mod flash;
mod gpio;
mod handoff;

use defmt::info;
use defmt_rtt as _;
use embedded_storage::nor_flash::ReadNorFlash;
use fwcore::metadata::RECORD_SIZE;
use fwcore::{verify_record, MetadataRecord};
use panic_probe as _;

use consts::{APPLICATION_ADDRESS, APPLICATION_MAX_SIZE, METADATA_ADDR, SUCCESS_BLINK_MS};
use fault::{pattern_for, run_fault_pattern_once, Indicator};
use flash::MappedFlash;
use gpio::StatusLed;

#[cortex_m_rt::entry]
fn main() -> ! {
    let mut led = StatusLed::init();
    led.led_on();
    cortex_m::asm::delay(cycles_for_ms(100));

    blink(&mut led, 2, 100, 100);
    cortex_m::asm::delay(cycles_for_ms(500));

    match load_and_verify() {
        Ok(()) => {
            info!("image verified, handing off");
            blink(&mut led, 3, SUCCESS_BLINK_MS, SUCCESS_BLINK_MS);
            cortex_m::asm::delay(cycles_for_ms(200));
            // Safety: `load_and_verify` only reaches here after
            // `verify_record` accepted the image at `APPLICATION_ADDRESS`.
            unsafe { handoff::jump_to_app(APPLICATION_ADDRESS) }
        }
        Err(err) => {
            info!("verification failed: {}", defmt::Debug2Format(&err));
            let pattern = pattern_for(err);
            led.led_on();
            loop {
                run_fault_pattern_once(&mut led, pattern);
            }
        }
    }
}

fn load_and_verify() -> Result<(), fwcore::VerifyError> {
    let mut flash = MappedFlash;

    let mut meta_bytes = [0u8; RECORD_SIZE];
    let _ = flash.read(METADATA_ADDR, &mut meta_bytes);
    let meta = MetadataRecord::from_bytes(&meta_bytes).ok_or(fwcore::VerifyError::BadMagic)?;

    let image = unsafe {
        core::slice::from_raw_parts(APPLICATION_ADDRESS as *const u8, APPLICATION_MAX_SIZE as usize)
    };

    verify_record(&meta, image, APPLICATION_MAX_SIZE)
}

fn blink(led: &mut StatusLed, count: u32, on_ms: u32, off_ms: u32) {
    for i in 0..count {
        led.led_off();
        led.delay_ms(on_ms);
        led.led_on();
        if i + 1 < count {
            led.delay_ms(off_ms);
        }
    }
}

fn cycles_for_ms(ms: u32) -> u32 {
    // Approximate core clock for the delay loop; the application's
    // own clock init runs after handoff and is independent of this.
    const APPROX_CORE_HZ: u32 = 8_000_000;
    (APPROX_CORE_HZ / 1000).saturating_mul(ms)
}
