// SPDX-License-Identifier: GPL-3.0-or-later

//! Stage-B: the application runtime. Runs the takeover prologue, then
//! a cooperative single-threaded loop that drains the UART intake
//! ring, dispatches completed command lines, and samples telemetry on
//! a fixed cadence (§4.6, §4.9).

#![no_std]
#![no_main]

mod consts;
mod peripherals;
mod system_reset;

use defmt_rtt as _;
use panic_probe as _;

use rtcore::protocol::dispatch;
use rtcore::takeover::takeover_prologue;
use rtcore::telemetry::{apply_adc_sample, Cadence};
use rtcore::{DeviceState, LineAccumulator, RingConsumer};

use consts::{HEARTBEAT_INTERVAL_TICKS, TICK_MS};
use peripherals::{Adc, Pwm, StatusLed, Uart};
use system_reset::McuReset;

/// DMA remaining-count register read, elided like the rest of
/// peripheral bring-up; a real port reads this off the UART's DMA
/// channel.
fn dma_remaining_count() -> u16 {
    0
}

#[cortex_m_rt::entry]
fn main() -> ! {
    takeover_prologue(&mut McuReset);

    let mut uart = Uart;
    let mut pwm = Pwm;
    let mut led = StatusLed;
    let adc = Adc;

    for i in 0..3 {
        led.set(true);
        cortex_m::asm::delay(cycles_for_ms(100));
        led.set(false);
        if i < 2 {
            cortex_m::asm::delay(cycles_for_ms(100));
        }
    }

    uart.write_blocking(b"READY\r\n");

    let mut state = DeviceState::new();
    let mut ring = RingConsumer::new();
    let mut line_acc = LineAccumulator::new();
    let mut cadence = Cadence::new();
    let mut heartbeat_ticks: u32 = 0;
    let mut tick_ms: u32 = 0;

    loop {
        let pos = uart.rx_position(dma_remaining_count());
        let rx_buf = unsafe { &peripherals::UART_RX_BUFFER };

        let mut completed: heapless::Vec<heapless::String<{ rtcore::protocol::LINE_LEN }>, 4> = heapless::Vec::new();
        ring.drain(rx_buf, pos, |byte| {
            state.rx_count += 1;
            if let Some(line) = line_acc.push(byte) {
                let _ = completed.push(line);
            }
        });

        for line in &completed {
            let reply = dispatch(line.as_str(), &mut state);
            if let rtcore::protocol::ReplyBody::PwmSet { duty } = reply.body {
                pwm.set_duty(duty);
            }
            led.set(state.led_on);
            let rendered = rtcore::txpath::render(&reply);
            uart.write_blocking(rendered.as_bytes());
            if matches!(reply.body, rtcore::protocol::ReplyBody::Resetting) {
                cortex_m::asm::delay(cycles_for_ms(100));
                cortex_m::peripheral::SCB::sys_reset();
            }
        }

        if cadence.tick() {
            apply_adc_sample(&mut state, adc.read_averaged());
        }

        heartbeat_ticks += 1;
        if heartbeat_ticks >= HEARTBEAT_INTERVAL_TICKS {
            heartbeat_ticks = 0;
            let mut msg: heapless::String<64> = heapless::String::new();
            let _ = core::fmt::Write::write_fmt(
                &mut msg,
                format_args!("UP:{}s V:{:.2} PWM:{}\r\n", state.uptime_s, state.voltage, state.pwm_duty),
            );
            uart.write_blocking(msg.as_bytes());
        }

        tick_ms = tick_ms.wrapping_add(TICK_MS);
        state.uptime_s = tick_ms / 1000;
        cortex_m::asm::delay(cycles_for_ms(TICK_MS));
    }
}

fn cycles_for_ms(ms: u32) -> u32 {
    const APPROX_CORE_HZ: u32 = 8_000_000;
    (APPROX_CORE_HZ / 1000).saturating_mul(ms)
}
