// SPDX-License-Identifier: GPL-3.0-or-later

//! Handoff to the verified application image (§4.4).
//!
//! Disables interrupts and the systick, repoints the vector table at
//! the application, loads its stack pointer, and branches to its
//! reset vector. Modeled on the bootloader-to-application jump this
//! project's flash layout was distilled from, minus the
//! SoftDevice/MBR machinery that design doesn't have.

use cortex_m::peripheral::{NVIC, SCB};

/// Jumps to the application at `app_base`. Never returns.
///
/// # Safety
///
/// `app_base` must point at a flash region verified by
/// [`fwcore::verify_record`] to contain a valid vector table: word 0
/// is the initial stack pointer, word 1 is the reset vector. Calling
/// this against unverified memory can jump into arbitrary code with
/// an arbitrary stack pointer.
pub unsafe fn jump_to_app(app_base: u32) -> ! {
    cortex_m::interrupt::disable();

    let systick = &*cortex_m::peripheral::SYST::PTR;
    systick.csr.write(0);
    systick.rvr.write(0);
    systick.cvr.write(0);

    for i in 0..8u8 {
        (*NVIC::PTR).icer[i as usize].write(0xFFFF_FFFF);
        (*NVIC::PTR).icpr[i as usize].write(0xFFFF_FFFF);
    }

    (*SCB::PTR).vtor.write(app_base);
    cortex_m::asm::dsb();
    cortex_m::asm::isb();

    let app_stack = core::ptr::read_volatile(app_base as *const u32);
    let app_reset = core::ptr::read_volatile((app_base + 4) as *const u32);

    core::arch::asm!(
        "msr MSP, {sp}",
        "dsb",
        "isb",
        "mov lr, {new_lr}",
        "bx {reset}",
        sp = in(reg) app_stack,
        new_lr = in(reg) 0xFFFF_FFFFu32,
        reset = in(reg) app_reset,
        options(noreturn),
    );
}
