//! Concrete [`rtcore::SystemReset`] for the generic Cortex-M3 target
//! this runtime boots on.

use rtcore::SystemReset;

const RCC_BASE: u32 = 0x4002_1000;
const RCC_CR: u32 = RCC_BASE;
const RCC_CFGR: u32 = RCC_BASE + 0x04;
const RCC_CIR: u32 = RCC_BASE + 0x08;
const RCC_APB2RSTR: u32 = RCC_BASE + 0x0C;
const RCC_APB1RSTR: u32 = RCC_BASE + 0x10;
const RCC_AHBENR: u32 = RCC_BASE + 0x14;
const RCC_APB2ENR: u32 = RCC_BASE + 0x18;
const RCC_APB1ENR: u32 = RCC_BASE + 0x1C;

const SCB_AIRCR: u32 = 0xE000_ED0C;
const AIRCR_VECTKEY: u32 = 0x05FA_0000;

unsafe fn write32(addr: u32, value: u32) {
    core::ptr::write_volatile(addr as *mut u32, value);
}

pub struct McuReset;

impl SystemReset for McuReset {
    fn disable_interrupts(&mut self) {
        cortex_m::interrupt::disable();
        let systick = unsafe { &*cortex_m::peripheral::SYST::PTR };
        systick.csr.write(0);
        systick.rvr.write(0);
        systick.cvr.write(0);
        unsafe {
            let nvic = &*cortex_m::peripheral::NVIC::PTR;
            for i in 0..8 {
                nvic.icer[i].write(0xFFFF_FFFF);
                nvic.icpr[i].write(0xFFFF_FFFF);
            }
        }
    }

    fn reinit_clock_control(&mut self, cr_value: u32, ahb_enable_value: u32) {
        unsafe {
            write32(RCC_CR, cr_value);
            write32(RCC_CFGR, 0);
            write32(RCC_CIR, 0);
            write32(RCC_AHBENR, ahb_enable_value);
        }
    }

    fn reset_peripheral_buses(&mut self) {
        unsafe {
            write32(RCC_APB2RSTR, 0xFFFF_FFFF);
            write32(RCC_APB2RSTR, 0);
            write32(RCC_APB1RSTR, 0xFFFF_FFFF);
            write32(RCC_APB1RSTR, 0);
            write32(RCC_APB2ENR, 0);
            write32(RCC_APB1ENR, 0);
        }
    }

    fn reset_priority_grouping(&mut self) {
        // PRIGROUP lives in AIRCR[10:8]; writing 0 there with the
        // required VECTKEY selects group priority 0, sub-priority 0.
        unsafe { write32(SCB_AIRCR, AIRCR_VECTKEY) };
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
    }

    fn enable_interrupts(&mut self) {
        unsafe { cortex_m::interrupt::enable() };
    }
}
