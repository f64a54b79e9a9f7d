//! Raw register handles for the generic Cortex-M3 target's UART, PWM
//! timer, ADC, and status LED. Peripheral/clock bring-up (the
//! HAL_*_Init equivalents) is out of scope; these wrappers only cover
//! the register pokes the main loop actually performs at runtime.

const USART2_BASE: u32 = 0x4000_4400;
const USART2_SR: u32 = USART2_BASE;
const USART2_DR: u32 = USART2_BASE + 0x04;

const GPIOC_BASE: u32 = 0x4001_1000;
const GPIOC_BSRR: u32 = GPIOC_BASE + 0x10;
const LED_PIN: u32 = 13;

const TIM2_BASE: u32 = 0x4000_0000;
const TIM2_CCR2: u32 = TIM2_BASE + 0x38;

const ADC_BUFFER_LEN: usize = 16;

unsafe fn read32(addr: u32) -> u32 {
    core::ptr::read_volatile(addr as *const u32)
}

unsafe fn write32(addr: u32, value: u32) {
    core::ptr::write_volatile(addr as *mut u32, value);
}

/// UART RX DMA target buffer; written by hardware, drained by
/// [`rtcore::RingConsumer`].
pub static mut UART_RX_BUFFER: [u8; rtcore::intake::BUF_LEN] = [0u8; rtcore::intake::BUF_LEN];

/// ADC DMA target buffer; written by hardware, averaged by the
/// telemetry cadence.
pub static mut ADC_BUFFER: [u16; ADC_BUFFER_LEN] = [0u16; ADC_BUFFER_LEN];

pub struct Uart;

impl Uart {
    /// Blocking transmit: one byte at a time, polling TXE. Line speed
    /// is high enough relative to loop cadence that this never stalls
    /// the next tick by more than one reply's worth of bytes.
    pub fn write_blocking(&mut self, bytes: &[u8]) {
        const TXE: u32 = 1 << 7;
        for &b in bytes {
            unsafe {
                while read32(USART2_SR) & TXE == 0 {}
                write32(USART2_DR, b as u32);
            }
        }
    }

    /// Returns the DMA controller's current write position into
    /// [`UART_RX_BUFFER`], the form [`rtcore::RingConsumer::drain`]
    /// expects (buffer length minus remaining-count register; that
    /// remaining-count read is itself hardware-specific and is the
    /// only part elided here).
    pub fn rx_position(&self, dma_remaining_count: u16) -> usize {
        rtcore::intake::BUF_LEN - dma_remaining_count as usize
    }
}

pub struct Pwm;

impl Pwm {
    /// `duty` is 0..=100; the capture/compare register takes
    /// 0..=999 matching this timer's configured auto-reload period.
    pub fn set_duty(&mut self, duty: u8) {
        let duty = duty.min(100);
        let pulse = (duty as u32 * 999) / 100;
        unsafe { write32(TIM2_CCR2, pulse) };
    }
}

pub struct StatusLed;

impl StatusLed {
    pub fn set(&mut self, on: bool) {
        let bit = if on { LED_PIN + 16 } else { LED_PIN };
        unsafe { write32(GPIOC_BSRR, 1 << bit) };
    }
}

pub struct Adc;

impl Adc {
    /// Averages the DMA-filled ADC buffer, matching `updateADC`'s
    /// plain sum-then-divide.
    pub fn read_averaged(&self) -> u16 {
        let buf = unsafe { &ADC_BUFFER };
        let sum: u32 = buf.iter().map(|&v| v as u32).sum();
        (sum / buf.len() as u32) as u16
    }
}
