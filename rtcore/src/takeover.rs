//! Stage-B takeover prologue (§4.6): the sequence the application runs
//! immediately after stage-A hands off control, before the main loop
//! starts. It re-initializes the few peripheral registers stage-A's
//! verifier and any residual stage-A state could have left dirty.
//!
//! Stage-A's handoff (§4.4) already points VTOR at this image before
//! branching here, and never touches clock/peripheral registers by
//! design (§4.4, §9) — this prologue is the other half of that split,
//! so it does not re-touch VTOR; it only re-touches what stage-A's
//! handoff deliberately leaves alone.
//!
//! The actual register pokes are hardware, so they live behind
//! [`SystemReset`]; this module only fixes the *order* and *values*,
//! which is exercised on the host with a mock implementation.

/// The peripheral operations the takeover prologue performs, in order.
/// A concrete binary implements this against real NVIC/SCB/RCC
/// registers; tests implement it against a recording mock.
pub trait SystemReset {
    /// Masks all maskable interrupts at the NVIC.
    fn disable_interrupts(&mut self);

    /// §4.6 step 4: resets the clock-control, clock-config, and
    /// clock-interrupt registers to their post-reset values, and sets
    /// the AHB clock-enable register to its reset default.
    fn reinit_clock_control(&mut self, cr_value: u32, ahb_enable_value: u32);

    /// §4.6 step 5: pulses the APB peripheral-reset registers (all
    /// ones, then zero) on both buses, then clears their
    /// peripheral-enable registers to 0.
    fn reset_peripheral_buses(&mut self);

    /// §4.6 step 6: resets the interrupt-priority grouping (NVIC/SCB
    /// `AIRCR` `PRIGROUP` field) to 0, discarding whatever grouping
    /// stage-A's verifier (or the silicon's power-on default) left
    /// configured.
    fn reset_priority_grouping(&mut self);

    /// Re-enables interrupts once the above is complete.
    fn enable_interrupts(&mut self);
}

/// Clock control register value the application expects at boot.
pub const CLOCK_CONTROL_RESET_VALUE: u32 = 0x0000_0083;

/// AHB clock-enable register value the application expects at boot.
pub const AHB_ENABLE_RESET_VALUE: u32 = 0x0000_0014;

/// Runs the takeover prologue against `reset`: mask interrupts,
/// rewrite the clock-control/AHB-enable registers to their expected
/// reset values, pulse the APB buses, reset the priority grouping,
/// then unmask interrupts. Order matters — interrupts stay masked for
/// the whole sequence so a stale ISR can't observe the
/// half-reinitialized peripheral state.
pub fn takeover_prologue(reset: &mut impl SystemReset) {
    reset.disable_interrupts();
    reset.reinit_clock_control(CLOCK_CONTROL_RESET_VALUE, AHB_ENABLE_RESET_VALUE);
    reset.reset_peripheral_buses();
    reset.reset_priority_grouping();
    reset.enable_interrupts();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    enum Call {
        #[default]
        None,
        DisableInterrupts,
        ReinitClockControl(u32, u32),
        ResetPeripheralBuses,
        ResetPriorityGrouping,
        EnableInterrupts,
    }

    #[derive(Default)]
    struct MockReset {
        calls: heapless::Vec<Call, 8>,
    }

    impl SystemReset for MockReset {
        fn disable_interrupts(&mut self) {
            self.calls.push(Call::DisableInterrupts).unwrap();
        }
        fn reinit_clock_control(&mut self, cr_value: u32, ahb_enable_value: u32) {
            self.calls.push(Call::ReinitClockControl(cr_value, ahb_enable_value)).unwrap();
        }
        fn reset_peripheral_buses(&mut self) {
            self.calls.push(Call::ResetPeripheralBuses).unwrap();
        }
        fn reset_priority_grouping(&mut self) {
            self.calls.push(Call::ResetPriorityGrouping).unwrap();
        }
        fn enable_interrupts(&mut self) {
            self.calls.push(Call::EnableInterrupts).unwrap();
        }
    }

    #[test]
    fn prologue_runs_steps_in_order_with_expected_values() {
        let mut mock = MockReset::default();
        takeover_prologue(&mut mock);
        assert_eq!(
            &mock.calls[..],
            &[
                Call::DisableInterrupts,
                Call::ReinitClockControl(CLOCK_CONTROL_RESET_VALUE, AHB_ENABLE_RESET_VALUE),
                Call::ResetPeripheralBuses,
                Call::ResetPriorityGrouping,
                Call::EnableInterrupts,
            ]
        );
    }

    #[test]
    fn interrupts_stay_masked_for_the_whole_reinit() {
        let mut mock = MockReset::default();
        takeover_prologue(&mut mock);
        let disable_idx = mock.calls.iter().position(|c| *c == Call::DisableInterrupts).unwrap();
        let enable_idx = mock.calls.iter().position(|c| *c == Call::EnableInterrupts).unwrap();
        assert!(disable_idx < enable_idx);
        assert_eq!(disable_idx, 0);
        assert_eq!(enable_idx, mock.calls.len() - 1);
    }

    #[test]
    fn clock_control_precedes_peripheral_bus_reset() {
        let mut mock = MockReset::default();
        takeover_prologue(&mut mock);
        let clock_idx = mock.calls.iter().position(|c| matches!(c, Call::ReinitClockControl(..))).unwrap();
        let buses_idx = mock.calls.iter().position(|c| *c == Call::ResetPeripheralBuses).unwrap();
        assert!(clock_idx < buses_idx);
    }
}
