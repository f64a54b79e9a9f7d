// SPDX-License-Identifier: GPL-3.0-or-later

//! Hardware-agnostic core of the stage-B application runtime.
//!
//! Everything here operates on plain buffers, traits, and the
//! in-memory [`state::DeviceState`] — no peripheral registers are
//! touched directly, so the whole module tree runs under `cargo test`
//! on the host. `stage-b` is the thin binary that wires this to real
//! UART/ADC/PWM/GPIO/NVIC hardware.

#![cfg_attr(not(test), no_std)]

pub mod aux;
pub mod intake;
pub mod protocol;
pub mod state;
pub mod takeover;
pub mod telemetry;
pub mod txpath;

pub use intake::RingConsumer;
pub use protocol::{dispatch, Dialect, LineAccumulator, Reply, ReplyBody};
pub use state::DeviceState;
pub use takeover::{takeover_prologue, SystemReset};
