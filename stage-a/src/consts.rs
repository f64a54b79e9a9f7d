//! Flash layout and timing constants (§3, §4.5).

/// Start of the candidate application image in flash.
pub const APPLICATION_ADDRESS: u32 = 0x0800_2000;

/// Largest image the application region can hold.
pub const APPLICATION_MAX_SIZE: u32 = 0xC000;

/// Location of the [`fwcore::MetadataRecord`] written by the flashing
/// tool alongside the image.
pub const METADATA_ADDR: u32 = 0x0800_E000;

/// Milliseconds per on/off phase of the pre-handoff success blink.
pub const SUCCESS_BLINK_MS: u32 = 200;

/// Milliseconds per on/off phase of a fault pattern's fast blinks.
pub const FAULT_BLINK_FAST_MS: u32 = 200;

/// Milliseconds per phase of a fault pattern's slow (pattern 1) blink.
pub const FAULT_BLINK_SLOW_ON_MS: u32 = 2000;
pub const FAULT_BLINK_SLOW_OFF_MS: u32 = 500;

/// Pause between repeats of a numbered fault pattern.
pub const FAULT_PATTERN_PAUSE_MS: u32 = 1000;
