//! Line accumulation, dialect detection, and command dispatch (§4.8).
//!
//! The JSON dialect is deliberately not a general parser: it is a
//! targeted substring scanner, matching the original firmware's
//! `extractJsonString`/`extractJsonInt` and the design notes' "no
//! allocator, no recursive descent" constraint.

use heapless::String;

use crate::state::DeviceState;

/// Line buffer capacity (§3): overflow beyond this discards the
/// partial line.
pub const LINE_LEN: usize = 512;

/// Maximum characters captured for a JSON `command` value (§4.8).
const MAX_COMMAND_LEN: usize = 31;

/// Maximum characters echoed back for an unrecognized command.
const MAX_ECHO_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Dialect {
    Text,
    Json,
}

/// The body of a reply, dialect-agnostic; [`crate::txpath`] renders it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ReplyBody {
    Pong,
    Status {
        led_on: bool,
        uptime_s: u32,
        voltage: f32,
        pwm_duty: u8,
    },
    Temperature(f32),
    Voltage {
        voltage: f32,
        adc_raw: u16,
    },
    LedSet {
        on: bool,
    },
    PwmSet {
        duty: u8,
    },
    PwmOutOfRange,
    Resetting,
    InvalidJson,
    MissingParam(&'static str),
    Unknown(String<MAX_ECHO_LEN>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Reply {
    pub dialect: Dialect,
    pub body: ReplyBody,
}

/// Accumulates bytes into line frames, completed by `\n` or `\r` (a
/// `\r\n` pair completes on the `\r`; the following `\n` begins and
/// immediately ends an empty frame, which is ignored).
///
/// States: accumulating, overflowed (transient — discards bytes,
/// including the terminator that follows, until the line buffer is
/// fresh again), dispatching (modeled by `push` returning `Some`).
pub struct LineAccumulator {
    buf: [u8; LINE_LEN],
    len: usize,
    overflowed: bool,
}

impl LineAccumulator {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_LEN],
            len: 0,
            overflowed: false,
        }
    }

    /// Feeds one byte. Returns the trimmed line when a terminator
    /// completes a non-empty, non-overflowed frame.
    pub fn push(&mut self, byte: u8) -> Option<String<LINE_LEN>> {
        if byte == b'\n' || byte == b'\r' {
            let was_overflowed = self.overflowed;
            self.overflowed = false;
            let len = self.len;
            self.len = 0;
            if was_overflowed || len == 0 {
                return None;
            }
            let line = trim(&self.buf[..len]);
            if line.is_empty() {
                return None;
            }
            let mut out = String::new();
            // `line` is a sub-slice of a line-length buffer, so it
            // always fits; this cannot fail.
            let _ = out.push_str(core::str::from_utf8(line).unwrap_or(""));
            return Some(out);
        }

        if self.overflowed {
            return None;
        }
        if self.len < LINE_LEN {
            self.buf[self.len] = byte;
            self.len += 1;
        } else {
            self.len = 0;
            self.overflowed = true;
        }
        None
    }
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading spaces and trailing `\n`, `\r`, ' ' are trimmed (the
/// original firmware's `trim()`; tabs are left alone).
fn trim(mut bytes: &[u8]) -> &[u8] {
    while let Some((b' ', rest)) = bytes.split_first() {
        bytes = rest;
    }
    while let Some((&last, rest)) = bytes.split_last() {
        if last == b'\n' || last == b'\r' || last == b' ' {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

fn is_json_command(line: &str) -> bool {
    line.as_bytes().first() == Some(&b'{') && line.contains("\"command\"")
}

/// Scans for `"command":"`, capturing up to the next `"` (max
/// [`MAX_COMMAND_LEN`] characters).
fn extract_command(line: &str) -> Option<String<MAX_COMMAND_LEN>> {
    let marker = "\"command\":\"";
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find('"')?;
    let mut out = String::new();
    for ch in rest[..end].chars().take(MAX_COMMAND_LEN) {
        if out.push(ch).is_err() {
            break;
        }
    }
    Some(out)
}

/// Scans for `"params"`, the `{` that follows it, then `"key":`,
/// skips spaces/tabs, and parses a decimal integer (optional leading
/// `-`). A non-digit, non-`-` leading character is missing/invalid.
fn extract_param_int(line: &str, key: &str) -> Option<i64> {
    let params_at = line.find("\"params\"")?;
    let obj_start = params_at + line[params_at..].find('{')?;
    let search = &line[obj_start..];

    let mut needle = String::<40>::new();
    let _ = needle.push('"');
    let _ = needle.push_str(key);
    let _ = needle.push_str("\":");

    let key_at = search.find(needle.as_str())?;
    let after_key = &search[key_at + needle.len()..];
    let bytes = after_key.as_bytes();

    let mut i = 0;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }
    let first = bytes[i];
    if !first.is_ascii_digit() && first != b'-' {
        return None;
    }

    let neg = first == b'-';
    if neg {
        i += 1;
    }
    let digit_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mag: i64 = if digit_start == i {
        0
    } else {
        core::str::from_utf8(&bytes[digit_start..i]).ok()?.parse().unwrap_or(0)
    };
    Some(if neg { -mag } else { mag })
}

/// `atoi`-equivalent used by the text dialect's `KEY=VALUE` forms:
/// always succeeds, defaulting to 0 when no digits are found.
fn atoi_like(s: &str) -> i64 {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    let neg = i < bytes.len() && bytes[i] == b'-';
    let plus = i < bytes.len() && bytes[i] == b'+';
    if neg || plus {
        i += 1;
    }
    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mag: i64 = if start == i {
        0
    } else {
        core::str::from_utf8(&bytes[start..i]).ok().and_then(|d| d.parse().ok()).unwrap_or(0)
    };
    if neg {
        -mag
    } else {
        mag
    }
}

fn unknown(echo: &str) -> ReplyBody {
    let mut out = String::new();
    for ch in echo.chars().take(MAX_ECHO_LEN) {
        if out.push(ch).is_err() {
            break;
        }
    }
    ReplyBody::Unknown(out)
}

/// Parses and applies one completed, non-empty line against `state`,
/// returning the reply to send. This is the only place `DeviceState`
/// is mutated outside of telemetry sampling.
pub fn dispatch(line: &str, state: &mut DeviceState) -> Reply {
    if is_json_command(line) {
        return dispatch_json(line, state);
    }
    dispatch_text(line, state)
}

fn dispatch_text(line: &str, state: &mut DeviceState) -> Reply {
    let body = if line == "PING" {
        ReplyBody::Pong
    } else if line == "STATUS" {
        ReplyBody::Status {
            led_on: state.led_on,
            uptime_s: state.uptime_s,
            voltage: state.voltage,
            pwm_duty: state.pwm_duty,
        }
    } else if line == "TEMP" {
        ReplyBody::Temperature(state.temperature_c)
    } else if line == "VOLTAGE" {
        ReplyBody::Voltage {
            voltage: state.voltage,
            adc_raw: state.adc_raw,
        }
    } else if let Some(rest) = line.strip_prefix("LED=") {
        let on = atoi_like(rest) == 1;
        state.led_on = on;
        ReplyBody::LedSet { on }
    } else if let Some(rest) = line.strip_prefix("PWM=") {
        let val = atoi_like(rest);
        if (0..=100).contains(&val) {
            state.pwm_duty = val as u8;
            ReplyBody::PwmSet { duty: val as u8 }
        } else {
            ReplyBody::PwmOutOfRange
        }
    } else if line == "RESET" {
        ReplyBody::Resetting
    } else {
        unknown(line)
    };
    Reply { dialect: Dialect::Text, body }
}

fn dispatch_json(line: &str, state: &mut DeviceState) -> Reply {
    let Some(command) = extract_command(line) else {
        return Reply {
            dialect: Dialect::Json,
            body: ReplyBody::InvalidJson,
        };
    };

    let body = match command.as_str() {
        "SET_LED" => match extract_param_int(line, "state") {
            Some(state_val) => {
                let on = state_val == 1;
                state.led_on = on;
                ReplyBody::LedSet { on }
            }
            None => ReplyBody::MissingParam("state"),
        },
        "SET_PWM" => match extract_param_int(line, "duty") {
            Some(duty) if (0..=100).contains(&duty) => {
                state.pwm_duty = duty as u8;
                ReplyBody::PwmSet { duty: duty as u8 }
            }
            Some(_) => ReplyBody::PwmOutOfRange,
            None => ReplyBody::MissingParam("duty"),
        },
        "STATUS" => ReplyBody::Status {
            led_on: state.led_on,
            uptime_s: state.uptime_s,
            voltage: state.voltage,
            pwm_duty: state.pwm_duty,
        },
        "GET_TEMP" => ReplyBody::Temperature(state.temperature_c),
        "GET_VOLTAGE" => ReplyBody::Voltage {
            voltage: state.voltage,
            adc_raw: state.adc_raw,
        },
        "RESET" => ReplyBody::Resetting,
        other => unknown(other),
    };
    Reply { dialect: Dialect::Json, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(acc: &mut LineAccumulator, bytes: &[u8]) -> heapless::Vec<String<LINE_LEN>, 8> {
        let mut out = heapless::Vec::new();
        for &b in bytes {
            if let Some(line) = acc.push(b) {
                out.push(line).unwrap();
            }
        }
        out
    }

    #[test]
    fn every_terminated_nonempty_segment_dispatches_exactly_once() {
        let mut acc = LineAccumulator::new();
        let lines = feed(&mut acc, b"PING\r\nSTATUS\nTEMP\r");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_str(), "PING");
        assert_eq!(lines[1].as_str(), "STATUS");
        assert_eq!(lines[2].as_str(), "TEMP");
    }

    #[test]
    fn crlf_is_a_single_terminator() {
        let mut acc = LineAccumulator::new();
        let lines = feed(&mut acc, b"PING\r\n");
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn empty_frames_are_ignored() {
        let mut acc = LineAccumulator::new();
        let lines = feed(&mut acc, b"\r\n\n\r");
        assert!(lines.is_empty());
    }

    #[test]
    fn leading_and_trailing_whitespace_is_trimmed() {
        let mut acc = LineAccumulator::new();
        let lines = feed(&mut acc, b"   PING   \r\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "PING");
    }

    #[test]
    fn overflow_discards_until_next_terminator() {
        let mut acc = LineAccumulator::new();
        let mut overflow_fill = heapless::Vec::<u8, 600>::new();
        overflow_fill.extend_from_slice(&[b'X'; LINE_LEN]).unwrap();
        overflow_fill.extend_from_slice(b"garbage\r").unwrap();
        overflow_fill.extend_from_slice(b"PING\r\n").unwrap();
        let lines = feed(&mut acc, &overflow_fill);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "PING");
    }

    #[test]
    fn text_ping() {
        let mut state = DeviceState::new();
        let reply = dispatch("PING", &mut state);
        assert_eq!(reply.dialect, Dialect::Text);
        assert_eq!(reply.body, ReplyBody::Pong);
    }

    #[test]
    fn text_set_pwm_updates_state_idempotently() {
        let mut state = DeviceState::new();
        let r1 = dispatch("PWM=42", &mut state);
        let r2 = dispatch("PWM=42", &mut state);
        assert_eq!(r1.body, ReplyBody::PwmSet { duty: 42 });
        assert_eq!(r2.body, ReplyBody::PwmSet { duty: 42 });
        assert_eq!(state.pwm_duty, 42);
    }

    #[test]
    fn text_pwm_out_of_range_leaves_state_unchanged() {
        let mut state = DeviceState::new();
        state.pwm_duty = 10;
        let reply = dispatch("PWM=150", &mut state);
        assert_eq!(reply.body, ReplyBody::PwmOutOfRange);
        assert_eq!(state.pwm_duty, 10);
    }

    #[test]
    fn text_led_nonzero_other_than_one_means_off() {
        let mut state = DeviceState::new();
        dispatch("LED=1", &mut state);
        assert!(state.led_on);
        dispatch("LED=9", &mut state);
        assert!(!state.led_on);
    }

    #[test]
    fn text_unknown_command_echoes_offender() {
        let mut state = DeviceState::new();
        let reply = dispatch("FROBNICATE", &mut state);
        assert_eq!(reply.body, ReplyBody::Unknown(String::try_from("FROBNICATE").unwrap()));
    }

    #[test]
    fn json_set_pwm() {
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"command":"SET_PWM","params":{"duty":42}}"#, &mut state);
        assert_eq!(reply.dialect, Dialect::Json);
        assert_eq!(reply.body, ReplyBody::PwmSet { duty: 42 });
        assert_eq!(state.pwm_duty, 42);
    }

    #[test]
    fn json_set_pwm_out_of_range() {
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"command":"SET_PWM","params":{"duty":150}}"#, &mut state);
        assert_eq!(reply.body, ReplyBody::PwmOutOfRange);
        assert_eq!(state.pwm_duty, 0);
    }

    #[test]
    fn json_missing_param() {
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"command":"SET_LED","params":{}}"#, &mut state);
        assert_eq!(reply.body, ReplyBody::MissingParam("state"));
    }

    #[test]
    fn json_negative_duty_is_parsed_then_rejected_by_range() {
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"command":"SET_PWM","params":{"duty":-1}}"#, &mut state);
        assert_eq!(reply.body, ReplyBody::PwmOutOfRange);
    }

    #[test]
    fn json_without_command_key_is_not_json_dialect() {
        // Starts with '{' but has no "command" key: falls through to
        // the text dialect and is treated as an unrecognized command.
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"foo":"bar"}"#, &mut state);
        assert_eq!(reply.dialect, Dialect::Text);
    }

    #[test]
    fn json_unknown_command() {
        let mut state = DeviceState::new();
        let reply = dispatch(r#"{"command":"NOPE"}"#, &mut state);
        assert_eq!(reply.body, ReplyBody::Unknown(String::try_from("NOPE").unwrap()));
    }
}
