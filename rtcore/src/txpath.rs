//! Renders a [`Reply`] into the wire bytes for its dialect (§4.8).
//!
//! Output is built into a fixed-capacity buffer; a reply that would
//! not fit is truncated rather than panicking or blocking forever —
//! the peer sees a short reply instead of a stalled line.

use core::fmt::Write as _;

use heapless::String;

use crate::protocol::{Dialect, Reply, ReplyBody};

/// Matches the accumulator's line length; replies are never longer
/// than a command line in practice, but truncation still applies.
pub const REPLY_LEN: usize = 512;

/// Renders `reply` into an owned, newline-terminated string, silently
/// truncating output that exceeds [`REPLY_LEN`].
pub fn render(reply: &Reply) -> String<REPLY_LEN> {
    let mut out = String::new();
    match reply.dialect {
        Dialect::Text => render_text(reply, &mut out),
        Dialect::Json => render_json(reply, &mut out),
    }
    out
}

fn render_text(reply: &Reply, out: &mut String<REPLY_LEN>) {
    let _ = match &reply.body {
        ReplyBody::Pong => write!(out, "PONG\r\n"),
        ReplyBody::Status { led_on, uptime_s, voltage, pwm_duty } => write!(
            out,
            "STATUS: OK | LED:{} | UP:{}s | V:{:.2}V | PWM:{}%\r\n",
            if *led_on { "ON" } else { "OFF" },
            uptime_s,
            voltage,
            pwm_duty
        ),
        ReplyBody::Temperature(t) => write!(out, "TEMP: {:.1}\u{b0}C\r\n", t),
        ReplyBody::Voltage { voltage, adc_raw } => write!(out, "VOLTAGE: {:.2}V (ADC:{})\r\n", voltage, adc_raw),
        ReplyBody::LedSet { on } => write!(out, "OK: LED {}\r\n", if *on { "ON" } else { "OFF" }),
        ReplyBody::PwmSet { duty } => write!(out, "OK: PWM={}%\r\n", duty),
        ReplyBody::PwmOutOfRange => write!(out, "ERROR: PWM 0-100\r\n"),
        ReplyBody::Resetting => write!(out, "RESETTING...\r\n"),
        ReplyBody::InvalidJson => write!(out, "ERROR: Invalid JSON\r\n"),
        ReplyBody::MissingParam(name) => write!(out, "ERROR: Missing {}\r\n", name),
        ReplyBody::Unknown(cmd) => write!(out, "ERROR: Unknown '{}'\r\n", cmd.as_str()),
    };
}

fn render_json(reply: &Reply, out: &mut String<REPLY_LEN>) {
    let _ = match &reply.body {
        ReplyBody::Pong => write!(out, "{{\"status\":\"ok\",\"message\":\"pong\"}}\r\n"),
        ReplyBody::Status { led_on, uptime_s, voltage, pwm_duty } => write!(
            out,
            "{{\"status\":\"ok\",\"led\":{},\"uptime\":{},\"voltage\":{:.2},\"pwm\":{}}}\r\n",
            led_on, uptime_s, voltage, pwm_duty
        ),
        ReplyBody::Temperature(t) => write!(out, "{{\"status\":\"ok\",\"temperature\":{:.1}}}\r\n", t),
        ReplyBody::Voltage { voltage, adc_raw } => write!(
            out,
            "{{\"status\":\"ok\",\"voltage\":{:.2},\"adc_raw\":{}}}\r\n",
            voltage, adc_raw
        ),
        ReplyBody::LedSet { on } => write!(
            out,
            "{{\"status\":\"ok\",\"message\":\"LED {}\"}}\r\n",
            if *on { "ON" } else { "OFF" }
        ),
        ReplyBody::PwmSet { duty } => write!(out, "{{\"status\":\"ok\",\"message\":\"PWM={}%\"}}\r\n", duty),
        ReplyBody::PwmOutOfRange => write!(out, "{{\"status\":\"error\",\"message\":\"PWM 0-100\"}}\r\n"),
        ReplyBody::Resetting => write!(out, "{{\"status\":\"ok\",\"message\":\"Resetting...\"}}\r\n"),
        ReplyBody::InvalidJson => write!(out, "{{\"status\":\"error\",\"message\":\"Invalid JSON\"}}\r\n"),
        ReplyBody::MissingParam(name) => {
            write!(out, "{{\"status\":\"error\",\"message\":\"Missing {}\"}}\r\n", name)
        }
        ReplyBody::Unknown(cmd) => {
            write!(out, "{{\"status\":\"error\",\"message\":\"Unknown: {}\"}}\r\n", cmd.as_str())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeviceState;

    #[test]
    fn json_pwm_set_matches_expected_reply() {
        let mut state = DeviceState::new();
        let reply = crate::protocol::dispatch(r#"{"command":"SET_PWM","params":{"duty":42}}"#, &mut state);
        assert_eq!(render(&reply).as_str(), "{\"status\":\"ok\",\"message\":\"PWM=42%\"}\r\n");
    }

    #[test]
    fn json_pwm_out_of_range_matches_expected_reply() {
        let mut state = DeviceState::new();
        let reply = crate::protocol::dispatch(r#"{"command":"SET_PWM","params":{"duty":150}}"#, &mut state);
        assert_eq!(render(&reply).as_str(), "{\"status\":\"error\",\"message\":\"PWM 0-100\"}\r\n");
    }

    #[test]
    fn text_pong_matches_expected_reply() {
        let mut state = DeviceState::new();
        let reply = crate::protocol::dispatch("PING", &mut state);
        assert_eq!(render(&reply).as_str(), "PONG\r\n");
    }

    #[test]
    fn oversized_unknown_echo_is_truncated_not_panicking() {
        let mut state = DeviceState::new();
        let long_line: String<600> = {
            let mut s = String::new();
            for _ in 0..520 {
                let _ = s.push('A');
            }
            s
        };
        let reply = crate::protocol::dispatch(long_line.as_str(), &mut state);
        let rendered = render(&reply);
        assert!(rendered.len() <= REPLY_LEN);
    }
}
