// ISO-8601 duration parsing for the restricted form NX-OS emits
//
// Accepted: P[nD][T[nH][nM][n[.frac]S]], e.g. "P6DT2H33M31S", "PT51S".
// Years, months and weeks are never produced by the device and are rejected.

use std::time::Duration;

use crate::error::ScalarError;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Parse a device duration string. The empty string is a zero duration.
pub fn try_parse_duration(value: &str) -> Result<Duration, ScalarError> {
    if value.is_empty() {
        return Ok(Duration::ZERO);
    }

    let invalid = |reason: &'static str| ScalarError::InvalidDuration {
        value: value.to_string(),
        reason,
    };

    let rest = value
        .strip_prefix('P')
        .ok_or_else(|| invalid("missing leading 'P'"))?;

    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut secs: u64 = 0;
    let mut nanos: u32 = 0;

    if !date.is_empty() {
        let days = date
            .strip_suffix('D')
            .ok_or_else(|| invalid("only days are allowed before 'T'"))?;
        let days = parse_digits(days).ok_or_else(|| invalid("bad day count"))?;
        secs = accumulate(secs, days, SECS_PER_DAY).ok_or_else(|| invalid("overflow"))?;
    }

    if let Some(mut cursor) = time {
        // 0 = nothing yet, 1 = hours, 2 = minutes, 3 = seconds
        let mut last_rank = 0;

        while !cursor.is_empty() {
            let split = cursor
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .ok_or_else(|| invalid("number without designator"))?;
            let (number, tail) = cursor.split_at(split);
            let Some(designator) = tail.chars().next() else {
                return Err(invalid("number without designator"));
            };

            let rank = match designator {
                'H' => 1,
                'M' => 2,
                'S' => 3,
                _ => return Err(invalid("unknown time designator")),
            };
            if rank <= last_rank {
                return Err(invalid("time designators out of order"));
            }
            last_rank = rank;

            match designator {
                'H' | 'M' => {
                    let scale = if designator == 'H' {
                        SECS_PER_HOUR
                    } else {
                        SECS_PER_MINUTE
                    };
                    let count = parse_digits(number).ok_or_else(|| invalid("bad time count"))?;
                    secs = accumulate(secs, count, scale).ok_or_else(|| invalid("overflow"))?;
                }
                _ => {
                    let (whole, frac) = match number.split_once('.') {
                        Some((whole, frac)) => (whole, Some(frac)),
                        None => (number, None),
                    };
                    let whole = parse_digits(whole).ok_or_else(|| invalid("bad seconds"))?;
                    secs = accumulate(secs, whole, 1).ok_or_else(|| invalid("overflow"))?;

                    if let Some(frac) = frac {
                        let (frac_nanos, carry) =
                            round_fraction(frac).ok_or_else(|| invalid("bad fractional seconds"))?;
                        nanos = frac_nanos;
                        if carry {
                            secs = secs.checked_add(1).ok_or_else(|| invalid("overflow"))?;
                        }
                    }
                }
            }

            cursor = &tail[designator.len_utf8()..];
        }
    }

    Ok(Duration::new(secs, nanos))
}

/// Total form of [`try_parse_duration`]: anything unparseable is zero.
pub fn parse_duration(value: &str) -> Duration {
    try_parse_duration(value).unwrap_or(Duration::ZERO)
}

fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn accumulate(total: u64, count: u64, scale: u64) -> Option<u64> {
    count.checked_mul(scale)?.checked_add(total)
}

/// Convert fractional-second digits to nanoseconds, rounding half to even.
/// The flag is set when rounding carries into a whole second.
fn round_fraction(digits: &str) -> Option<(u32, bool)> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let bytes = digits.as_bytes();
    let mut nanos: u32 = 0;
    for idx in 0..9 {
        let digit = bytes.get(idx).map_or(0, |b| (b - b'0') as u32);
        nanos = nanos * 10 + digit;
    }

    let round_up = match bytes.get(9) {
        None => false,
        Some(b'5') => {
            let exact_half = bytes[10..].iter().all(|b| *b == b'0');
            !exact_half || nanos % 2 == 1
        }
        Some(b) => *b > b'5',
    };

    if round_up {
        nanos += 1;
    }

    if nanos == NANOS_PER_SEC {
        Some((0, true))
    } else {
        Some((nanos, false))
    }
}
