use coffeedoro::defaults::{
    MAX_LONG_BREAK_INTERVAL, MAX_PHASE_SECS, MIN_LONG_BREAK_INTERVAL, MIN_PHASE_SECS,
};
use coffeedoro::format_clock;
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static DURATION_MIN_SEC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)m\s*(\d+)s$").unwrap());
static DURATION_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d+)$").unwrap());
static DURATION_MIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)m$").unwrap());
static DURATION_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)s$").unwrap());

/// Duration parsing error types
#[derive(Debug)]
pub enum DurationParseError {
    EmptyInput,
    InvalidFormat(String),
    InvalidMinutes,
    InvalidSeconds(u32),
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationParseError::EmptyInput => write!(f, "Duration cannot be empty"),
            DurationParseError::InvalidFormat(hint) => {
                write!(f, "Invalid duration format. {}", hint)
            }
            DurationParseError::InvalidMinutes => write!(f, "Invalid minutes value"),
            DurationParseError::InvalidSeconds(s) => {
                write!(f, "Invalid seconds: {} (must be 0-59)", s)
            }
        }
    }
}

impl std::error::Error for DurationParseError {}

fn parse_number(digits: &str, err: DurationParseError) -> Result<u32, String> {
    digits.parse::<u32>().map_err(|_| err.to_string())
}

fn minutes_and_seconds(minutes: &str, seconds: &str) -> Result<u32, String> {
    let minutes = parse_number(minutes, DurationParseError::InvalidMinutes)?;
    let seconds = parse_number(seconds, DurationParseError::InvalidSeconds(0))?;
    if seconds > 59 {
        return Err(DurationParseError::InvalidSeconds(seconds).to_string());
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(|| DurationParseError::InvalidMinutes.to_string())
}

/// Parse a phase duration into seconds.
///
/// Supported formats:
/// - Pure number: "25" (interpreted as minutes)
/// - Minutes:seconds: "24:30"
/// - Minutes and seconds: "1m 30s" or "1m30s"
/// - Minutes only: "25m"
/// - Seconds only: "90s"
///
/// # Examples
/// ```ignore
/// assert_eq!(parse_duration_to_secs("25"), Ok(1500));
/// assert_eq!(parse_duration_to_secs("24:30"), Ok(1470));
/// assert_eq!(parse_duration_to_secs("90s"), Ok(90));
/// ```
pub fn parse_duration_to_secs(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::EmptyInput.to_string());
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return minutes_and_seconds(trimmed, "0");
    }

    if let Some(captures) = DURATION_COLON_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], &captures[2]);
    }

    if let Some(captures) = DURATION_MIN_SEC_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], &captures[2]);
    }

    if let Some(captures) = DURATION_MIN_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], "0");
    }

    if let Some(captures) = DURATION_SEC_REGEX.captures(trimmed) {
        return parse_number(&captures[1], DurationParseError::InvalidSeconds(0));
    }

    Err(DurationParseError::InvalidFormat("Use: 25, 24:30, 1m30s, 25m or 90s".to_string())
        .to_string())
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate a work/break length input, returning seconds.
pub fn validate_phase_duration(input: &str) -> Result<u32, String> {
    let secs = parse_duration_to_secs(input)?;
    if !(MIN_PHASE_SECS..=MAX_PHASE_SECS).contains(&secs) {
        return Err(format!(
            "Duration must be between {} and {}",
            format_clock(MIN_PHASE_SECS),
            format_clock(MAX_PHASE_SECS)
        ));
    }
    Ok(secs)
}

/// Validate the number of sessions between long breaks
pub fn validate_long_break_interval(input: &str) -> Result<u32, String> {
    validate_numeric_input(
        input,
        Some(MIN_LONG_BREAK_INTERVAL),
        Some(MAX_LONG_BREAK_INTERVAL),
        "Long break interval",
    )
}

/// Text shown in a duration input for a value in seconds.
pub fn format_duration_input(secs: &u32) -> String {
    format_clock(*secs)
}

pub fn format_count_input(count: &u32) -> String {
    count.to_string()
}
