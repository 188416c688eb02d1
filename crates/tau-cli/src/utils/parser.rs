use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid time range '{0}'. Expected 'START:END:STEP' (e.g., '0:10:0.5').")]
    InvalidTimeRange(String),

    #[error("Time range '{0}' must have a positive step and END >= START.")]
    EmptyTimeRange(String),

    #[error("At least one timepoint is required.")]
    NoTimepoints,

    #[error("Time grid would hold more than {max} timepoints.", max = MAX_TIMEPOINTS)]
    TooManyTimepoints,

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Upper bound on the number of timepoints a single grid may hold.
pub const MAX_TIMEPOINTS: usize = 10_000_000;

/// Timepoints `0, 1, ..., count - 1`.
pub fn timepoints_from_count(count: usize) -> Result<Vec<f64>, ParseError> {
    if count == 0 {
        return Err(ParseError::NoTimepoints);
    }
    if count > MAX_TIMEPOINTS {
        return Err(ParseError::TooManyTimepoints);
    }
    Ok((0..count).map(|i| i as f64).collect())
}

/// Parses an inclusive `START:END:STEP` range.
///
/// The end point is included when it lies on the grid, allowing for
/// floating-point drift in the step.
pub fn parse_time_range(range: &str) -> Result<Vec<f64>, ParseError> {
    let invalid = || ParseError::InvalidTimeRange(range.to_string());

    let parts: Vec<&str> = range.split(':').map(str::trim).collect();
    let [start, end, step] = parts.as_slice() else {
        return Err(invalid());
    };
    let start: f64 = start.parse().map_err(|_| invalid())?;
    let end: f64 = end.parse().map_err(|_| invalid())?;
    let step: f64 = step.parse().map_err(|_| invalid())?;

    if ![start, end, step].iter().all(|v| v.is_finite()) {
        return Err(invalid());
    }
    if step <= 0.0 || end < start {
        return Err(ParseError::EmptyTimeRange(range.to_string()));
    }

    let intervals = ((end - start) / step + 1e-9).floor();
    if !intervals.is_finite() || intervals >= MAX_TIMEPOINTS as f64 {
        return Err(ParseError::TooManyTimepoints);
    }
    let intervals = intervals as usize;
    Ok((0..=intervals).map(|i| start + i as f64 * step).collect())
}

/// Splits `KEY=VALUE` at the first '='.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| ParseError::InvalidKeyValue(pair.to_string()))
}
