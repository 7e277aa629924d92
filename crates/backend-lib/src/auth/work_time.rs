// ============================
// crates/backend-lib/src/auth/work_time.rs
// ============================
//! Partner work-time windows.
//!
//! A window is a pair of `"HH:MM"` bounds. Only the first two `:`-separated
//! fields are read. Windows that cross midnight are compared hour by hour
//! like any other window, so `22:00`-`06:00` only matches inside hours 22
//! and 6.
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkTimeError {
    #[error("malformed time bound '{0}'")]
    Malformed(String),
}

/// Hour/minute window during which a partner accepts work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkTime {
    from_hour: i32,
    from_minute: i32,
    to_hour: i32,
    to_minute: i32,
}

impl WorkTime {
    pub fn parse(from: &str, to: &str) -> Result<Self, WorkTimeError> {
        let (from_hour, from_minute) = parse_bound(from)?;
        let (to_hour, to_minute) = parse_bound(to)?;
        Ok(Self {
            from_hour,
            from_minute,
            to_hour,
            to_minute,
        })
    }

    /// Whether the wall-clock time `hour:minute` falls inside the window
    pub fn contains(&self, hour: u32, minute: u32) -> bool {
        let (hour, minute) = (hour as i32, minute as i32);
        (hour > self.from_hour && hour < self.to_hour)
            || (hour == self.from_hour && minute >= self.from_minute)
            || (hour == self.to_hour && minute <= self.to_minute)
    }
}

fn parse_bound(bound: &str) -> Result<(i32, i32), WorkTimeError> {
    let malformed = || WorkTimeError::Malformed(bound.to_string());
    let mut parts = bound.split(':');
    let hour = parts
        .next()
        .and_then(|h| h.parse::<i32>().ok())
        .ok_or_else(malformed)?;
    let minute = parts
        .next()
        .and_then(|m| m.parse::<i32>().ok())
        .ok_or_else(malformed)?;
    Ok((hour, minute))
}
