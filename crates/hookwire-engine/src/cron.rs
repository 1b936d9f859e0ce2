//! Cron expression building for scheduled dispatch jobs.

use hookwire_core::{Error, Result};

/// How often a scheduled dispatch job runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Schedule {
    /// Every minute.
    Minute,
    /// Once a day at the configured time.
    #[default]
    Daily,
    /// Once a week, on the first day of the week.
    Weekly,
    /// Once a month, on the first day of the month.
    Monthly,
}

/// Builds a five-field cron expression from a schedule and an `"HH,MM"` time.
///
/// [`Schedule::Minute`] ignores the time entirely. For the other schedules
/// the time must be two comma-separated integers; hour 0..=23, minute
/// 0..=59.
pub fn cron_expr(schedule: Schedule, time: &str) -> Result<String> {
    if schedule == Schedule::Minute {
        return Ok("* * * * *".to_string());
    }

    let (hour, minute) = parse_time(time)?;

    let day_of_month = if schedule == Schedule::Monthly { "1" } else { "*" };
    let day_of_week = if schedule == Schedule::Weekly { "0" } else { "*" };

    Ok(format!("{minute} {hour} {day_of_month} * {day_of_week}"))
}

fn parse_time(time: &str) -> Result<(u8, u8)> {
    let Some((hour, minute)) = time.split_once(',') else {
        return Err(Error::invalid_input()
            .with_message(format!("schedule time is not of the form HH,MM: {time:?}")));
    };

    let hour: u8 = hour
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input().with_message(format!("invalid hour: {hour:?}")))?;
    let minute: u8 = minute
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input().with_message(format!("invalid minute: {minute:?}")))?;

    if hour > 23 {
        return Err(Error::invalid_input().with_message(format!("hour out of range: {hour}")));
    }
    if minute > 59 {
        return Err(Error::invalid_input().with_message(format!("minute out of range: {minute}")));
    }

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_schedule_ignores_time() {
        assert_eq!(cron_expr(Schedule::Minute, "garbage").unwrap(), "* * * * *");
    }

    #[test]
    fn test_daily_schedule() {
        assert_eq!(cron_expr(Schedule::Daily, "14,30").unwrap(), "30 14 * * *");
    }

    #[test]
    fn test_weekly_schedule() {
        assert_eq!(cron_expr(Schedule::Weekly, "0,5").unwrap(), "5 0 * * 0");
    }

    #[test]
    fn test_monthly_schedule() {
        assert_eq!(cron_expr(Schedule::Monthly, "23,59").unwrap(), "59 23 1 * *");
    }

    #[test]
    fn test_malformed_time_is_rejected() {
        assert!(cron_expr(Schedule::Daily, "14:30").is_err());
        assert!(cron_expr(Schedule::Daily, "").is_err());
        assert!(cron_expr(Schedule::Daily, "a,b").is_err());
    }

    #[test]
    fn test_out_of_range_time_is_rejected() {
        assert!(cron_expr(Schedule::Daily, "24,00").is_err());
        assert!(cron_expr(Schedule::Daily, "12,60").is_err());
    }
}
