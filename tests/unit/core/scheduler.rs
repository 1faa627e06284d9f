//! Unit tests for refresher scheduling

use stockking::core::scheduler::{cron_expression, schedule_for_interval, SchedulerError};
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_cron_expression_seconds() {
    assert_eq!(cron_expression(30).unwrap(), "*/30 * * * * *");
}

#[test]
fn test_cron_expression_minutes() {
    assert_eq!(cron_expression(300).unwrap(), "0 */5 * * * *");
}

#[test]
fn test_zero_interval_disabled() {
    assert!(matches!(cron_expression(0), Err(SchedulerError::Disabled)));
    assert_err!(schedule_for_interval(0));
}

#[test]
fn test_schedule_has_upcoming_ticks() {
    let schedule = assert_ok!(schedule_for_interval(900));
    let mut upcoming = schedule.upcoming(chrono::Utc);
    let first = upcoming.next().unwrap();
    let second = upcoming.next().unwrap();
    assert_eq!((second - first).num_minutes(), 15);
}
