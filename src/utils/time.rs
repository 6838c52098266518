use chrono::Utc;

/// Wall-clock milliseconds since the unix epoch, used to stamp notifications.
pub fn time_millis() -> i64 {
    Utc::now().timestamp_millis()
}
