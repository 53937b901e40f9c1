/// Milliseconds since the Unix epoch, used to prefix stored file names.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
