//! Time helpers
//!
//! All timestamps in the system are Unix milliseconds (UTC); handlers and
//! storage only ever exchange `i64` millis.

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_positive() {
        assert!(now_millis() > 0);
    }
}
