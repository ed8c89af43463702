use chrono::{DateTime, Utc};

/// `HH:MM` stamp shown beside chat messages.
#[must_use]
pub fn format_clock_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::time::fixed_now;

    #[test]
    fn clock_time_drops_seconds() {
        assert_eq!(format_clock_time(fixed_now()), "22:13");
    }
}
