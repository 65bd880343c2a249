//! Clock-style formatting of second counts.

/// `HH:MM:SS` for an hour or more, `MM:SS` otherwise.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Countdown display; minutes are not wrapped into hours.
pub fn format_countdown(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_omit_hours() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn long_durations_include_hours() {
        assert_eq!(format_time(3600), "01:00:00");
        assert_eq!(format_time(3725), "01:02:05");
    }

    #[test]
    fn countdown_keeps_minutes() {
        assert_eq!(format_countdown(3725), "62:05");
        assert_eq!(format_countdown(9), "00:09");
    }
}
