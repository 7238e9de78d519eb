//! Timestamp formatting shared by the list and the history panel

/// Format a UTC timestamp as DD.MM.YYYY HH:MM:SS
pub fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M:%S").to_string()
}
