//! Custom Askama template filters.

use std::fmt::Display;

/// Current year, for the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// `"record"` or `"records"` depending on `count`.
///
/// Usage in templates: `{{ products.len()|records }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn records(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(records_label(&count.to_string()))
}

fn records_label(count: &str) -> String {
    if count == "1" {
        "1 record".to_string()
    } else {
        format!("{count} records")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_label() {
        assert_eq!(records_label("0"), "0 records");
        assert_eq!(records_label("1"), "1 record");
        assert_eq!(records_label("12"), "12 records");
    }
}
