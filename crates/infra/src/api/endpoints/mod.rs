//! Endpoint wrappers on [`CustomerApi`](super::customer::CustomerApi)
//!
//! One file per API group. Every method returns the typed `Data` member of
//! the response.

mod accounts;
mod balances;
mod sbp_accounts;
mod sbp_legal;
mod sbp_merchants;
mod sbp_qr;
mod sbp_refunds;

use std::borrow::Cow;

use chrono::NaiveDate;

const OPEN_BANKING: &str = "/open-banking/v1.0";
const SBP: &str = "/sbp/v1.0";

/// Percent-encode one path segment.
fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// `YYYY-MM-DD`, as the query parameters expect.
fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("LE-1/2"), "LE-1%2F2");
        assert_eq!(segment("AS1000"), "AS1000");
    }

    #[test]
    fn test_date_param() {
        assert_eq!(date_param(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()), "2024-03-07");
    }
}
