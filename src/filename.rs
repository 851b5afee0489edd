use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

/// Token used for files dated before the reference date.
pub const BEFORE_TOKEN: &str = "AVANT_";

/// Fallback token for an age that renders as an empty string.
pub const ZERO_TOKEN: &str = "0J";

/// Elapsed time since the reference date in flat units: years are always 365
/// days and months always 30. Deliberately not calendar-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    /// The timestamp predates the reference date; the four components above
    /// are placeholders and carry no meaning.
    pub before: bool,
}

impl AgeBreakdown {
    /// Decompose the gap between `timestamp` and `reference`. A missing
    /// timestamp counts as zero elapsed time.
    pub fn new(timestamp: Option<NaiveDateTime>, reference: NaiveDate) -> Self {
        let date = match timestamp {
            Some(ts) => ts.date(),
            None => reference,
        };

        if date < reference {
            return AgeBreakdown {
                years: 0,
                months: 0,
                weeks: 0,
                days: 0,
                before: true,
            };
        }

        let total = (date - reference).num_days();
        let years = total / 365;
        let remaining = total % 365;
        let months = remaining / 30;
        let remaining = remaining % 30;

        AgeBreakdown {
            years,
            months,
            weeks: remaining / 7,
            days: remaining % 7,
            before: false,
        }
    }

    /// Render the breakdown as a filename token:
    /// `years_A_months_M_weeks_S_days_J`. Every component is present, zero
    /// or not.
    pub fn token(&self) -> String {
        if self.before {
            return BEFORE_TOKEN.to_string();
        }

        let fragments = [
            (self.years, 'A'),
            (self.months, 'M'),
            (self.weeks, 'S'),
            (self.days, 'J'),
        ];

        let token = fragments
            .iter()
            .map(|(value, suffix)| format!("{}_{}", value, suffix))
            .collect::<Vec<_>>()
            .join("_");

        if token.is_empty() {
            ZERO_TOKEN.to_string()
        } else {
            token
        }
    }
}

/// Encode a (possibly missing) timestamp as a filename token relative to
/// `reference`.
pub fn age_token(timestamp: Option<NaiveDateTime>, reference: NaiveDate) -> String {
    AgeBreakdown::new(timestamp, reference).token()
}

/// Build the new filename: `<token>-<original stem>.<original extension>`.
pub fn renamed_file_name(path: &Path, token: &str) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{}-{}.{}", token, stem, ext),
        None => format!("{}-{}", token, stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_on_reference_date() {
        let reference = date(2022, 11, 1);
        let token = age_token(Some(at_noon(2022, 11, 1)), reference);
        // All four zero components stay in the token; the empty-string
        // fallback does not apply.
        assert_eq!(token, "0_A_0_M_0_S_0_J");
    }

    #[test]
    fn test_token_for_unknown_timestamp() {
        let reference = date(2022, 11, 1);
        assert_eq!(age_token(None, reference), "0_A_0_M_0_S_0_J");
    }

    #[test]
    fn test_token_before_reference() {
        let reference = date(2022, 11, 1);
        assert_eq!(age_token(Some(at_noon(2022, 10, 31)), reference), "AVANT_");
        assert_eq!(age_token(Some(at_noon(2021, 3, 14)), reference), "AVANT_");
        assert_eq!(age_token(Some(at_noon(1970, 1, 1)), reference), "AVANT_");
    }

    #[test]
    fn test_token_75_days_after_reference() {
        // 75 days = 2 flat months (60) + 1 week (7) + 5 days
        let reference = date(2022, 11, 1);
        let token = age_token(Some(at_noon(2023, 1, 15)), reference);
        assert_eq!(token, "0_A_2_M_1_S_5_J");
    }

    #[test]
    fn test_token_spanning_years() {
        // 400 days = 1 year (365) + 1 month (30) + 0 weeks + 5 days
        let reference = date(2022, 11, 1);
        let timestamp = (date(2022, 11, 1) + chrono::Duration::days(400))
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(age_token(Some(timestamp), reference), "1_A_1_M_0_S_5_J");
    }

    #[test]
    fn test_token_is_deterministic() {
        let reference = date(2022, 11, 1);
        let timestamp = Some(at_noon(2024, 6, 30));
        assert_eq!(age_token(timestamp, reference), age_token(timestamp, reference));
    }

    #[test]
    fn test_flat_decomposition_adds_up() {
        let reference = date(2020, 1, 1);
        for offset in 0..=3650i64 {
            let day = reference + chrono::Duration::days(offset);
            let breakdown = AgeBreakdown::new(day.and_hms_opt(0, 0, 0), reference);
            assert!(!breakdown.before);
            assert_eq!(
                breakdown.years * 365 + breakdown.months * 30 + breakdown.weeks * 7 + breakdown.days,
                offset
            );
            assert!(breakdown.months <= 12);
            assert!(breakdown.weeks <= 4);
            assert!(breakdown.days <= 6);
        }
    }

    #[test]
    fn test_renamed_file_name() {
        let name = renamed_file_name(Path::new("/in/Muscu1/IMG_0001.jpg"), "0_A_2_M_1_S_5_J");
        assert_eq!(name, "0_A_2_M_1_S_5_J-IMG_0001.jpg");

        let name = renamed_file_name(Path::new("/in/clip.mp4"), "AVANT_");
        assert_eq!(name, "AVANT_-clip.mp4");

        let name = renamed_file_name(Path::new("/in/noext"), "0_A_0_M_0_S_0_J");
        assert_eq!(name, "0_A_0_M_0_S_0_J-noext");
    }
}
