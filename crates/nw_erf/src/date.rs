//! Build date stored in the archive header.

use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// Date an archive was built, as stored on disk
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildDate {
    /// Years since 1900
    pub years_since_1900: u32,

    /// Day of the year, starting at 1
    pub day_of_year: u32,
}

impl BuildDate {
    pub fn new(years_since_1900: u32, day_of_year: u32) -> Self {
        Self {
            years_since_1900,
            day_of_year,
        }
    }

    /// Calendar year
    pub fn year(&self) -> u32 {
        self.years_since_1900 + 1900
    }

    /// Date of the given number of days since 1970-01-01
    pub fn from_unix_days(days: u32) -> Self {
        let year = year_of(days as i64);
        let day_of_year = days as i64 - days_from_civil(year, 1, 1) + 1;

        Self {
            years_since_1900: (year - 1900) as u32,
            day_of_year: day_of_year as u32,
        }
    }

    /// Today in UTC
    pub fn now() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_days((seconds / SECONDS_PER_DAY) as u32)
    }
}

// Howard Hinnant's civil calendar algorithms
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe - 719_468
}

fn year_of(days: i64) -> i64 {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;

    // the era starts in March
    let y = yoe + era * 400;
    if mp < 10 {
        y
    } else {
        y + 1
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::date::BuildDate;

    #[test]
    fn epoch() {
        assert_eq!(BuildDate::from_unix_days(0), BuildDate::new(70, 1));
    }

    #[test]
    fn last_day_of_leap_year() {
        let date = BuildDate::from_unix_days(11_322);
        assert_eq!(date.year(), 2000);
        assert_eq!(date.day_of_year, 366);
    }

    #[test]
    fn after_february() {
        assert_eq!(BuildDate::from_unix_days(19_783), BuildDate::new(124, 61));
    }

    #[test]
    fn first_of_january() {
        assert_eq!(BuildDate::from_unix_days(19_723), BuildDate::new(124, 1));
    }
}
