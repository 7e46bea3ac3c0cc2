use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Reporting period offered by the stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Quarter];

    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            Period::Week => "Last 7 days",
            Period::Month => "Last 30 days",
            Period::Quarter => "Last 90 days",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "7d" => Ok(Period::Week),
            "month" | "30d" => Ok(Period::Month),
            "quarter" | "90d" => Ok(Period::Quarter),
            other => Err(format!(
                "unknown period '{other}', expected week, month or quarter"
            )),
        }
    }
}

/// Inclusive `(start, end)` covering the last `period.days()` calendar days,
/// today included.
pub fn window_for(period: Period, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(period.days() - 1);
    (start, today)
}
