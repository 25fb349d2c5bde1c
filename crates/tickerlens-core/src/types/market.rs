//! Request vocabulary: history periods, bar intervals, statement frequencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Look-back period for historical prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum Period {
    /// One day
    #[serde(rename = "1d")]
    OneDay,
    /// Five days
    #[serde(rename = "5d")]
    FiveDays,
    /// One month
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    /// Three months
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// Six months
    #[serde(rename = "6mo")]
    SixMonths,
    /// One year
    #[serde(rename = "1y")]
    OneYear,
    /// Two years
    #[serde(rename = "2y")]
    TwoYears,
    /// Five years
    #[serde(rename = "5y")]
    FiveYears,
    /// Ten years
    #[serde(rename = "10y")]
    TenYears,
    /// Year to date
    #[serde(rename = "ytd")]
    YearToDate,
    /// Full available history
    #[serde(rename = "max")]
    Max,
}

impl Period {
    const EXPECTED: &'static str = "1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max";

    /// Wire code used by Yahoo's `range` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// First date covered by this period when it ends on `end`.
    ///
    /// Returns `None` for [`Period::Max`], which has no lower bound.
    pub fn start_from(&self, end: Date) -> Option<Date> {
        let months = match self {
            Period::OneDay => return Some(end.add_days(-1)),
            Period::FiveDays => return Some(end.add_days(-5)),
            Period::YearToDate => return Some(end.start_of_year()),
            Period::Max => return None,
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
            Period::TwoYears => 24,
            Period::FiveYears => 60,
            Period::TenYears => 120,
        };
        end.add_months(-months).ok()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Ok(match s.trim() {
            "1d" => Period::OneDay,
            "5d" => Period::FiveDays,
            "1mo" => Period::OneMonth,
            "3mo" => Period::ThreeMonths,
            "6mo" => Period::SixMonths,
            "1y" => Period::OneYear,
            "2y" => Period::TwoYears,
            "5y" => Period::FiveYears,
            "10y" => Period::TenYears,
            "ytd" => Period::YearToDate,
            "max" => Period::Max,
            other => {
                return Err(CoreError::UnknownVariant {
                    kind: "period",
                    value: other.to_string(),
                    expected: Self::EXPECTED,
                })
            }
        })
    }
}

/// Spacing between consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum Interval {
    /// Daily bars
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    /// Five-day bars
    #[serde(rename = "5d")]
    FiveDays,
    /// Weekly bars
    #[serde(rename = "1wk")]
    OneWeek,
    /// Monthly bars
    #[serde(rename = "1mo")]
    OneMonth,
    /// Quarterly bars
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl Interval {
    const EXPECTED: &'static str = "1d, 5d, 1wk, 1mo, 3mo";

    /// Wire code used by Yahoo's `interval` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneDay => "1d",
            Interval::FiveDays => "5d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
            Interval::ThreeMonths => "3mo",
        }
    }

    /// Conventional number of bars per year, used for annualization.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Interval::OneDay => 252.0,
            Interval::FiveDays => 50.4,
            Interval::OneWeek => 52.0,
            Interval::OneMonth => 12.0,
            Interval::ThreeMonths => 4.0,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Ok(match s.trim() {
            "1d" => Interval::OneDay,
            "5d" => Interval::FiveDays,
            "1wk" => Interval::OneWeek,
            "1mo" => Interval::OneMonth,
            "3mo" => Interval::ThreeMonths,
            other => {
                return Err(CoreError::UnknownVariant {
                    kind: "interval",
                    value: other.to_string(),
                    expected: Self::EXPECTED,
                })
            }
        })
    }
}

/// Reporting frequency of a financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatementFrequency {
    /// Annual reports
    #[default]
    Yearly,
    /// Quarterly reports
    Quarterly,
    /// Trailing twelve months
    #[serde(alias = "trainling")]
    Trailing,
}

impl StatementFrequency {
    const EXPECTED: &'static str = "yearly, quarterly, trailing";

    /// Prefix Yahoo's fundamentals time series uses for this frequency.
    pub fn series_prefix(&self) -> &'static str {
        match self {
            StatementFrequency::Yearly => "annual",
            StatementFrequency::Quarterly => "quarterly",
            StatementFrequency::Trailing => "trailing",
        }
    }
}

impl fmt::Display for StatementFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementFrequency::Yearly => "yearly",
            StatementFrequency::Quarterly => "quarterly",
            StatementFrequency::Trailing => "trailing",
        })
    }
}

impl FromStr for StatementFrequency {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Ok(match s.trim() {
            "yearly" => StatementFrequency::Yearly,
            "quarterly" => StatementFrequency::Quarterly,
            "trailing" | "trainling" => StatementFrequency::Trailing,
            other => {
                return Err(CoreError::UnknownVariant {
                    kind: "statement frequency",
                    value: other.to_string(),
                    expected: Self::EXPECTED,
                })
            }
        })
    }
}
