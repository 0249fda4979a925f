//! Typed results of the scrape operations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::video::{Section, VideoRecord};

/// Landing page: ordered named carousels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    pub sections: Vec<Section>,
}

/// Trending listing with paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingPage {
    pub period: String,
    pub page: u32,
    pub page_size: u32,
    pub number_of_pages: u32,
    pub videos: Vec<VideoRecord>,
}

impl Default for TrendingPage {
    fn default() -> Self {
        Self {
            period: TrendingPeriod::Month.as_str().to_string(),
            page: 1,
            page_size: 24,
            number_of_pages: 1,
            videos: Vec::new(),
        }
    }
}

/// Random listing, 24 fresh videos per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomPage {
    pub videos: Vec<VideoRecord>,
}

/// Search results in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub videos: Vec<VideoRecord>,
}

/// Trending time window accepted by the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendingPeriod {
    Day,
    Week,
    Month,
    Quarter,
    Semi,
    Year,
}

impl TrendingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Semi => "semi",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TrendingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "semi" => Ok(Self::Semi),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown trending period: {other}")),
        }
    }
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Live,
    Cache,
}

/// A scrape result plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOutcome<T> {
    pub source: Source,
    pub scraped_at: DateTime<Utc>,
    pub data: T,
}

impl<T> ScrapeOutcome<T> {
    pub fn live(data: T) -> Self {
        Self {
            source: Source::Live,
            scraped_at: Utc::now(),
            data,
        }
    }

    pub fn cached(data: T) -> Self {
        Self {
            source: Source::Cache,
            scraped_at: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_round_trip() {
        for p in ["day", "week", "month", "quarter", "semi", "year"] {
            assert_eq!(p.parse::<TrendingPeriod>().unwrap().as_str(), p);
        }
        assert!("weekly".parse::<TrendingPeriod>().is_err());
    }
}
