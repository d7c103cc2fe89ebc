use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    #[default]
    All,
    Inbound,
    Outbound,
    Internal,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::All => "all",
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
            CallDirection::Internal => "internal",
        }
    }
}

impl FromStr for CallDirection {
    type Err = InvalidRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(CallDirection::All),
            "inbound" => Ok(CallDirection::Inbound),
            "outbound" => Ok(CallDirection::Outbound),
            "internal" => Ok(CallDirection::Internal),
            other => Err(InvalidRangeError::Direction(other.to_string())),
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRangeError {
    #[error("start time {start} is after end time {end}")]
    StartAfterEnd {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("limit must be at least 1")]
    ZeroLimit,
    #[error("invalid timestamp '{0}', expected YYYY-MM-DDTHH:MM:SS")]
    Timestamp(String),
    #[error("invalid call direction '{0}', expected all, inbound, outbound or internal")]
    Direction(String),
}

/// Validated CDR search parameters. The constructor rejects inverted ranges,
/// so an instance always satisfies `start_time <= end_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDetailQuery {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    direction: CallDirection,
    limit: u32,
    offset: u32,
}

impl CallDetailQuery {
    const ACCEPTED_FORMATS: [&'static str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        direction: CallDirection,
        limit: u32,
        offset: u32,
    ) -> Result<Self, InvalidRangeError> {
        if start_time > end_time {
            return Err(InvalidRangeError::StartAfterEnd {
                start: start_time,
                end: end_time,
            });
        }
        if limit == 0 {
            return Err(InvalidRangeError::ZeroLimit);
        }
        Ok(Self {
            start_time,
            end_time,
            direction,
            limit,
            offset,
        })
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`.
    pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, InvalidRangeError> {
        let trimmed = value.trim();
        Self::ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| InvalidRangeError::Timestamp(value.to_string()))
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}
