//! Publish platforms and scheduling payloads.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Social or publishing platform a design can be scheduled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Facebook,
    Linkedin,
    Twitter,
    Tiktok,
    Pinterest,
    Youtube,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Pinterest => "pinterest",
            Platform::Youtube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of the "schedule" approval action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    pub platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub auto_publish: bool,
}

impl SchedulePayload {
    /// A schedule must target at least one platform.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.platforms.is_empty() {
            return Err(CoreError::Validation(
                "A schedule must target at least one platform".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scheduling fields stored on a design.
///
/// Only the schedule transition writes these; editors read them through the
/// accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInfo {
    #[serde(default)]
    scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    scheduled_time: Option<NaiveTime>,
    #[serde(default)]
    scheduled_platforms: BTreeSet<Platform>,
    #[serde(default)]
    auto_publish: bool,
}

impl ScheduleInfo {
    pub(crate) fn from_payload(payload: SchedulePayload) -> Self {
        Self {
            scheduled_date: Some(payload.date),
            scheduled_time: payload.time,
            scheduled_platforms: payload.platforms,
            auto_publish: payload.auto_publish,
        }
    }

    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        self.scheduled_date
    }

    pub fn scheduled_time(&self) -> Option<NaiveTime> {
        self.scheduled_time
    }

    pub fn scheduled_platforms(&self) -> &BTreeSet<Platform> {
        &self.scheduled_platforms
    }

    pub fn auto_publish(&self) -> bool {
        self.auto_publish
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_date.is_some()
    }
}
