//! Preset canvas formats.
//!
//! Every design is created from one of these presets. The preset fixes the
//! canvas size in pixels, except [`DesignFormat::Custom`] which starts at a
//! default size and may be resized at creation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default width for a custom canvas.
pub const CUSTOM_DEFAULT_WIDTH: u32 = 1200;

/// Default height for a custom canvas.
pub const CUSTOM_DEFAULT_HEIGHT: u32 = 800;

/// Largest edge accepted for a custom canvas.
pub const MAX_CUSTOM_DIMENSION: u32 = 10_000;

/// Named canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignFormat {
    SocialSquare,
    StoryPortrait,
    BlogFeatured,
    EmailHeader,
    Custom,
}

impl DesignFormat {
    /// All presets, in display order.
    pub const ALL: [DesignFormat; 5] = [
        DesignFormat::SocialSquare,
        DesignFormat::StoryPortrait,
        DesignFormat::BlogFeatured,
        DesignFormat::EmailHeader,
        DesignFormat::Custom,
    ];

    /// Canvas `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            DesignFormat::SocialSquare => (1080, 1080),
            DesignFormat::StoryPortrait => (1080, 1920),
            DesignFormat::BlogFeatured => (1200, 675),
            DesignFormat::EmailHeader => (800, 300),
            DesignFormat::Custom => (CUSTOM_DEFAULT_WIDTH, CUSTOM_DEFAULT_HEIGHT),
        }
    }

    /// Wire name of the preset.
    pub fn as_str(self) -> &'static str {
        match self {
            DesignFormat::SocialSquare => "social_square",
            DesignFormat::StoryPortrait => "story_portrait",
            DesignFormat::BlogFeatured => "blog_featured",
            DesignFormat::EmailHeader => "email_header",
            DesignFormat::Custom => "custom",
        }
    }
}

impl fmt::Display for DesignFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignFormat {
    type Err = CoreError;

    /// Parse a preset key. Unknown keys fail; there is no fallback preset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DesignFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = DesignFormat::ALL.iter().map(|f| f.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid design format '{s}'. Must be one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Validate a custom canvas edge length.
pub fn validate_custom_dimension(name: &str, value: u32) -> Result<(), CoreError> {
    if value == 0 || value > MAX_CUSTOM_DIMENSION {
        return Err(CoreError::Validation(format!(
            "Canvas {name} must be between 1 and {MAX_CUSTOM_DIMENSION} pixels, got {value}"
        )));
    }
    Ok(())
}
