//! Quality ratings (0-5)
//!
//! - 0: Complete blackout, no recognition
//! - 1: Incorrect response, but the word was recognized
//! - 2: Incorrect response, but the correct answer felt familiar
//! - 3: Correct response, recalled with significant effort
//! - 4: Correct response, after some hesitation
//! - 5: Correct response, perfect recall

use std::fmt;

use serde::Serialize;

/// Highest rating on the scale
pub const MAX_QUALITY: u8 = 5;

/// Lowest rating that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

/// Rejected by the strict boundary validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Quality rating {0} is outside the range 0..=5")]
pub struct InvalidQuality(pub i32);

/// A self-assessed recall rating, always within `0..=5`
///
/// Serializes as the bare number. There is no `Deserialize`; parse through
/// [`clamped`](Self::clamped) or `TryFrom<i32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QualityRating(u8);

impl QualityRating {
    /// Worst possible rating
    pub const BLACKOUT: Self = Self(0);
    /// Best possible rating
    pub const PERFECT: Self = Self(MAX_QUALITY);

    /// Coerce any integer onto the scale. Out-of-range input is never an error.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, i32::from(MAX_QUALITY)) as u8)
    }

    /// Every rating on the scale, lowest first
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_QUALITY).map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the rating counts as a successful recall (>= 3)
    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_QUALITY
    }

    /// Short human-readable meaning of the rating
    pub fn describe(self) -> &'static str {
        match self.0 {
            0 => "complete blackout",
            1 => "incorrect, recognized",
            2 => "incorrect, felt familiar",
            3 => "correct, significant effort",
            4 => "correct, some hesitation",
            _ => "perfect recall",
        }
    }
}

impl TryFrom<i32> for QualityRating {
    type Error = InvalidQuality;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (0..=i32::from(MAX_QUALITY)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidQuality(value))
        }
    }
}

impl From<QualityRating> for i32 {
    fn from(rating: QualityRating) -> Self {
        i32::from(rating.0)
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
