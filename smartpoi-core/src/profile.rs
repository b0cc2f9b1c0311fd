//! Travel modes and their speed and emission assumptions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A travel mode offered to callers.
///
/// Each profile carries the identifier the routing provider understands,
/// the average speed used for straight-line estimates and an emission
/// factor in grams of CO2 per kilometre.
///
/// # Examples
///
/// ```
/// use smartpoi_core::TravelProfile;
///
/// assert_eq!(TravelProfile::Driving.provider_id(), "driving-car");
/// assert_eq!(TravelProfile::Walking.average_speed_kmh(), 5.0);
/// assert_eq!("cycling-regular".parse(), Ok(TravelProfile::Cycling));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelProfile {
    /// On foot.
    #[serde(rename = "foot-walking")]
    Walking,
    /// Regular bicycle.
    #[serde(rename = "cycling-regular")]
    Cycling,
    /// Private car.
    #[serde(rename = "driving-car")]
    Driving,
}

impl TravelProfile {
    /// Every profile, in the order the provider is queried.
    pub const PROVIDER_ORDER: [Self; 3] = [Self::Driving, Self::Cycling, Self::Walking];

    /// Every profile, in the order straight-line estimates are listed.
    pub const ESTIMATE_ORDER: [Self; 3] = [Self::Walking, Self::Cycling, Self::Driving];

    /// Profile identifier used by the routing provider and in responses.
    #[must_use]
    pub const fn provider_id(self) -> &'static str {
        match self {
            Self::Walking => "foot-walking",
            Self::Cycling => "cycling-regular",
            Self::Driving => "driving-car",
        }
    }

    /// Short human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Cycling => "Cycling",
            Self::Driving => "Car",
        }
    }

    /// Average speed assumed when no provider duration is available.
    #[must_use]
    pub const fn average_speed_kmh(self) -> f64 {
        match self {
            Self::Walking => 5.0,
            Self::Cycling => 15.0,
            Self::Driving => 40.0,
        }
    }

    /// Grams of CO2 emitted per kilometre travelled.
    #[must_use]
    pub const fn emission_factor_g_per_km(self) -> f64 {
        match self {
            Self::Walking | Self::Cycling => 0.0,
            Self::Driving => 120.0,
        }
    }

    /// Minutes needed to cover `distance_km` at the profile's average speed.
    #[must_use]
    pub fn estimated_minutes(self, distance_km: f64) -> f64 {
        distance_km / self.average_speed_kmh() * 60.0
    }

    /// Grams of CO2 emitted over `distance_km`.
    #[must_use]
    pub fn emissions_g(self, distance_km: f64) -> f64 {
        distance_km * self.emission_factor_g_per_km()
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_id())
    }
}

/// Error returned when parsing an unknown profile identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel profile {0:?}")]
pub struct UnknownProfile(pub String);

impl FromStr for TravelProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot-walking" | "walking" => Ok(Self::Walking),
            "cycling-regular" | "cycling" => Ok(Self::Cycling),
            "driving-car" | "driving" => Ok(Self::Driving),
            other => Err(UnknownProfile(other.to_owned())),
        }
    }
}
