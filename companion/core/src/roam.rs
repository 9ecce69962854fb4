//! Roam Mode
//!
//! Process-wide policy constraining where the companions may go.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the companions are allowed to roam
///
/// Cycles `Full → Bottom → Hidden → Full`, never in any other order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoamMode {
    /// Anywhere on screen
    #[default]
    Full,
    /// Pinned to a floor near the bottom edge
    Bottom,
    /// Not simulated nor drawn (the "none" mode)
    #[serde(rename = "none", alias = "hidden")]
    Hidden,
}

impl RoamMode {
    /// The next mode in the cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Full => Self::Bottom,
            Self::Bottom => Self::Hidden,
            Self::Hidden => Self::Full,
        }
    }

    /// Transient caption shown after switching to this mode
    #[must_use]
    pub fn caption(self) -> &'static str {
        match self {
            Self::Full => "Mode: Full Screen 🌍",
            Self::Bottom => "Mode: Bottom Only ⬇️",
            Self::Hidden => "Mode: Hidden 👻",
        }
    }

    /// Short label for a mode button or status bar
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Bottom => "BTM",
            Self::Hidden => "OFF",
        }
    }

    /// Whether the actors are simulated and drawn
    #[must_use]
    pub fn actors_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether vertical movement is pinned to a floor
    #[must_use]
    pub fn is_floor_locked(self) -> bool {
        matches!(self, Self::Bottom)
    }
}

impl fmt::Display for RoamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Bottom => "bottom",
            Self::Hidden => "none",
        })
    }
}

impl FromStr for RoamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "bottom" | "btm" => Ok(Self::Bottom),
            "none" | "hidden" | "off" => Ok(Self::Hidden),
            other => Err(format!(
                "unknown roam mode '{other}' (expected full, bottom or none)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        let mut mode = RoamMode::default();
        let mut seen = vec![mode];
        for _ in 0..6 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                RoamMode::Full,
                RoamMode::Bottom,
                RoamMode::Hidden,
                RoamMode::Full,
                RoamMode::Bottom,
                RoamMode::Hidden,
                RoamMode::Full,
            ]
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("FULL".parse::<RoamMode>(), Ok(RoamMode::Full));
        assert_eq!("bottom".parse::<RoamMode>(), Ok(RoamMode::Bottom));
        assert_eq!("none".parse::<RoamMode>(), Ok(RoamMode::Hidden));
        assert!("sideways".parse::<RoamMode>().is_err());
        assert_eq!(RoamMode::Hidden.to_string(), "none");
    }

    #[test]
    fn test_visibility() {
        assert!(RoamMode::Full.actors_visible());
        assert!(RoamMode::Bottom.actors_visible());
        assert!(!RoamMode::Hidden.actors_visible());
        assert!(RoamMode::Bottom.is_floor_locked());
    }
}
