use core::fmt;
use serde::{Deserialize, Serialize};

use crate::WalkConfig;

/// Paint color in the HSL space with alpha, formatted the way CSS expects it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    /// Degrees in `[0, 360)`.
    pub hue: f64,
    /// Percent.
    pub saturation: f64,
    /// Percent.
    pub lightness: f64,
    pub alpha: f64,
}

/// Maps any finite angle into `[0, 360)`.
pub fn wrap_hue(degrees: f64) -> f64 {
    let hue = degrees % 360.0;
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    // tiny negative angles round up to a full turn; adding zero drops the sign of -0.0
    if hue >= 360.0 { 0.0 } else { hue + 0.0 }
}

impl Hsla {
    pub fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue: wrap_hue(hue),
            saturation,
            lightness,
            alpha,
        }
    }

    /// Color painted on step `tick` (zero-based): the hue advances `hue_shift` degrees per step.
    pub fn for_tick(tick: u64, config: &WalkConfig) -> Self {
        Self::new(
            tick as f64 * config.hue_shift,
            config.saturation,
            config.lightness,
            config.opacity,
        )
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({} {}% {}% / {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}
