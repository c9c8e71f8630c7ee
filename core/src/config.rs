use alloc::string::ToString;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a walk needs to know, merged over the documented defaults.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalkConfig {
    /// Lattice width and height in cells.
    pub grid_count: Coord,
    /// Pixel size of the drawing surface, only meaningful to the canvas.
    pub canvas_size: u32,
    /// Coverage added per visit, also the alpha of the paint.
    pub opacity: f64,
    /// Milliseconds between two steps.
    pub speed: u32,
    /// Degrees of hue advanced per step; `0` and `360` never change color.
    pub hue_shift: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub format: Format,
    /// Length of the trailing path shown in [`Format::Border`].
    pub path_limit: usize,
    /// Coverage every cell needs before the walk is done. `0` finishes immediately, infinity never.
    #[serde(with = "threshold")]
    pub minimum_opacity: f64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            grid_count: 20,
            canvas_size: 300,
            opacity: 0.2,
            speed: 10,
            hue_shift: 0.5,
            saturation: 80.0,
            lightness: 75.0,
            format: Format::Grid,
            path_limit: 30,
            minimum_opacity: 1.0,
        }
    }
}

/// Longest delay browser timers accept; larger values fire immediately.
pub const MAX_SPEED: u32 = i32::MAX as u32;

fn clamp_percent(key: &str, value: f64, default: f64) -> f64 {
    if value.is_nan() {
        log::warn!("{} is not a number, using {}", key, default);
        default
    } else if !(0.0..=100.0).contains(&value) {
        let clamped = value.clamp(0.0, 100.0);
        log::warn!("{} of {} out of range, clamped to {}", key, value, clamped);
        clamped
    } else {
        value
    }
}

impl WalkConfig {
    /// Applies every option that is set, keeping current values for the rest.
    pub fn merged(mut self, options: &WalkOptions) -> Self {
        let WalkOptions {
            grid_count,
            canvas_size,
            opacity,
            speed,
            hue_shift,
            saturation,
            lightness,
            format,
            path_limit,
            minimum_opacity,
        } = *options;

        if let Some(value) = grid_count {
            self.grid_count = value;
        }
        if let Some(value) = canvas_size {
            self.canvas_size = value;
        }
        if let Some(value) = opacity {
            self.opacity = value;
        }
        if let Some(value) = speed {
            self.speed = value;
        }
        if let Some(value) = hue_shift {
            self.hue_shift = value;
        }
        if let Some(value) = saturation {
            self.saturation = value;
        }
        if let Some(value) = lightness {
            self.lightness = value;
        }
        if let Some(value) = format {
            self.format = value;
        }
        if let Some(value) = path_limit {
            self.path_limit = value;
        }
        if let Some(value) = minimum_opacity {
            self.minimum_opacity = value;
        }
        self
    }

    /// Pulls every value back into the range the walk can work with.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        if config.grid_count == 0 {
            log::warn!("grid count of 0 requested, using a single cell");
            config.grid_count = 1;
        }
        if config.canvas_size == 0 {
            log::warn!("canvas size of 0 requested, using 1px");
            config.canvas_size = 1;
        }
        // cells narrower than a pixel cannot be drawn
        let max_grid_count = Coord::try_from(config.canvas_size).unwrap_or(Coord::MAX);
        if config.grid_count > max_grid_count {
            log::warn!(
                "grid count of {} exceeds the {}px canvas, clamped to {}",
                config.grid_count,
                config.canvas_size,
                max_grid_count
            );
            config.grid_count = max_grid_count;
        }
        if config.speed > MAX_SPEED {
            log::warn!(
                "speed of {}ms exceeds what timers support, clamped to {}ms",
                config.speed,
                MAX_SPEED
            );
            config.speed = MAX_SPEED;
        }
        if !config.opacity.is_finite() || config.opacity <= 0.0 {
            log::warn!(
                "opacity of {} would never cover the grid, using {}",
                config.opacity,
                defaults.opacity
            );
            config.opacity = defaults.opacity;
        }
        if !config.hue_shift.is_finite() {
            log::warn!("hue shift is not finite, using {}", defaults.hue_shift);
            config.hue_shift = defaults.hue_shift;
        } else if config.hue_shift < 0.0 {
            let forward = wrap_hue(config.hue_shift);
            log::warn!(
                "negative hue shift of {} runs backwards, using {}",
                config.hue_shift,
                forward
            );
            config.hue_shift = forward;
        }
        config.saturation = clamp_percent("saturation", config.saturation, defaults.saturation);
        config.lightness = clamp_percent("lightness", config.lightness, defaults.lightness);
        if config.path_limit == 0 {
            log::warn!("path limit of 0 requested, keeping a single cell");
            config.path_limit = 1;
        }
        if config.minimum_opacity.is_nan() {
            log::warn!(
                "minimum opacity is not a number, using {}",
                defaults.minimum_opacity
            );
            config.minimum_opacity = defaults.minimum_opacity;
        } else if config.minimum_opacity < 0.0 {
            log::warn!("negative minimum opacity behaves like 0");
            config.minimum_opacity = 0.0;
        }

        config
    }

    /// Pixel size of one lattice cell on the canvas.
    pub fn cell_size(&self) -> f64 {
        f64::from(self.canvas_size) / f64::from(self.grid_count.max(1))
    }

    /// Whether evicted path cells have to be erased again.
    pub const fn erases_path(&self) -> bool {
        matches!(self.format, Format::Border)
    }
}

/// Partial configuration, as submitted by the settings form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalkOptions {
    pub grid_count: Option<Coord>,
    pub canvas_size: Option<u32>,
    pub opacity: Option<f64>,
    pub speed: Option<u32>,
    pub hue_shift: Option<f64>,
    pub saturation: Option<f64>,
    pub lightness: Option<f64>,
    pub format: Option<Format>,
    pub path_limit: Option<usize>,
    #[serde(deserialize_with = "threshold::deserialize_some")]
    pub minimum_opacity: Option<f64>,
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) if !number.is_nan() => Ok(number),
        _ => Err(WalkError::InvalidNumber {
            key: key.to_string(),
        }),
    }
}

fn parse_count(key: &str, value: &str) -> Result<f64> {
    let number = parse_number(key, value)?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(WalkError::InvalidNumber {
            key: key.to_string(),
        })
    }
}

impl WalkOptions {
    /// Parses key/value pairs of a submitted settings form.
    ///
    /// Every value except `format` is a number; fractional values for integer options are truncated
    /// and negative ones saturate at zero. Unknown keys are skipped.
    pub fn from_form_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in entries {
            match key {
                "gridCount" => options.grid_count = Some(parse_count(key, value)? as Coord),
                "canvasSize" => options.canvas_size = Some(parse_count(key, value)? as u32),
                "opacity" => options.opacity = Some(parse_number(key, value)?),
                "speed" => options.speed = Some(parse_count(key, value)? as u32),
                "hueShift" => options.hue_shift = Some(parse_number(key, value)?),
                "saturation" => options.saturation = Some(parse_number(key, value)?),
                "lightness" => options.lightness = Some(parse_number(key, value)?),
                "format" => options.format = Some(value.trim().parse()?),
                "pathLimit" => options.path_limit = Some(parse_count(key, value)? as usize),
                "minimumOpacity" => options.minimum_opacity = Some(parse_number(key, value)?),
                _ => log::debug!("ignoring unknown option {:?}", key),
            }
        }
        Ok(options)
    }
}

/// Serde glue for thresholds that may be infinite, which JSON can only carry as a string.
mod threshold {
    use core::fmt;
    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    struct ThresholdVisitor;

    impl<'de> Visitor<'de> for ThresholdVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or \"Infinity\"")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(ThresholdVisitor)
    }

    pub(super) fn deserialize_some<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        deserialize(deserializer).map(Some)
    }
}
