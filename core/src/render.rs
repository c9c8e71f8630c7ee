use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Gap left around a cell in [`Format::Grid`], and the outline kept when a [`Format::Border`] cell is erased.
pub const CELL_GAP: f64 = 1.0;

/// How a visited cell is drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Solid block without gaps.
    Full,
    /// Solid block with a gap to its neighbors.
    #[default]
    Grid,
    /// Only a trailing path is kept; older cells fade back to their outline.
    Border,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Full, Format::Grid, Format::Border];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Grid => "grid",
            Self::Border => "border",
        }
    }

    /// Geometry of painting `color` at `coords`, or erasing the cell when `color` is `None`.
    pub fn paint_op(self, coords: Coord2, color: Option<Hsla>, cell_size: f64) -> PaintOp {
        let full = Rect::cell(coords, cell_size);
        let inset = full.inset(CELL_GAP);
        match (self, color) {
            (Self::Full, Some(color)) => PaintOp::Fill { rect: full, color },
            (Self::Full, None) => PaintOp::Clear { rect: full },
            (Self::Grid, Some(color)) => PaintOp::Fill { rect: inset, color },
            (Self::Grid | Self::Border, None) => PaintOp::Clear { rect: inset },
            (Self::Border, Some(color)) => PaintOp::Fill { rect: full, color },
        }
    }
}

impl FromStr for Format {
    type Err = WalkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or(WalkError::InvalidFormat)
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn cell((x, y): Coord2, cell_size: f64) -> Self {
        Self {
            x: f64::from(x) * cell_size,
            y: f64::from(y) * cell_size,
            width: cell_size,
            height: cell_size,
        }
    }

    pub fn inset(self, gap: f64) -> Self {
        Self {
            x: self.x + gap,
            y: self.y + gap,
            width: self.width - 2.0 * gap,
            height: self.height - 2.0 * gap,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PaintOp {
    Fill { rect: Rect, color: Hsla },
    Clear { rect: Rect },
}

impl PaintOp {
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Fill { rect, .. } | Self::Clear { rect } => *rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Hsla {
        Hsla::new(0.0, 100.0, 50.0, 1.0)
    }

    #[test]
    fn full_fills_whole_cell() {
        let op = Format::Full.paint_op((2, 1), Some(red()), 10.0);
        assert_eq!(
            op,
            PaintOp::Fill {
                rect: Rect {
                    x: 20.0,
                    y: 10.0,
                    width: 10.0,
                    height: 10.0
                },
                color: red(),
            }
        );
    }

    #[test]
    fn grid_leaves_gap() {
        let op = Format::Grid.paint_op((0, 0), Some(red()), 10.0);
        assert_eq!(
            op.rect(),
            Rect {
                x: 1.0,
                y: 1.0,
                width: 8.0,
                height: 8.0
            }
        );
    }

    #[test]
    fn border_erase_keeps_outline() {
        let painted = Format::Border.paint_op((1, 1), Some(red()), 10.0);
        let erased = Format::Border.paint_op((1, 1), None, 10.0);
        assert_eq!(painted.rect().width, 10.0);
        assert!(matches!(erased, PaintOp::Clear { .. }));
        assert_eq!(
            erased.rect(),
            Rect {
                x: 11.0,
                y: 11.0,
                width: 8.0,
                height: 8.0
            }
        );
    }

    #[test]
    fn format_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>(), Ok(format));
        }
        assert_eq!("Border".parse::<Format>(), Err(WalkError::InvalidFormat));
    }
}
