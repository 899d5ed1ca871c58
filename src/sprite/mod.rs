// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Sheet Geometry                                      │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ Layout            │ frame -> (column, row)                               │
// ├───────────────────┼──────────────────────────────────────────────────────┤
// │ Strip horizontal  │ (frame, 0)                                           │
// │ Strip vertical    │ (0, frame)                                           │
// │ Grid c x r        │ (frame % c, frame / c)                               │
// └───────────────────┴──────────────────────────────────────────────────────┘
// - frame size = sheet size / (columns, rows)
// - source rect = (column * frame width, row * frame height, frame size)
mod animation;

pub use self::animation::Animation;

use crate::engine::{Point, Rect, Size};
use anyhow::{anyhow, ensure, Result};
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripDirection {
    Horizontal,
    Vertical,
}

/// How frames are laid out on the sheet image
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetLayout {
    Strip {
        frame_count: u32,
        direction: StripDirection,
    },
    Grid {
        columns: u32,
        rows: u32,
    },
}

impl SheetLayout {
    pub fn columns(&self) -> u32 {
        match *self {
            SheetLayout::Strip {
                frame_count,
                direction: StripDirection::Horizontal,
            } => frame_count,
            SheetLayout::Strip {
                direction: StripDirection::Vertical,
                ..
            } => 1,
            SheetLayout::Grid { columns, .. } => columns,
        }
    }

    pub fn rows(&self) -> u32 {
        match *self {
            SheetLayout::Strip {
                direction: StripDirection::Horizontal,
                ..
            } => 1,
            SheetLayout::Strip {
                frame_count,
                direction: StripDirection::Vertical,
            } => frame_count,
            SheetLayout::Grid { rows, .. } => rows,
        }
    }

    /// None when columns * rows does not fit a u32
    pub fn total_frames(&self) -> Option<u32> {
        self.columns().checked_mul(self.rows())
    }
}

/// Sheet geometry, derived once the sheet image has loaded and immutable
/// afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteSheet {
    layout: SheetLayout,
    total_frames: u32,
    frame_size: Size,
    frame_speed: u32,
}

impl SpriteSheet {
    /// `sheet_size` is the natural pixel size of the loaded image, an image
    /// that has not loaded reports 0 x 0 and is rejected here.
    pub fn new(sheet_size: Size, layout: SheetLayout, frame_speed: u32) -> Result<Self> {
        ensure!(
            sheet_size.width > 0.0 && sheet_size.height > 0.0,
            "sprite sheet has no pixels ({} x {}), was it loaded?",
            sheet_size.width,
            sheet_size.height
        );
        let total_frames = layout
            .total_frames()
            .ok_or_else(|| anyhow!("sprite sheet layout {:?} has too many frames", layout))?;
        ensure!(
            total_frames > 0,
            "sprite sheet layout {:?} has no frames",
            layout
        );
        ensure!(frame_speed > 0, "frame speed must be at least one tick");

        let frame_size = Size {
            width: sheet_size.width / f64::from(layout.columns()),
            height: sheet_size.height / f64::from(layout.rows()),
        };

        Ok(SpriteSheet {
            layout,
            total_frames,
            frame_size,
            frame_speed,
        })
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    pub fn frame_speed(&self) -> u32 {
        self.frame_speed
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// (column, row) of a frame
    pub fn cell(&self, frame: u32) -> (u32, u32) {
        let columns = self.layout.columns();
        (frame % columns, frame / columns)
    }

    /// Sub rectangle of the sheet holding `frame`
    pub fn source_rect(&self, frame: u32) -> Rect {
        let (column, row) = self.cell(frame);
        Rect::new(
            Point {
                x: f64::from(column) * self.frame_size.width,
                y: f64::from(row) * self.frame_size.height,
            },
            self.frame_size,
        )
    }

    /// Inverse of `source_rect` : frame whose cell contains `source`
    pub fn frame_at(&self, source: Point) -> u32 {
        let column = (source.x / self.frame_size.width).floor() as u32;
        let row = (source.y / self.frame_size.height).floor() as u32;
        row * self.layout.columns() + column
    }
}
