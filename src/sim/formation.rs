//! Destructible block formation
//!
//! Builds the triangular stack of blocks as pure placement data. The same
//! `(row, col)` derivation is used in reverse by the viewport adapter to
//! re-place live blocks by index, so both directions live here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::GeometryProfile;
use crate::consts::BLOCK_SPACING_FACTOR;

/// Color tag for a block; rendering maps it to CSS colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockColor {
    Crimson,
    Amber,
    Jade,
    Azure,
    Violet,
}

impl BlockColor {
    pub fn as_css(&self) -> &'static str {
        match self {
            BlockColor::Crimson => "#e64545",
            BlockColor::Amber => "#e6a23c",
            BlockColor::Jade => "#4caf7d",
            BlockColor::Azure => "#3c8de6",
            BlockColor::Violet => "#9b5de5",
        }
    }

    /// Default row color cycle, bottom to top
    pub fn default_palette() -> Vec<BlockColor> {
        vec![
            BlockColor::Crimson,
            BlockColor::Amber,
            BlockColor::Jade,
            BlockColor::Azure,
        ]
    }
}

/// Shape catalog entry selectable in edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Square,
    Wide,
    Tall,
}

impl ShapeKind {
    /// Block dimensions at reference scale
    pub fn dimensions(&self) -> BlockShape {
        match self {
            ShapeKind::Square => BlockShape {
                width: 40.0,
                height: 40.0,
            },
            ShapeKind::Wide => BlockShape {
                width: 60.0,
                height: 30.0,
            },
            ShapeKind::Tall => BlockShape {
                width: 30.0,
                height: 60.0,
            },
        }
    }
}

/// Unscaled block dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockShape {
    pub width: f32,
    pub height: f32,
}

/// Placement for one block: position, size, and material tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub row: usize,
    pub col: usize,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub color: BlockColor,
}

/// Total block count for a pyramid of `rows` rows
#[inline]
pub fn block_count(rows: usize) -> usize {
    rows * (rows + 1) / 2
}

/// Invert a build-order index into `(row, col)`. Blocks are emitted bottom
/// row first; row `r` of an `R`-row pyramid has `R - r` blocks.
pub fn row_col(index: usize, rows: usize) -> (usize, usize) {
    let mut remaining = index;
    for row in 0..rows {
        let width = rows - row;
        if remaining < width {
            return (row, remaining);
        }
        remaining -= width;
    }
    // Past the last block; callers iterate within block_count(rows)
    (rows, 0)
}

/// Center of block `(row, col)` under a profile. Each upper row shifts right
/// by half a spacing so every block rests centered over the gap between its
/// two supporters.
pub fn block_center(profile: &GeometryProfile, shape: BlockShape, row: usize, col: usize) -> Vec2 {
    let spacing = shape.width * profile.scale * BLOCK_SPACING_FACTOR;
    let half_h = shape.height * profile.scale / 2.0;
    Vec2::new(
        profile.formation_base.x + col as f32 * spacing + row as f32 * spacing / 2.0,
        profile.formation_base.y - half_h - row as f32 * spacing,
    )
}

/// Half extents of a block under a profile
#[inline]
pub fn block_half_extents(profile: &GeometryProfile, shape: BlockShape) -> Vec2 {
    Vec2::new(
        shape.width * profile.scale / 2.0,
        shape.height * profile.scale / 2.0,
    )
}

/// Build the full pyramid placement, bottom row first. Pure and
/// deterministic: identical inputs give geometrically identical output,
/// which is what makes a clean reset possible.
pub fn build(
    profile: &GeometryProfile,
    rows: usize,
    shape: BlockShape,
    colors: &[BlockColor],
) -> Vec<BlockSpec> {
    // A persisted palette can deserialize empty; fall back instead of
    // indexing into it
    let fallback;
    let colors = if colors.is_empty() {
        fallback = BlockColor::default_palette();
        &fallback[..]
    } else {
        colors
    };

    let half = block_half_extents(profile, shape);
    let mut specs = Vec::with_capacity(block_count(rows));
    for row in 0..rows {
        let color = colors[row % colors.len()];
        for col in 0..rows - row {
            specs.push(BlockSpec {
                row,
                col,
                center: block_center(profile, shape, row, col),
                half_extents: half,
                color,
            });
        }
    }
    specs
}
