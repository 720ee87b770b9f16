//! Occupancy, touch, and pickup grids over the field extent. Grids are
//! accumulated as `ndarray::Array2<f32>` and serialized as nested arrays.

use ndarray::Array2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::field::ARENA;
use crate::frame::Vec3;
use crate::normalize::PlayerIndexEntry;

/// A row-major grid; rows span the y extent (defensive blue end first),
/// columns the x extent.
pub type Grid = Vec<Vec<f32>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Heatmaps {
    pub position_occupancy_grid: Grid,
    pub touch_density_grid: Grid,
    pub boost_pickup_grid: Grid,
    /// `null` when no frame data carried boost readings.
    pub boost_usage_grid: Option<Grid>,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> Heatmaps {
    let mut occupancy = Array2::<f32>::zeros((HEATMAP_ROWS, HEATMAP_COLS));
    let mut touches = Array2::<f32>::zeros((HEATMAP_ROWS, HEATMAP_COLS));
    let mut pickups = Array2::<f32>::zeros((HEATMAP_ROWS, HEATMAP_COLS));
    let mut usage = Array2::<f32>::zeros((HEATMAP_ROWS, HEATMAP_COLS));
    let mut any_usage = false;

    let deltas = ctx.frame_deltas();
    let mut previous_boost: Option<f32> = None;
    for (frame, dt) in ctx.timeline.iter().zip(deltas.iter()) {
        let Some(player) = frame.player(entry.slot) else {
            previous_boost = None;
            continue;
        };
        let (row, col) = cell_of(player.position);
        occupancy[(row, col)] += dt;

        if let Some(previous) = previous_boost {
            if player.boost_amount < previous {
                usage[(row, col)] += previous - player.boost_amount;
                any_usage = true;
            }
        }
        previous_boost = Some(player.boost_amount);
    }

    let id = entry.info.canonical_id.as_str();
    for touch in ctx.events.touches.iter().filter(|t| t.player_id == id) {
        let (row, col) = cell_of(touch.location);
        touches[(row, col)] += 1.0;
    }
    for pickup in ctx
        .events
        .boost_pickups
        .iter()
        .filter(|p| p.player_id.as_deref() == Some(id))
    {
        if let Some(pad) = crate::field::pad_by_id(pickup.pad_id) {
            let (row, col) = cell_of(pad.position);
            pickups[(row, col)] += 1.0;
        }
    }

    Heatmaps {
        position_occupancy_grid: to_grid(&occupancy),
        touch_density_grid: to_grid(&touches),
        boost_pickup_grid: to_grid(&pickups),
        boost_usage_grid: if any_usage { Some(to_grid(&usage)) } else { None },
    }
}

fn cell_of(position: Vec3) -> (usize, usize) {
    let x_extent = ARENA.side_wall_x * 2.0;
    let y_extent = ARENA.back_wall_y * 2.0;
    let col = ((position.x + ARENA.side_wall_x) / x_extent * HEATMAP_COLS as f32)
        .floor()
        .clamp(0.0, (HEATMAP_COLS - 1) as f32) as usize;
    let row = ((position.y + ARENA.back_wall_y) / y_extent * HEATMAP_ROWS as f32)
        .floor()
        .clamp(0.0, (HEATMAP_ROWS - 1) as f32) as usize;
    (row, col)
}

fn to_grid(array: &Array2<f32>) -> Grid {
    array.outer_iter().map(|row| row.to_vec()).collect()
}
