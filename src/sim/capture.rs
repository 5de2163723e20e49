//! Region capture
//!
//! When a trail closes, every hidden region that no adversary can reach is
//! claimed. Trail tiles count as walls for the fill (they just closed the loop).

use glam::Vec2;

use super::grid::{Tile, TileGrid, TilePos};
use crate::tile_of;

/// Outcome of one closure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResult {
    /// Hidden tiles converted to revealed
    pub captured: Vec<TilePos>,
    /// Former trail tiles, now revealed
    pub sealed: Vec<TilePos>,
}

impl CaptureResult {
    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }
}

/// Mark every hidden tile reachable from any adversary.
///
/// `grid` is read with trail tiles treated as revealed. Uses an explicit stack
/// so large grids can't blow the call stack; each tile is pushed at most once.
pub fn adversary_reach(grid: &TileGrid, adversaries: impl IntoIterator<Item = Vec2>) -> Vec<bool> {
    let blocked = |t: Tile| t != Tile::Hidden;
    let mut visited = vec![false; grid.len()];
    let mut stack: Vec<(u32, u32)> = Vec::new();

    for pos in adversaries {
        let (ax, ay) = tile_of(pos);
        let Some(origin) = grid.get_signed(ax, ay) else {
            continue;
        };
        if blocked(origin) {
            // Sitting on revealed/trail ground: nothing to protect
            continue;
        }
        let origin_idx = grid.index(ax as u32, ay as u32);
        if visited[origin_idx] {
            // Shares a region with an earlier adversary
            continue;
        }

        visited[origin_idx] = true;
        stack.push((ax as u32, ay as u32));

        while let Some((x, y)) = stack.pop() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                let Some(tile) = grid.get_signed(nx, ny) else {
                    continue;
                };
                if blocked(tile) {
                    continue;
                }
                let ni = grid.index(nx as u32, ny as u32);
                if !visited[ni] {
                    visited[ni] = true;
                    stack.push((nx as u32, ny as u32));
                }
            }
        }
    }

    visited
}

/// Close the trail: seal trail tiles and capture unreachable hidden tiles.
///
/// Scoring and combo bookkeeping are left to the caller.
pub fn close_trail(
    grid: &mut TileGrid,
    trail: Vec<TilePos>,
    adversaries: impl IntoIterator<Item = Vec2>,
) -> CaptureResult {
    // Trail tiles are not Hidden, so the fill already treats them as walls
    let reach = adversary_reach(grid, adversaries);

    let mut captured = Vec::new();
    for (i, tile) in grid.tiles_mut().iter_mut().enumerate() {
        if *tile == Tile::Hidden && !reach[i] {
            *tile = Tile::Revealed;
            captured.push(i);
        }
    }
    let captured = captured.into_iter().map(|i| grid.pos_of(i)).collect();

    let mut sealed = Vec::with_capacity(trail.len());
    for pos in trail {
        if grid.get(pos) == Tile::Trail {
            grid.set(pos, Tile::Revealed);
            sealed.push(pos);
        }
    }

    CaptureResult { captured, sealed }
}
