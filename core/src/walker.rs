use rand::prelude::*;

use crate::*;

/// Draws before giving up on luck and taking the first direction that moves.
///
/// Even in a corner five of eight directions move, so this is never reached in practice.
pub const MAX_DIRECTION_DRAWS: usize = 64;

pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.random_range(0..Direction::ALL.len())]
}

/// Picks the cell the walk moves to from `current`.
///
/// A uniformly random direction is clamped to the lattice; draws that the edge fully absorbs are
/// discarded, so for `grid_count > 1` the result always differs from `current`. A single-cell
/// lattice has nowhere to go and yields `current` itself.
pub fn next_coordinate<R: Rng + ?Sized>(current: Coord2, grid_count: Coord, rng: &mut R) -> Coord2 {
    if grid_count <= 1 {
        return current;
    }

    for _ in 0..MAX_DIRECTION_DRAWS {
        let next = neighbor(current, random_direction(rng), grid_count);
        if next != current {
            return next;
        }
    }

    log::warn!(
        "no move from {:?} after {} draws, taking the first open direction",
        current,
        MAX_DIRECTION_DRAWS
    );
    first_open_neighbor(current, grid_count)
}

/// First neighbor in [`Direction::ALL`] order that is not `current`.
fn first_open_neighbor(current: Coord2, grid_count: Coord) -> Coord2 {
    Direction::ALL
        .into_iter()
        .map(|direction| neighbor(current, direction, grid_count))
        .find(|&next| next != current)
        .unwrap_or(current)
}
