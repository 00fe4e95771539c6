//! Multi-source step-distance fields over the explored, non-wall grid.
//! This module exists so chase behavior, auto-explore and turn tie-breaking share one metric.
//! It does not own what an actor does with the next step it is offered.

use super::*;

/// Minimum step count from the nearest seed for every reachable cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    costs: Vec<Option<u32>>,
}

/// A neighbor offered by [`DistanceField::move_toward`] and its field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub pos: Pos,
    pub cost: u32,
}

impl DistanceField {
    pub fn unreached(width: usize, height: usize) -> Self {
        Self { width, height, costs: vec![None; width * height] }
    }

    /// Breadth-first relaxation from `seeds`. Expansion only enters cells that
    /// are explored and not walls; seeds themselves may be anything in bounds.
    pub fn compute(grid: &Grid, seeds: impl IntoIterator<Item = (Pos, u32)>) -> Self {
        let mut field = Self::unreached(grid.width(), grid.height());
        let mut frontier = VecDeque::new();
        for (pos, cost) in seeds {
            if let Some(idx) = field.index(pos) {
                field.costs[idx] = Some(cost);
                frontier.push_back((pos, cost));
            }
        }

        while let Some((pos, cost)) = frontier.pop_front() {
            let next_cost = cost + 1;
            for next in grid.neighbors(pos) {
                let Some(tile) = grid.tile(next) else {
                    continue;
                };
                if tile.is_wall() || !tile.explored {
                    continue;
                }
                let Some(idx) = field.index(next) else {
                    continue;
                };
                if field.costs[idx].is_none_or(|known| next_cost < known) {
                    field.costs[idx] = Some(next_cost);
                    frontier.push_back((next, next_cost));
                }
            }
        }

        field
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `None` for unreached or out-of-bounds cells.
    pub fn cost(&self, pos: Pos) -> Option<u32> {
        self.index(pos).and_then(|idx| self.costs[idx])
    }

    /// The neighbor with the strictly lowest value below `from`'s own, first
    /// in `Direction::ALL` order on ties. `None` at the goal, on a plateau, or
    /// when `from` is unreached.
    pub fn move_toward(&self, from: Pos) -> Option<Step> {
        self.move_toward_where(from, |_| true)
    }

    /// Like [`DistanceField::move_toward`], restricted to neighbors accepted by
    /// `allowed`.
    pub fn move_toward_where(&self, from: Pos, allowed: impl Fn(Pos) -> bool) -> Option<Step> {
        let mut best = self.cost(from)?;
        let mut next = None;
        for dir in Direction::ALL {
            let pos = from.offset(dir);
            if let Some(cost) = self.cost(pos)
                && cost < best
                && allowed(pos)
            {
                best = cost;
                next = Some(Step { pos, cost });
            }
        }
        next
    }

    /// Successive steps from `from` down the field until the goal or a plateau.
    pub fn descend_path(&self, from: Pos) -> Vec<Step> {
        let mut path = Vec::new();
        let mut current = from;
        while let Some(step) = self.move_toward(current) {
            path.push(step);
            if step.cost == 0 {
                break;
            }
            current = step.pos;
        }
        path
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| (pos.y as usize) * self.width + pos.x as usize)
    }
}

impl Game {
    /// Rebuilds both standing fields: distance to the player, and distance to
    /// the nearest unexplored cell.
    pub(super) fn refresh_fields(&mut self) {
        let player_seed = self.player().map(|player| (player.pos, 0));
        self.player_field = DistanceField::compute(&self.grid, player_seed);

        let unexplored: Vec<(Pos, u32)> = self
            .grid
            .positions()
            .filter(|pos| !self.grid.is_explored(*pos))
            .map(|pos| (pos, 0))
            .collect();
        self.explore_field = DistanceField::compute(&self.grid, unexplored);
    }

    /// Steps from `from` toward the player along the player field.
    pub fn descend_path(&self, from: Pos) -> Vec<Step> {
        self.player_field.descend_path(from)
    }
}
