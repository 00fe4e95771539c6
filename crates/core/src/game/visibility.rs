//! Angular-sweep field of view producing per-tile light and line of sight.
//! This module exists to keep the octant sweep and light accumulation deterministic and isolated.
//! It does not own the distance fields or any decision made from what is visible.

use super::*;

const ANGLE_EPSILON: f64 = 0.001;

/// Whether a sweep is the authoritative sight pass or only adds light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepMode {
    /// Marks line of sight and exploration; keeps going after light fades
    /// so line of sight is still established.
    Sight,
    /// Adds light only and stops once the light level is no longer visible.
    LightOnly,
}

#[derive(Clone, Copy, Debug)]
struct AngleRange {
    distance: i32,
    min_angle: f64,
    max_angle: f64,
    light: f64,
}

/// Sweeps all eight octants around `origin`, adding light to every tile it
/// reaches. Does not clear previous results.
pub(super) fn compute_fov(
    grid: &mut Grid,
    origin: Pos,
    decay: f64,
    mode: SweepMode,
    distance_cap: i32,
) {
    let threshold = f64::from(grid.visible_threshold());
    for dir in Direction::ALL {
        let mut ranges = VecDeque::new();
        ranges.push_back(AngleRange { distance: 1, min_angle: 0.0, max_angle: 1.0, light: 1.0 });

        while let Some(range) = ranges.pop_front() {
            if mode == SweepMode::LightOnly && range.light < threshold {
                continue;
            }
            if range.distance > distance_cap {
                continue;
            }
            let row = row_in_octant(grid, origin, range.distance, dir);
            sweep_row(grid, &range, &row, &mut ranges, decay, mode);
        }
    }
}

/// Tiles at `distance` in the octant whose right edge is `dir`, starting at
/// the straight edge. Stops at the first out-of-bounds tile.
fn row_in_octant(grid: &Grid, origin: Pos, distance: i32, dir: Direction) -> Vec<Pos> {
    let mut row = Vec::with_capacity(distance as usize + 1);
    for i in 0..=distance {
        let (dy, dx) = match dir {
            Direction::N => (-distance, -i),
            Direction::NW => (-i, -distance),
            Direction::W => (i, -distance),
            Direction::SW => (distance, -i),
            Direction::S => (distance, i),
            Direction::SE => (i, distance),
            Direction::E => (-i, distance),
            Direction::NE => (-distance, i),
        };
        let pos = Pos { y: origin.y + dy, x: origin.x + dx };
        if !grid.in_bounds(pos) {
            break;
        }
        row.push(pos);
    }
    row
}

/// Lights one row and queues the unblocked angle spans for the next band.
fn sweep_row(
    grid: &mut Grid,
    range: &AngleRange,
    row: &[Pos],
    queue: &mut VecDeque<AngleRange>,
    decay: f64,
    mode: SweepMode,
) {
    let delta = 0.5 / f64::from(range.distance);
    let threshold = grid.visible_threshold();
    let next_light = range.light * (1.0 - decay) * (1.0 - decay);
    let next_distance = range.distance + 1;

    let mut angle = 0.0;
    let mut new_min = range.min_angle;
    let mut new_max = range.max_angle;
    let mut prev_lightable = false;
    let mut first = true;

    for &pos in row {
        let Some(tile) = grid.tile_mut(pos) else {
            break;
        };
        let lightable = tile.is_lightable();

        if angle > range.max_angle && (angle - range.max_angle).abs() > ANGLE_EPSILON {
            // Past the range: partially light the boundary tile.
            let visible = (range.max_angle - angle) / (2.0 * delta) + 0.5;
            if visible > 0.0 {
                tile.add_light((visible * range.light) as f32);
            }
            if mode == SweepMode::Sight {
                tile.los = true;
            }
            if !lightable {
                new_max = angle - delta;
            }
            break;
        }

        if angle > range.min_angle || (angle - range.min_angle).abs() < ANGLE_EPSILON {
            let begin = angle - delta;
            let end = angle + delta;

            // Edge tiles are shared between two octants, so each contributes half.
            let contribution = if end > range.max_angle {
                ((range.max_angle - angle) / (2.0 * delta) + 0.5) * range.light
            } else if begin < range.min_angle {
                ((angle - range.min_angle) / (2.0 * delta) + 0.5) * range.light
            } else {
                range.light
            };
            tile.add_light(contribution as f32);

            if mode == SweepMode::Sight {
                tile.los = true;
                if tile.light() > threshold {
                    tile.explored = true;
                }
            }

            if first {
                first = false;
                new_min = if lightable { range.min_angle } else { end };
            } else if prev_lightable && !lightable {
                queue.push_back(AngleRange {
                    distance: next_distance,
                    min_angle: new_min,
                    max_angle: begin,
                    light: next_light,
                });
                new_min = end;
            } else if !lightable {
                new_min = end;
            }
        }

        prev_lightable = lightable;
        angle += 2.0 * delta;
    }

    if prev_lightable {
        queue.push_back(AngleRange {
            distance: next_distance,
            min_angle: new_min,
            max_angle: new_max,
            light: next_light,
        });
    }
}

impl Game {
    /// Clears and recomputes light and line of sight: fire light first, then
    /// the player's sight pass.
    pub(super) fn refresh_sight(&mut self) {
        self.grid.clear_sight();

        let fires: Vec<Pos> =
            self.entities.values().filter(|entity| entity.is_fire()).map(|fire| fire.pos).collect();
        for pos in fires {
            if let Some(tile) = self.grid.tile_mut(pos) {
                tile.add_light(1.0);
            }
            compute_fov(
                &mut self.grid,
                pos,
                self.config.fire_light_decay,
                SweepMode::LightOnly,
                self.config.fov_distance_cap,
            );
        }

        let Some(origin) = self.player().map(|player| player.pos) else {
            return;
        };
        if let Some(tile) = self.grid.tile_mut(origin) {
            tile.set_light(1.0);
            tile.los = true;
            tile.explored = true;
        }
        compute_fov(
            &mut self.grid,
            origin,
            self.config.light_decay,
            SweepMode::Sight,
            self.config.fov_distance_cap,
        );
    }

    /// Recomputes everything derived from the player's position: sight, then
    /// both distance fields.
    pub fn refresh(&mut self) {
        self.refresh_sight();
        self.refresh_fields();
        debug!(turn = self.turn, "sight and distance fields refreshed");
    }

    /// Whether any hostile actor currently stands on a visible tile.
    pub fn hostile_in_view(&self) -> bool {
        self.entities.values().any(|entity| entity.is_hostile() && self.grid.is_visible(entity.pos))
    }
}
