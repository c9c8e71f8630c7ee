use rand::prelude::*;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Drawing surface the walk paints on.
pub trait Canvas {
    /// Prepares an empty surface for a walk with `config`.
    fn reset(&mut self, config: &WalkConfig);

    /// Paints `coords` with `color`, or erases the cell when `color` is `None`.
    fn paint(&mut self, coords: Coord2, color: Option<Hsla>);

    /// The walk covered the whole grid after `total_steps` fills.
    fn done(&mut self, total_steps: u64);
}

/// Runs [`WalkDriver::step`] with the given ticket once the delay elapsed.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: StepTicket);

    /// Drops the pending step, if any.
    fn cancel(&mut self);
}

/// Handle for a scheduled step, only honored by the walk that issued it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepTicket {
    generation: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl WalkState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// Nothing happened: the ticket was stale or the walk is not running.
    Skipped,
    /// Moved to `coords`; `tick` steps have been taken so far.
    Moved { coords: Coord2, tick: u64 },
    /// This step covered the grid.
    Completed { total_steps: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ControlOutcome {
    NoChange,
    Changed,
}

/// Owns one walk: its configuration, coverage, trailing path and the chain of scheduled steps.
pub struct WalkDriver<C, S> {
    canvas: C,
    scheduler: S,
    rng: SmallRng,
    config: WalkConfig,
    coverage: CoverageTracker,
    history: PathHistory,
    position: Option<Coord2>,
    tick: u64,
    state: WalkState,
    generation: u32,
    started_at: Option<Instant>,
}

impl<C: Canvas, S: Scheduler> WalkDriver<C, S> {
    pub fn new(canvas: C, scheduler: S, seed: u64) -> Self {
        Self {
            canvas,
            scheduler,
            rng: SmallRng::seed_from_u64(seed),
            config: WalkConfig::default(),
            coverage: CoverageTracker::default(),
            history: PathHistory::new(),
            position: None,
            tick: 0,
            state: WalkState::Idle,
            generation: 0,
            started_at: None,
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn position(&self) -> Option<Coord2> {
        self.position
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Starts a fresh walk with `config`, taking the first step at `start` (the top-left cell by default).
    ///
    /// Any step still scheduled for a previous walk is invalidated.
    pub fn restart(&mut self, config: WalkConfig, start: Option<Coord2>) -> Result<StepOutcome> {
        let config = config.sanitized();
        let start = start.unwrap_or((0, 0));
        if !in_bounds(start, config.grid_count) {
            return Err(WalkError::InvalidCoords);
        }

        self.invalidate_pending();
        self.config = config;
        self.canvas.reset(&self.config);
        self.coverage.reset(config.grid_count);
        self.history.clear();
        self.position = None;
        self.tick = 0;
        self.state = WalkState::Running;
        self.started_at = Some(Instant::now());
        log::debug!(
            "restart: {}x{} grid from {:?}",
            config.grid_count,
            config.grid_count,
            start
        );

        self.advance(Some(start))
    }

    pub fn pause(&mut self) -> ControlOutcome {
        if !self.state.is_running() {
            return ControlOutcome::NoChange;
        }
        self.invalidate_pending();
        self.state = WalkState::Paused;
        log::debug!("paused at {:?} after {} steps", self.position, self.tick);
        ControlOutcome::Changed
    }

    /// Continues a paused walk from where it stopped.
    pub fn play(&mut self) -> Result<StepOutcome> {
        if !matches!(self.state, WalkState::Paused) {
            return Ok(StepOutcome::Skipped);
        }
        self.state = WalkState::Running;
        log::debug!("resumed at {:?}", self.position);
        self.advance(None)
    }

    /// Runs the step `ticket` was issued for, unless the walk moved on since.
    pub fn step(&mut self, ticket: StepTicket) -> Result<StepOutcome> {
        if ticket.generation != self.generation || !self.state.is_running() {
            log::trace!("skipping stale step {:?}", ticket);
            return Ok(StepOutcome::Skipped);
        }
        self.advance(None)
    }

    fn invalidate_pending(&mut self) {
        self.scheduler.cancel();
        self.generation = self.generation.wrapping_add(1);
    }

    fn advance(&mut self, coords: Option<Coord2>) -> Result<StepOutcome> {
        let coords = match coords {
            Some(coords) => coords,
            None => {
                let current = self.position.unwrap_or((0, 0));
                next_coordinate(current, self.config.grid_count, &mut self.rng)
            }
        };

        if let Some(eviction) = self.history.push(coords, self.config.path_limit) {
            if self.config.erases_path() && eviction.needs_erase() {
                self.canvas.paint(eviction.coords, None);
            }
        }

        let color = Hsla::for_tick(self.tick, &self.config);
        self.coverage.record(coords, color, self.config.opacity)?;
        self.canvas.paint(coords, Some(color));
        self.position = Some(coords);
        self.tick += 1;
        log::trace!("step {} at {:?} with {}", self.tick, coords, color);

        if self.coverage.is_complete(self.config.minimum_opacity) {
            return Ok(self.complete());
        }

        self.scheduler.schedule(
            self.config.speed,
            StepTicket {
                generation: self.generation,
            },
        );
        Ok(StepOutcome::Moved {
            coords,
            tick: self.tick,
        })
    }

    fn complete(&mut self) -> StepOutcome {
        self.state = WalkState::Completed;
        self.invalidate_pending();

        if self.config.erases_path() {
            for coords in self.history.iter() {
                self.canvas.paint(coords, None);
            }
        }

        if let Some(started_at) = self.started_at {
            log::info!(
                "square done after {} color fills in {:?}",
                self.tick,
                started_at.elapsed()
            );
        }
        self.canvas.done(self.tick);
        StepOutcome::Completed {
            total_steps: self.tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn driver(seed: u64) -> WalkDriver<PaintLog, ManualScheduler> {
        WalkDriver::new(PaintLog::default(), ManualScheduler::default(), seed)
    }

    fn config(grid_count: Coord) -> WalkConfig {
        WalkConfig {
            grid_count,
            opacity: 1.0,
            minimum_opacity: 1.0,
            ..WalkConfig::default()
        }
    }

    #[test]
    fn restart_paints_start_and_schedules_next_step() {
        let mut walk = driver(1);

        let outcome = walk.restart(config(3), Some((1, 2))).unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Moved {
                coords: (1, 2),
                tick: 1
            }
        );
        assert_eq!(walk.state(), WalkState::Running);
        assert_eq!(walk.canvas().resets, 1);
        assert_eq!(walk.canvas().painted(), [(1, 2)]);
        assert_eq!(walk.scheduler().pending().map(|(delay, _)| delay), Some(10));
        assert_eq!(walk.coverage().cell_at((1, 2)).unwrap().accumulated_opacity, 1.0);
    }

    #[test]
    fn restart_rejects_start_outside_grid() {
        let mut walk = driver(1);
        assert_eq!(
            walk.restart(config(3), Some((3, 0))),
            Err(WalkError::InvalidCoords)
        );
        assert_eq!(walk.state(), WalkState::Idle);
        assert_eq!(walk.canvas().resets, 0);
    }

    #[test]
    fn first_step_uses_hue_zero_then_shifts() {
        let mut walk = driver(2);
        let config = WalkConfig {
            hue_shift: 10.0,
            ..config(4)
        };
        walk.restart(config, None).unwrap();
        walk.run_pending(2).unwrap();

        let hues: Vec<_> = walk
            .canvas()
            .ops
            .iter()
            .filter_map(|(_, color)| color.map(|color| color.hue))
            .collect();
        assert_eq!(hues, [0.0, 10.0, 20.0]);
    }

    #[test]
    fn completes_exactly_when_last_cell_is_covered() {
        let mut walk = driver(42);
        walk.restart(config(2), None).unwrap();

        let outcome = walk.run_pending(10_000).unwrap();

        let StepOutcome::Completed { total_steps } = outcome else {
            panic!("walk did not finish: {:?}", outcome);
        };
        assert_eq!(walk.canvas().done, Some(total_steps));
        assert_eq!(walk.tick_count(), total_steps);
        assert!(total_steps >= 4);
        assert!(walk.coverage().is_complete(1.0));
        assert!(walk.scheduler().pending().is_none());

        // the final paint is the one that filled the last uncovered cell
        let painted = walk.canvas().painted();
        let (last, earlier) = painted.split_last().unwrap();
        assert!(!earlier.contains(last));
    }

    #[test]
    fn zero_threshold_completes_on_first_step() {
        let mut walk = driver(3);
        let config = WalkConfig {
            minimum_opacity: 0.0,
            ..WalkConfig::default()
        };

        let outcome = walk.restart(config, None).unwrap();

        assert_eq!(outcome, StepOutcome::Completed { total_steps: 1 });
        assert_eq!(walk.canvas().done, Some(1));
    }

    #[test]
    fn single_cell_grid_repaints_until_covered() {
        let mut walk = driver(4);
        let config = WalkConfig {
            grid_count: 1,
            opacity: 0.25,
            minimum_opacity: 1.0,
            ..WalkConfig::default()
        };
        walk.restart(config, None).unwrap();

        let outcome = walk.run_pending(100).unwrap();

        assert_eq!(outcome, StepOutcome::Completed { total_steps: 4 });
        assert_eq!(walk.canvas().painted(), [(0, 0); 4]);
    }

    #[test]
    fn infinite_threshold_keeps_walking() {
        let mut walk = driver(5);
        let config = WalkConfig {
            minimum_opacity: f64::INFINITY,
            ..config(2)
        };
        walk.restart(config, None).unwrap();

        let outcome = walk.run_pending(500).unwrap();

        assert!(matches!(outcome, StepOutcome::Moved { tick: 501, .. }));
        assert_eq!(walk.state(), WalkState::Running);
        assert_eq!(walk.canvas().done, None);
    }

    #[test]
    fn pause_turns_pending_step_into_noop() {
        let mut walk = driver(6);
        walk.restart(config(5), None).unwrap();
        walk.run_pending(3).unwrap();
        let (_, ticket) = walk.scheduler().pending().unwrap();
        let position = walk.position();
        let painted = walk.canvas().ops.len();

        assert_eq!(walk.pause(), ControlOutcome::Changed);
        assert_eq!(walk.step(ticket), Ok(StepOutcome::Skipped));

        assert_eq!(walk.state(), WalkState::Paused);
        assert_eq!(walk.position(), position);
        assert_eq!(walk.tick_count(), 4);
        assert_eq!(walk.canvas().ops.len(), painted);
        assert_eq!(walk.pause(), ControlOutcome::NoChange);
    }

    #[test]
    fn play_continues_from_paused_position() {
        let mut walk = driver(7);
        walk.restart(config(5), None).unwrap();
        walk.run_pending(3).unwrap();
        let (_, stale) = walk.scheduler().pending().unwrap();
        let position = walk.position().unwrap();
        walk.pause();

        let StepOutcome::Moved { coords, tick } = walk.play().unwrap() else {
            panic!("play did not step");
        };

        assert_eq!(tick, 5);
        assert!(position.0.abs_diff(coords.0) <= 1 && position.1.abs_diff(coords.1) <= 1);
        assert_ne!(coords, position);
        assert_eq!(walk.step(stale), Ok(StepOutcome::Skipped));
        assert!(walk.scheduler().pending().is_some());
    }

    #[test]
    fn restart_invalidates_previous_walk() {
        let mut walk = driver(8);
        walk.restart(config(5), None).unwrap();
        let (_, stale) = walk.scheduler().pending().unwrap();

        walk.restart(config(3), Some((2, 2))).unwrap();

        assert_eq!(walk.step(stale), Ok(StepOutcome::Skipped));
        assert_eq!(walk.tick_count(), 1);
        assert_eq!(walk.coverage().total_cells(), 9);
        assert_eq!(walk.history().iter().collect::<Vec<_>>(), [(2, 2)]);
        assert!(walk.scheduler().cancels >= 1);
    }

    #[test]
    fn play_after_completion_is_noop() {
        let mut walk = driver(9);
        walk.restart(config(2), None).unwrap();
        walk.run_pending(10_000).unwrap();
        let total = walk.tick_count();

        assert_eq!(walk.play(), Ok(StepOutcome::Skipped));
        assert_eq!(walk.pause(), ControlOutcome::NoChange);
        assert_eq!(walk.tick_count(), total);
        assert_eq!(walk.state(), WalkState::Completed);
    }

    #[test]
    fn play_before_restart_is_noop() {
        let mut walk = driver(10);
        assert_eq!(walk.play(), Ok(StepOutcome::Skipped));
        assert_eq!(walk.state(), WalkState::Idle);
        assert!(walk.canvas().ops.is_empty());
    }

    #[test]
    fn border_mode_erases_cells_leaving_the_path() {
        let mut walk = driver(11);
        let config = WalkConfig {
            format: Format::Border,
            path_limit: 3,
            minimum_opacity: f64::INFINITY,
            ..config(6)
        };
        walk.restart(config, None).unwrap();
        walk.run_pending(40).unwrap();

        // an erased cell is neither among the two cells painted before it nor the one painted right after
        let ops = &walk.canvas().ops;
        for (index, &(coords, color)) in ops.iter().enumerate() {
            if color.is_some() {
                continue;
            }
            let recent = ops[..index]
                .iter()
                .rev()
                .filter(|(_, color)| color.is_some())
                .take(2);
            let upcoming = ops[index + 1..].iter().find(|(_, color)| color.is_some());
            for &(kept, _) in recent.chain(upcoming) {
                assert_ne!(kept, coords);
            }
        }
        assert!(walk.canvas().erased().count() > 0);
        assert_eq!(walk.history().len(), 3);
    }

    #[test]
    fn border_mode_clears_path_on_completion() {
        let mut walk = driver(12);
        let config = WalkConfig {
            format: Format::Border,
            path_limit: 4,
            ..config(3)
        };
        walk.restart(config, None).unwrap();
        walk.run_pending(10_000).unwrap();

        let trailing: Vec<_> = walk.history().iter().collect();
        let erased: Vec<_> = walk.canvas().erased().collect();
        assert_eq!(walk.state(), WalkState::Completed);
        assert!(erased.ends_with(&trailing));
    }

    #[test]
    fn other_formats_never_erase() {
        let mut walk = driver(13);
        let config = WalkConfig {
            format: Format::Full,
            path_limit: 1,
            ..config(4)
        };
        walk.restart(config, None).unwrap();
        walk.run_pending(10_000).unwrap();

        assert_eq!(walk.state(), WalkState::Completed);
        assert_eq!(walk.canvas().erased().count(), 0);
    }
}
