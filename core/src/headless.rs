use alloc::vec::Vec;

use crate::*;

/// Canvas that only remembers what it was asked to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaintLog {
    /// Every paint request in order; `None` is an erase.
    pub ops: Vec<(Coord2, Option<Hsla>)>,
    pub resets: usize,
    pub done: Option<u64>,
}

impl PaintLog {
    /// Cells painted with a color, in order.
    pub fn painted(&self) -> Vec<Coord2> {
        self.ops
            .iter()
            .filter(|(_, color)| color.is_some())
            .map(|&(coords, _)| coords)
            .collect()
    }

    /// Cells erased, in order.
    pub fn erased(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.ops
            .iter()
            .filter(|(_, color)| color.is_none())
            .map(|&(coords, _)| coords)
    }
}

impl Canvas for PaintLog {
    fn reset(&mut self, _config: &WalkConfig) {
        self.ops.clear();
        self.done = None;
        self.resets += 1;
    }

    fn paint(&mut self, coords: Coord2, color: Option<Hsla>) {
        self.ops.push((coords, color));
    }

    fn done(&mut self, total_steps: u64) {
        self.done = Some(total_steps);
    }
}

/// Holds at most one pending step until someone drives it with [`WalkDriver::run_pending`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManualScheduler {
    pending: Option<(u32, StepTicket)>,
    pub cancels: usize,
}

impl ManualScheduler {
    /// Delay and ticket of the step waiting to run.
    pub fn pending(&self) -> Option<(u32, StepTicket)> {
        self.pending
    }

    pub fn take(&mut self) -> Option<(u32, StepTicket)> {
        self.pending.take()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: StepTicket) {
        self.pending = Some((delay_ms, ticket));
    }

    fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.cancels += 1;
        }
    }
}

impl<C: Canvas> WalkDriver<C, ManualScheduler> {
    /// Runs up to `max_steps` scheduled steps back to back, ignoring their delays.
    ///
    /// Returns the outcome of the last step run, or [`StepOutcome::Skipped`] if nothing was pending.
    pub fn run_pending(&mut self, max_steps: u64) -> Result<StepOutcome> {
        let mut outcome = StepOutcome::Skipped;
        for _ in 0..max_steps {
            let Some((_, ticket)) = self.scheduler_mut().take() else {
                break;
            };
            outcome = self.step(ticket)?;
        }
        Ok(outcome)
    }
}
