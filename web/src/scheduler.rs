use gloo::timers::callback::Timeout;
use huewalk_core::{Scheduler, StepTicket};
use yew::html::Scope;

use crate::walk::{Msg, WalkView};

/// Delivers each step to the component as a message once its timeout fires.
pub(crate) struct TimeoutScheduler {
    link: Scope<WalkView>,
    pending: Option<Timeout>,
}

impl TimeoutScheduler {
    pub(crate) fn new(link: Scope<WalkView>) -> Self {
        Self {
            link,
            pending: None,
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: StepTicket) {
        let link = self.link.clone();
        self.pending = Some(Timeout::new(delay_ms, move || {
            link.send_message(Msg::Step(ticket))
        }));
    }

    fn cancel(&mut self) {
        // dropping a Timeout clears it
        self.pending = None;
    }
}
