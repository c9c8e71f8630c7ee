use clap::Args;
use gloo::events::EventListener;
use gloo::utils::document;
use huewalk_core::{StepTicket, WalkConfig, WalkDriver, WalkOptions};
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::canvas::CanvasSurface;
use crate::scheduler::TimeoutScheduler;
use crate::settings::SettingsView;
use crate::utils::*;

impl StorageKey for WalkConfig {
    const KEY: &'static str = "huewalk:config";
}

/// `Shift+S` pauses the walk and opens the settings.
pub(crate) fn is_settings_shortcut(code: &str, shift: bool) -> bool {
    shift && code == "KeyS"
}

pub(crate) fn done_message(total_steps: u64) -> String {
    format!("Square done after {} color fills!", total_steps)
}

pub(crate) enum Msg {
    Step(StepTicket),
    Done(u64),
    OpenSettings,
    CancelSettings,
    ApplySettings(WalkOptions),
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct WalkProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<String>,
}

impl WalkProps {
    fn seed(&self) -> u64 {
        match self.seed.as_deref().map(str::parse::<u64>) {
            Some(Ok(seed)) => seed,
            Some(Err(err)) => {
                log::warn!("ignoring seed {:?}: {}", self.seed, err);
                js_random_seed()
            }
            None => js_random_seed(),
        }
    }
}

pub(crate) struct WalkView {
    driver: WalkDriver<CanvasSurface, TimeoutScheduler>,
    canvas_ref: NodeRef,
    settings_open: bool,
    message: Option<String>,
    _keydown_listener: EventListener,
}

impl WalkView {
    fn listen_for_shortcut(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_settings_shortcut(&event.code(), event.shift_key()) {
                link.send_message(Msg::OpenSettings);
            }
        })
    }

    fn restart(&mut self, config: WalkConfig) {
        self.message = None;
        match self.driver.restart(config, None) {
            Ok(outcome) => log::debug!("first step: {:?}", outcome),
            Err(err) => log::error!("could not restart walk: {}", err),
        }
        self.driver.config().local_save();
    }
}

impl Component for WalkView {
    type Message = Msg;
    type Properties = WalkProps;

    fn create(ctx: &Context<Self>) -> Self {
        let canvas_ref = NodeRef::default();
        let surface = CanvasSurface::new(canvas_ref.clone(), ctx.link().callback(Msg::Done));
        let scheduler = TimeoutScheduler::new(ctx.link().clone());
        let seed = ctx.props().seed();
        log::debug!("seed: {}", seed);

        Self {
            driver: WalkDriver::new(surface, scheduler, seed),
            canvas_ref,
            settings_open: false,
            message: None,
            _keydown_listener: WalkView::listen_for_shortcut(ctx),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.restart(LocalOrDefault::local_or_default());
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Step(ticket) => {
                if let Err(err) = self.driver.step(ticket) {
                    log::error!("step failed: {}", err);
                }
                false
            }
            Done(total_steps) => {
                self.message = Some(done_message(total_steps));
                true
            }
            OpenSettings => {
                if self.settings_open {
                    return false;
                }
                let paused = self.driver.pause();
                log::debug!("settings opened, pause: {:?}", paused);
                self.settings_open = true;
                true
            }
            CancelSettings => {
                self.settings_open = false;
                if let Err(err) = self.driver.play() {
                    log::error!("could not resume walk: {}", err);
                }
                true
            }
            ApplySettings(options) => {
                self.settings_open = false;
                let config = self.driver.config().merged(&options);
                self.restart(config);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let on_apply = ctx.link().callback(ApplySettings);
        let on_cancel = ctx.link().callback(|_: ()| CancelSettings);

        // the canvas size is owned by `CanvasSurface`, re-rendering its attributes would wipe it
        html! {
            <main class="huewalk">
                <canvas id="grid" ref={self.canvas_ref.clone()}/>
                <p class="message">{self.message.clone().unwrap_or_default()}</p>
                <small>{"Shift+S for settings"}</small>
                <SettingsView open={self.settings_open} config={*self.driver.config()} {on_apply} {on_cancel}/>
            </main>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_needs_shift() {
        assert!(is_settings_shortcut("KeyS", true));
        assert!(!is_settings_shortcut("KeyS", false));
        assert!(!is_settings_shortcut("KeyD", true));
    }

    #[test]
    fn done_message_counts_fills() {
        assert_eq!(done_message(412), "Square done after 412 color fills!");
    }

    #[test]
    fn config_storage_key() {
        assert_eq!(<WalkConfig as StorageKey>::KEY, "huewalk:config");
    }

    #[test]
    fn seed_argument_is_parsed() {
        let props = WalkProps {
            seed: Some("42".to_string()),
        };
        assert_eq!(props.seed(), 42);
    }
}
