use huewalk_core::{Format, WalkConfig, WalkOptions};
use web_sys::{FormData, HtmlDialogElement, HtmlFormElement, SubmitEvent};
use yew::prelude::*;

/// Form field names, matching the keys [`WalkOptions::from_form_entries`] understands.
const FIELDS: &[&str] = &[
    "gridCount",
    "canvasSize",
    "opacity",
    "speed",
    "hueShift",
    "saturation",
    "lightness",
    "format",
    "pathLimit",
    "minimumOpacity",
];

/// Text shown for a threshold, spelling infinity the way the form parses it back.
fn threshold_text(value: f64) -> String {
    if value.is_infinite() && value.is_sign_positive() {
        "Infinity".to_string()
    } else {
        value.to_string()
    }
}

/// Reads the submitted form; blank fields keep their current value.
fn read_form(data: &FormData) -> huewalk_core::Result<WalkOptions> {
    let entries: Vec<(&str, String)> = FIELDS
        .iter()
        .filter_map(|&key| {
            data.get(key)
                .as_string()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (key, value))
        })
        .collect();
    WalkOptions::from_form_entries(entries.iter().map(|(key, value)| (*key, value.as_str())))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DialogAction {
    ShowModal,
    Close,
}

/// What the dialog element needs so its shown state follows `open`.
fn dialog_action(open: bool, shown: bool) -> Option<DialogAction> {
    match (open, shown) {
        (true, false) => Some(DialogAction::ShowModal),
        (false, true) => Some(DialogAction::Close),
        _ => None,
    }
}

fn sync_dialog(dialog: &HtmlDialogElement, open: bool) {
    match dialog_action(open, dialog.open()) {
        Some(DialogAction::ShowModal) => {
            if let Err(err) = dialog.show_modal() {
                log::error!("could not show settings: {:?}", err);
            }
        }
        Some(DialogAction::Close) => dialog.close(),
        None => {}
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub config: WalkConfig,
    pub on_apply: Callback<WalkOptions>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let config = props.config;
    let dialog_ref = use_node_ref();

    {
        let dialog_ref = dialog_ref.clone();
        use_effect_with(props.open, move |&open| {
            if let Some(dialog) = dialog_ref.cast::<HtmlDialogElement>() {
                sync_dialog(&dialog, open);
            }
        });
    }

    let onsubmit = {
        let on_apply = props.on_apply.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(form) = e.target_dyn_into::<HtmlFormElement>() else {
                return;
            };
            let data = match FormData::new_with_form(&form) {
                Ok(data) => data,
                Err(err) => {
                    log::error!("could not read settings form: {:?}", err);
                    return;
                }
            };
            match read_form(&data) {
                Ok(options) => {
                    log::debug!("applying settings: {:?}", options);
                    on_apply.emit(options);
                }
                Err(err) => log::error!("invalid settings: {}", err),
            }
        })
    };
    let onclick_cancel = props.on_cancel.reform(|_: MouseEvent| ());
    // Escape closes a modal dialog on its own, keep it shown until the walk resumes
    let oncancel = props.on_cancel.reform(|e: Event| e.prevent_default());

    html! {
        <dialog id="settings" ref={dialog_ref} {oncancel}>
            <article>
                <h2>{"Settings"}</h2>
                <form {onsubmit}>
                    <label>{"Grid count"}
                        <input type="number" name="gridCount" min="1" step="1" value={config.grid_count.to_string()}/>
                    </label>
                    <label>{"Canvas size"}
                        <input type="number" name="canvasSize" min="1" step="1" value={config.canvas_size.to_string()}/>
                    </label>
                    <label>{"Opacity"}
                        <input type="number" name="opacity" min="0" step="any" value={config.opacity.to_string()}/>
                    </label>
                    <label>{"Speed (ms)"}
                        <input type="number" name="speed" min="0" step="1" value={config.speed.to_string()}/>
                    </label>
                    <label>{"Hue shift"}
                        <input type="number" name="hueShift" min="0" max="360" step="any" value={config.hue_shift.to_string()}/>
                    </label>
                    <label>{"Saturation"}
                        <input type="number" name="saturation" min="0" max="100" step="any" value={config.saturation.to_string()}/>
                    </label>
                    <label>{"Lightness"}
                        <input type="number" name="lightness" min="0" max="100" step="any" value={config.lightness.to_string()}/>
                    </label>
                    <label>{"Format"}
                        <select name="format">
                            {
                                for Format::ALL.into_iter().map(|format| html! {
                                    <option value={format.name()} selected={format == config.format}>{format.name()}</option>
                                })
                            }
                        </select>
                    </label>
                    <label>{"Path limit"}
                        <input type="number" name="pathLimit" min="1" step="1" value={config.path_limit.to_string()}/>
                    </label>
                    <label>{"Minimum opacity"}
                        <input type="text" name="minimumOpacity" value={threshold_text(config.minimum_opacity)}/>
                    </label>
                    <footer>
                        <button type="button" onclick={onclick_cancel}>{"Cancel"}</button>
                        <button type="submit">{"Apply"}</button>
                    </footer>
                </form>
            </article>
        </dialog>
    }
}
