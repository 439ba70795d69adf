//! Pure Yew view components for the Coffeedoro UI.
//!
//! These render from props only; all timer state lives in the store hook.

use crate::hooks::use_validated_input;
use crate::utils::{
    format_count_input, format_duration_input, validate_long_break_interval,
    validate_phase_duration,
};
use coffeedoro::{format_clock, Controls, SettingsPatch, TimerSettings};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

const PRIMARY_BUTTON: &str =
    "px-8 py-3 bg-coffee-600 text-white rounded-lg hover:bg-coffee-700 transition";
const PAUSE_BUTTON: &str =
    "px-8 py-3 bg-coffee-400 text-white rounded-lg hover:bg-coffee-500 transition";
const RESET_BUTTON: &str =
    "px-8 py-3 bg-gray-400 text-white rounded-lg hover:bg-gray-500 transition";

/// Remaining time as `MM:SS` plus the phase label.
#[derive(Properties, PartialEq)]
pub struct ClockFaceProps {
    pub remaining: u32,
    pub label: AttrValue,
}

#[function_component(ClockFace)]
pub fn clock_face(props: &ClockFaceProps) -> Html {
    html! {
        <>
            <div class="text-6xl font-bold text-coffee-700 mb-4">
                { format_clock(props.remaining) }
            </div>
            <div class="text-sm text-coffee-500 uppercase tracking-wider mb-6">
                { props.label.clone() }
            </div>
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    /// Elapsed fraction in `[0, 1]`.
    pub ratio: f64,
}

#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    html! {
        <div class="w-64 h-2 bg-coffee-200 rounded-full overflow-hidden mb-8">
            <div
                class="h-full bg-coffee-500 transition-all duration-1000"
                style={format!("width: {}%", props.ratio * 100.0)}
            />
        </div>
    }
}

/// Start / Pause / Resume+Reset, depending on `controls`.
#[derive(Properties, PartialEq)]
pub struct ControlButtonsProps {
    pub controls: Controls,
    pub on_start: Callback<MouseEvent>,
    pub on_pause: Callback<MouseEvent>,
    pub on_resume: Callback<MouseEvent>,
    pub on_reset: Callback<MouseEvent>,
}

#[function_component(ControlButtons)]
pub fn control_buttons(props: &ControlButtonsProps) -> Html {
    let buttons = match props.controls {
        Controls::Start => html! {
            <button onclick={props.on_start.clone()} class={PRIMARY_BUTTON}>{ "Start" }</button>
        },
        Controls::Pause => html! {
            <button onclick={props.on_pause.clone()} class={PAUSE_BUTTON}>{ "Pause" }</button>
        },
        Controls::ResumeReset => html! {
            <>
                <button onclick={props.on_resume.clone()} class={PRIMARY_BUTTON}>{ "Resume" }</button>
                <button onclick={props.on_reset.clone()} class={RESET_BUTTON}>{ "Reset" }</button>
            </>
        },
    };

    html! {
        <div class="flex gap-4 justify-center">
            { buttons }
        </div>
    }
}

/// How a numeric setting is typed in and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Seconds, entered as `25`, `24:30`, `90s`, ...
    Duration,
    /// Session count.
    Count,
}

impl FieldKind {
    fn parser(self) -> fn(&str) -> Result<u32, String> {
        match self {
            FieldKind::Duration => validate_phase_duration,
            FieldKind::Count => validate_long_break_interval,
        }
    }

    fn formatter(self) -> fn(&u32) -> String {
        match self {
            FieldKind::Duration => format_duration_input,
            FieldKind::Count => format_count_input,
        }
    }
}

/// Text input committing a validated `u32` on change or Enter.
#[derive(Properties, PartialEq)]
pub struct SettingFieldProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub kind: FieldKind,
    pub value: u32,
    pub on_commit: Callback<u32>,
}

#[function_component(SettingField)]
pub fn setting_field(props: &SettingFieldProps) -> Html {
    let parse = props.kind.parser();
    let input = use_validated_input(
        props.value,
        Rc::new(move |text: &str| parse(text)),
        props.kind.formatter(),
        props.on_commit.clone(),
    );
    let on_change = {
        let commit = input.on_commit.clone();
        Callback::from(move |_: Event| commit.emit(()))
    };

    html! {
        <div class="form-group flex flex-col text-left">
            <label for={props.id.clone()} class="text-sm text-coffee-600">{ props.label.clone() }</label>
            <input
                type="text"
                id={props.id.clone()}
                class="px-3 py-2 border border-coffee-200 rounded"
                value={input.text.clone()}
                oninput={input.on_text_input.clone()}
                onchange={on_change}
                onkeydown={input.on_keydown.clone()}
            />
            { if let Some(err) = &input.error {
                html! { <span class="text-xs text-red-600">{ err.clone() }</span> }
            } else { html! {} } }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToggleFieldProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub checked: bool,
    pub on_toggle: Callback<bool>,
}

#[function_component(ToggleField)]
pub fn toggle_field(props: &ToggleFieldProps) -> Html {
    let onchange = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_toggle.emit(input.checked());
        })
    };

    html! {
        <label for={props.id.clone()} class="flex items-center gap-2 text-sm text-coffee-600">
            <input type="checkbox" id={props.id.clone()} checked={props.checked} {onchange} />
            { props.label.clone() }
        </label>
    }
}

/// Editor for [`TimerSettings`]; every committed field is sent as a
/// single-field [`SettingsPatch`].
#[derive(Properties, PartialEq)]
pub struct SettingsPanelProps {
    pub settings: TimerSettings,
    pub on_update: Callback<SettingsPatch>,
}

#[function_component(SettingsPanel)]
pub fn settings_panel(props: &SettingsPanelProps) -> Html {
    let patch_with = |build: fn(u32) -> SettingsPatch| props.on_update.reform(build);
    let toggle_with = |build: fn(bool) -> SettingsPatch| props.on_update.reform(build);
    let s = &props.settings;

    html! {
        <details class="bg-white rounded-3xl shadow p-6 mb-8 text-coffee-700">
            <summary class="cursor-pointer font-display">{ "Settings" }</summary>
            <div class="grid grid-cols-2 gap-4 mt-4">
                <SettingField
                    id="work_duration"
                    label="Focus length"
                    value={s.work_duration}
                    kind={FieldKind::Duration}
                    on_commit={patch_with(|v| SettingsPatch { work_duration: Some(v), ..Default::default() })}
                />
                <SettingField
                    id="short_break_duration"
                    label="Short break"
                    value={s.short_break_duration}
                    kind={FieldKind::Duration}
                    on_commit={patch_with(|v| SettingsPatch { short_break_duration: Some(v), ..Default::default() })}
                />
                <SettingField
                    id="long_break_duration"
                    label="Long break"
                    value={s.long_break_duration}
                    kind={FieldKind::Duration}
                    on_commit={patch_with(|v| SettingsPatch { long_break_duration: Some(v), ..Default::default() })}
                />
                <SettingField
                    id="long_break_interval"
                    label="Sessions per long break"
                    value={s.long_break_interval}
                    kind={FieldKind::Count}
                    on_commit={patch_with(|v| SettingsPatch { long_break_interval: Some(v), ..Default::default() })}
                />
                <ToggleField
                    id="auto_start_breaks"
                    label="Auto-start breaks"
                    checked={s.auto_start_breaks}
                    on_toggle={toggle_with(|v| SettingsPatch { auto_start_breaks: Some(v), ..Default::default() })}
                />
                <ToggleField
                    id="auto_start_work"
                    label="Auto-start focus"
                    checked={s.auto_start_work}
                    on_toggle={toggle_with(|v| SettingsPatch { auto_start_work: Some(v), ..Default::default() })}
                />
            </div>
        </details>
    }
}
