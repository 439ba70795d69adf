//! Main module for the Coffeedoro timer using Yew.
//! Wires the timer store, the tick interval and the view components.

use coffeedoro::storage::{LocalStorage, SnapshotStorage};
use coffeedoro::{SettingsPatch, TimerAction};
use log::info;
use std::rc::Rc;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod utils;

use components::{ClockFace, ControlButtons, ProgressBar, SettingsPanel};
use config::TICK_INTERVAL_MS;
use hooks::{use_interval, use_timer_store};

#[derive(Properties, Clone)]
pub struct TimerViewProps {
    /// Where settings and the session count are persisted.
    pub storage: Rc<dyn SnapshotStorage>,
}

impl PartialEq for TimerViewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }
}

/// Timer screen: subscribes to the store and ticks once a second while running.
#[function_component(TimerView)]
fn timer_view(props: &TimerViewProps) -> Html {
    let timer = use_timer_store(props.storage.clone());

    let on_tick = use_callback(timer.dispatcher(), |_: (), dispatcher| {
        dispatcher.dispatch(TimerAction::Tick)
    });
    use_interval(timer.is_running, TICK_INTERVAL_MS, on_tick);

    let on_action = |action: TimerAction| {
        let dispatcher = timer.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(action.clone()))
    };

    let on_settings = {
        let dispatcher = timer.dispatcher();
        Callback::from(move |patch: SettingsPatch| {
            dispatcher.dispatch(TimerAction::UpdateSettings(patch))
        })
    };

    html! {
        <div class="flex flex-col items-center justify-center min-h-screen bg-gradient-to-br from-coffee-50 to-coffee-100">
            <div class="text-center">
                <h1 class="text-4xl font-display font-bold mb-8 text-coffee-800">
                    { "☕ Coffeedoro" }
                </h1>

                <div class="bg-white rounded-3xl shadow-2xl p-12 mb-8">
                    <ClockFace remaining={timer.remaining()} label={timer.mode_label()} />
                    <ProgressBar ratio={timer.progress_ratio()} />
                    <ControlButtons
                        controls={timer.controls()}
                        on_start={on_action(timer.start_action())}
                        on_pause={on_action(TimerAction::Pause)}
                        on_resume={on_action(TimerAction::Resume)}
                        on_reset={on_action(TimerAction::Reset)}
                    />
                </div>

                <SettingsPanel settings={timer.settings.clone()} on_update={on_settings} />

                <div class="text-coffee-600">
                    { format!("Sessions completed: {}", timer.session_count) }
                </div>
            </div>
        </div>
    }
}

/// App wrapper choosing the browser storage backend.
#[function_component]
pub fn App() -> Html {
    let storage = use_memo((), |_| LocalStorage);
    let storage: Rc<dyn SnapshotStorage> = storage;

    html! {
        <TimerView {storage} />
    }
}

/// Entry point: installs the panic hook and logger, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    info!("Starting Coffeedoro");
    yew::Renderer::<App>::new().render();
}
