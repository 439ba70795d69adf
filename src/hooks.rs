use coffeedoro::storage::{restore_snapshot, save_snapshot, SnapshotStorage};
use coffeedoro::TimerState;
use gloo_timers::callback::Interval;
use log::{debug, warn};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Timer state restored from `storage`, saved back whenever the session
/// count or settings change.
///
/// A record written with another snapshot version is not overwritten on
/// mount; the first save happens once the snapshot changes.
#[hook]
pub fn use_timer_store(storage: Rc<dyn SnapshotStorage>) -> UseReducerHandle<TimerState> {
    let restored = {
        let storage = storage.clone();
        use_memo((), move |_| restore_snapshot(&*storage))
    };
    let skip_next_save = {
        let restored = restored.clone();
        use_mut_ref(move || restored.preserve_record())
    };
    let state = {
        let restored = restored.clone();
        use_reducer_eq(move || TimerState::restore(restored.snapshot.clone()))
    };

    {
        let snapshot = state.snapshot();
        use_effect_with(snapshot, move |snapshot| {
            if skip_next_save.replace(false) {
                debug!("Keeping stored record of another version until settings change");
            } else if let Err(e) = save_snapshot(&*storage, snapshot) {
                warn!("Could not persist timer state: {}", e);
            }
            || ()
        });
    }

    state
}

/// Owns the running tick source while the timer is active.
///
/// Dropping the guard drops the handle, which for [`Interval`] cancels it.
pub struct TickGuard<H> {
    handle: Option<H>,
}

impl<H> TickGuard<H> {
    /// Start a tick source via `start` only when `active` with a non-zero period.
    pub fn arm(active: bool, period_ms: u32, start: impl FnOnce(u32) -> H) -> Self {
        let handle = (active && period_ms > 0).then(|| start(period_ms));
        let guard = Self { handle };
        if guard.is_armed() {
            debug!("Tick interval armed ({} ms)", period_ms);
        }
        guard
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl<H> Drop for TickGuard<H> {
    fn drop(&mut self) {
        if self.is_armed() {
            debug!("Tick interval cancelled");
        }
    }
}

/// Emit `on_tick` every `period_ms` while `active`.
///
/// The guard is torn down as soon as any argument changes or the component
/// unmounts.
#[hook]
pub fn use_interval(active: bool, period_ms: u32, on_tick: Callback<()>) {
    use_effect_with(
        (active, period_ms, on_tick),
        move |(active, period_ms, on_tick)| {
            let on_tick = on_tick.clone();
            let guard = TickGuard::arm(*active, *period_ms, move |ms| {
                Interval::new(ms, move || on_tick.emit(()))
            });
            move || drop(guard)
        },
    );
}

/// Holds the state and callbacks for a validated input field.
#[derive(Clone)]
pub struct ValidatedInput {
    /// The current text content of the input field.
    pub text: String,
    /// An optional error message if validation failed.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event. Updates the internal text state.
    pub on_text_input: Callback<InputEvent>,
    /// Parses the current text and forwards the value on success.
    /// Used with `onchange`.
    pub on_commit: Callback<()>,
    /// Commits on Enter.
    pub on_keydown: Callback<KeyboardEvent>,
}

/// Custom hook to manage state for a validated input field.
///
/// `current` is the committed value owned by the caller; the text is
/// re-synced from it whenever it changes.
#[hook]
pub fn use_validated_input<T>(
    current: T,
    parse_and_validate: Rc<dyn Fn(&str) -> Result<T, String>>,
    format: fn(&T) -> String,
    on_valid: Callback<T>,
) -> ValidatedInput
where
    T: Clone + PartialEq + 'static,
{
    let text_state_handle: UseStateHandle<String> = use_state(|| format(&current));
    let error_state_handle: UseStateHandle<Option<String>> = use_state(|| None::<String>);

    let on_text_input = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let on_commit = {
        let current_text_handle = text_state_handle.clone();
        let error_setter = error_state_handle.clone();
        let parse_fn = parse_and_validate.clone();

        Callback::from(move |_: ()| match parse_fn(&(*current_text_handle)) {
            Ok(parsed_val) => {
                // Text to canonical form
                current_text_handle.set(format(&parsed_val));
                error_setter.set(None);
                on_valid.emit(parsed_val);
            }
            Err(err_msg) => {
                error_setter.set(Some(err_msg));
            }
        })
    };

    let on_keydown = {
        let commit_handler = on_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit_handler.emit(());
            }
        })
    };

    // Sync text when the committed value changes from outside
    {
        let text_setter = text_state_handle.clone();
        let error_setter = error_state_handle.clone();
        use_effect_with(current, move |current_value| {
            let formatted = format(current_value);
            if *text_setter != formatted {
                text_setter.set(formatted);
                error_setter.set(None);
            }
            || ()
        });
    }

    ValidatedInput {
        text: (*text_state_handle).clone(),
        error: (*error_state_handle).clone(),
        on_text_input,
        on_commit,
        on_keydown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts how many handles were started and how many were dropped.
    #[derive(Default)]
    struct Counters {
        started: Cell<u32>,
        dropped: Cell<u32>,
    }

    struct CountingHandle(Rc<Counters>);

    impl Drop for CountingHandle {
        fn drop(&mut self) {
            self.0.dropped.set(self.0.dropped.get() + 1);
        }
    }

    fn arm(counters: &Rc<Counters>, active: bool, period_ms: u32) -> TickGuard<CountingHandle> {
        let counters = counters.clone();
        TickGuard::arm(active, period_ms, move |ms| {
            assert_eq!(ms, period_ms);
            counters.started.set(counters.started.get() + 1);
            CountingHandle(counters)
        })
    }

    #[test]
    fn inactive_timer_never_starts_a_tick_source() {
        let counters = Rc::new(Counters::default());
        let guard = arm(&counters, false, 1000);
        assert!(!guard.is_armed());
        drop(guard);
        assert_eq!(counters.started.get(), 0);
        assert_eq!(counters.dropped.get(), 0);
    }

    #[test]
    fn zero_period_is_not_armed() {
        let counters = Rc::new(Counters::default());
        assert!(!arm(&counters, true, 0).is_armed());
        assert_eq!(counters.started.get(), 0);
    }

    #[test]
    fn unmount_cancels_running_ticks() {
        let counters = Rc::new(Counters::default());
        let guard = arm(&counters, true, 1000);
        assert!(guard.is_armed());
        assert_eq!(counters.started.get(), 1);
        assert_eq!(counters.dropped.get(), 0);

        drop(guard);
        assert_eq!(counters.dropped.get(), 1);
    }

    #[test]
    fn pause_then_resume_replaces_the_tick_source() {
        let counters = Rc::new(Counters::default());

        // running -> paused: the old guard is torn down, the new one is idle
        let running = arm(&counters, true, 1000);
        drop(running);
        let paused = arm(&counters, false, 1000);
        assert_eq!(counters.dropped.get(), 1);
        assert!(!paused.is_armed());

        // paused -> running: exactly one live source
        drop(paused);
        let resumed = arm(&counters, true, 1000);
        assert_eq!(counters.started.get(), 2);
        assert_eq!(counters.started.get() - counters.dropped.get(), 1);
        drop(resumed);
        assert_eq!(counters.started.get(), counters.dropped.get());
    }
}
