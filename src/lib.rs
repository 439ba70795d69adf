//! Timer state container for Coffeedoro.
//!
//! `TimerState` owns the current phase, the elapsed/duration counters and the
//! persisted settings. All transitions are infallible; the Yew view drives
//! them through [`TimerAction`] via the [`Reducible`] impl at the bottom of
//! this file.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

pub mod storage;

/// Default timer parameters
pub mod defaults {
    pub const WORK_DURATION_SECS: u32 = 25 * 60;
    pub const SHORT_BREAK_SECS: u32 = 5 * 60;
    pub const LONG_BREAK_SECS: u32 = 15 * 60;
    pub const LONG_BREAK_INTERVAL: u32 = 4;

    // Accepted ranges for stored and typed-in settings
    pub const MIN_PHASE_SECS: u32 = 60;
    pub const MAX_PHASE_SECS: u32 = 4 * 60 * 60;
    pub const MIN_LONG_BREAK_INTERVAL: u32 = 1;
    pub const MAX_LONG_BREAK_INTERVAL: u32 = 12;

    /// localStorage record holding `{ sessionCount, settings }`.
    pub const STORAGE_KEY: &str = "coffeedoro-timer";
    pub const SNAPSHOT_VERSION: u32 = 0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
    #[default]
    Idle,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Work => write!(f, "work"),
            TimerMode::ShortBreak => write!(f, "shortBreak"),
            TimerMode::LongBreak => write!(f, "longBreak"),
            TimerMode::Idle => write!(f, "idle"),
        }
    }
}

/// User-configurable durations (seconds) and auto-start behaviour.
///
/// Fields missing from a stored record fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    /// Completed work sessions between long breaks.
    pub long_break_interval: u32,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: defaults::WORK_DURATION_SECS,
            short_break_duration: defaults::SHORT_BREAK_SECS,
            long_break_duration: defaults::LONG_BREAK_SECS,
            long_break_interval: defaults::LONG_BREAK_INTERVAL,
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

impl TimerSettings {
    /// Configured length of a phase. `Idle` arms a work phase.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work | TimerMode::Idle => self.work_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Reset every field outside its accepted range to the default value.
    ///
    /// Returns the names of the fields that were replaced.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let fallback = TimerSettings::default();
        let phases = defaults::MIN_PHASE_SECS..=defaults::MAX_PHASE_SECS;
        let intervals = defaults::MIN_LONG_BREAK_INTERVAL..=defaults::MAX_LONG_BREAK_INTERVAL;
        let mut replaced = Vec::new();

        if !phases.contains(&self.work_duration) {
            self.work_duration = fallback.work_duration;
            replaced.push("workDuration");
        }
        if !phases.contains(&self.short_break_duration) {
            self.short_break_duration = fallback.short_break_duration;
            replaced.push("shortBreakDuration");
        }
        if !phases.contains(&self.long_break_duration) {
            self.long_break_duration = fallback.long_break_duration;
            replaced.push("longBreakDuration");
        }
        if !intervals.contains(&self.long_break_interval) {
            self.long_break_interval = fallback.long_break_interval;
            replaced.push("longBreakInterval");
        }
        replaced
    }

    /// Overwrite only the fields present in `patch`.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.work_duration {
            self.work_duration = v;
        }
        if let Some(v) = patch.short_break_duration {
            self.short_break_duration = v;
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = patch.long_break_interval {
            self.long_break_interval = v;
        }
        if let Some(v) = patch.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_work {
            self.auto_start_work = v;
        }
    }
}

/// Partial settings update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub work_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub long_break_interval: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_work: Option<bool>,
}

/// The subset of [`TimerState`] that survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedTimer {
    pub session_count: u32,
    pub settings: TimerSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed.
    Idle,
    Advanced,
    /// The phase reached its duration and the timer stopped.
    Completed(TimerMode),
}

/// Button set shown for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    Start,
    Pause,
    ResumeReset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Reset,
    Tick,
    UpdateSettings(SettingsPatch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub mode: TimerMode,
    /// Target length of the current phase, in seconds.
    pub duration: u32,
    pub elapsed: u32,
    pub is_running: bool,
    pub session_count: u32,
    pub settings: TimerSettings,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::restore(PersistedTimer::default())
    }
}

impl TimerState {
    /// Rebuild a state from its persisted subset. Ephemeral fields start idle.
    pub fn restore(snapshot: PersistedTimer) -> Self {
        Self {
            mode: TimerMode::Idle,
            duration: snapshot.settings.work_duration,
            elapsed: 0,
            is_running: false,
            session_count: snapshot.session_count,
            settings: snapshot.settings,
        }
    }

    pub fn snapshot(&self) -> PersistedTimer {
        PersistedTimer {
            session_count: self.session_count,
            settings: self.settings.clone(),
        }
    }

    /// Enter work mode and run. `elapsed` is left as is.
    pub fn start(&mut self) {
        self.is_running = true;
        self.mode = TimerMode::Work;
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn resume(&mut self) {
        self.is_running = true;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.is_running = false;
        self.mode = TimerMode::Idle;
        self.duration = self.settings.work_duration;
    }

    /// Advance one second. On reaching `duration` the counter is cleared and
    /// the timer stops; the caller decides what happens next.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }

        let elapsed = self.elapsed.saturating_add(1);
        if elapsed >= self.duration {
            self.elapsed = 0;
            self.is_running = false;
            TickOutcome::Completed(self.mode)
        } else {
            self.elapsed = elapsed;
            TickOutcome::Advanced
        }
    }

    /// Merge a partial settings update. A phase already in progress keeps its
    /// duration; an idle timer picks up the new work duration.
    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.settings.merge(patch);
        if self.mode == TimerMode::Idle && self.elapsed == 0 && !self.is_running {
            self.duration = self.settings.work_duration;
        }
        debug!("Settings updated: {:?}", self.settings);
    }

    /// Arm the phase that follows `finished`.
    ///
    /// A finished work phase counts as a session; every `long_break_interval`
    /// sessions earns a long break. The next phase starts running right away
    /// only if the matching auto-start flag is set.
    pub fn complete_phase(&mut self, finished: TimerMode) {
        let next = match finished {
            TimerMode::Work => {
                self.session_count = self.session_count.saturating_add(1);
                let interval = self.settings.long_break_interval.max(1);
                if self.session_count % interval == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak | TimerMode::Idle => TimerMode::Work,
        };

        self.mode = next;
        self.duration = self.settings.duration_for(next);
        self.elapsed = 0;
        self.is_running = if next.is_break() {
            self.settings.auto_start_breaks
        } else {
            self.settings.auto_start_work
        };

        info!(
            "Phase {} complete (sessions: {}), next: {} for {}s{}",
            finished,
            self.session_count,
            next,
            self.duration,
            if self.is_running { ", auto-started" } else { "" }
        );
    }

    pub fn apply(&mut self, action: TimerAction) {
        match action {
            TimerAction::Start => self.start(),
            TimerAction::Pause => self.pause(),
            TimerAction::Resume => self.resume(),
            TimerAction::Reset => self.reset(),
            TimerAction::Tick => {
                if let TickOutcome::Completed(finished) = self.tick() {
                    self.complete_phase(finished);
                }
            }
            TimerAction::UpdateSettings(patch) => self.update_settings(&patch),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Fraction of the phase already elapsed, clamped to `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.elapsed as f64 / self.duration as f64).clamp(0.0, 1.0)
    }

    pub fn controls(&self) -> Controls {
        if self.is_running {
            Controls::Pause
        } else if self.elapsed == 0 {
            Controls::Start
        } else {
            Controls::ResumeReset
        }
    }

    /// Action bound to the Start button. A break armed by
    /// [`complete_phase`](Self::complete_phase) is resumed rather than
    /// replaced by a work phase.
    pub fn start_action(&self) -> TimerAction {
        if self.mode.is_break() {
            TimerAction::Resume
        } else {
            TimerAction::Start
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode {
            TimerMode::Work => "🎯 Focus Time",
            TimerMode::Idle => "Ready to Start",
            TimerMode::ShortBreak | TimerMode::LongBreak => "☕ Break Time",
        }
    }
}

impl Reducible for TimerState {
    type Action = TimerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Format whole seconds as zero-padded `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(duration: u32, elapsed: u32) -> TimerState {
        TimerState {
            mode: TimerMode::Work,
            duration,
            elapsed,
            is_running: true,
            ..TimerState::default()
        }
    }

    #[test]
    fn tick_is_noop_when_not_running() {
        let mut state = running(10, 3);
        state.pause();
        let before = state.clone();
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state, before);

        let mut idle = TimerState::default();
        let before = idle.clone();
        idle.tick();
        assert_eq!(idle, before);
    }

    #[test]
    fn tick_advances_by_one() {
        let mut state = running(10, 3);
        assert_eq!(state.tick(), TickOutcome::Advanced);
        assert_eq!(state.elapsed, 4);
        assert!(state.is_running);
        assert_eq!(state.mode, TimerMode::Work);
    }

    #[test]
    fn tick_completes_at_duration() {
        let mut state = running(5, 4);
        assert_eq!(state.tick(), TickOutcome::Completed(TimerMode::Work));
        assert_eq!(state.elapsed, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn tick_completes_when_duration_already_passed() {
        let mut state = running(3, 7);
        assert_eq!(state.tick(), TickOutcome::Completed(TimerMode::Work));
        assert_eq!(state.elapsed, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn start_from_idle_enters_work_without_touching_elapsed() {
        let mut state = TimerState::default();
        state.start();
        assert_eq!(state.mode, TimerMode::Work);
        assert!(state.is_running);
        assert_eq!(state.elapsed, 0);

        let mut paused = running(100, 42);
        paused.pause();
        paused.start();
        assert_eq!(paused.elapsed, 42);
    }

    #[test]
    fn pause_and_resume_keep_elapsed() {
        let mut state = running(100, 10);
        state.pause();
        assert!(!state.is_running);
        assert_eq!(state.elapsed, 10);
        state.resume();
        assert!(state.is_running);
        assert_eq!(state.elapsed, 10);
        assert_eq!(state.mode, TimerMode::Work);
    }

    #[test]
    fn reset_always_returns_to_idle() {
        let mut states = vec![TimerState::default(), running(100, 50)];
        let mut on_break = running(300, 12);
        on_break.mode = TimerMode::LongBreak;
        on_break.is_running = false;
        states.push(on_break);

        for mut state in states {
            state.reset();
            assert_eq!(state.elapsed, 0);
            assert!(!state.is_running);
            assert_eq!(state.mode, TimerMode::Idle);
            assert_eq!(state.duration, state.settings.work_duration);
        }
    }

    #[test]
    fn update_settings_merges_only_given_fields() {
        let mut state = TimerState::default();
        state.update_settings(&SettingsPatch {
            work_duration: Some(50 * 60),
            ..SettingsPatch::default()
        });
        let expected = TimerSettings {
            work_duration: 50 * 60,
            ..TimerSettings::default()
        };
        assert_eq!(state.settings, expected);
    }

    #[test]
    fn update_settings_leaves_running_phase_duration() {
        let mut state = running(1500, 200);
        state.update_settings(&SettingsPatch {
            work_duration: Some(60),
            ..SettingsPatch::default()
        });
        assert_eq!(state.duration, 1500);
        assert_eq!(state.settings.work_duration, 60);
    }

    #[test]
    fn update_settings_rearms_idle_timer() {
        let mut state = TimerState::default();
        state.update_settings(&SettingsPatch {
            work_duration: Some(10 * 60),
            ..SettingsPatch::default()
        });
        assert_eq!(state.duration, 10 * 60);
        assert_eq!(state.remaining(), 10 * 60);
    }

    #[test]
    fn completed_work_counts_session_and_arms_short_break() {
        let mut state = running(2, 1);
        state.apply(TimerAction::Tick);
        assert_eq!(state.session_count, 1);
        assert_eq!(state.mode, TimerMode::ShortBreak);
        assert_eq!(state.duration, defaults::SHORT_BREAK_SECS);
        assert_eq!(state.elapsed, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn every_interval_sessions_earn_a_long_break() {
        let mut state = TimerState::default();
        state.session_count = 3;
        state.complete_phase(TimerMode::Work);
        assert_eq!(state.session_count, 4);
        assert_eq!(state.mode, TimerMode::LongBreak);
        assert_eq!(state.duration, defaults::LONG_BREAK_SECS);
    }

    #[test]
    fn zero_interval_is_treated_as_one() {
        let mut state = TimerState::default();
        state.settings.long_break_interval = 0;
        state.complete_phase(TimerMode::Work);
        assert_eq!(state.mode, TimerMode::LongBreak);
    }

    #[test]
    fn completed_break_arms_work_and_honours_auto_start() {
        let mut state = TimerState::default();
        state.settings.auto_start_work = true;
        state.complete_phase(TimerMode::ShortBreak);
        assert_eq!(state.mode, TimerMode::Work);
        assert_eq!(state.duration, state.settings.work_duration);
        assert!(state.is_running);
        assert_eq!(state.session_count, 0);
    }

    #[test]
    fn auto_start_breaks_keeps_timer_running() {
        let mut state = running(1, 0);
        state.settings.auto_start_breaks = true;
        state.apply(TimerAction::Tick);
        assert_eq!(state.mode, TimerMode::ShortBreak);
        assert!(state.is_running);
    }

    #[test]
    fn start_button_resumes_armed_break() {
        let mut state = TimerState::default();
        state.complete_phase(TimerMode::Work);
        assert_eq!(state.controls(), Controls::Start);
        assert_eq!(state.start_action(), TimerAction::Resume);

        let action = state.start_action();
        state.apply(action);
        assert_eq!(state.mode, TimerMode::ShortBreak);
        assert!(state.is_running);

        assert_eq!(TimerState::default().start_action(), TimerAction::Start);
    }

    #[test]
    fn controls_follow_predicate_table() {
        let mut state = TimerState::default();
        assert_eq!(state.controls(), Controls::Start);
        state.start();
        assert_eq!(state.controls(), Controls::Pause);
        state.tick();
        state.pause();
        assert_eq!(state.controls(), Controls::ResumeReset);
        state.reset();
        assert_eq!(state.controls(), Controls::Start);
    }

    #[test]
    fn display_derivations() {
        let state = TimerState {
            duration: 1500,
            elapsed: 375,
            ..TimerState::default()
        };
        assert_eq!(state.remaining(), 1125);
        assert_eq!(format_clock(state.remaining()), "18:45");
        assert!((state.progress_ratio() - 0.25).abs() < f64::EPSILON);

        let empty = TimerState {
            duration: 0,
            ..TimerState::default()
        };
        assert_eq!(empty.progress_ratio(), 0.0);
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(100 * 60 + 5), "100:05");
    }

    #[test]
    fn mode_labels() {
        let mut state = TimerState::default();
        assert_eq!(state.mode_label(), "Ready to Start");
        state.mode = TimerMode::Work;
        assert_eq!(state.mode_label(), "🎯 Focus Time");
        state.mode = TimerMode::LongBreak;
        assert_eq!(state.mode_label(), "☕ Break Time");
    }

    #[test]
    fn restore_resets_ephemeral_fields() {
        let mut state = running(900, 300);
        state.session_count = 7;
        state.settings.work_duration = 900;

        let restored = TimerState::restore(state.snapshot());
        assert_eq!(restored.session_count, 7);
        assert_eq!(restored.settings, state.settings);
        assert_eq!(restored.mode, TimerMode::Idle);
        assert_eq!(restored.elapsed, 0);
        assert!(!restored.is_running);
        assert_eq!(restored.duration, 900);
    }

    #[test]
    fn reducer_applies_actions() {
        let state = Rc::new(TimerState::default());
        let state = state.reduce(TimerAction::Start);
        let state = state.reduce(TimerAction::Tick);
        assert_eq!(state.elapsed, 1);
        let state = state.reduce(TimerAction::Reset);
        assert_eq!(state.mode, TimerMode::Idle);
        assert_eq!(state.elapsed, 0);
    }

    #[test]
    fn sanitize_replaces_only_out_of_range_fields() {
        let mut settings = TimerSettings {
            work_duration: 0,
            short_break_duration: 10 * 60,
            long_break_duration: defaults::MAX_PHASE_SECS + 1,
            long_break_interval: 0,
            auto_start_breaks: true,
            auto_start_work: true,
        };
        let replaced = settings.sanitize();
        assert_eq!(
            replaced,
            vec!["workDuration", "longBreakDuration", "longBreakInterval"]
        );
        assert_eq!(settings.work_duration, defaults::WORK_DURATION_SECS);
        assert_eq!(settings.short_break_duration, 10 * 60);
        assert_eq!(settings.long_break_duration, defaults::LONG_BREAK_SECS);
        assert_eq!(settings.long_break_interval, defaults::LONG_BREAK_INTERVAL);
        assert!(settings.auto_start_breaks && settings.auto_start_work);

        let mut valid = TimerSettings::default();
        assert!(valid.sanitize().is_empty());
    }

    #[test]
    fn settings_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(TimerSettings::default()).unwrap();
        assert_eq!(json["workDuration"], 1500);
        assert_eq!(json["longBreakInterval"], 4);
        assert_eq!(json["autoStartBreaks"], false);
        assert_eq!(serde_json::to_value(TimerMode::ShortBreak).unwrap(), "shortBreak");
    }
}
