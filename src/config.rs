//! Application-level configuration constants.
//! Setting ranges live in `coffeedoro::defaults`.

// Timer behavior
pub const TICK_INTERVAL_MS: u32 = 1000;
