//! Status-flag polling
//!
//! Every blocking driver operation on this part waits by spinning on a
//! status bit. The default contract is to spin forever, which matches the
//! bare-metal behaviour: a stuck peripheral hangs the caller. A bounded
//! [`PollLimit`] turns that hang into an error instead.

use core::num::NonZeroU32;

/// How long a driver may spin on a status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollLimit {
    /// Spin until the condition holds, however long that takes
    #[default]
    Unbounded,
    /// Give up after this many unsuccessful checks
    Attempts(NonZeroU32),
}

impl PollLimit {
    /// Bounded limit, or `Unbounded` when `attempts` is zero
    pub const fn attempts(attempts: u32) -> Self {
        match NonZeroU32::new(attempts) {
            Some(n) => PollLimit::Attempts(n),
            None => PollLimit::Unbounded,
        }
    }
}

/// The polled condition did not become true within the limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut;

/// Spin until `ready` returns true
///
/// `ready` is evaluated at least once. With [`PollLimit::Attempts`] the
/// condition is checked at most that many times.
pub fn wait_until<F>(limit: PollLimit, mut ready: F) -> Result<(), TimedOut>
where
    F: FnMut() -> bool,
{
    match limit {
        PollLimit::Unbounded => {
            while !ready() {
                core::hint::spin_loop();
            }
            Ok(())
        }
        PollLimit::Attempts(max) => {
            for _ in 0..max.get() {
                if ready() {
                    return Ok(());
                }
                core::hint::spin_loop();
            }
            Err(TimedOut)
        }
    }
}
