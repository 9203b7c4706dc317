//! Single-shot deadline timer.
//!
//! [`start_after`] schedules a callback to run once a duration has elapsed,
//! measured from the call. The returned [`DeadlineHandle`] cancels it;
//! dropping the handle cancels it too.
//!
//! Cancellation and expiry race through a shared gate:
//! - cancel before expiry: the callback never runs
//! - cancel after expiry: no-op
//! - cancel from inside the callback: no-op, no deadlock

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::trigger::ArmedTrigger;

/// Cancellation handle for a scheduled deadline.
pub struct DeadlineHandle {
	trigger: ArmedTrigger,
	deadline: Instant,
}

impl DeadlineHandle {
	/// Cancels the deadline. Returns true if it was still pending.
	pub fn cancel(&self) -> bool {
		self.trigger.disarm()
	}

	/// Returns true if the deadline has neither fired nor been cancelled.
	pub fn is_pending(&self) -> bool {
		self.trigger.is_armed()
	}

	/// Instant at which the callback fires.
	pub fn deadline(&self) -> Instant {
		self.deadline
	}
}

impl fmt::Debug for DeadlineHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DeadlineHandle")
			.field("deadline", &self.deadline)
			.field("pending", &self.is_pending())
			.finish()
	}
}

/// Schedules `on_expire` on the current Tokio runtime.
///
/// # Errors
///
/// Returns [`Error::NoRuntime`] when called outside a Tokio runtime.
pub fn start_after<F>(duration: Duration, on_expire: F) -> Result<DeadlineHandle>
where
	F: FnOnce() + Send + 'static,
{
	let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
	Ok(start_after_on(&handle, duration, on_expire))
}

/// Schedules `on_expire` on the given runtime.
pub fn start_after_on<F>(handle: &Handle, duration: Duration, on_expire: F) -> DeadlineHandle
where
	F: FnOnce() + Send + 'static,
{
	// Fix the deadline before spawning so scheduling latency doesn't stretch it.
	let deadline = Instant::now() + duration;
	let trigger = ArmedTrigger::spawn(handle, tokio::time::sleep_until(deadline), on_expire);
	DeadlineHandle { trigger, deadline }
}
