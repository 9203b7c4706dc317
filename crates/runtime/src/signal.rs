//! Bridge from an external disconnect signal to a one-shot callback.
//!
//! The signal is a [`CancellationToken`] owned by the connection. The bridge
//! only observes it: [`on_signal`] runs the callback the first time the token
//! is cancelled and returns a [`SignalSubscription`] that stops observing.
//!
//! A token that is already cancelled at subscription time fires the callback
//! synchronously, before `on_signal` returns. The subscription is not yet
//! visible to the caller at that point, so a callback that tears down its
//! owner must not expect to find the subscription stored anywhere.

use std::fmt;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::trigger::ArmedTrigger;

/// Unsubscribe handle returned by [`on_signal`]. Dropping it unsubscribes.
pub struct SignalSubscription {
	trigger: ArmedTrigger,
}

impl SignalSubscription {
	/// Stops observing the signal. Returns true if the callback had not fired.
	///
	/// Unsubscribing after the signal tripped is a no-op.
	pub fn unsubscribe(&self) -> bool {
		self.trigger.disarm()
	}

	/// Returns true while the callback can still fire.
	pub fn is_active(&self) -> bool {
		self.trigger.is_armed()
	}
}

impl fmt::Debug for SignalSubscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SignalSubscription")
			.field("active", &self.is_active())
			.finish()
	}
}

/// Subscribes `on_tripped` to `signal` on the current Tokio runtime.
///
/// # Errors
///
/// Returns [`Error::NoRuntime`] when called outside a Tokio runtime.
pub fn on_signal<F>(signal: &CancellationToken, on_tripped: F) -> Result<SignalSubscription>
where
	F: FnOnce() + Send + 'static,
{
	let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
	Ok(on_signal_on(&handle, signal, on_tripped))
}

/// Subscribes `on_tripped` to `signal`, watching it from a task on `handle`.
pub fn on_signal_on<F>(handle: &Handle, signal: &CancellationToken, on_tripped: F) -> SignalSubscription
where
	F: FnOnce() + Send + 'static,
{
	if signal.is_cancelled() {
		tracing::debug!("disconnect signal already tripped at subscription");
		on_tripped();
		return SignalSubscription {
			trigger: ArmedTrigger::fired(),
		};
	}

	let token = signal.clone();
	let trigger = ArmedTrigger::spawn(handle, async move { token.cancelled().await }, on_tripped);
	SignalSubscription { trigger }
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	async fn settle() {
		for _ in 0..4 {
			tokio::task::yield_now().await;
		}
	}

	fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
		let count = Arc::new(AtomicUsize::new(0));
		let inner = Arc::clone(&count);
		(count, move || {
			inner.fetch_add(1, Ordering::SeqCst);
		})
	}

	#[tokio::test]
	async fn fires_when_signal_trips() {
		let token = CancellationToken::new();
		let (count, on_tripped) = counter();
		let sub = on_signal(&token, on_tripped).unwrap();

		settle().await;
		assert_eq!(count.load(Ordering::SeqCst), 0);
		assert!(sub.is_active());

		token.cancel();
		settle().await;
		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert!(!sub.is_active());
		assert!(!sub.unsubscribe());
	}

	#[tokio::test]
	async fn already_tripped_signal_fires_synchronously() {
		let token = CancellationToken::new();
		token.cancel();
		let (count, on_tripped) = counter();

		let sub = on_signal(&token, on_tripped).unwrap();

		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert!(!sub.is_active());
	}

	#[tokio::test]
	async fn unsubscribed_callback_never_fires() {
		let token = CancellationToken::new();
		let (count, on_tripped) = counter();
		let sub = on_signal(&token, on_tripped).unwrap();

		assert!(sub.unsubscribe());
		token.cancel();
		settle().await;

		assert_eq!(count.load(Ordering::SeqCst), 0);
		assert!(!sub.is_active());
	}

	#[tokio::test]
	async fn child_token_cancellation_propagates() {
		let parent = CancellationToken::new();
		let child = parent.child_token();
		let (count, on_tripped) = counter();
		let _sub = on_signal(&child, on_tripped).unwrap();

		parent.cancel();
		settle().await;
		assert_eq!(count.load(Ordering::SeqCst), 1);
	}
}
