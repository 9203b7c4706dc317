//! Exactly-once execution gate.
//!
//! [`ExactlyOnceGate`] admits the first [`invoke`](ExactlyOnceGate::invoke)
//! call and silently drops every later one. Admission is a single
//! compare-and-swap, so concurrent callers on different threads or tasks race
//! on the flag itself, not on the action body.
//!
//! The gate holds no lock while the action runs. An action may therefore call
//! back into the same gate (the nested call is dropped) without deadlocking.

use std::sync::atomic::{AtomicBool, Ordering};

/// Runs a guarded action at most once across all callers.
#[derive(Debug, Default)]
pub struct ExactlyOnceGate {
	consumed: AtomicBool,
}

impl ExactlyOnceGate {
	/// Creates an unconsumed gate.
	pub const fn new() -> Self {
		Self {
			consumed: AtomicBool::new(false),
		}
	}

	/// Runs `action` if no previous call on this gate has been admitted.
	///
	/// Later calls, including ones racing this call from other threads, do
	/// nothing and drop their action unrun.
	pub fn invoke<F: FnOnce()>(&self, action: F) {
		if self.try_admit() {
			action();
		}
	}

	/// Returns true once some call has been admitted.
	pub fn is_consumed(&self) -> bool {
		self.consumed.load(Ordering::Acquire)
	}

	fn try_admit(&self) -> bool {
		self.consumed
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::AtomicUsize;

	use super::*;

	#[test]
	fn first_invoke_runs_later_ones_do_not() {
		let gate = ExactlyOnceGate::new();
		let runs = AtomicUsize::new(0);

		assert!(!gate.is_consumed());
		gate.invoke(|| {
			runs.fetch_add(1, Ordering::SeqCst);
		});
		gate.invoke(|| {
			runs.fetch_add(10, Ordering::SeqCst);
		});

		assert!(gate.is_consumed());
		assert_eq!(runs.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn nested_invoke_is_dropped_without_deadlock() {
		let gate = ExactlyOnceGate::new();
		let inner_ran = AtomicBool::new(false);

		gate.invoke(|| {
			gate.invoke(|| inner_ran.store(true, Ordering::SeqCst));
		});

		assert!(!inner_ran.load(Ordering::SeqCst));
	}

	#[test]
	fn concurrent_callers_admit_exactly_one() {
		for _ in 0..50 {
			let gate = Arc::new(ExactlyOnceGate::new());
			let runs = Arc::new(AtomicUsize::new(0));
			let barrier = Arc::new(std::sync::Barrier::new(8));

			std::thread::scope(|scope| {
				for _ in 0..8 {
					let gate = Arc::clone(&gate);
					let runs = Arc::clone(&runs);
					let barrier = Arc::clone(&barrier);
					scope.spawn(move || {
						barrier.wait();
						gate.invoke(|| {
							runs.fetch_add(1, Ordering::SeqCst);
						});
					});
				}
			});

			assert_eq!(runs.load(Ordering::SeqCst), 1);
		}
	}
}
