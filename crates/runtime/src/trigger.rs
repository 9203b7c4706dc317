//! Cancelable one-shot trigger shared by the deadline watcher and the signal bridge.
//!
//! A trigger is a spawned task that waits on some future and then runs a
//! callback. Firing and disarming both go through one [`ExactlyOnceGate`], so
//! exactly one of them wins: a disarmed trigger never fires, and disarming a
//! fired trigger is a no-op.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::gate::ExactlyOnceGate;

pub(crate) struct ArmedTrigger {
	gate: Arc<ExactlyOnceGate>,
	task: Option<JoinHandle<()>>,
}

impl ArmedTrigger {
	/// Spawns a task on `handle` that runs `on_fire` once `wait` completes.
	pub(crate) fn spawn<W, F>(handle: &Handle, wait: W, on_fire: F) -> Self
	where
		W: Future<Output = ()> + Send + 'static,
		F: FnOnce() + Send + 'static,
	{
		let gate = Arc::new(ExactlyOnceGate::new());
		let task_gate = Arc::clone(&gate);
		let task = handle.spawn(async move {
			wait.await;
			task_gate.invoke(on_fire);
		});

		Self {
			gate,
			task: Some(task),
		}
	}

	/// A trigger that already fired synchronously and has nothing left to cancel.
	pub(crate) fn fired() -> Self {
		let gate = Arc::new(ExactlyOnceGate::new());
		gate.invoke(|| {});
		Self { gate, task: None }
	}

	/// Prevents the trigger from firing. Returns true if it had not fired yet.
	pub(crate) fn disarm(&self) -> bool {
		let mut disarmed = false;
		self.gate.invoke(|| disarmed = true);
		if let Some(task) = &self.task {
			task.abort();
		}
		disarmed
	}

	/// Returns true while the trigger can still fire.
	pub(crate) fn is_armed(&self) -> bool {
		!self.gate.is_consumed()
	}
}

impl Drop for ArmedTrigger {
	fn drop(&mut self) {
		self.disarm();
	}
}
