//! Transport start handshake coordination.
//!
//! A [`HandshakeCoordinator`] adjudicates one attempt to start a transport.
//! Four sources race to decide it:
//!
//! 1. [`report_success`](HandshakeCoordinator::report_success), which issues
//!    the start request and succeeds if the server acknowledges it
//! 2. [`report_failure`](HandshakeCoordinator::report_failure) from the transport
//! 3. The connect deadline ([`crate::deadline`])
//! 4. The connection's disconnect signal ([`crate::signal`])
//!
//! Every source routes through one [`ExactlyOnceGate`]. The first to reach it
//! decides the [`Outcome`]; the rest are dropped. No source has priority.
//!
//! # Lifecycle
//!
//! ```text
//!            report_success ──► start request ──► "started" ─┐
//!                                     │                      │
//!                                     └─ rejected / error ─┐ │
//!  report_failure ─────────────────────────────────────────┤ │
//!  deadline expiry ────────────────────────────────────────┤ │
//!  disconnect signal ──────────────────────────────────────┤ │
//!                                                          ▼ ▼
//!                                                    ExactlyOnceGate
//!                                                     │           │
//!                        observer, release triggers ◄─┘           └─► release triggers,
//!                        publish Failed                               queue Succeeded
//! ```
//!
//! Once decided, the deadline and the disconnect subscription are released so
//! neither can fire later. Success is published from a task on the runtime's
//! queue rather than inline, so the context that delivered the start response
//! never runs downstream continuations.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use hubwire_protocol::TransportKind;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::connection::{ConnectionLike, HttpClient};
use crate::deadline::{self, DeadlineHandle};
use crate::error::{Error, HandshakeError, Result};
use crate::gate::ExactlyOnceGate;
use crate::signal::{self, SignalSubscription};
use crate::start;

/// Callback run once if, and only if, the handshake fails.
///
/// Must not panic. A panicking observer is a bug in the caller and is not caught.
pub type FailureObserver = Box<dyn FnOnce(&HandshakeError) + Send>;

/// State of the pending-result slot.
#[derive(Debug, Clone, Default)]
pub enum Outcome {
	/// Not yet decided.
	#[default]
	Pending,
	/// The server acknowledged the transport.
	Succeeded,
	/// The handshake failed.
	Failed(HandshakeError),
}

impl Outcome {
	/// Returns true once the slot holds a terminal value.
	pub fn is_resolved(&self) -> bool {
		!matches!(self, Outcome::Pending)
	}

	/// Converts a terminal outcome into a result. `None` while pending.
	pub fn into_result(self) -> Option<std::result::Result<(), HandshakeError>> {
		match self {
			Outcome::Pending => None,
			Outcome::Succeeded => Some(Ok(())),
			Outcome::Failed(e) => Some(Err(e)),
		}
	}
}

/// Awaitable, read-only view of a handshake's outcome.
///
/// Cloneable; every clone resolves to the same terminal value.
#[derive(Debug, Clone)]
pub struct HandshakeOutcome {
	rx: watch::Receiver<Outcome>,
}

impl HandshakeOutcome {
	/// Waits for the handshake to be decided.
	///
	/// A coordinator dropped before it was decided reports
	/// [`HandshakeError::ExternalDisconnect`].
	pub async fn wait(mut self) -> std::result::Result<(), HandshakeError> {
		let outcome = match self.rx.wait_for(Outcome::is_resolved).await {
			Ok(outcome) => outcome.clone(),
			Err(_) => {
				tracing::debug!("handshake coordinator dropped before resolution");
				return Err(HandshakeError::ExternalDisconnect);
			}
		};
		outcome.into_result().unwrap_or(Err(HandshakeError::ExternalDisconnect))
	}

	/// Returns the current state without waiting.
	pub fn current(&self) -> Outcome {
		self.rx.borrow().clone()
	}
}

impl IntoFuture for HandshakeOutcome {
	type Output = std::result::Result<(), HandshakeError>;
	type IntoFuture = BoxFuture<'static, Self::Output>;

	fn into_future(self) -> Self::IntoFuture {
		Box::pin(self.wait())
	}
}

/// Builder for [`HandshakeCoordinator`].
///
/// Everything set here is in place before any trigger source is wired, so an
/// already-tripped disconnect signal still reaches the failure observer.
pub struct HandshakeBuilder {
	connection: Arc<dyn ConnectionLike>,
	http: Arc<dyn HttpClient>,
	transport: TransportKind,
	connection_data: Option<Arc<str>>,
	on_failure: Option<FailureObserver>,
}

impl HandshakeBuilder {
	/// Transport being started. Defaults to long polling.
	pub fn transport(mut self, transport: TransportKind) -> Self {
		self.transport = transport;
		self
	}

	/// Opaque per-connection data sent with the start request.
	pub fn connection_data(mut self, data: impl Into<Arc<str>>) -> Self {
		self.connection_data = Some(data.into());
		self
	}

	/// Observer run once if the handshake fails.
	pub fn on_failure<F>(mut self, observer: F) -> Self
	where
		F: FnOnce(&HandshakeError) + Send + 'static,
	{
		self.on_failure = Some(Box::new(observer));
		self
	}

	/// Creates the coordinator and arms the disconnect and deadline triggers.
	///
	/// # Errors
	///
	/// Returns [`Error::NoRuntime`] when called outside a Tokio runtime.
	pub fn start(self) -> Result<HandshakeCoordinator> {
		let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
		let timeout = self.connection.total_transport_connect_timeout();
		let (outcome, _) = watch::channel(Outcome::Pending);

		let inner = Arc::new(Inner {
			connection: self.connection,
			http: self.http,
			transport: self.transport,
			connection_data: self.connection_data,
			timeout,
			gate: ExactlyOnceGate::new(),
			outcome,
			on_failure: Mutex::new(self.on_failure),
			triggers: Mutex::new(TriggerSources::default()),
			runtime,
		});

		tracing::debug!(
			transport = %inner.transport,
			timeout_ms = timeout.as_millis() as u64,
			"starting transport handshake"
		);

		// May fire synchronously if the signal already tripped; fail() then
		// marks the trigger set released and the store below drops it.
		let weak = Arc::downgrade(&inner);
		let disconnect_token = inner.connection.disconnect_token();
		let disconnect = signal::on_signal_on(&inner.runtime, &disconnect_token, move || {
			if let Some(inner) = weak.upgrade() {
				tracing::debug!(transport = %inner.transport, "disconnect signal tripped");
				inner.fail(HandshakeError::ExternalDisconnect);
			}
		});
		inner.store_disconnect(disconnect);

		if !inner.gate.is_consumed() {
			let weak = Arc::downgrade(&inner);
			let deadline = deadline::start_after_on(&inner.runtime, timeout, move || {
				if let Some(inner) = weak.upgrade() {
					tracing::debug!(transport = %inner.transport, "handshake deadline expired");
					inner.fail(HandshakeError::Timeout(timeout));
				}
			});
			inner.store_deadline(deadline);
		}

		Ok(HandshakeCoordinator { inner })
	}
}

/// Coordinates a single transport start handshake.
///
/// Cheap to clone; clones share the same attempt. A new attempt needs a new
/// coordinator.
#[derive(Clone)]
pub struct HandshakeCoordinator {
	inner: Arc<Inner>,
}

impl HandshakeCoordinator {
	/// Starts building a coordinator for `connection`.
	pub fn builder(connection: Arc<dyn ConnectionLike>, http: Arc<dyn HttpClient>) -> HandshakeBuilder {
		HandshakeBuilder {
			connection,
			http,
			transport: TransportKind::default(),
			connection_data: None,
			on_failure: None,
		}
	}

	/// Creates a coordinator with default settings and no failure observer.
	pub fn start(connection: Arc<dyn ConnectionLike>, http: Arc<dyn HttpClient>) -> Result<Self> {
		Self::builder(connection, http).start()
	}

	/// Replaces the failure observer.
	///
	/// Has no effect on a handshake that has already failed.
	pub fn set_on_failure<F>(&self, observer: F)
	where
		F: FnOnce(&HandshakeError) + Send + 'static,
	{
		*self.inner.on_failure.lock() = Some(Box::new(observer));
	}

	/// Reports that the transport connected; asks the server to start it.
	///
	/// The request runs on a spawned task. Its result is routed through the
	/// gate, so a response arriving after the handshake was decided is dropped.
	pub fn report_success(&self) {
		if self.inner.gate.is_consumed() {
			tracing::debug!(transport = %self.inner.transport, "handshake already decided, skipping start request");
			return;
		}

		let inner = Arc::clone(&self.inner);
		self.inner.runtime.spawn(async move {
			let result = start::request_start(
				inner.connection.as_ref(),
				inner.http.as_ref(),
				inner.transport,
				inner.connection_data.as_deref(),
			)
			.await;

			match result {
				Ok(()) => inner.succeed(),
				Err(e) => inner.fail(e),
			}
		});
	}

	/// Reports that the transport failed to connect.
	pub fn report_failure(&self) {
		self.inner.fail(HandshakeError::ExplicitFailure(None));
	}

	/// Reports that the transport failed to connect because of `cause`.
	pub fn report_failure_with(&self, cause: Error) {
		self.inner.fail(HandshakeError::ExplicitFailure(Some(Arc::new(cause))));
	}

	/// Returns an awaitable view of the outcome.
	pub fn outcome(&self) -> HandshakeOutcome {
		HandshakeOutcome {
			rx: self.inner.outcome.subscribe(),
		}
	}

	/// Returns the current state of the result slot.
	pub fn current(&self) -> Outcome {
		self.inner.outcome.borrow().clone()
	}

	/// Returns true once a trigger has won the gate.
	///
	/// A successful handshake is decided before its outcome is published.
	pub fn is_decided(&self) -> bool {
		self.inner.gate.is_consumed()
	}

	/// Returns true once neither the deadline nor the disconnect signal can fire.
	pub fn triggers_released(&self) -> bool {
		let triggers = self.inner.triggers.lock();
		triggers.released && triggers.deadline.is_none() && triggers.disconnect.is_none()
	}

	/// Transport this handshake starts.
	pub fn transport(&self) -> TransportKind {
		self.inner.transport
	}

	/// Configured connect window.
	pub fn timeout(&self) -> Duration {
		self.inner.timeout
	}
}

impl IntoFuture for &HandshakeCoordinator {
	type Output = std::result::Result<(), HandshakeError>;
	type IntoFuture = BoxFuture<'static, Self::Output>;

	fn into_future(self) -> Self::IntoFuture {
		self.outcome().into_future()
	}
}

impl fmt::Debug for HandshakeCoordinator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HandshakeCoordinator")
			.field("transport", &self.inner.transport)
			.field("timeout", &self.inner.timeout)
			.field("outcome", &*self.inner.outcome.borrow())
			.finish()
	}
}

#[derive(Default)]
struct TriggerSources {
	deadline: Option<DeadlineHandle>,
	disconnect: Option<SignalSubscription>,
	released: bool,
}

struct Inner {
	connection: Arc<dyn ConnectionLike>,
	http: Arc<dyn HttpClient>,
	transport: TransportKind,
	connection_data: Option<Arc<str>>,
	timeout: Duration,
	gate: ExactlyOnceGate,
	outcome: watch::Sender<Outcome>,
	on_failure: Mutex<Option<FailureObserver>>,
	triggers: Mutex<TriggerSources>,
	runtime: Handle,
}

impl Inner {
	fn succeed(self: &Arc<Self>) {
		let mut admitted = false;
		self.gate.invoke(|| {
			admitted = true;
			tracing::info!(transport = %self.transport, "transport started");

			self.release_triggers();

			let inner = Arc::clone(self);
			self.runtime.spawn(async move {
				inner.outcome.send_replace(Outcome::Succeeded);
			});
		});

		if !admitted {
			tracing::debug!(transport = %self.transport, "late start acknowledgement dropped");
		}
	}

	fn fail(&self, error: HandshakeError) {
		let mut admitted = false;
		self.gate.invoke(|| {
			admitted = true;
			tracing::warn!(
				transport = %self.transport,
				cause = %error.cause(),
				"transport start failed: {error}"
			);

			// Taken out of the lock so the observer may call back into the coordinator.
			let observer = self.on_failure.lock().take();
			if let Some(observer) = observer {
				observer(&error);
			}

			self.release_triggers();
			self.outcome.send_replace(Outcome::Failed(error.clone()));
		});

		if !admitted {
			tracing::debug!(
				transport = %self.transport,
				cause = %error.cause(),
				"handshake already decided, failure dropped"
			);
		}
	}

	fn release_triggers(&self) {
		let (deadline, disconnect) = {
			let mut triggers = self.triggers.lock();
			triggers.released = true;
			(triggers.deadline.take(), triggers.disconnect.take())
		};

		if let Some(deadline) = deadline {
			deadline.cancel();
		}
		if let Some(disconnect) = disconnect {
			disconnect.unsubscribe();
		}
		tracing::debug!(transport = %self.transport, "handshake trigger sources released");
	}

	fn store_disconnect(&self, subscription: SignalSubscription) {
		let rejected = {
			let mut triggers = self.triggers.lock();
			if triggers.released {
				Some(subscription)
			} else {
				triggers.disconnect = Some(subscription);
				None
			}
		};
		if let Some(subscription) = rejected {
			subscription.unsubscribe();
		}
	}

	fn store_deadline(&self, deadline: DeadlineHandle) {
		let rejected = {
			let mut triggers = self.triggers.lock();
			if triggers.released {
				Some(deadline)
			} else {
				triggers.deadline = Some(deadline);
				None
			}
		};
		if let Some(deadline) = rejected {
			deadline.cancel();
		}
	}
}
