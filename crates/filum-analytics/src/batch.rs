// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event queue, flush scheduling, and batch transmission.
//!
//! Events land in an in-memory FIFO queue. Three things trigger a flush:
//! the first enqueue on a client (bootstrap), the queue reaching `flush_at`
//! (threshold), and a one-shot timer armed while events sit below the
//! threshold (interval). A flush drains at most `flush_at` entries
//! atomically, posts them through the transport with bounded retry, and
//! resolves every drained delivery with the terminal outcome.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{debug, error};

use filum_analytics_core::{Event, EventType};

use crate::config::ClientConfig;
use crate::error::{DeliveryError, FlushError};
use crate::message::{normalize, Message};
use crate::transport::Transport;

type DeliveryResult = Result<(), DeliveryError>;
type DeliverySender = oneshot::Sender<DeliveryResult>;

/// The pending outcome of one recorded event.
///
/// Resolves exactly once, when the batch containing the event is delivered
/// or abandoned. Dropping the handle is allowed; delivery proceeds
/// regardless.
#[derive(Debug)]
pub struct Delivery {
	rx: oneshot::Receiver<DeliveryResult>,
}

impl Delivery {
	fn pending() -> (DeliverySender, Self) {
		let (tx, rx) = oneshot::channel();
		(tx, Self { rx })
	}

	fn resolved(result: DeliveryResult) -> Self {
		let (tx, rx) = oneshot::channel();
		let _ = tx.send(result);
		Self { rx }
	}
}

impl Future for Delivery {
	type Output = DeliveryResult;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.rx).poll(cx).map(|recv| match recv {
			Ok(outcome) => outcome,
			// The sender only disappears unresolved if the client was torn
			// down mid-queue.
			Err(_) => Err(DeliveryError::ClientShutdown),
		})
	}
}

/// One queued event and its delivery sender.
struct QueueEntry {
	event: Event,
	delivery: DeliverySender,
}

/// Queue and timer state, guarded by a single mutex.
///
/// The lock is only held for queue mutation and timer bookkeeping, never
/// across an await point.
struct QueueState {
	entries: VecDeque<QueueEntry>,
	/// True while a one-shot interval timer is armed.
	timer_pending: bool,
	/// Bumped on every arm and cancel; a woken timer re-checks it and exits
	/// when stale, so cancellation never aborts an in-flight flush.
	timer_epoch: u64,
	/// Set by the first enqueue; the bootstrap flush fires once per client.
	flushed: bool,
}

/// Owns the queue and performs flush cycles.
pub(crate) struct BatchProcessor {
	config: ClientConfig,
	write_key: String,
	endpoint: String,
	transport: Arc<dyn Transport>,
	state: Mutex<QueueState>,
	closed: AtomicBool,
	/// Self-handle for spawning flush tasks and timers from `&self`.
	me: Weak<BatchProcessor>,
}

impl BatchProcessor {
	pub(crate) fn new(
		config: ClientConfig,
		write_key: String,
		transport: Arc<dyn Transport>,
	) -> Arc<Self> {
		let endpoint = config.endpoint();
		Arc::new_cyclic(|me| Self {
			config,
			write_key,
			endpoint,
			transport,
			state: Mutex::new(QueueState {
				entries: VecDeque::new(),
				timer_pending: false,
				timer_epoch: 0,
				flushed: false,
			}),
			closed: AtomicBool::new(false),
			me: me.clone(),
		})
	}

	fn state(&self) -> MutexGuard<'_, QueueState> {
		// Recover from poisoning; the guarded section never runs user code.
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	pub(crate) fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	pub(crate) fn queue_len(&self) -> usize {
		self.state().entries.len()
	}

	/// Normalizes and queues an event, then applies the flush rules.
	///
	/// Must be called within a Tokio runtime: triggered flushes and the
	/// interval timer are spawned tasks.
	pub(crate) fn enqueue(&self, event_type: EventType, message: Message) -> Delivery {
		if !self.config.enable {
			return Delivery::resolved(Ok(()));
		}
		if self.is_closed() {
			return Delivery::resolved(Err(DeliveryError::ClientShutdown));
		}

		let event = normalize(event_type, message);
		let (tx, delivery) = Delivery::pending();

		let trigger = {
			let mut state = self.state();
			state.entries.push_back(QueueEntry {
				event,
				delivery: tx,
			});

			if !state.flushed {
				state.flushed = true;
				debug!(event_type = %event_type, "First enqueue, bootstrap flush");
				true
			} else {
				let trigger = state.entries.len() >= self.config.flush_at;
				if trigger {
					debug!(
						queue_len = state.entries.len(),
						flush_at = self.config.flush_at,
						"Queue reached flush threshold"
					);
				}
				if !self.config.flush_interval.is_zero() && !state.timer_pending {
					self.arm_timer(&mut state);
				}
				trigger
			}
		};

		if trigger {
			self.spawn_flush();
		}

		delivery
	}

	/// Spawns a fire-and-forget flush; terminal failures are logged.
	fn spawn_flush(&self) {
		let Some(this) = self.me.upgrade() else {
			return;
		};
		tokio::spawn(async move {
			if let Err(e) = this.flush().await {
				error!(error = %e, batch_len = e.batch.len(), "Triggered flush failed");
			}
		});
	}

	/// Arms the one-shot interval timer. Caller holds the state lock.
	fn arm_timer(&self, state: &mut QueueState) {
		let Some(this) = self.me.upgrade() else {
			return;
		};
		state.timer_pending = true;
		state.timer_epoch += 1;
		let epoch = state.timer_epoch;
		let interval = self.config.flush_interval;

		tokio::spawn(async move {
			tokio::time::sleep(interval).await;
			{
				let mut state = this.state();
				if !state.timer_pending || state.timer_epoch != epoch {
					// Cancelled by a flush in the meantime.
					return;
				}
				state.timer_pending = false;
			}
			debug!("Flush timer fired");
			if let Err(e) = this.flush().await {
				error!(error = %e, batch_len = e.batch.len(), "Interval flush failed");
			}
		});
	}

	/// Drains and transmits one batch.
	///
	/// Returns the events that were sent (empty when the client is disabled
	/// or the queue was empty). On terminal failure the error carries the
	/// attempted batch; the batch is not re-queued.
	pub(crate) async fn flush(&self) -> Result<Vec<Event>, FlushError> {
		if !self.config.enable {
			return Ok(Vec::new());
		}

		let batch: Vec<QueueEntry> = {
			let mut state = self.state();
			// Any flush cancels a pending timer.
			state.timer_pending = false;
			state.timer_epoch += 1;

			let n = state.entries.len().min(self.config.flush_at);
			state.entries.drain(..n).collect()
		};

		if batch.is_empty() {
			return Ok(Vec::new());
		}

		debug!(count = batch.len(), "Flushing event batch");

		let (events, senders): (Vec<Event>, Vec<DeliverySender>) = batch
			.into_iter()
			.map(|entry| (entry.event, entry.delivery))
			.unzip();

		let headers = vec![(
			"Authorization".to_string(),
			format!("Bearer {}", self.write_key),
		)];

		let sent = filum_common_http::retry(&self.config.retry_config, || async {
			self.transport
				.post(
					&self.endpoint,
					&events,
					&headers,
					self.config.request_timeout,
				)
				.await
		})
		.await;

		match sent {
			Ok(()) => {
				for sender in senders {
					let _ = sender.send(Ok(()));
				}
				Ok(events)
			}
			Err(err) => {
				let err: DeliveryError = err.into();
				for sender in senders {
					let _ = sender.send(Err(err.clone()));
				}
				Err(FlushError {
					error: err,
					batch: events,
				})
			}
		}
	}

	/// Marks the client closed and performs a final flush.
	pub(crate) async fn shutdown(&self) -> Result<Vec<Event>, FlushError> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Ok(Vec::new());
		}
		self.flush().await
	}

	#[cfg(test)]
	fn timer_pending(&self) -> bool {
		self.state().timer_pending
	}
}
