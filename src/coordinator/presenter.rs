//! # Presenter: the presentation-thread half of the activation protocol.
//!
//! The [`Presenter`] is the single consumer of the presentation channel.
//! The host application takes it once
//! ([`Coordinator::take_presenter`](crate::Coordinator::take_presenter))
//! and drives [`Presenter::run`] on the thread that is allowed to touch
//! UI — commands are processed there synchronously, in FIFO order, and it
//! is the only place the active slot is mutated.
//!
//! ## Command handling
//! ```text
//! Activate ──► slot occupied? ── yes ──► stale wake-up, ignore
//!              claim slot (is_active = true, before any pop)
//!              loop:
//!                pop front ── none ──► release claim, done (queue drained)
//!                host invalid? ── yes ──► synthetic cancel, continue
//!                install completion hook ── Err ──► forced cancel, continue
//!                install into slot, publish Activated, entity.activate()
//!
//! Complete ──► clear slot gracefully            (no-op when idle)
//! Cancel(None) ──► force-clear slot             (no-op when idle)
//! Cancel(Some(e)) ──► force-clear only if slot holds exactly e
//! ```
//!
//! The completion hook — fired by the entity itself when it finishes —
//! detaches the entity from the slot and broadcasts the gate so the
//! coordinator immediately re-checks the queue. Commands never signal the
//! gate directly; the wake always travels through the entity's completion
//! notification, exactly once per activation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::coordinator::channel::Command;
use crate::coordinator::gate::ActivationGate;
use crate::coordinator::queue::WaitQueue;
use crate::coordinator::slot::ActiveSlot;
use crate::events::{Bus, Event, EventKind};
use crate::presentables::{CompletionHook, PresentableRef};

/// Presentation-side command processor. Take it once, run it on the
/// presentation thread.
pub struct Presenter {
    rx: mpsc::UnboundedReceiver<Command>,
    queue: Arc<WaitQueue>,
    slot: Arc<ActiveSlot>,
    gate: Arc<ActivationGate>,
    bus: Bus,
}

impl Presenter {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Command>,
        queue: Arc<WaitQueue>,
        slot: Arc<ActiveSlot>,
        gate: Arc<ActivationGate>,
        bus: Bus,
    ) -> Self {
        Self {
            rx,
            queue,
            slot,
            gate,
            bus,
        }
    }

    /// Processes commands until the token is cancelled or the coordinator
    /// is gone.
    ///
    /// Drive this on the presentation thread (for example inside a
    /// `LocalSet` on the UI event loop). On exit the active entity, if
    /// any, is force-cancelled; queued entities are left un-activated.
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }
        if let Some(prev) = self.slot.clear(false) {
            self.bus
                .publish(Event::new(EventKind::Cancelled).with_entity(prev.name()));
        }
    }

    /// Handles one command to completion before the next is taken.
    fn handle(&self, cmd: Command) {
        match cmd {
            Command::Activate => self.activate_next(),
            Command::Complete => {
                if let Some(entity) = self.slot.clear(true) {
                    self.bus
                        .publish(Event::new(EventKind::Dismissed).with_entity(entity.name()));
                }
            }
            Command::Cancel(None) => {
                if let Some(entity) = self.slot.clear(false) {
                    self.bus
                        .publish(Event::new(EventKind::Cancelled).with_entity(entity.name()));
                }
            }
            Command::Cancel(Some(target)) => {
                if let Some(entity) = self.slot.clear_if(&target, false) {
                    self.bus
                        .publish(Event::new(EventKind::Cancelled).with_entity(entity.name()));
                }
            }
        }
    }

    /// Pops and activates the next viable entity.
    fn activate_next(&self) {
        // An occupied slot means a stale wake-up raced the entity that is
        // currently presenting; dispatching over it would tear down a live
        // presentation. The queue is re-checked when that entity completes.
        if self.slot.is_occupied() {
            return;
        }

        // Claim the slot before popping. Once the front entity leaves the
        // queue a producer's `show` sees an empty queue; the raised flag is
        // what tells it an activation is still in flight, so it must not
        // signal the gate.
        self.slot.begin_activation();

        loop {
            let Some(entity) = self.queue.remove_first() else {
                self.slot.abort_activation();
                // A `show` that raced the empty pop saw the claim and
                // stayed quiet; re-check so its entity is not stranded.
                if !self.queue.is_empty() {
                    self.gate.signal_all();
                }
                return;
            };

            if let Some(host) = entity.host() {
                if !host.is_valid() {
                    self.bus.publish(
                        Event::new(EventKind::ActivationSkipped).with_entity(entity.name()),
                    );
                    entity.force_complete(false);
                    continue;
                }
            }

            let already_done = Arc::new(AtomicBool::new(false));
            if let Err(err) = entity.on_completion(self.completion_hook(&entity, &already_done)) {
                self.bus.publish(
                    Event::new(EventKind::HookFailed)
                        .with_entity(entity.name())
                        .with_reason(err.to_string()),
                );
                entity.force_complete(false);
                continue;
            }

            // An entity can complete while still queued (its owner closed
            // it early); the hook then ran during installation and there is
            // nothing left to present.
            if already_done.load(Ordering::Acquire) {
                self.bus.publish(
                    Event::new(EventKind::ActivationSkipped)
                        .with_entity(entity.name())
                        .with_reason("completed before activation"),
                );
                continue;
            }

            self.slot.install(Arc::clone(&entity));
            self.bus.publish(
                Event::new(EventKind::Activated)
                    .with_entity(entity.name())
                    .with_pending(self.queue.len()),
            );
            entity.activate();
            return;
        }
    }

    /// Builds the one-shot hook installed on an entity just before
    /// activation.
    ///
    /// Holds only a weak handle: the hook must not keep the entity alive
    /// through its own completion registry.
    fn completion_hook(&self, entity: &PresentableRef, done: &Arc<AtomicBool>) -> CompletionHook {
        let weak = Arc::downgrade(entity);
        let slot = Arc::clone(&self.slot);
        let gate = Arc::clone(&self.gate);
        let bus = self.bus.clone();
        let done = Arc::clone(done);

        Box::new(move || {
            done.store(true, Ordering::Release);
            if let Some(entity) = weak.upgrade() {
                // `release` only succeeds while the slot still holds this
                // entity, i.e. on self-completion. Forced paths cleared the
                // slot already and only need the wake-up below.
                if slot.release(&entity) {
                    bus.publish(Event::new(EventKind::Completed).with_entity(entity.name()));
                }
            }
            gate.signal_all();
        })
    }
}
