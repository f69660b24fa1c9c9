//! # Auto-save Notifications
//!
//! After every committed mutation the editor emits one [`MutationEvent`]: what
//! happened, which scope it touched, and the full resulting snapshot. Whoever
//! persists the collection subscribes a [`MutationSink`].
//!
//! Delivery is one-way. The notifier does not wait for acknowledgement, and a
//! sink that fails is logged and skipped; local state is never rolled back.
//! Events carry a sequence number and go out in the order mutations happened,
//! so a collaborator that batches can always keep the last one.
//!
//! Sinks replace process-wide event buses: a component that wants "product
//! reorders" registers a [`ChannelSink`] filtered to [`MutationKind::Reorder`]
//! and reads them from its own typed channel.

use crate::error::Result;
use crate::model::{OrderedRecord, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Add,
    Update,
    Delete,
    Reorder,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Add => "add",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Reorder => "reorder",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent<T> {
    pub sequence: u64,
    pub kind: MutationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub snapshot: Vec<OrderedRecord<T>>,
}

/// Receives mutation events. Errors are reported back only to be logged.
pub trait MutationSink<T> {
    fn receive(&mut self, event: &MutationEvent<T>) -> Result<()>;

    /// A closed sink will never accept another event and is unsubscribed.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Forwards events over an mpsc channel, optionally only some kinds.
pub struct ChannelSink<T> {
    sender: Sender<MutationEvent<T>>,
    kinds: Option<Vec<MutationKind>>,
    closed: bool,
}

impl<T> ChannelSink<T> {
    pub fn new(sender: Sender<MutationEvent<T>>) -> Self {
        Self {
            sender,
            kinds: None,
            closed: false,
        }
    }

    pub fn only(mut self, kinds: &[MutationKind]) -> Self {
        self.kinds = Some(kinds.to_vec());
        self
    }

    fn wants(&self, kind: MutationKind) -> bool {
        self.kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }
}

impl<T: Clone> MutationSink<T> for ChannelSink<T> {
    fn receive(&mut self, event: &MutationEvent<T>) -> Result<()> {
        if self.closed || !self.wants(event.kind) {
            return Ok(());
        }
        if self.sender.send(event.clone()).is_err() {
            // receiver dropped: the listener is gone, not failing
            self.closed = true;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Wraps a closure as a sink.
pub struct FnSink<F>(pub F);

impl<T, F> MutationSink<T> for FnSink<F>
where
    F: FnMut(&MutationEvent<T>),
{
    fn receive(&mut self, event: &MutationEvent<T>) -> Result<()> {
        (self.0)(event);
        Ok(())
    }
}

pub struct AutoSaveNotifier<T> {
    sinks: Vec<Box<dyn MutationSink<T>>>,
    sequence: u64,
}

impl<T> Default for AutoSaveNotifier<T> {
    fn default() -> Self {
        Self {
            sinks: Vec::new(),
            sequence: 0,
        }
    }
}

impl<T: Clone + 'static> AutoSaveNotifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: impl MutationSink<T> + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Registers a channel for the given kinds (all kinds when empty).
    pub fn channel(&mut self, kinds: &[MutationKind]) -> Receiver<MutationEvent<T>> {
        let (sender, receiver) = mpsc::channel();
        let sink = if kinds.is_empty() {
            ChannelSink::new(sender)
        } else {
            ChannelSink::new(sender).only(kinds)
        };
        self.subscribe(sink);
        receiver
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn last_sequence(&self) -> u64 {
        self.sequence
    }

    /// Sends one event to every sink and returns its sequence number.
    pub fn emit(
        &mut self,
        kind: MutationKind,
        scope: Option<Scope>,
        snapshot: Vec<OrderedRecord<T>>,
    ) -> u64 {
        self.sequence += 1;
        let event = MutationEvent {
            sequence: self.sequence,
            kind,
            scope,
            snapshot,
        };
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.receive(&event) {
                tracing::error!(sequence = event.sequence, %kind, error = %e, "auto-save sink failed");
            }
        }
        let before = self.sinks.len();
        self.sinks.retain(|sink| !sink.is_closed());
        if self.sinks.len() != before {
            tracing::debug!(removed = before - self.sinks.len(), "closed sinks unsubscribed");
        }
        self.sequence
    }
}
