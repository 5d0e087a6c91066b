//! Typed notifications published by the controller.
//!
//! Listeners call [`EventBus::subscribe`] and receive every event emitted
//! afterwards, in emission order. Dropping the [`Subscription`] unsubscribes.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;

use crate::player::playback::Marker;

/// Something the view layer or host may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// Playback came within the proximity threshold of a marker
    MarkerReached { marker: Marker },
    /// The virtual playhead moved while simulating
    TargetTimeUpdated { time: f64 },
    /// The logical playback rate changed
    TargetRateChanged { rate: f64 },
    /// A preview frame is wanted for `time`
    ThumbnailRequested { time: f64 },
    /// The start or end bound changed
    TimeWindowChanged { start: f64, end: f64 },
    /// Simulated playback hit the end of the window
    EndReached,
    /// Simulated rewind hit the start of the window
    StartReached,
    /// The engine finished a seek
    SeekCompleted { position: f64 },
    /// The engine played off the end of the media
    MediaEnded,
}

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<ControllerEvent>,
}

impl Subscription {
    /// Next pending event, if any.
    pub fn try_next(&self) -> Option<ControllerEvent> {
        self.rx.try_recv().ok()
    }

    /// All events emitted since the last drain.
    pub fn drain(&self) -> Vec<ControllerEvent> {
        self.rx.try_iter().collect()
    }
}

/// Fan-out of controller events to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    senders: Vec<Sender<ControllerEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        Subscription { rx }
    }

    /// Deliver `event` to every live subscriber, forgetting dropped ones.
    pub fn emit(&mut self, event: ControllerEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
