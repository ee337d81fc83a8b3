//! Rotary encoder pipeline
//!
//! Producer half: monitor callbacks convert debounced edges into
//! [`PinStateChange`] values and push them onto a bounded queue without
//! ever blocking; a full queue drops the new event, since stale
//! transitions carry no decode value and stalling the hardware callback
//! is unacceptable. Consumer half: one task per encoder drains the queue
//! in FIFO order, accumulates a history and runs the quadrature matcher.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use oiax_core::{decoder, Direction, PinId, PinStateChange, TransitionHistory};

use crate::config::{InputConfig, QUEUE_DEPTH};
use crate::monitor::{Line, PinMonitor, Pull};

/// Bounded per-encoder transition queue
pub type TransitionQueue = Channel<CriticalSectionRawMutex, PinStateChange, QUEUE_DEPTH>;

/// Shutdown signal for one pipeline task
pub type Shutdown = Signal<CriticalSectionRawMutex, ()>;

/// Physical wiring of one encoder
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    pub a: Line,
    pub b: Line,
    pub pull: Pull,
}

/// Push a transition onto the queue, dropping it if the queue is full.
///
/// Runs in the monitor's delivery context; must never block.
fn offer(queue: &TransitionQueue, change: PinStateChange) {
    if queue.try_send(change).is_err() {
        #[cfg(feature = "defmt")]
        defmt::trace!("transition queue full, dropping {}", change);
    }
}

/// Consumer-side state for one encoder: its queue, history and matcher
pub struct RotaryEncoderHandler {
    queue: &'static TransitionQueue,
    history: TransitionHistory,
}

impl RotaryEncoderHandler {
    /// Register both encoder phases and build the consumer-side handler.
    ///
    /// The returned handles release the two lines via
    /// [`PinMonitor::unprovision`]. A registration failure aborts startup;
    /// earlier registrations are not rolled back since the process will
    /// not come up anyway.
    pub fn attach<M: PinMonitor>(
        monitor: &mut M,
        queue: &'static TransitionQueue,
        pins: EncoderPins,
        config: &InputConfig,
    ) -> Result<(Self, [M::Handle; 2]), M::Error> {
        let a = monitor.register_debounced_input(pins.a, pins.pull, config.debounce, move |level| {
            offer(queue, PinStateChange::new(PinId::A, level))
        })?;
        let b = monitor.register_debounced_input(pins.b, pins.pull, config.debounce, move |level| {
            offer(queue, PinStateChange::new(PinId::B, level))
        })?;

        Ok((
            Self {
                queue,
                history: TransitionHistory::new(),
            },
            [a, b],
        ))
    }

    /// Feed one transition through the matcher.
    ///
    /// Appends to the history; on a successful decode the history is
    /// cleared in the same step, so the next call starts a fresh window.
    pub fn step(&mut self, change: PinStateChange) -> Option<Direction> {
        self.history.push(change);
        let decoded = decoder::decode(self.history.as_slice());
        if decoded.is_some() {
            self.history.clear();
        }
        decoded
    }

    /// Consumer loop: drain the queue until `shutdown` fires.
    ///
    /// `on_rotate` is invoked synchronously on this task for every decoded
    /// detent. The listener contract is to do nothing but write a flag and
    /// return, so the next transition is never stalled behind it.
    pub async fn run<F: Fn(Direction)>(mut self, on_rotate: F, shutdown: &Shutdown) {
        #[cfg(feature = "defmt")]
        defmt::info!("encoder consumer task started");

        loop {
            match select(self.queue.receive(), shutdown.wait()).await {
                Either::First(change) => {
                    if let Some(direction) = self.step(change) {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("decoded {}", direction);
                        on_rotate(direction);
                    }
                }
                Either::Second(()) => break,
            }
        }
    }
}
