//! Navigation dispatcher
//!
//! Edge-triggered sampler over two coalescing rotation flags plus two
//! button channels. Rotation decodes land in single-slot signals where the
//! last write wins; a periodic poll drains both and emits at most one
//! command per axis per tick, which bounds dispatch to 10 Hz per axis no
//! matter how fast a knob spins. Button presses bypass the poll and post
//! immediately - discrete presses must never be dropped or merged.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Ticker;
use heapless::Vec;

use oiax_core::{Axis, Direction, NavigationCommand, PinLevel, Route, RoutedCommand};

use crate::config::{InputConfig, COMMAND_QUEUE_DEPTH};
use crate::encoder::{EncoderPins, RotaryEncoderHandler, Shutdown, TransitionQueue};
use crate::monitor::{Line, PinMonitor, Pull};

/// Single-slot rotation flag: written by an encoder consumer task, drained
/// by the poll task. Last write wins, so a burst of same-direction detents
/// inside one poll window collapses to one pending value and an opposite
/// detent simply overwrites it.
pub type RotationFlag = Signal<CriticalSectionRawMutex, Direction>;

/// Outbound command queue consumed by the host application's event loop
pub type CommandQueue = Channel<CriticalSectionRawMutex, RoutedCommand, COMMAND_QUEUE_DEPTH>;

/// Lines provisioned by the dispatcher: two per encoder plus two buttons
const PROVISIONED_LINES: usize = 6;

/// Focus state shared with the host UI.
///
/// When a control holds input focus, UP/DOWN commands are routed to it so
/// the vertical encoder drives the control directly; otherwise they fall
/// through to the application root like everything else.
#[derive(Debug, Default)]
pub struct FocusHandle {
    focused: AtomicBool,
}

impl FocusHandle {
    pub const fn new() -> Self {
        Self {
            focused: AtomicBool::new(false),
        }
    }

    /// Called by the host when a control takes or releases focus
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }

    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }
}

/// Physical wiring of one button
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPins {
    pub line: Line,
    pub pull: Pull,
    /// Level the line settles at while the button is held
    pub pressed: PinLevel,
}

/// Full input wiring: two encoders, two buttons
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputWiring {
    /// Encoder 1, mapped to LEFT/RIGHT
    pub horizontal: EncoderPins,
    /// Encoder 2, mapped to UP/DOWN
    pub vertical: EncoderPins,
    /// Button 1, synthesizes ESCAPE
    pub escape: ButtonPins,
    /// Button 2, synthesizes SPACE
    pub space: ButtonPins,
}

/// Shutdown signals for the three pipeline tasks
pub struct ShutdownFlags {
    pub horizontal: Shutdown,
    pub vertical: Shutdown,
    pub poll: Shutdown,
}

impl ShutdownFlags {
    pub const fn new() -> Self {
        Self {
            horizontal: Shutdown::new(),
            vertical: Shutdown::new(),
            poll: Shutdown::new(),
        }
    }
}

/// Statically allocated state shared between the pipeline tasks and the
/// monitor callback contexts.
///
/// Everything here is const-constructible, so one instance lives in a
/// `static` for the process lifetime:
///
/// ```ignore
/// static PIPELINE: PipelineState = PipelineState::new();
/// ```
pub struct PipelineState {
    pub horizontal_queue: TransitionQueue,
    pub vertical_queue: TransitionQueue,
    pub horizontal_flag: RotationFlag,
    pub vertical_flag: RotationFlag,
    pub commands: CommandQueue,
    pub focus: FocusHandle,
    pub shutdown: ShutdownFlags,
}

impl PipelineState {
    pub const fn new() -> Self {
        Self {
            horizontal_queue: Channel::new(),
            vertical_queue: Channel::new(),
            horizontal_flag: Signal::new(),
            vertical_flag: Signal::new(),
            commands: Channel::new(),
            focus: FocusHandle::new(),
            shutdown: ShutdownFlags::new(),
        }
    }

    /// Sample both rotation flags, posting at most one routed command per
    /// axis for this poll window.
    pub fn poll_once(&self) {
        if let Some(direction) = self.horizontal_flag.try_take() {
            self.post(
                NavigationCommand::from_rotation(Axis::Horizontal, direction),
                Route::Root,
            );
        }
        if let Some(direction) = self.vertical_flag.try_take() {
            let route = if self.focus.is_focused() {
                Route::Focused
            } else {
                Route::Root
            };
            self.post(NavigationCommand::from_rotation(Axis::Vertical, direction), route);
        }
    }

    fn post(&self, command: NavigationCommand, route: Route) {
        if self.commands.try_send(RoutedCommand { command, route }).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("command queue full, dropping {}", command);
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of every provisioned input line.
///
/// Created once at startup; [`close`](Self::close) stops the pipeline
/// tasks and releases all lines exactly once.
pub struct NavigationDispatcher<M: PinMonitor> {
    state: &'static PipelineState,
    handles: Vec<M::Handle, PROVISIONED_LINES>,
}

impl<M: PinMonitor> NavigationDispatcher<M> {
    /// Provision both encoders and both buttons.
    ///
    /// Returns the dispatcher plus the two consumer-side encoder handlers,
    /// ready to be spawned with [`run_horizontal`] / [`run_vertical`]. Any
    /// provisioning failure aborts construction: a missing physical input
    /// cannot self-heal, so startup fails instead of retrying.
    pub fn attach(
        monitor: &mut M,
        wiring: InputWiring,
        config: &InputConfig,
        state: &'static PipelineState,
    ) -> Result<(Self, RotaryEncoderHandler, RotaryEncoderHandler), M::Error> {
        let (horizontal, [ha, hb]) = RotaryEncoderHandler::attach(
            monitor,
            &state.horizontal_queue,
            wiring.horizontal,
            config,
        )?;
        let (vertical, [va, vb]) =
            RotaryEncoderHandler::attach(monitor, &state.vertical_queue, wiring.vertical, config)?;

        let escape = Self::attach_button(
            monitor,
            wiring.escape,
            config,
            state,
            NavigationCommand::Escape,
        )?;
        let space = Self::attach_button(
            monitor,
            wiring.space,
            config,
            state,
            NavigationCommand::Space,
        )?;

        let mut handles = Vec::new();
        for handle in [ha, hb, va, vb, escape, space] {
            // Capacity matches the array; cannot fail
            let _ = handles.push(handle);
        }

        Ok((Self { state, handles }, horizontal, vertical))
    }

    /// Register one button; a transition to the pressed level posts its
    /// command immediately from the callback context.
    fn attach_button(
        monitor: &mut M,
        pins: ButtonPins,
        config: &InputConfig,
        state: &'static PipelineState,
        command: NavigationCommand,
    ) -> Result<M::Handle, M::Error> {
        monitor.register_debounced_input(pins.line, pins.pull, config.debounce, move |level| {
            if level == pins.pressed {
                state.post(command, Route::Root);
            }
        })
    }

    /// Stop the consumer and poll tasks, then release every provisioned
    /// line exactly once.
    pub fn close(self, monitor: &mut M) {
        self.state.shutdown.horizontal.signal(());
        self.state.shutdown.vertical.signal(());
        self.state.shutdown.poll.signal(());

        for handle in self.handles {
            monitor.unprovision(handle);
        }
    }
}

/// Consumer task for the horizontal encoder; decodes overwrite the
/// horizontal rotation flag and nothing else.
pub async fn run_horizontal(handler: RotaryEncoderHandler, state: &'static PipelineState) {
    handler
        .run(
            |direction| state.horizontal_flag.signal(direction),
            &state.shutdown.horizontal,
        )
        .await;
}

/// Consumer task for the vertical encoder
pub async fn run_vertical(handler: RotaryEncoderHandler, state: &'static PipelineState) {
    handler
        .run(
            |direction| state.vertical_flag.signal(direction),
            &state.shutdown.vertical,
        )
        .await;
}

/// Periodic dispatch task.
///
/// Samples the rotation flags every `config.poll_period` (100 ms default)
/// until the poll shutdown flag fires. Translating every decode straight
/// into a UI action is too expensive on constrained hardware; sampling
/// decouples the decode rate from the dispatch rate.
pub async fn run_poll(state: &'static PipelineState, config: InputConfig) {
    #[cfg(feature = "defmt")]
    defmt::info!("poll task started");

    let mut ticker = Ticker::every(config.poll_period);
    loop {
        match select(ticker.next(), state.shutdown.poll.wait()).await {
            Either::First(()) => state.poll_once(),
            Either::Second(()) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec as StdVec;

    use embassy_time::Duration;

    /// Records registrations and lets tests fire transitions by line
    #[derive(Default)]
    struct MockMonitor {
        callbacks: StdVec<(Line, Arc<dyn Fn(PinLevel) + Send + Sync>)>,
        released: Arc<Mutex<StdVec<u8>>>,
        fail_line: Option<Line>,
    }

    #[derive(Debug)]
    struct ProvisionFailed;

    impl PinMonitor for MockMonitor {
        type Handle = Line;
        type Error = ProvisionFailed;

        fn register_debounced_input<F>(
            &mut self,
            line: Line,
            _pull: Pull,
            _debounce: Duration,
            on_transition: F,
        ) -> Result<Line, ProvisionFailed>
        where
            F: Fn(PinLevel) + Send + Sync + 'static,
        {
            if self.fail_line == Some(line) {
                return Err(ProvisionFailed);
            }
            self.callbacks.push((line, Arc::new(on_transition)));
            Ok(line)
        }

        fn unprovision(&mut self, handle: Line) {
            self.released.lock().unwrap().push(handle.0);
        }
    }

    impl MockMonitor {
        fn fire(&self, line: Line, level: PinLevel) {
            for (l, callback) in &self.callbacks {
                if *l == line {
                    callback(level);
                }
            }
        }
    }

    fn wiring() -> InputWiring {
        InputWiring {
            horizontal: EncoderPins {
                a: Line(0),
                b: Line(1),
                pull: Pull::Up,
            },
            vertical: EncoderPins {
                a: Line(2),
                b: Line(3),
                pull: Pull::Up,
            },
            escape: ButtonPins {
                line: Line(4),
                pull: Pull::Up,
                pressed: PinLevel::Low,
            },
            space: ButtonPins {
                line: Line(5),
                pull: Pull::Down,
                pressed: PinLevel::High,
            },
        }
    }

    fn drain(state: &PipelineState) -> StdVec<RoutedCommand> {
        let mut out = StdVec::new();
        while let Ok(cmd) = state.commands.try_receive() {
            out.push(cmd);
        }
        out
    }

    #[test]
    fn test_burst_coalesces_to_one_command() {
        static STATE: PipelineState = PipelineState::new();

        for _ in 0..5 {
            STATE.horizontal_flag.signal(Direction::Right);
        }
        STATE.poll_once();

        let commands = drain(&STATE);
        assert_eq!(
            commands,
            [RoutedCommand {
                command: NavigationCommand::Right,
                route: Route::Root,
            }]
        );

        // Flag is drained; the next window is empty
        STATE.poll_once();
        assert!(drain(&STATE).is_empty());
    }

    #[test]
    fn test_opposite_rotation_overwrites_pending() {
        static STATE: PipelineState = PipelineState::new();

        STATE.horizontal_flag.signal(Direction::Right);
        STATE.horizontal_flag.signal(Direction::Left);
        STATE.poll_once();

        let commands = drain(&STATE);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command, NavigationCommand::Left);
    }

    #[test]
    fn test_vertical_routes_to_focused_control() {
        static STATE: PipelineState = PipelineState::new();

        STATE.vertical_flag.signal(Direction::Left);
        STATE.poll_once();
        assert_eq!(
            drain(&STATE),
            [RoutedCommand {
                command: NavigationCommand::Up,
                route: Route::Root,
            }]
        );

        STATE.focus.set_focused(true);
        STATE.vertical_flag.signal(Direction::Right);
        STATE.poll_once();
        assert_eq!(
            drain(&STATE),
            [RoutedCommand {
                command: NavigationCommand::Down,
                route: Route::Focused,
            }]
        );

        // Horizontal ignores focus
        STATE.horizontal_flag.signal(Direction::Left);
        STATE.poll_once();
        assert_eq!(drain(&STATE)[0].route, Route::Root);
    }

    #[test]
    fn test_button_posts_immediately_and_never_coalesces() {
        static STATE: PipelineState = PipelineState::new();

        let mut monitor = MockMonitor::default();
        let (_dispatcher, _h, _v) = NavigationDispatcher::attach(
            &mut monitor,
            wiring(),
            &InputConfig::default(),
            &STATE,
        )
        .unwrap();

        // Rotation pending in the same window
        STATE.horizontal_flag.signal(Direction::Right);

        // Press lands in the command queue before any poll tick
        monitor.fire(Line(4), PinLevel::Low);
        assert_eq!(
            STATE.commands.try_receive().unwrap(),
            RoutedCommand {
                command: NavigationCommand::Escape,
                route: Route::Root,
            }
        );

        // The pending rotation is still delivered on its own tick
        STATE.poll_once();
        assert_eq!(drain(&STATE)[0].command, NavigationCommand::Right);
    }

    #[test]
    fn test_button_release_is_ignored() {
        static STATE: PipelineState = PipelineState::new();

        let mut monitor = MockMonitor::default();
        let (_dispatcher, _h, _v) = NavigationDispatcher::attach(
            &mut monitor,
            wiring(),
            &InputConfig::default(),
            &STATE,
        )
        .unwrap();

        // Space is wired active-high; a falling edge is a release
        monitor.fire(Line(5), PinLevel::Low);
        assert!(drain(&STATE).is_empty());

        monitor.fire(Line(5), PinLevel::High);
        assert_eq!(drain(&STATE)[0].command, NavigationCommand::Space);
    }

    #[test]
    fn test_end_to_end_vertical_detent() {
        static STATE: PipelineState = PipelineState::new();

        let mut monitor = MockMonitor::default();
        let (_dispatcher, _h, mut vertical) = NavigationDispatcher::attach(
            &mut monitor,
            wiring(),
            &InputConfig::default(),
            &STATE,
        )
        .unwrap();

        // Clean LEFT detent on the vertical encoder pins
        monitor.fire(Line(2), PinLevel::Low);
        monitor.fire(Line(3), PinLevel::Low);
        monitor.fire(Line(2), PinLevel::High);
        monitor.fire(Line(3), PinLevel::High);

        // Drive the consumer side manually
        while let Ok(change) = STATE.vertical_queue.try_receive() {
            if let Some(direction) = vertical.step(change) {
                STATE.vertical_flag.signal(direction);
            }
        }

        STATE.poll_once();
        let commands = drain(&STATE);
        assert_eq!(
            commands,
            [RoutedCommand {
                command: NavigationCommand::Up,
                route: Route::Root,
            }]
        );
    }

    #[test]
    fn test_close_releases_every_line_once() {
        static STATE: PipelineState = PipelineState::new();

        let mut monitor = MockMonitor::default();
        let released = monitor.released.clone();
        let (dispatcher, _h, _v) = NavigationDispatcher::attach(
            &mut monitor,
            wiring(),
            &InputConfig::default(),
            &STATE,
        )
        .unwrap();

        dispatcher.close(&mut monitor);

        let mut lines = released.lock().unwrap().clone();
        lines.sort();
        assert_eq!(lines, [0, 1, 2, 3, 4, 5]);

        assert!(STATE.shutdown.horizontal.signaled());
        assert!(STATE.shutdown.vertical.signaled());
        assert!(STATE.shutdown.poll.signaled());
    }

    #[test]
    fn test_attach_failure_is_fatal() {
        static STATE: PipelineState = PipelineState::new();

        let mut monitor = MockMonitor {
            fail_line: Some(Line(3)),
            ..MockMonitor::default()
        };
        let result =
            NavigationDispatcher::attach(&mut monitor, wiring(), &InputConfig::default(), &STATE);
        assert!(result.is_err());
    }
}
