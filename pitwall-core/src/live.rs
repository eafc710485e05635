//! Timer driven session running on a single tokio task.
//!
//! The driver owns the [`SimulationController`] and `select!`s between
//! operator commands and the [`TickTimer`]. A command is applied to
//! completion before the timer is polled again, so a tick can never land
//! after a transition that cancelled it.
//!
//! A pit plan handed to the driver is executed on the tick itself, right
//! before the lap it belongs to is driven, so planned stops never depend on
//! how quickly the operator reacts to events.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::TireCompound;
use crate::config::PlannedStop;
use crate::controller::{SimulationController, Snapshot, TickEvent};
use crate::error::{LiveError, SessionError, SessionResult};
use crate::scoring::RunRecord;
use crate::session::{LapRecord, SessionState};
use crate::timer::TickTimer;

/// Operator input accepted by the driver.
#[derive(Debug)]
pub enum Command {
    SelectTrack(String),
    SelectStartingTire(TireCompound),
    Start,
    Pause,
    Resume,
    RequestPit,
    ConfirmPit(TireCompound),
    Abort,
    Reset,
    SetTickInterval(u64),
    /// Replace the pit plan. Stops are made before their lap is driven.
    PlanStops(Vec<PlannedStop>),
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown,
}

/// Notifications emitted by the driver, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    LapCompleted { record: LapRecord, snapshot: Snapshot },
    PitStop(LapRecord),
    Finished(RunRecord),
    /// A command that was not valid in the current state. Nothing changed.
    Rejected(SessionError),
}

/// Cloneable sender side of a live session.
#[derive(Debug, Clone)]
pub struct LiveHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl LiveHandle {
    pub fn send(&self, command: Command) -> Result<(), LiveError> {
        self.commands.send(command).map_err(|_| LiveError::Closed)
    }

    pub fn start(&self) -> Result<(), LiveError> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<(), LiveError> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<(), LiveError> {
        self.send(Command::Resume)
    }

    pub fn request_pit(&self) -> Result<(), LiveError> {
        self.send(Command::RequestPit)
    }

    pub fn confirm_pit(&self, tire: TireCompound) -> Result<(), LiveError> {
        self.send(Command::ConfirmPit(tire))
    }

    pub fn abort(&self) -> Result<(), LiveError> {
        self.send(Command::Abort)
    }

    pub fn reset(&self) -> Result<(), LiveError> {
        self.send(Command::Reset)
    }

    pub fn set_tick_interval(&self, ms: u64) -> Result<(), LiveError> {
        self.send(Command::SetTickInterval(ms))
    }

    pub fn plan_stops(&self, plan: Vec<PlannedStop>) -> Result<(), LiveError> {
        self.send(Command::PlanStops(plan))
    }

    pub async fn snapshot(&self) -> Result<Snapshot, LiveError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| LiveError::Closed)
    }

    pub fn shutdown(&self) -> Result<(), LiveError> {
        self.send(Command::Shutdown)
    }
}

/// Spawned driver task.
pub struct LiveSession {
    controller: SimulationController,
    timer: TickTimer,
    plan: Vec<PlannedStop>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl LiveSession {
    /// Spawn the driver on the current runtime. The join handle yields the
    /// controller back after `shutdown` or once every handle is dropped.
    pub fn spawn(
        controller: SimulationController,
    ) -> (
        LiveHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<SimulationController>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let driver = LiveSession {
            controller,
            timer: TickTimer::new(),
            plan: Vec::new(),
            commands: command_rx,
            events: event_tx,
        };
        let task = tokio::spawn(driver.run());
        (LiveHandle { commands: command_tx }, event_rx, task)
    }

    async fn run(mut self) -> SimulationController {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => self.apply(command),
                },
                _ = self.timer.fired() => self.on_tick(),
            }
        }
        self.timer.cancel();
        debug!("live session stopped");
        self.controller
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine; the driver keeps going.
        let _ = self.events.send(event);
    }

    fn apply(&mut self, command: Command) {
        let result = match command {
            Command::SelectTrack(code) => self.controller.select_track(&code).map(|_| ()),
            Command::SelectStartingTire(tire) => self.controller.select_starting_tire(tire),
            Command::Start => self.controller.start().map(|()| self.arm_next()),
            Command::Pause => self.controller.pause().map(|()| {
                self.timer.cancel();
            }),
            Command::Resume => self.controller.resume().map(|()| self.arm_next()),
            Command::RequestPit => self.controller.request_pit().map(|()| {
                self.timer.cancel();
            }),
            Command::ConfirmPit(tire) => self.controller.confirm_pit(tire).map(|record| {
                self.emit(SessionEvent::PitStop(record));
                self.arm_next();
            }),
            Command::Abort => self.controller.abort().map(|()| {
                self.timer.cancel();
            }),
            Command::Reset => self.controller.reset(),
            Command::SetTickInterval(ms) => {
                // Takes effect the next time the timer is armed.
                self.controller.set_tick_interval(ms);
                return;
            }
            Command::PlanStops(plan) => {
                debug!(stops = plan.len(), "pit plan updated");
                self.plan = plan;
                return;
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
                return;
            }
            Command::Shutdown => return,
        };
        self.report(result);
    }

    fn report(&self, result: SessionResult) {
        match result {
            Ok(()) => self.emit(SessionEvent::StateChanged(self.controller.state())),
            Err(err) => {
                warn!(error = %err, "command ignored");
                self.emit(SessionEvent::Rejected(err));
            }
        }
    }

    fn on_tick(&mut self) {
        self.make_planned_stop();
        match self.controller.tick() {
            Ok(TickEvent::Lap(record)) => {
                self.emit(SessionEvent::LapCompleted {
                    record,
                    snapshot: self.controller.snapshot(),
                });
                self.arm_next();
            }
            Ok(TickEvent::Finished(run)) => {
                self.emit(SessionEvent::StateChanged(self.controller.state()));
                self.emit(SessionEvent::Finished(run));
            }
            Err(err) => warn!(error = %err, "tick fired outside a running session"),
        }
    }

    fn make_planned_stop(&mut self) {
        let lap = self.controller.current_lap();
        let Some(stop) = self.plan.iter().copied().find(|s| s.lap == lap) else {
            return;
        };
        let result = self
            .controller
            .request_pit()
            .and_then(|()| self.controller.confirm_pit(stop.tire));
        match result {
            Ok(record) => self.emit(SessionEvent::PitStop(record)),
            Err(err) => {
                warn!(error = %err, lap, "planned stop skipped");
                self.emit(SessionEvent::Rejected(err));
            }
        }
    }

    /// Arm the timer for the next tick. Once every lap is driven the finish is
    /// scored on an immediate tick rather than after another interval.
    fn arm_next(&mut self) {
        let session = self.controller.session();
        let delay = if session.current_lap() > session.race_laps() {
            Duration::ZERO
        } else {
            self.controller.tick_interval()
        };
        self.timer.arm(delay);
    }
}
