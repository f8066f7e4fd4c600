//! [`Pilot`] – the top-level control loop.
//!
//! Drives the whole client at a fixed cadence.  Each tick:
//!
//! 1. Drain discrete input events (quit, toggle, halt, speed steps).
//! 2. Poll the input snapshot and derive this tick's [`ControlIntent`]
//!    and effective speed (throttle, lifted by the trigger boost).
//! 3. Mix into a [`MotorCommand`] – an active drive command while the
//!    is-sending toggle is on, the canonical stop otherwise.
//! 4. Let the supervisor advance its connection state, then submit the
//!    command.  Transport faults never surface here; the loop keeps
//!    ticking through outages so input and rendering stay responsive.
//! 5. Hand a [`StatusFrame`] to the render sink.
//! 6. Await the tick boundary.
//!
//! The loop exits on a shutdown request (quit event or Ctrl-C flag) and on
//! collaborator failure; both paths run the supervisor's final teardown so
//! the remote actuator is left stopped.
//!
//! [`ControlIntent`]: drivelink_types::ControlIntent

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use drivelink_link::session::Connector;
use drivelink_link::supervisor::Supervisor;
use drivelink_types::{MotorCommand, ShutdownFlag, Throttle};

use crate::ControlError;
use crate::input::{InputEvent, InputSource};
use crate::mixer;
use crate::render::{RenderSink, StatusFrame};

/// Tuning knobs for the control loop, sourced from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PilotConfig {
    pub tick_rate_hz: u32,
    pub dead_zone: f32,
    pub max_motor_power: i16,
    pub initial_speed: f32,
    pub speed_step: f32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 30,
            dead_zone: 0.18,
            max_motor_power: 255,
            initial_speed: 0.5,
            speed_step: 0.1,
        }
    }
}

/// The control-loop driver.  Owns the collaborators and the supervisor for
/// the lifetime of the run.
pub struct Pilot<I, R, C: Connector> {
    config: PilotConfig,
    input: I,
    render: R,
    link: Supervisor<C>,
    throttle: Throttle,
    sending: bool,
    shutdown: ShutdownFlag,
}

impl<I: InputSource, R: RenderSink, C: Connector> Pilot<I, R, C> {
    pub fn new(
        config: PilotConfig,
        input: I,
        render: R,
        link: Supervisor<C>,
        shutdown: ShutdownFlag,
    ) -> Self {
        let throttle = Throttle::new(config.initial_speed, config.speed_step);
        Self {
            config,
            input,
            render,
            link,
            throttle,
            sending: false,
            shutdown,
        }
    }

    /// Run until shutdown.  Always finishes with the supervisor's final
    /// teardown (best-effort stop), on the clean path and the fatal path
    /// alike.
    pub async fn run(mut self) -> Result<(), ControlError> {
        let period = Duration::from_secs_f64(1.0 / f64::from(self.config.tick_rate_hz));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            if self.shutdown.is_requested() {
                break Ok(());
            }
            if let Err(err) = self.tick().await {
                error!(error = %err, "collaborator failure; shutting down");
                self.shutdown.request();
                break Err(err);
            }
            ticker.tick().await;
        };

        self.link.close().await;
        outcome
    }

    async fn tick(&mut self) -> Result<(), ControlError> {
        for event in self.input.events()? {
            match event {
                InputEvent::Quit => {
                    info!("quit requested");
                    self.shutdown.request();
                    return Ok(());
                }
                InputEvent::ToggleSending => {
                    self.sending = !self.sending;
                    info!(sending = self.sending, "command streaming toggled");
                }
                InputEvent::HaltSending => {
                    if self.sending {
                        info!("halt requested; command streaming stopped");
                    }
                    self.sending = false;
                }
                InputEvent::SpeedUp => {
                    let speed = self.throttle.increase();
                    info!(speed, "throttle increased");
                }
                InputEvent::SpeedDown => {
                    let speed = self.throttle.decrease();
                    info!(speed, "throttle decreased");
                }
            }
        }

        let snapshot = self.input.snapshot()?;
        let command = if self.sending {
            let intent = snapshot.intent(self.config.dead_zone);
            let speed = self.throttle.speed().max(snapshot.boost());
            let powers = mixer::mix(intent, speed, self.config.max_motor_power);
            MotorCommand::from_sides(powers.left, powers.right)
        } else {
            MotorCommand::stop()
        };

        self.link.maintain().await;
        self.link.dispatch(&command).await;

        self.render.render(&StatusFrame {
            sending: self.sending,
            held: snapshot.held,
            speed: self.throttle.speed(),
            session: self.link.state(),
            command,
        })
    }
}
