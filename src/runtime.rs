// Fixed-period control loop with pause/resume and a run-duration stop
// Stop signals (Ctrl-C, duration, pause) are only looked at between cycles,
// so a cycle always runs to completion.

use std::time::Instant;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

// local imports
use crate::config::{IntegrationStep, RobotConfig, TOPIC_CMD_RUN, TOPIC_HEALTH, TOPIC_TELEMETRY};
use crate::cycle::ControlCycle;
use crate::drive::{DiffDriveKinematics, DriveBase, RobotPose, SerialBridge, SimulatedBase};
use crate::messages::{RunCommand, RuntimeHealth, Telemetry};

/// Where readings come from and wheel commands go
#[derive(Debug, Clone)]
pub enum Backend {
    Sim,
    Serial { port: String, baudrate: u32 },
}

/// Elapsed-time accumulator and integration step source
#[derive(Debug, Clone, Copy)]
pub struct CycleClock {
    last: Instant,
    elapsed: f64,
    nominal: f64,
    step: IntegrationStep,
}

impl CycleClock {
    pub fn new(start: Instant, nominal: f64, step: IntegrationStep) -> Self {
        Self {
            last: start,
            elapsed: 0.0,
            nominal,
            step,
        }
    }

    /// Advance to `now`, returning (measured elapsed total, integration dt)
    pub fn advance(&mut self, now: Instant) -> (f64, f64) {
        let measured = now.saturating_duration_since(self.last).as_secs_f64();
        self.last = now;
        self.elapsed += measured;

        let dt = match self.step {
            IntegrationStep::Nominal => self.nominal,
            IntegrationStep::Measured => measured,
        };
        (self.elapsed, dt)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

pub struct Runtime {
    cycle: ControlCycle,
    clock: CycleClock,
    pose: RobotPose,
    running: bool,
    braked: bool,
    health: RuntimeHealth,
    cycles: u64,
    run_duration: Option<f64>,
}

impl Runtime {
    pub fn new(config: &RobotConfig, start: Instant) -> Self {
        Self {
            cycle: ControlCycle::from_config(config),
            clock: CycleClock::new(start, config.period_s, config.integration_step),
            pose: RobotPose::origin(),
            running: true,
            braked: false,
            health: RuntimeHealth::Ok,
            cycles: 0,
            run_duration: config.run_duration_s,
        }
    }

    pub fn pose(&self) -> RobotPose {
        self.pose
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Process incoming command
    pub fn on_command(&mut self, cmd: RunCommand) {
        if cmd.run != self.running {
            info!("{} line following", if cmd.run { "Resuming" } else { "Pausing" });
        }
        self.running = cmd.run;
        if cmd.run {
            self.braked = false;
        }
    }

    /// Run one cycle at `now`; returns telemetry when a cycle completed
    pub fn tick<B: DriveBase + ?Sized>(&mut self, io: &mut B, now: Instant) -> Option<Telemetry> {
        // Advance even while paused so a measured step never spans the pause
        let (t, dt) = self.clock.advance(now);

        if !self.running {
            self.health = RuntimeHealth::Paused;
            if !self.braked {
                self.brake(io);
            }
            return None;
        }

        match self.cycle.step(io, self.pose, dt) {
            Ok(report) => {
                self.pose = report.pose;
                self.cycles += 1;
                self.health = RuntimeHealth::Ok;
                debug!(
                    "L: ({:.1}, {:.1}) | w = {:.2} rad/s | x = {:.2}",
                    report.readings.left,
                    report.readings.right,
                    report.w(),
                    report.pose.x
                );
                Some(Telemetry::from_report(self.cycles, t, dt, &report))
            }
            Err(e) => {
                if self.health != RuntimeHealth::DriveFault {
                    warn!("Drive fault, stopping wheels: {}", e);
                }
                self.health = RuntimeHealth::DriveFault;
                self.brake(io);
                None
            }
        }
    }

    /// Whether the configured run duration has elapsed
    pub fn finished(&self) -> bool {
        self.run_duration
            .is_some_and(|duration| self.clock.elapsed() >= duration)
    }

    /// Brake and report the final pose
    pub fn stop<B: DriveBase + ?Sized>(&mut self, io: &mut B) {
        self.brake(io);
        info!(
            "Stopped after {} cycles. x = {:.2}, y = {:.2}, phi = {:.1}°",
            self.cycles,
            self.pose.x,
            self.pose.y,
            self.pose.heading_deg()
        );
    }

    fn brake<B: DriveBase + ?Sized>(&mut self, io: &mut B) {
        match io.brake() {
            Ok(()) => self.braked = true,
            Err(e) => warn!("Failed to brake: {}", e),
        }
    }
}

fn open_backend(
    backend: &Backend,
    config: &RobotConfig,
) -> Result<Box<dyn DriveBase>, Box<dyn std::error::Error + Send + Sync>> {
    match backend {
        Backend::Sim => {
            info!("Using simulated base on {:?}", config.sim.track);
            Ok(Box::new(SimulatedBase::new(
                config.sim,
                DiffDriveKinematics::new(config.geometry),
                config.period_s,
            )))
        }
        Backend::Serial { port, baudrate } => {
            info!("Opening serial bridge on {} at {} baud", port, baudrate);
            Ok(Box::new(SerialBridge::open_with_baudrate(port, *baudrate)?))
        }
    }
}

pub async fn run(
    config: RobotConfig,
    backend: Backend,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut io = open_backend(&backend, &config)?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session.declare_subscriber(TOPIC_CMD_RUN).await?;
    let pub_telemetry = session.declare_publisher(TOPIC_TELEMETRY).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut tick = interval(config.period());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut runtime = Runtime::new(&config, Instant::now());

    info!(
        "Runtime started: {}ms period, u = {} m/s, {:?} integration step",
        config.period().as_millis(),
        config.linear_speed,
        config.integration_step
    );
    info!("Subscribed to: {}", TOPIC_CMD_RUN);
    info!("Publishing to: {}, {}", TOPIC_TELEMETRY, TOPIC_HEALTH);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                break;
            }
        }

        // 1. Drain all pending run commands (non-blocking), keep latest
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<RunCommand>(&payload) {
                Ok(cmd) => runtime.on_command(cmd),
                Err(e) => warn!("Failed to parse run command: {}", e),
            }
        }

        // 2. Run the cycle (skipped while paused)
        if let Some(telemetry) = runtime.tick(io.as_mut(), Instant::now()) {
            let telemetry_json = serde_json::to_string(&telemetry)?;
            pub_telemetry.put(telemetry_json).await?;
        }

        // 3. Publish health
        let health_json = serde_json::to_string(&runtime.health())?;
        pub_health.put(health_json).await?;

        if runtime.finished() {
            info!("Run duration reached");
            break;
        }
    }

    runtime.stop(io.as_mut());
    Ok(())
}
