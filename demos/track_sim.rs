// Offline run of the control cycle against the simulated base
//
// Usage: cargo run --example track_sim -- [config.json] [cycles]

use linebot_zenoh_runtime::config::RobotConfig;
use linebot_zenoh_runtime::cycle::ControlCycle;
use linebot_zenoh_runtime::drive::{DiffDriveKinematics, SimulatedBase};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RobotConfig::load(path.as_ref())?,
        None => RobotConfig::default(),
    };
    let cycles: u32 = match args.next() {
        Some(n) => n.parse()?,
        None => 300,
    };

    let cycle = ControlCycle::from_config(&config);
    let mut base = SimulatedBase::new(
        config.sim,
        DiffDriveKinematics::new(config.geometry),
        config.period_s,
    );

    println!("cycle,t,left,right,w,x,y,phi,true_x,true_y,offset");
    let mut pose = config.sim.start;
    for i in 0..cycles {
        let report = cycle.step(&mut base, pose, config.period_s)?;
        pose = report.pose;
        let truth = base.true_pose();
        println!(
            "{},{:.2},{:.1},{:.1},{:.3},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            i + 1,
            (i + 1) as f64 * config.period_s,
            report.readings.left,
            report.readings.right,
            report.w(),
            pose.x,
            pose.y,
            pose.phi,
            truth.x,
            truth.y,
            base.line_offset()
        );
    }

    Ok(())
}
