// Print runtime telemetry and health as it arrives
//
// Usage: cargo run --example telemetry_listener

use tracing::{info, warn};

use linebot_zenoh_runtime::config::{TOPIC_HEALTH, TOPIC_TELEMETRY};
use linebot_zenoh_runtime::messages::{RuntimeHealth, Telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let telemetry = session.declare_subscriber(TOPIC_TELEMETRY).await?;
    let health = session.declare_subscriber(TOPIC_HEALTH).await?;

    let mut last_health = None;

    loop {
        tokio::select! {
            sample = telemetry.recv_async() => {
                let sample = sample?;
                match serde_json::from_slice::<Telemetry>(&sample.payload().to_bytes()) {
                    Ok(t) => println!(
                        "#{:<5} t={:6.2}s  L=({:5.1}, {:5.1})  w={:+.2}  pose=({:+.3}, {:+.3}, {:+.1}°)",
                        t.cycle,
                        t.t,
                        t.readings.left,
                        t.readings.right,
                        t.w,
                        t.pose.x,
                        t.pose.y,
                        t.pose.heading_deg()
                    ),
                    Err(e) => warn!("Bad telemetry: {}", e),
                }
            }
            sample = health.recv_async() => {
                let sample = sample?;
                if let Ok(h) = serde_json::from_slice::<RuntimeHealth>(&sample.payload().to_bytes()) {
                    if last_health != Some(h) {
                        info!("Health: {:?}", h);
                        last_health = Some(h);
                    }
                }
            }
        }
    }
}
