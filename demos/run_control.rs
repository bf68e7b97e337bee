// Keyboard run control: SPACE toggles run/pause, Q quits
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::Duration;
use tracing::info;

use linebot_zenoh_runtime::config::TOPIC_CMD_RUN;
use linebot_zenoh_runtime::messages::RunCommand;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_RUN).await?;

    info!("Controls: SPACE=run/pause, Q=quit");

    enable_raw_mode()?;
    let result = run_control(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_control(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut run = true;

    loop {
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    continue;
                }

                match code {
                    KeyCode::Char(' ') => {
                        run = !run;
                        info!("{}", if run { "RUN" } else { "PAUSE" });
                        let cmd = serde_json::to_string(&RunCommand { run })?;
                        publisher.put(cmd).await?;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
