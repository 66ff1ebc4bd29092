//! heltec-bindd: identify the Heltec V3 and keep its serial transport
//! bound, logging every attach and detach until shutdown.

#[cfg(target_os = "linux")]
use anyhow::Context;
#[cfg(target_os = "linux")]
use tokio::signal::unix::{self, SignalKind};
#[cfg(target_os = "linux")]
use tokio_util::{sync::CancellationToken, task::TaskTracker};

#[cfg(target_os = "linux")]
use heltec_bind::binder;
#[cfg(target_os = "linux")]
use heltec_bind::host::linux::{self, LinuxHost};
#[cfg(target_os = "linux")]
use heltec_bind::tracing::{self, prelude::*};

#[cfg(not(target_os = "linux"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("heltec-bindd needs a Linux host framework (udev)");
}

#[cfg(target_os = "linux")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing::init_journald_or_stdout();

    let host = LinuxHost::new();
    let registration = binder::init(&host).context("driver load failed")?;

    let running = CancellationToken::new();
    let tracker = TaskTracker::new();
    tracker.spawn(linux::monitor_task(host.clone(), running.clone()));
    tracker.close();
    info!("Started.");

    let mut sigint = unix::signal(SignalKind::interrupt())?;
    let mut sigterm = unix::signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }

    trace!("Shutting down.");
    running.cancel();
    tracker.wait().await;

    binder::exit(&host, registration);
    info!("Exiting.");
    Ok(())
}
