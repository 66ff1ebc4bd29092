//! Linux host framework backed by udev and modprobe.
//!
//! Module loading goes through `/sys/module` and modprobe; hotplug
//! events come from a udev monitor on the usb subsystem. A registered
//! driver sees the same contract the kernel gives a serial driver: the
//! table is consulted on every add and remove event, and the callbacks
//! run only on an exact signature match.

use crate::error::{Error, Result};
use crate::host::{DeviceHandle, DriverRegistration, HostFramework};
use crate::resolver::DependencyLoadResult;
use crate::signature::DeviceSignature;
use crate::tracing::prelude::*;
use futures::StreamExt;
use parking_lot::Mutex;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tokio_udev::{AsyncMonitorSocket, Device, EventType, MonitorBuilder};
use tokio_util::sync::CancellationToken;

/// Host framework implementation for a Linux USB bus.
///
/// Cloning shares the registration slot, so the daemon can hand one
/// clone to the monitor task and keep another for init/exit.
#[derive(Clone, Default)]
pub struct LinuxHost {
    registration: Arc<Mutex<Option<DriverRegistration>>>,
}

impl LinuxHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one bus event to the registered driver, if any, applying
    /// exact-match semantics against its id table.
    fn dispatch(&self, event_type: EventType, handle: &DeviceHandle) {
        // Clone the driver out of the slot first; callbacks must run
        // without the lock held so they are free to call back into the
        // host.
        let driver = {
            let guard = self.registration.lock();
            let Some(reg) = guard.as_ref() else { return };
            if !reg.id_table.contains(&handle.signature()) {
                return;
            }
            reg.driver.clone()
        };
        match event_type {
            EventType::Add => {
                if let Err(e) = driver.probe(handle, handle.signature()) {
                    // On a real bus a probe error would hand the device
                    // to the next candidate driver; here there is no
                    // queue of candidates to fall back to.
                    warn!("Probe rejected {}: {e}.", handle.signature());
                }
            }
            EventType::Remove => driver.disconnect(handle),
            _ => {}
        }
    }
}

impl HostFramework for LinuxHost {
    fn request_module(&self, name: &str) -> DependencyLoadResult {
        // Loaded and built-in modules both appear under /sys/module.
        if Path::new("/sys/module").join(name.replace('-', "_")).exists() {
            return DependencyLoadResult::AlreadyPresent;
        }
        match Command::new("modprobe").arg(name).status() {
            Ok(status) if status.success() => DependencyLoadResult::Loaded,
            Ok(status) => {
                debug!("modprobe {name} exited with {status}.");
                DependencyLoadResult::Unavailable
            }
            Err(e) => {
                debug!("Error {e} running modprobe {name}.");
                DependencyLoadResult::Unavailable
            }
        }
    }

    fn register_driver(&self, registration: DriverRegistration) -> Result<()> {
        let mut slot = self.registration.lock();
        if slot.is_some() {
            return Err(Error::Registration(format!(
                "a driver is already registered with this host ({} rejected)",
                registration.name
            )));
        }
        *slot = Some(registration);
        Ok(())
    }

    fn deregister_driver(&self, name: &str) {
        let mut slot = self.registration.lock();
        if slot.as_ref().is_some_and(|r| r.name == name) {
            *slot = None;
        }
    }
}

/// Task watching the USB bus, routing add/remove events to the driver
/// registered with `host`.
pub async fn monitor_task(host: LinuxHost, running: CancellationToken) {
    trace!("Task started.");

    let mut events = match monitor_socket() {
        Ok(events) => events,
        Err(e) => {
            error!("Error {e} opening udev monitor.");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = running.cancelled() => break,
            event = events.next() => {
                let Some(Ok(event)) = event else { continue };
                let event_type = event.event_type();
                if !matches!(event_type, EventType::Add | EventType::Remove) {
                    continue;
                }
                if let Some(handle) = handle_from(&event.device()) {
                    host.dispatch(event_type, &handle);
                }
            }
        }
    }

    trace!("Task stopped.");
}

fn monitor_socket() -> Result<AsyncMonitorSocket> {
    let socket = MonitorBuilder::new()?
        .match_subsystem_devtype("usb", "usb_device")?
        .listen()?;
    Ok(AsyncMonitorSocket::new(socket)?)
}

/// Build a device handle from a udev event device.
///
/// The PRODUCT property ("vvvv/pppp/rrrr", unpadded hex) is present on
/// both add and remove events, unlike the sysfs id attributes, which
/// are already gone by removal time.
fn handle_from(device: &Device) -> Option<DeviceHandle> {
    let product = device.property_value("PRODUCT")?.to_str()?;
    let signature = parse_product(product)?;
    let serial = device
        .property_value("ID_SERIAL_SHORT")
        .and_then(|s| s.to_str())
        .map(str::to_owned);
    Some(DeviceHandle::new(
        signature,
        device.syspath().display().to_string(),
        serial,
    ))
}

fn parse_product(product: &str) -> Option<DeviceSignature> {
    let mut parts = product.split('/');
    let vendor_id = u16::from_str_radix(parts.next()?, 16).ok()?;
    let product_id = u16::from_str_radix(parts.next()?, 16).ok()?;
    Some(DeviceSignature::new(vendor_id, product_id))
}
