//! Driver registration and the probe/disconnect lifecycle.
//!
//! [`init`] and [`exit`] bracket the module's residency: init resolves
//! the transport dependency and registers the signature table with its
//! callback pair, exit releases the claim. In between, the host
//! framework delivers probe and disconnect per matching device.
//!
//! Only registration can fail upward. The dependency step and both
//! per-device callbacks observe and log; accurate identification logging
//! is this driver's whole obligation, not device control.

use crate::error::Result;
use crate::host::{DeviceHandle, DriverRegistration, HostFramework, SerialDriver};
use crate::resolver;
use crate::signature::{DeviceSignature, DEVICE_TABLE};
use crate::tracing::prelude::*;
use std::sync::Arc;

/// Name under which this driver registers with the host framework.
pub const DRIVER_NAME: &str = "heltec";

/// Attach/detach observer for the Heltec V3.
///
/// The generic transport driver owns the byte stream and the mesh
/// protocol lives in user space, so probe asserts no veto over the
/// claim. If the device ever needs an init sequence or GPIO strapping,
/// probe is where it would go, with an error result rejecting the claim.
pub struct HeltecDriver;

impl SerialDriver for HeltecDriver {
    fn probe(&self, device: &DeviceHandle, id: DeviceSignature) -> Result<()> {
        info!(
            "Heltec V3 device (VID: {:#06x}, PID: {:#06x}) found at {}.",
            id.vendor_id,
            id.product_id,
            device.syspath()
        );
        Ok(())
    }

    fn disconnect(&self, device: &DeviceHandle) {
        // The handle may already be dead; log and touch nothing else.
        info!("Heltec V3 device at {} disconnected.", device.syspath());
    }
}

/// Proof that this driver is currently registered.
///
/// At most one exists per host; [`exit`] consumes it, so the record is
/// written exactly twice in the driver's lifetime.
#[must_use = "dropping a BindingRegistration leaks the host framework claim; pass it to exit"]
#[derive(Debug)]
pub struct BindingRegistration {
    name: &'static str,
}

/// Bring the driver up: resolve the transport dependency, then register
/// the signature table together with the probe/disconnect pair.
///
/// Registration failure is the only fatal outcome and is propagated so
/// the caller can abort the load.
pub fn init(host: &impl HostFramework) -> Result<BindingRegistration> {
    // Outcome already logged by the resolver; by contract it never
    // gates registration.
    let module = resolver::transport_module();
    let _ = resolver::ensure_dependency(host, &module);

    let registration = DriverRegistration {
        name: DRIVER_NAME,
        id_table: DEVICE_TABLE,
        driver: Arc::new(HeltecDriver),
    };
    if let Err(e) = host.register_driver(registration) {
        error!("Failed to register Heltec serial driver: {e}.");
        return Err(e);
    }

    info!("Driver initialized.");
    Ok(BindingRegistration { name: DRIVER_NAME })
}

/// Tear the driver down, releasing the claim unconditionally.
///
/// The host framework guarantees no probe or disconnect is in flight
/// once deregistration begins.
pub fn exit(host: &impl HostFramework, registration: BindingRegistration) {
    host.deregister_driver(registration.name);
    info!("Driver unloaded.");
}
