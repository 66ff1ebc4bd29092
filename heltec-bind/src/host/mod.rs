//! Host driver framework abstraction.
//!
//! The surrounding operating system owns bus enumeration, driver
//! matching, and device handle lifetime. This module models that
//! collaborator as a trait so the binder can be exercised against a
//! simulated bus in tests and against udev on a real Linux host.
//!
//! The contract mirrors what a kernel gives a serial driver: the host
//! consults the registered signature table when a device appears, and
//! only on an exact match dispatches the driver's probe callback. The
//! same table gates disconnect dispatch on removal.

use crate::error::Result;
use crate::resolver::DependencyLoadResult;
use crate::signature::DeviceSignature;
use std::sync::Arc;

#[cfg(target_os = "linux")]
pub mod linux;

/// One live device attachment.
///
/// Owned by the host framework. Driver callbacks borrow a handle for the
/// duration of the call only; the framework may invalidate it the moment
/// disconnect returns, so a handle is deliberately not cloneable and
/// nothing in this crate stores one.
#[derive(Debug)]
pub struct DeviceHandle {
    signature: DeviceSignature,
    syspath: String,
    serial_number: Option<String>,
}

impl DeviceHandle {
    /// Construct a handle. Only host framework implementations should
    /// create these.
    pub fn new(
        signature: DeviceSignature,
        syspath: impl Into<String>,
        serial_number: Option<String>,
    ) -> Self {
        Self {
            signature,
            syspath: syspath.into(),
            serial_number,
        }
    }

    pub fn signature(&self) -> DeviceSignature {
        self.signature
    }

    pub fn syspath(&self) -> &str {
        &self.syspath
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }
}

/// Attach/detach callbacks a driver registers with the host framework.
pub trait SerialDriver: Send + Sync {
    /// Called once per newly enumerated matching device. Returning an
    /// error rejects the claim and lets the framework try other drivers.
    fn probe(&self, device: &DeviceHandle, id: DeviceSignature) -> Result<()>;

    /// Called when a previously enumerated device is removed. The handle
    /// may already be dead, and probe may never have run for it;
    /// implementations must tolerate both and cannot fail.
    fn disconnect(&self, device: &DeviceHandle);
}

/// A driver's claim over a set of device signatures.
pub struct DriverRegistration {
    pub name: &'static str,
    pub id_table: &'static [DeviceSignature],
    pub driver: Arc<dyn SerialDriver>,
}

/// The host framework operations this crate consumes.
pub trait HostFramework {
    /// Best-effort request to load a transport module by name. Never
    /// fails; the outcome says whether the module ended up resident.
    fn request_module(&self, name: &str) -> DependencyLoadResult;

    /// Register `registration` as a claimant for its id table.
    ///
    /// Atomic: on error nothing was committed and no cleanup is owed.
    fn register_driver(&self, registration: DriverRegistration) -> Result<()>;

    /// Remove the named registration. Idempotent; unknown names are
    /// ignored. The host guarantees no probe or disconnect is in flight
    /// once this returns.
    fn deregister_driver(&self, name: &str);
}

#[cfg(test)]
pub(crate) mod mock {
    //! A simulated bus for exercising the binder without hardware.

    use super::*;
    use crate::error::Error;
    use parking_lot::Mutex;

    pub struct MockHost {
        registration: Mutex<Option<DriverRegistration>>,
        /// Outcome `request_module` reports.
        pub module_status: DependencyLoadResult,
        /// Refuse the next `register_driver` call.
        pub reject_registration: bool,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self {
                registration: Mutex::new(None),
                module_status: DependencyLoadResult::Loaded,
                reject_registration: false,
            }
        }

        pub fn has_registration(&self) -> bool {
            self.registration.lock().is_some()
        }

        /// Simulate enumeration of `handle`: consult the registered
        /// table and dispatch probe on an exact match. Returns None when
        /// no registered driver matched.
        pub fn enumerate(&self, handle: &DeviceHandle) -> Option<Result<()>> {
            let guard = self.registration.lock();
            let reg = guard.as_ref()?;
            if reg.id_table.contains(&handle.signature()) {
                Some(reg.driver.probe(handle, handle.signature()))
            } else {
                None
            }
        }

        /// Simulate removal of `handle`, whether or not it was ever
        /// enumerated.
        pub fn unplug(&self, handle: &DeviceHandle) {
            let guard = self.registration.lock();
            if let Some(reg) = guard.as_ref() {
                if reg.id_table.contains(&handle.signature()) {
                    reg.driver.disconnect(handle);
                }
            }
        }
    }

    impl HostFramework for MockHost {
        fn request_module(&self, _name: &str) -> DependencyLoadResult {
            self.module_status
        }

        fn register_driver(&self, registration: DriverRegistration) -> Result<()> {
            if self.reject_registration {
                return Err(Error::Registration(
                    "simulated resource exhaustion".to_string(),
                ));
            }
            let mut slot = self.registration.lock();
            if slot.is_some() {
                return Err(Error::Registration(format!(
                    "duplicate claim for {}",
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
}
