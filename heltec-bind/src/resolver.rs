//! Best-effort loading of the cooperating transport module.
//!
//! The generic serial transport (cdc_acm by default) may already be
//! resident: built into the kernel, auto-probed by another signature, or
//! loaded by an operator. Failing to load it here is therefore
//! informational, never fatal. The return type makes that contract
//! explicit; callers get an outcome to log, not an error to propagate,
//! so this path cannot drift into aborting initialization.

use crate::host::HostFramework;
use crate::tracing::prelude::*;
use std::env;
use std::fmt;

/// Transport module this driver cooperates with unless overridden.
pub const DEFAULT_TRANSPORT_MODULE: &str = "cdc_acm";

/// Outcome of the single module-load request made at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyLoadResult {
    /// The host framework loaded the module on our request.
    Loaded,
    /// The module was already resident.
    AlreadyPresent,
    /// The module could not be loaded by name.
    Unavailable,
}

impl fmt::Display for DependencyLoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyLoadResult::Loaded => write!(f, "loaded"),
            DependencyLoadResult::AlreadyPresent => write!(f, "already present"),
            DependencyLoadResult::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Get the transport module name from the environment or use the
/// default.
pub fn transport_module() -> String {
    env::var("HELTEC_TRANSPORT_MODULE").unwrap_or_else(|_| DEFAULT_TRANSPORT_MODULE.to_string())
}

/// Ask the host framework to load `name`. Called exactly once, at init,
/// before registration; synchronous, no retries.
pub fn ensure_dependency(host: &impl HostFramework, name: &str) -> DependencyLoadResult {
    let outcome = host.request_module(name);
    match outcome {
        DependencyLoadResult::Loaded => info!("Loaded {name} module."),
        DependencyLoadResult::AlreadyPresent => info!("Module {name} already present."),
        DependencyLoadResult::Unavailable => info!(
            "Module {name} not loaded (may be built in, loaded already, \
             or the device uses a different serial driver)."
        ),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;
    use serial_test::serial;

    #[test]
    fn reports_the_host_outcome_verbatim() {
        let mut host = MockHost::new();
        for status in [
            DependencyLoadResult::Loaded,
            DependencyLoadResult::AlreadyPresent,
            DependencyLoadResult::Unavailable,
        ] {
            host.module_status = status;
            assert_eq!(ensure_dependency(&host, "cdc_acm"), status);
        }
    }

    #[test]
    #[serial]
    fn module_name_defaults_and_honors_override() {
        env::remove_var("HELTEC_TRANSPORT_MODULE");
        assert_eq!(transport_module(), DEFAULT_TRANSPORT_MODULE);

        env::set_var("HELTEC_TRANSPORT_MODULE", "cdc_ecm");
        assert_eq!(transport_module(), "cdc_ecm");
        env::remove_var("HELTEC_TRANSPORT_MODULE");
    }
}
