//! Device identity constants and the signature table.
//!
//! The signature set is fixed at build time. Host framework
//! implementations consult it with plain `contains`; matching is exact,
//! never by range or prefix, so a device absent from the table is never
//! offered to probe.

use std::fmt;

/// USB vendor ID of the Heltec V3 (Espressif).
pub const HELTEC_VENDOR_ID: u16 = 0x303A;
/// USB product ID of the Heltec V3.
pub const HELTEC_PRODUCT_ID: u16 = 0x80C4;

/// USB vendor and product IDs identifying one class of hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceSignature {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl DeviceSignature {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl fmt::Display for DeviceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// The signatures this driver claims.
pub static DEVICE_TABLE: &[DeviceSignature] =
    &[DeviceSignature::new(HELTEC_VENDOR_ID, HELTEC_PRODUCT_ID)];
