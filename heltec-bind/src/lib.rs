//! Hardware identification and lifecycle binding for the Heltec V3.
//!
//! The Heltec V3 Meshtastic node enumerates as a USB CDC serial device
//! (303a:80c4). The generic cdc_acm transport owns the byte stream and a
//! separate user-space process speaks the mesh protocol over it; this
//! crate is the layer in between. It recognizes the device when it
//! appears on the bus, makes a best-effort attempt to have the transport
//! module resident, claims the device signature with the host framework,
//! logs every attach and detach, and releases the binding cleanly on
//! shutdown.

pub mod binder;
pub mod error;
pub mod host;
pub mod resolver;
pub mod signature;
pub mod tracing;
