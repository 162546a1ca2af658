#![forbid(unsafe_code)]
#![doc = "Common protocol version, error and rejection types for tlswire."]

pub mod error;
pub mod version;

pub use error::*;
pub use version::ProtocolVersion;
