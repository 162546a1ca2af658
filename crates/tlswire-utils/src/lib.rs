#![forbid(unsafe_code)]
#![doc = "Utility functions for tlswire: bounds-checked wire parsing and building."]

#[cfg(feature = "codec")]
pub mod codec;
