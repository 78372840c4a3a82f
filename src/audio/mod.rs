//! Audio input: the frame source seam and its implementations.

#[cfg(feature = "cpal-audio")]
pub mod capture;
#[cfg(feature = "cpal-audio")]
pub mod device;
pub mod source;
pub mod wav;
