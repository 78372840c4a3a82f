//! Input device selection and enumeration.

use crate::error::{Result, VoxnoteError};
use crate::sys::with_suppressed_stderr;
use cpal::traits::{DeviceTrait, HostTrait};

/// How the user identified the input device.
///
/// The CLI accepts either a numeric index (as printed by `voxnote devices`)
/// or a name substring; the selector is resolved once at startup and the
/// resolved device is used for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelector {
    ByIndex(usize),
    BySubstring(String),
}

impl DeviceSelector {
    /// Parse a raw device argument: digits mean an index, anything else a
    /// name substring.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(index) => DeviceSelector::ByIndex(index),
            Err(_) => DeviceSelector::BySubstring(raw.trim().to_string()),
        }
    }

    /// Resolve the selector to a concrete input device.
    ///
    /// Substring matching is case-insensitive against the device name.
    ///
    /// # Errors
    /// `DeviceNotFound` when no input device matches.
    pub fn resolve(&self) -> Result<cpal::Device> {
        let (host, devices) = with_suppressed_stderr(|| {
            let host = cpal::default_host();
            let devices = host.input_devices();
            (host, devices)
        });
        let _ = host; // keep host alive while iterating devices
        let devices = devices.map_err(|e| VoxnoteError::StreamOpen {
            message: format!("Failed to enumerate input devices: {}", e),
        })?;

        match self {
            DeviceSelector::ByIndex(index) => {
                devices
                    .into_iter()
                    .nth(*index)
                    .ok_or_else(|| VoxnoteError::DeviceNotFound {
                        device: index.to_string(),
                    })
            }
            DeviceSelector::BySubstring(needle) => {
                let needle_lower = needle.to_lowercase();
                for device in devices {
                    if let Ok(name) = device.name()
                        && name.to_lowercase().contains(&needle_lower)
                    {
                        return Ok(device);
                    }
                }
                Err(VoxnoteError::DeviceNotFound {
                    device: needle.clone(),
                })
            }
        }
    }
}

/// Get the system default input device.
///
/// # Errors
/// `DeviceNotFound` when no input device is available.
pub fn default_input_device() -> Result<cpal::Device> {
    with_suppressed_stderr(|| cpal::default_host().default_input_device()).ok_or_else(|| {
        VoxnoteError::DeviceNotFound {
            device: "default".to_string(),
        }
    })
}

/// One row of the `voxnote devices` diagnostic listing.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Position in the enumeration order; usable with `--device INDEX`.
    pub index: usize,
    pub name: String,
    /// The device's default input sample rate, when it reports one.
    pub default_sample_rate: Option<u32>,
    /// Whether this is the system default input device.
    pub is_default: bool,
}

/// List all available audio input devices.
///
/// # Note
/// During enumeration, cpal may probe multiple audio backends; their
/// warnings are suppressed because they are harmless but confusing.
pub fn list_input_devices() -> Result<Vec<DeviceInfo>> {
    with_suppressed_stderr(|| {
        let host = cpal::default_host();
        let default_name = host
            .default_input_device()
            .and_then(|device| device.name().ok());

        let devices = host.input_devices().map_err(|e| VoxnoteError::StreamOpen {
            message: format!("Failed to enumerate input devices: {}", e),
        })?;

        let mut infos = Vec::new();
        for (index, device) in devices.enumerate() {
            let Ok(name) = device.name() else {
                continue;
            };
            let default_sample_rate = device
                .default_input_config()
                .map(|config| config.sample_rate())
                .ok();
            let is_default = default_name.as_deref() == Some(name.as_str());
            infos.push(DeviceInfo {
                index,
                name,
                default_sample_rate,
                is_default,
            });
        }
        Ok(infos)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_is_index() {
        assert_eq!(DeviceSelector::parse("3"), DeviceSelector::ByIndex(3));
        assert_eq!(DeviceSelector::parse(" 0 "), DeviceSelector::ByIndex(0));
    }

    #[test]
    fn test_parse_text_is_substring() {
        assert_eq!(
            DeviceSelector::parse("pipewire"),
            DeviceSelector::BySubstring("pipewire".to_string())
        );
        assert_eq!(
            DeviceSelector::parse("hw:0,0"),
            DeviceSelector::BySubstring("hw:0,0".to_string())
        );
    }

    #[test]
    fn test_parse_mixed_is_substring() {
        // A leading digit does not make "2nd mic" an index.
        assert_eq!(
            DeviceSelector::parse("2nd mic"),
            DeviceSelector::BySubstring("2nd mic".to_string())
        );
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_list_devices_returns_at_least_one() {
        let devices = list_input_devices().expect("enumeration should succeed");
        assert!(!devices.is_empty(), "Expected at least one audio device");
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_resolve_nonexistent_substring_fails() {
        let selector = DeviceSelector::parse("NonExistentDevice12345");
        match selector.resolve() {
            Err(VoxnoteError::DeviceNotFound { device }) => {
                assert_eq!(device, "NonExistentDevice12345");
            }
            _ => panic!("Expected DeviceNotFound error"),
        }
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_resolve_out_of_range_index_fails() {
        let selector = DeviceSelector::ByIndex(usize::MAX);
        assert!(matches!(
            selector.resolve(),
            Err(VoxnoteError::DeviceNotFound { .. })
        ));
    }
}
