//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::value::Device;

/// Options that shape how values are written and read back.
///
/// Missing fields take their defaults when deserializing, so a partial
/// configuration file is enough.
///
/// # Examples
///
/// ```
/// # use treepack::{CodecConfig, value::Device};
/// let config = CodecConfig::default().with_target_device("cuda:0");
/// assert_eq!(config.target_device, Device::new("cuda:0"));
/// assert!(config.preserve_mapping_order);
///
/// let parsed: CodecConfig = serde_json::from_str(r#"{"preserve_mapping_order": false}"#)?;
/// assert!(parsed.target_device.is_cpu());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Device decoded tensors are placed on.
    pub target_device: Device,
    /// Record each mapping child's position so decoding restores insertion
    /// order. When off, decoded mappings are ordered by node name.
    pub preserve_mapping_order: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            target_device: Device::cpu(),
            preserve_mapping_order: true,
        }
    }
}

impl CodecConfig {
    pub fn with_target_device(mut self, device: impl Into<Device>) -> Self {
        self.target_device = device.into();
        self
    }

    pub fn with_mapping_order(mut self, preserve: bool) -> Self {
        self.preserve_mapping_order = preserve;
        self
    }
}
