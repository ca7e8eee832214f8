//! Queue Settings & Clear Configuration
//!
//! [`QueueSettings`] fixes the per-queue capacities. They are consumed once at
//! construction: the arena and the command/key arrays are allocated up front
//! and never grow, so recording is allocation-free from the first frame on.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use render_queue::{QueueSettings, RenderQueue, TargetSetup};
//!
//! // A small shadow-map queue
//! let settings = QueueSettings {
//!     arena_capacity: 64 * 1024,
//!     max_commands: 1024,
//!     ..Default::default()
//! };
//! let queue = RenderQueue::with_settings(&mut device, settings, &TargetSetup::Existing {
//!     targets: &[],
//!     depth: Some(shadow_map),
//!     face: None,
//! })?;
//! ```
//!
//! Settings deserialize with serde; missing fields take their defaults.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::errors::{QueueError, Result};
use crate::renderer::defs::MAX_SHADER_DATA_PER_QUEUE;
use crate::renderer::queue::encoding::HEADER_SIZE;

/// Default arena size in bytes (1 MiB).
pub const DEFAULT_ARENA_CAPACITY: usize = 1 << 20;

/// Default maximum number of commands per recording cycle.
pub const DEFAULT_MAX_COMMANDS: usize = 8192;

/// Capacity configuration of one render queue.
///
/// # Fields
///
/// | Field             | Description                                   | Default  |
/// |-------------------|-----------------------------------------------|----------|
/// | `arena_capacity`  | Bytes available for headers and payloads      | 1 MiB    |
/// | `max_commands`    | Commands per recording cycle                  | 8192     |
/// | `max_shader_data` | Queue-global shader data entries              | 8        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub arena_capacity: usize,
    pub max_commands: usize,
    pub max_shader_data: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            max_commands: DEFAULT_MAX_COMMANDS,
            max_shader_data: MAX_SHADER_DATA_PER_QUEUE,
        }
    }
}

impl QueueSettings {
    /// Checks that the arena can hold the sentinel and that the chain offsets fit in 32 bits.
    pub fn validate(&self) -> Result<()> {
        if self.arena_capacity < HEADER_SIZE {
            return Err(QueueError::InvalidSettings(format!(
                "arena_capacity {} is smaller than one command header ({HEADER_SIZE} bytes)",
                self.arena_capacity
            )));
        }
        if u32::try_from(self.arena_capacity).is_err() {
            return Err(QueueError::InvalidSettings(format!(
                "arena_capacity {} exceeds the 32-bit command chain",
                self.arena_capacity
            )));
        }
        if self.max_commands == 0 {
            return Err(QueueError::InvalidSettings(
                "max_commands must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a queue clears its targets to before the first command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearSettings {
    pub color: bool,
    pub depth: bool,
    pub color_value: Vec4,
    pub depth_value: f32,
}

impl Default for ClearSettings {
    fn default() -> Self {
        Self {
            color: false,
            depth: false,
            color_value: Vec4::ZERO,
            depth_value: 0.0,
        }
    }
}

impl ClearSettings {
    /// `true` when at least one attachment is cleared.
    #[inline]
    #[must_use]
    pub fn any(&self) -> bool {
        self.color || self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(QueueSettings::default().validate().is_ok());
    }

    #[test]
    fn test_arena_must_hold_sentinel() {
        let settings = QueueSettings {
            arena_capacity: HEADER_SIZE - 1,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(QueueError::InvalidSettings(_))));
    }
}
