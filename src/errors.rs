//! Error Types
//!
//! This module defines the error type returned by the render queue API.
//!
//! # Overview
//!
//! Every variant of [`QueueError`] is a programmer error: the queue refuses the
//! operation and leaves its state exactly as it was before the call. Nothing is
//! retried and nothing is truncated silently.
//!
//! - Capacity errors: arena space, command count, shader data, render targets
//! - Binding errors: face selection on an MRT setup, color format for a depth target
//! - Handle errors: payload access from a previous recording cycle
//!
//! # Usage
//!
//! ```rust,ignore
//! use render_queue::errors::{QueueError, Result};
//!
//! fn record(queue: &mut RenderQueue<'_>) -> Result<()> {
//!     queue.record(7u32, state, BatchDraw::arrays(vb, Primitive::Triangles, 0, 3))?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::renderer::defs::TextureFormat;

/// The error type for render queue operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    // ========================================================================
    // Capacity Errors
    // ========================================================================
    /// The command (header plus payload) does not fit in the remaining arena.
    #[error("Command arena exhausted: requested {requested} bytes, {remaining} remaining")]
    ArenaExhausted {
        /// Bytes the command would occupy, header included
        requested: usize,
        /// Bytes left between the write cursor and the arena end
        remaining: usize,
    },

    /// The recorded-command count would exceed the configured maximum.
    #[error("Command limit reached: at most {max} commands per recording cycle")]
    CommandLimit {
        /// Configured maximum
        max: usize,
    },

    /// More render targets were requested than can be bound at once.
    #[error("Too many render targets: {requested} requested, at most {max} supported")]
    RenderTargetLimit {
        /// Number of targets requested
        requested: usize,
        /// Maximum simultaneous render targets
        max: usize,
    },

    /// The queue-global shader data list is full.
    #[error("Queue shader data limit reached: at most {max} entries")]
    ShaderDataLimit {
        /// Configured maximum
        max: usize,
    },

    /// The payload size cannot be encoded in the command chain.
    #[error("Command payload too large: {size} bytes")]
    PayloadTooLarge {
        /// Requested payload size
        size: usize,
    },

    // ========================================================================
    // Binding Errors
    // ========================================================================
    /// A depth target was requested with a color format.
    #[error("Depth target requested with non-depth format {format:?}")]
    InvalidDepthFormat {
        /// The rejected format
        format: TextureFormat,
    },

    /// A cubemap/array face was selected while the queue does not bind exactly one target.
    #[error("Face selection requires exactly one render target, {targets} bound")]
    FaceRequiresSingleTarget {
        /// Number of bound render targets
        targets: usize,
    },

    // ========================================================================
    // Handle & Configuration Errors
    // ========================================================================
    /// The command handle belongs to a recording cycle that was already submitted.
    #[error("Command handle refers to a previous recording cycle")]
    StaleHandle,

    /// The typed read/write does not match the recorded payload size.
    #[error("Payload size mismatch: recorded {recorded} bytes, accessed as {expected}")]
    PayloadMismatch {
        /// Size of the recorded payload
        recorded: usize,
        /// Size of the requested type
        expected: usize,
    },

    /// The queue settings cannot be honoured.
    #[error("Invalid queue settings: {0}")]
    InvalidSettings(String),
}

/// Alias for `Result<T, QueueError>`.
pub type Result<T> = std::result::Result<T, QueueError>;
