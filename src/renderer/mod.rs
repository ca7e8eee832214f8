//! Deferred rendering core
//!
//! Provides:
//! - defs: resource ids, formats, primitives, reset flags, fixed-function enums
//! - device: the stateful graphics device interface
//! - state: the state-application layer (StateHelper, RenderState, StateTracker)
//! - binding: shader data objects
//! - queue: the sort-keyed command buffer and its command variants
//! - settings: queue capacities and clear configuration

pub mod binding;
pub mod defs;
pub mod device;
pub mod queue;
pub mod settings;
pub mod state;

pub use binding::{BlitShaderData, NoShaderData, ShaderData, TextureBindings};
pub use device::GraphicsDevice;
pub use queue::commands::{
    BatchDraw, ComputeDispatch, DrawCallState, DrawRoutine, FullscreenBlit, RenderCommand,
};
pub use queue::key::SortKey;
pub use queue::{CommandHandle, QueueState, RenderQueue, TargetSetup};
pub use settings::{ClearSettings, QueueSettings};
pub use state::{RenderState, RenderStateCache, RenderStateDesc, StateHelper, StateTracker};
