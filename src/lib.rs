#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Deferred, sort-keyed command submission for stateful graphics devices.
//!
//! Scene code records draw, dispatch and blit commands into a [`RenderQueue`]
//! in any order during a frame. The queue packs them into a fixed-size arena,
//! reorders them by [`SortKey`] and flushes them to a [`GraphicsDevice`]
//! through a [`StateHelper`] in one state-coherent pass.
//!
//! ```rust,ignore
//! use render_queue::*;
//!
//! let mut queue = RenderQueue::allocate(&mut device, 1280, 720, 1, TextureFormat::Rgba8, Some(TextureFormat::Depth32F))?;
//! queue.set_clear(true, true, glam::Vec4::ZERO, 1.0);
//! queue.add_shader_data(&view_data)?;
//!
//! queue.record(SortKey::new(0, material_id, depth), DrawCallState::new(state, &material), batch)?;
//!
//! queue.sort();
//! let mut helper = StateTracker::new(device);
//! queue.submit_all(&mut helper);
//! ```

pub mod errors;
pub mod renderer;

pub use errors::{QueueError, Result};
pub use renderer::defs::{
    DispatchGroup, IndexBufferId, Primitive, ResetFlags, SamplerStateId, ShaderId, TextureFormat,
    TextureId, VertexBufferId,
};
pub use renderer::{
    BatchDraw, BlitShaderData, ClearSettings, CommandHandle, ComputeDispatch, DrawCallState,
    DrawRoutine, FullscreenBlit, GraphicsDevice, NoShaderData, QueueSettings, QueueState,
    RenderCommand, RenderQueue, RenderState, RenderStateCache, RenderStateDesc, ShaderData,
    SortKey, StateHelper, StateTracker, TargetSetup, TextureBindings,
};
