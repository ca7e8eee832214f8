//! Command variants
//!
//! A command is any `Pod` payload that knows how to issue its own device
//! calls. The queue stores the payload bytes in the arena and a
//! monomorphised [`DrawRoutine`] in its routine table; at submission the
//! routine decodes the bytes back into the concrete type and runs
//! [`RenderCommand::execute`].
//!
//! New command types only need to implement [`RenderCommand`].

use bytemuck::{Pod, Zeroable};

use crate::renderer::binding::{BLIT_SOURCE_SLOT, ShaderData};
use crate::renderer::defs::{
    DispatchGroup, IndexBufferId, Primitive, SamplerStateId, TextureId, VertexBufferId,
};
use crate::renderer::state::{RenderState, StateHelper};

/// Type-erased entry point of a recorded command.
///
/// Receives the state helper (the device is reached through
/// [`StateHelper::device`]) and the command's raw payload bytes.
pub type DrawRoutine = fn(&mut dyn StateHelper, &[u8]);

/// A command payload that can be recorded into a render queue.
///
/// By the time `execute` runs, the command's render state and shader data
/// and the queue's global shader data have been applied and committed.
pub trait RenderCommand: Pod {
    fn execute(&self, helper: &mut dyn StateHelper);
}

/// Decodes `payload` as `C` and executes it.
pub(crate) fn execute_erased<C: RenderCommand>(helper: &mut dyn StateHelper, payload: &[u8]) {
    let command: C = bytemuck::pod_read_unaligned(payload);
    command.execute(helper);
}

/// Render state plus command-local shader data of one command.
#[derive(Clone, Copy)]
pub struct DrawCallState<'a> {
    pub render_state: RenderState,
    pub shader_data: &'a dyn ShaderData,
}

impl<'a> DrawCallState<'a> {
    #[must_use]
    pub fn new(render_state: RenderState, shader_data: &'a dyn ShaderData) -> Self {
        Self {
            render_state,
            shader_data,
        }
    }
}

impl std::fmt::Debug for DrawCallState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCallState")
            .field("render_state", &self.render_state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Batch draw
// ============================================================================

/// One geometry batch: a vertex range, or an index range when an index buffer is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct BatchDraw {
    pub vertex_buffer: VertexBufferId,
    pub index_buffer: IndexBufferId,
    /// Raw [`Primitive`] value.
    pub primitive: u32,
    pub first: u32,
    pub count: u32,
    pub base_vertex: i32,
}

impl BatchDraw {
    #[must_use]
    pub fn arrays(
        vertex_buffer: VertexBufferId,
        primitive: Primitive,
        first_vertex: u32,
        vertex_count: u32,
    ) -> Self {
        Self {
            vertex_buffer,
            index_buffer: IndexBufferId::NONE,
            primitive: primitive as u32,
            first: first_vertex,
            count: vertex_count,
            base_vertex: 0,
        }
    }

    #[must_use]
    pub fn indexed(
        vertex_buffer: VertexBufferId,
        index_buffer: IndexBufferId,
        primitive: Primitive,
        first_index: u32,
        index_count: u32,
        base_vertex: i32,
    ) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
            primitive: primitive as u32,
            first: first_index,
            count: index_count,
            base_vertex,
        }
    }
}

impl RenderCommand for BatchDraw {
    fn execute(&self, helper: &mut dyn StateHelper) {
        let Ok(primitive) = Primitive::try_from(self.primitive) else {
            log::error!("BatchDraw: unknown primitive {}, skipping", self.primitive);
            return;
        };

        let device = helper.device();
        device.set_vertex_buffer(0, self.vertex_buffer);
        device.set_index_buffer(self.index_buffer);
        device.apply();
        if self.index_buffer.is_some() {
            device.draw_elements(primitive, self.first, self.count, self.base_vertex);
        } else {
            device.draw_arrays(primitive, self.first, self.count);
        }
    }
}

// ============================================================================
// Compute dispatch
// ============================================================================

/// A dispatch ordered with the rest of the pass. The compute shader comes
/// from the command's render state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ComputeDispatch {
    pub group: DispatchGroup,
}

impl ComputeDispatch {
    #[must_use]
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self {
            group: DispatchGroup::new(x, y, z),
        }
    }
}

impl RenderCommand for ComputeDispatch {
    fn execute(&self, helper: &mut dyn StateHelper) {
        let DispatchGroup { x, y, z } = self.group;
        helper.device().dispatch_compute(x, y, z);
    }
}

// ============================================================================
// Fullscreen blit
// ============================================================================

/// A fullscreen pass sampling `source`, drawn into the queue's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct FullscreenBlit {
    pub source: TextureId,
    pub sampler: SamplerStateId,
}

impl FullscreenBlit {
    #[must_use]
    pub fn new(source: TextureId, sampler: SamplerStateId) -> Self {
        Self { source, sampler }
    }
}

impl RenderCommand for FullscreenBlit {
    fn execute(&self, helper: &mut dyn StateHelper) {
        let device = helper.device();
        device.set_vertex_buffer(0, VertexBufferId::NONE);
        device.set_index_buffer(IndexBufferId::NONE);
        device.set_texture(BLIT_SOURCE_SLOT, self.source);
        device.set_sampler_state(BLIT_SOURCE_SLOT, self.sampler);
        device.apply();
        device.draw_arrays(Primitive::TriangleStrip, 0, 4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_draw_constructors() {
        let arrays = BatchDraw::arrays(VertexBufferId(1), Primitive::Lines, 4, 8);
        assert!(arrays.index_buffer.is_none());
        assert_eq!(arrays.primitive, Primitive::Lines as u32);

        let indexed = BatchDraw::indexed(
            VertexBufferId(1),
            IndexBufferId(2),
            Primitive::Triangles,
            0,
            36,
            -4,
        );
        assert_eq!(indexed.base_vertex, -4);
        assert_eq!(std::mem::size_of::<BatchDraw>(), 24);
    }
}
