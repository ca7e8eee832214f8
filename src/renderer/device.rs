//! Graphics Device Interface
//!
//! The stateful device the queue flushes into. Binds are latched by the
//! device and only take effect after [`GraphicsDevice::apply`]; draw and
//! dispatch calls consume whatever was committed last.
//!
//! Implementations live outside this crate (GL/D3D backends, recording
//! devices in tests). The trait is object safe so the queue and the state
//! layer can work on `&mut dyn GraphicsDevice`.

use glam::Vec4;

use crate::renderer::defs::{
    BlendStateId, DepthStateId, IndexBufferId, Primitive, RasterizerStateId, ResetFlags,
    SamplerStateId, ShaderId, TextureFormat, TextureId, VertexBufferId,
};
use crate::renderer::state::{BlendDesc, DepthDesc, RasterDesc};

pub trait GraphicsDevice {
    /// Drops the binding state selected by `flags` back to the device baseline.
    fn reset(&mut self, flags: ResetFlags);

    fn set_shader(&mut self, shader: ShaderId);
    fn set_vertex_buffer(&mut self, slot: u32, buffer: VertexBufferId);
    fn set_index_buffer(&mut self, buffer: IndexBufferId);
    fn set_texture(&mut self, slot: u32, texture: TextureId);
    fn set_sampler_state(&mut self, slot: u32, sampler: SamplerStateId);
    fn set_blend_state(&mut self, state: BlendStateId);
    fn set_depth_state(&mut self, state: DepthStateId);
    fn set_rasterizer_state(&mut self, state: RasterizerStateId);

    /// Binds `targets` as color attachments plus an optional depth target.
    ///
    /// `faces` selects a cubemap/array slice per target; `None` binds whole
    /// targets. An empty `targets` slice with `TextureId::NONE` depth unbinds.
    fn change_render_targets(
        &mut self,
        targets: &[TextureId],
        depth: TextureId,
        faces: Option<&[u32]>,
    );

    /// Single-target convenience for [`change_render_targets`](Self::change_render_targets).
    fn change_render_target(&mut self, target: TextureId, depth: TextureId) {
        self.change_render_targets(&[target], depth, None);
    }

    fn clear(&mut self, clear_color: bool, clear_depth: bool, color: Vec4, depth: f32);

    /// Commits every pending bind.
    fn apply(&mut self);

    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32);
    fn draw_arrays(&mut self, primitive: Primitive, first_vertex: u32, vertex_count: u32);
    fn draw_elements(
        &mut self,
        primitive: Primitive,
        first_index: u32,
        index_count: u32,
        base_vertex: i32,
    );

    fn add_render_target(&mut self, width: u32, height: u32, format: TextureFormat) -> TextureId;
    fn add_render_depth(
        &mut self,
        width: u32,
        height: u32,
        slices: u32,
        format: TextureFormat,
    ) -> TextureId;

    fn add_blend_state(&mut self, desc: &BlendDesc) -> BlendStateId;
    fn add_depth_state(&mut self, desc: &DepthDesc) -> DepthStateId;
    fn add_rasterizer_state(&mut self, desc: &RasterDesc) -> RasterizerStateId;
}
