//! Immediate operations
//!
//! Dispatches and blits that must run now rather than be queued and sorted.
//! They bypass the command arena and talk to the device straight away.

use crate::renderer::binding::{BlitShaderData, ShaderData};
use crate::renderer::defs::{
    DispatchGroup, IndexBufferId, Primitive, ResetFlags, SamplerStateId, ShaderId, TextureId,
    VertexBufferId,
};
use crate::renderer::state::StateHelper;

use super::RenderQueue;

impl RenderQueue<'_> {
    /// Runs `shader` over `group` immediately.
    ///
    /// Only resource bindings are reset; blend/depth/raster state is left as is.
    pub fn dispatch_compute(
        helper: &mut dyn StateHelper,
        group: DispatchGroup,
        shader: ShaderId,
        shader_data: &[&dyn ShaderData],
    ) {
        helper.reset(ResetFlags::RESOURCES);
        helper.device().set_shader(shader);
        for data in shader_data {
            data.apply(helper);
        }
        let device = helper.device();
        device.apply();
        device.dispatch_compute(group.x, group.y, group.z);
    }

    /// Draws `source` into `target` with `shader` as a fullscreen triangle strip.
    ///
    /// `target` becomes the only bound render target, without depth.
    /// `shader_data` is applied after the source texture/sampler block.
    pub fn blit(
        helper: &mut dyn StateHelper,
        shader: ShaderId,
        shader_data: &[&dyn ShaderData],
        source: TextureId,
        sampler: SamplerStateId,
        target: TextureId,
    ) {
        helper.invalidate();
        let device = helper.device();
        device.change_render_target(target, TextureId::NONE);
        device.set_vertex_buffer(0, VertexBufferId::NONE);
        device.set_index_buffer(IndexBufferId::NONE);
        device.set_shader(shader);

        BlitShaderData::new(source, sampler).apply(helper);
        for data in shader_data {
            data.apply(helper);
        }

        let device = helper.device();
        device.apply();
        device.draw_arrays(Primitive::TriangleStrip, 0, 4);
    }
}
