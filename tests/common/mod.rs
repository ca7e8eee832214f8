//! Test doubles shared by the integration tests.
//!
//! - RecordingDevice: logs every device call as a `DeviceCall`
//! - RecordingHelper: a StateHelper that logs applied render states into the same log
//! - Marker: a command whose draw call carries an id, to observe submission order
//! - MarkerData: shader data that binds a recognisable texture id

#![allow(dead_code)]

use glam::Vec4;
use render_queue::renderer::defs::{
    BlendStateId, DepthStateId, IndexBufferId, Primitive, RasterizerStateId, ResetFlags,
    SamplerStateId, ShaderId, TextureFormat, TextureId, VertexBufferId,
};
use render_queue::renderer::state::{BlendDesc, DepthDesc, RasterDesc};
use render_queue::{GraphicsDevice, RenderCommand, RenderState, ShaderData, StateHelper};

/// Texture slot `MarkerData` binds to.
pub const MARKER_SLOT: u32 = 15;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Reset(ResetFlags),
    SetShader(ShaderId),
    SetVertexBuffer(u32, VertexBufferId),
    SetIndexBuffer(IndexBufferId),
    SetTexture(u32, TextureId),
    SetSamplerState(u32, SamplerStateId),
    SetBlendState(BlendStateId),
    SetDepthState(DepthStateId),
    SetRasterizerState(RasterizerStateId),
    ChangeRenderTargets {
        targets: Vec<TextureId>,
        depth: TextureId,
        faces: Option<Vec<u32>>,
    },
    Clear {
        color: bool,
        depth: bool,
        color_value: Vec4,
        depth_value: f32,
    },
    Apply,
    DispatchCompute(u32, u32, u32),
    DrawArrays(Primitive, u32, u32),
    DrawElements(Primitive, u32, u32, i32),
    AddRenderTarget(u32, u32, TextureFormat),
    AddRenderDepth(u32, u32, u32, TextureFormat),
    AddBlendState(BlendDesc),
    AddDepthState(DepthDesc),
    AddRasterizerState(RasterDesc),
    /// Logged by `RecordingHelper::apply`, not by the device.
    ApplyState(RenderState),
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<DeviceCall>,
    next_id: i32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn take(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// First-vertex argument of every `Points` draw, i.e. the ids of executed `Marker`s.
    pub fn markers(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::DrawArrays(Primitive::Points, marker, _) => Some(*marker),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn reset(&mut self, flags: ResetFlags) {
        self.calls.push(DeviceCall::Reset(flags));
    }

    fn set_shader(&mut self, shader: ShaderId) {
        self.calls.push(DeviceCall::SetShader(shader));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: VertexBufferId) {
        self.calls.push(DeviceCall::SetVertexBuffer(slot, buffer));
    }

    fn set_index_buffer(&mut self, buffer: IndexBufferId) {
        self.calls.push(DeviceCall::SetIndexBuffer(buffer));
    }

    fn set_texture(&mut self, slot: u32, texture: TextureId) {
        self.calls.push(DeviceCall::SetTexture(slot, texture));
    }

    fn set_sampler_state(&mut self, slot: u32, sampler: SamplerStateId) {
        self.calls.push(DeviceCall::SetSamplerState(slot, sampler));
    }

    fn set_blend_state(&mut self, state: BlendStateId) {
        self.calls.push(DeviceCall::SetBlendState(state));
    }

    fn set_depth_state(&mut self, state: DepthStateId) {
        self.calls.push(DeviceCall::SetDepthState(state));
    }

    fn set_rasterizer_state(&mut self, state: RasterizerStateId) {
        self.calls.push(DeviceCall::SetRasterizerState(state));
    }

    fn change_render_targets(
        &mut self,
        targets: &[TextureId],
        depth: TextureId,
        faces: Option<&[u32]>,
    ) {
        self.calls.push(DeviceCall::ChangeRenderTargets {
            targets: targets.to_vec(),
            depth,
            faces: faces.map(<[u32]>::to_vec),
        });
    }

    fn clear(&mut self, clear_color: bool, clear_depth: bool, color: Vec4, depth: f32) {
        self.calls.push(DeviceCall::Clear {
            color: clear_color,
            depth: clear_depth,
            color_value: color,
            depth_value: depth,
        });
    }

    fn apply(&mut self) {
        self.calls.push(DeviceCall::Apply);
    }

    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        self.calls.push(DeviceCall::DispatchCompute(x, y, z));
    }

    fn draw_arrays(&mut self, primitive: Primitive, first_vertex: u32, vertex_count: u32) {
        self.calls
            .push(DeviceCall::DrawArrays(primitive, first_vertex, vertex_count));
    }

    fn draw_elements(
        &mut self,
        primitive: Primitive,
        first_index: u32,
        index_count: u32,
        base_vertex: i32,
    ) {
        self.calls.push(DeviceCall::DrawElements(
            primitive,
            first_index,
            index_count,
            base_vertex,
        ));
    }

    fn add_render_target(&mut self, width: u32, height: u32, format: TextureFormat) -> TextureId {
        self.calls
            .push(DeviceCall::AddRenderTarget(width, height, format));
        TextureId(self.next_id())
    }

    fn add_render_depth(
        &mut self,
        width: u32,
        height: u32,
        slices: u32,
        format: TextureFormat,
    ) -> TextureId {
        self.calls
            .push(DeviceCall::AddRenderDepth(width, height, slices, format));
        TextureId(self.next_id())
    }

    fn add_blend_state(&mut self, desc: &BlendDesc) -> BlendStateId {
        self.calls.push(DeviceCall::AddBlendState(*desc));
        BlendStateId(self.next_id())
    }

    fn add_depth_state(&mut self, desc: &DepthDesc) -> DepthStateId {
        self.calls.push(DeviceCall::AddDepthState(*desc));
        DepthStateId(self.next_id())
    }

    fn add_rasterizer_state(&mut self, desc: &RasterDesc) -> RasterizerStateId {
        self.calls.push(DeviceCall::AddRasterizerState(*desc));
        RasterizerStateId(self.next_id())
    }
}

/// Logs applied render states instead of translating them.
#[derive(Debug, Default)]
pub struct RecordingHelper {
    pub device: RecordingDevice,
}

impl RecordingHelper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateHelper for RecordingHelper {
    fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut self.device
    }

    fn apply(&mut self, state: &RenderState) {
        self.device.calls.push(DeviceCall::ApplyState(*state));
    }
}

/// Draws one point whose first vertex is `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Marker {
    pub id: u32,
}

impl Marker {
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

impl RenderCommand for Marker {
    fn execute(&self, helper: &mut dyn StateHelper) {
        helper.device().draw_arrays(Primitive::Points, self.id, 1);
    }
}

/// Binds `TextureId(id)` at `MARKER_SLOT`.
#[derive(Debug, Clone, Copy)]
pub struct MarkerData(pub i32);

impl ShaderData for MarkerData {
    fn apply(&self, helper: &mut dyn StateHelper) {
        helper
            .device()
            .set_texture(MARKER_SLOT, TextureId(self.0));
    }
}

/// Deterministic xorshift sequence for order-independent property checks.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 32) as u32
    }
}
