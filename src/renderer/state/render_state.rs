//! Render State
//!
//! [`RenderStateDesc`] describes pipeline state declaratively; a
//! [`RenderStateCache`] resolves it once into device state objects and hands
//! out the resulting [`RenderState`], a handful of ids small enough to live in
//! every command header.

use bytemuck::{Pod, Zeroable};
use rustc_hash::FxHashMap;

use crate::renderer::defs::{
    BlendFactor, BlendOp, BlendStateId, ColorMask, CompareFunc, CullMode, DepthStateId,
    FillMode, RasterizerStateId, ShaderId, StencilOp,
};
use crate::renderer::device::GraphicsDevice;

/// Resolved pipeline state, as stored in a command's draw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RenderState {
    pub shader: ShaderId,
    pub blend: BlendStateId,
    pub depth: DepthStateId,
    pub rasterizer: RasterizerStateId,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            shader: ShaderId::NONE,
            blend: BlendStateId::NONE,
            depth: DepthStateId::NONE,
            rasterizer: RasterizerStateId::NONE,
        }
    }
}

impl RenderState {
    /// A state that only selects a shader and leaves everything else at the device default.
    #[must_use]
    pub fn with_shader(shader: ShaderId) -> Self {
        Self {
            shader,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendDesc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
    pub op: BlendOp,
    pub mask: ColorMask,
}

impl BlendDesc {
    pub const ALPHA: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
        op: BlendOp::Add,
        mask: ColorMask::ALL,
    };

    pub const ADDITIVE: Self = Self {
        src: BlendFactor::One,
        dst: BlendFactor::One,
        op: BlendOp::Add,
        mask: ColorMask::ALL,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilDesc {
    pub func: CompareFunc,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
    pub read_mask: u8,
    pub write_mask: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthDesc {
    pub test: bool,
    pub write: bool,
    pub func: CompareFunc,
    pub stencil: Option<StencilDesc>,
}

impl Default for DepthDesc {
    fn default() -> Self {
        Self {
            test: true,
            write: true,
            func: CompareFunc::LessEqual,
            stencil: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RasterDesc {
    pub cull: CullMode,
    pub fill: FillMode,
    pub multisample: bool,
    pub scissor: bool,
}

/// Declarative pipeline state.
///
/// `blend: None` means blending disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderStateDesc {
    pub shader: ShaderId,
    pub blend: Option<BlendDesc>,
    pub depth: DepthDesc,
    pub raster: RasterDesc,
}

impl RenderStateDesc {
    #[must_use]
    pub fn new(shader: ShaderId) -> Self {
        Self {
            shader,
            blend: None,
            depth: DepthDesc::default(),
            raster: RasterDesc::default(),
        }
    }
}

/// Resolves [`RenderStateDesc`]s into [`RenderState`]s.
///
/// Device state objects are created once per distinct sub-descriptor, so two
/// descriptors that only differ in their shader share blend/depth/raster ids.
#[derive(Debug, Default)]
pub struct RenderStateCache {
    states: FxHashMap<RenderStateDesc, RenderState>,
    blend_states: FxHashMap<BlendDesc, BlendStateId>,
    depth_states: FxHashMap<DepthDesc, DepthStateId>,
    raster_states: FxHashMap<RasterDesc, RasterizerStateId>,
}

impl RenderStateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_render_state(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &RenderStateDesc,
    ) -> RenderState {
        if let Some(state) = self.states.get(desc) {
            return *state;
        }

        let blend = match desc.blend {
            Some(blend) => *self
                .blend_states
                .entry(blend)
                .or_insert_with(|| device.add_blend_state(&blend)),
            None => BlendStateId::NONE,
        };
        let depth = *self
            .depth_states
            .entry(desc.depth)
            .or_insert_with(|| device.add_depth_state(&desc.depth));
        let rasterizer = *self
            .raster_states
            .entry(desc.raster)
            .or_insert_with(|| device.add_rasterizer_state(&desc.raster));

        let state = RenderState {
            shader: desc.shader,
            blend,
            depth,
            rasterizer,
        };
        self.states.insert(*desc, state);
        state
    }

    /// Number of distinct descriptors resolved so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drops every cached entry. Device objects are not released.
    pub fn clear(&mut self) {
        self.states.clear();
        self.blend_states.clear();
        self.depth_states.clear();
        self.raster_states.clear();
    }
}
