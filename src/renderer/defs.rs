//! Render Definitions
//!
//! Resource identifiers, formats, primitive topologies, reset flags and the
//! fixed-function state enums shared by the device, the state layer and the
//! command encoding.
//!
//! Identifiers are plain `i32` handles owned by the graphics device. They are
//! `Pod` so that commands can carry them inside the byte arena.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/// Maximum number of simultaneously bound color targets.
pub const MAX_MRTS: usize = 8;

/// Default maximum of queue-global shader data entries.
pub const MAX_SHADER_DATA_PER_QUEUE: usize = 8;

macro_rules! define_resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
        pub struct $name(pub i32);

        impl $name {
            /// The "nothing bound" value.
            pub const NONE: Self = Self(-1);

            #[inline]
            #[must_use]
            pub fn is_none(self) -> bool {
                self == Self::NONE
            }

            #[inline]
            #[must_use]
            pub fn is_some(self) -> bool {
                self != Self::NONE
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::NONE
            }
        }
    };
}

define_resource_id!(
    /// Handle of a texture or render target.
    TextureId
);
define_resource_id!(
    /// Handle of a compiled shader program.
    ShaderId
);
define_resource_id!(VertexBufferId);
define_resource_id!(IndexBufferId);
define_resource_id!(SamplerStateId);
define_resource_id!(BlendStateId);
define_resource_id!(DepthStateId);
define_resource_id!(RasterizerStateId);

impl TextureId {
    /// The device's default framebuffer.
    pub const FRAMEBUFFER: Self = Self(-2);
}

/// Texture storage format for render and depth targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8,
    Rg8,
    Rgba8,
    Rgba8Srgb,
    R16F,
    Rg16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgba32F,
    R11G11B10F,
    Depth16,
    Depth24,
    Depth24Stencil8,
    Depth32F,
}

impl TextureFormat {
    #[inline]
    #[must_use]
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            Self::Depth16 | Self::Depth24 | Self::Depth24Stencil8 | Self::Depth32F
        )
    }
}

/// Primitive topology passed to draw calls.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles = 0,
    TriangleFan = 1,
    TriangleStrip = 2,
    Quads = 3,
    Lines = 4,
    LineStrip = 5,
    LineLoop = 6,
    Points = 7,
}

impl TryFrom<u32> for Primitive {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Triangles,
            1 => Self::TriangleFan,
            2 => Self::TriangleStrip,
            3 => Self::Quads,
            4 => Self::Lines,
            5 => Self::LineStrip,
            6 => Self::LineLoop,
            7 => Self::Points,
            other => return Err(other),
        })
    }
}

bitflags! {
    /// Device binding state to reset before a pass or dispatch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResetFlags: u32 {
        const SHADER          = 0x1;
        const VERTEX_FORMAT   = 0x2;
        const VERTEX_BUFFERS  = 0x4;
        const INDEX_BUFFER    = 0x8;
        const DEPTH_STATE     = 0x10;
        const BLEND_STATE     = 0x20;
        const RASTER_STATE    = 0x40;
        const SAMPLERS        = 0x80;
        const TEXTURES        = 0x100;
        const UAVS            = 0x200;
        const BUFFERS         = 0x400;
        /// Every shader resource binding, leaving pipeline state alone.
        const RESOURCES = Self::TEXTURES.bits() | Self::UAVS.bits() | Self::BUFFERS.bits() | Self::SAMPLERS.bits();
        const ALL = 0xFFFF;
    }
}

bitflags! {
    /// Color channel write mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED   = 0x1;
        const GREEN = 0x2;
        const BLUE  = 0x4;
        const ALPHA = 0x8;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendOp {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Depth and stencil test comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    Invert,
    Increment,
    Decrement,
    IncrementSaturate,
    DecrementSaturate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    None,
    #[default]
    Back,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
}

/// Compute dispatch group counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct DispatchGroup {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl DispatchGroup {
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}
