//! Sort keys
//!
//! Commands are submitted in ascending key order after [`RenderQueue::sort`](super::RenderQueue::sort).
//! Callers may pass any integer; [`SortKey::new`] packs the usual
//! layer / material / depth triple so that one comparison orders all three.

// Field widths, most significant first; together they fill the 64 bits.
const LAYER_BITS: u32 = 14;
const MATERIAL_BITS: u32 = 20;
const DEPTH_BITS: u32 = 30;

const DEPTH_SHIFT: u32 = 0;
const MATERIAL_SHIFT: u32 = DEPTH_SHIFT + DEPTH_BITS;
const LAYER_SHIFT: u32 = MATERIAL_SHIFT + MATERIAL_BITS;

/// Submission order key (layer, then material, then depth).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(pub u64);

impl SortKey {
    /// Packs `layer`, `material` and `depth` so that one integer comparison
    /// orders by layer first and depth last.
    ///
    /// `layer` keeps its low 14 bits and `material` its low 20 bits. Depth
    /// keeps the top 30 bits of its IEEE encoding; zero, negative and NaN
    /// depths all sort to the front.
    #[must_use]
    pub fn new(layer: u16, material: u32, depth: f32) -> Self {
        // positive floats order like their bit patterns
        let depth_bits = if depth > 0.0 {
            depth.to_bits() >> (u32::BITS - DEPTH_BITS)
        } else {
            0
        };
        Self(
            Self::pack(u64::from(layer), LAYER_BITS, LAYER_SHIFT)
                | Self::pack(u64::from(material), MATERIAL_BITS, MATERIAL_SHIFT)
                | Self::pack(u64::from(depth_bits), DEPTH_BITS, DEPTH_SHIFT),
        )
    }

    #[inline]
    const fn pack(value: u64, bits: u32, shift: u32) -> u64 {
        (value & ((1 << bits) - 1)) << shift
    }

    /// The key `n` positions after this one, used for multi-batch objects.
    #[must_use]
    pub fn offset(self, n: u32) -> Self {
        Self(self.0.wrapping_add(u64::from(n)))
    }
}

impl From<u32> for SortKey {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl From<u64> for SortKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
