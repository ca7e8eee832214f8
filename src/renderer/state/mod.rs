//! State Application Layer
//!
//! Provides:
//! - StateHelper: the seam through which the queue reaches the device
//! - RenderState / RenderStateDesc: declarative pipeline state and its resolved ids
//! - RenderStateCache: descriptor to device state resolution
//! - StateTracker: a StateHelper that skips redundant state changes

pub mod render_state;
pub mod tracker;

pub use render_state::{
    BlendDesc, DepthDesc, RasterDesc, RenderState, RenderStateCache, RenderStateDesc, StencilDesc,
};
pub use tracker::{StateStats, StateTracker};

use crate::renderer::defs::ResetFlags;
use crate::renderer::device::GraphicsDevice;

/// Turns render states into device binds for one device.
///
/// Submission resets through [`reset`](Self::reset) and calls
/// [`invalidate`](Self::invalidate) before issuing binds that bypass
/// [`apply`](Self::apply), so an implementation that caches device state
/// never skips a bind the device actually needs.
pub trait StateHelper {
    fn device(&mut self) -> &mut dyn GraphicsDevice;

    /// Applies shader, blend, depth and rasterizer state.
    fn apply(&mut self, state: &RenderState);

    /// Forgets any cached knowledge of the device state.
    fn invalidate(&mut self) {}

    fn reset(&mut self, flags: ResetFlags) {
        self.invalidate();
        self.device().reset(flags);
    }
}
