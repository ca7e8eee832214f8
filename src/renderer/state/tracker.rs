//! State-tracking helper
//!
//! Avoids redundant state change calls when consecutive commands share
//! shader or fixed-function state.

use crate::renderer::defs::{BlendStateId, DepthStateId, RasterizerStateId, ShaderId};
use crate::renderer::device::GraphicsDevice;
use crate::renderer::state::{RenderState, StateHelper};

/// Counts of state changes forwarded to and elided from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateStats {
    pub applied: u64,
    pub skipped: u64,
}

/// A [`StateHelper`] that remembers the last state it bound.
pub struct StateTracker<D: GraphicsDevice> {
    device: D,
    current_shader: Option<ShaderId>,
    current_blend: Option<BlendStateId>,
    current_depth: Option<DepthStateId>,
    current_rasterizer: Option<RasterizerStateId>,
    stats: StateStats,
}

impl<D: GraphicsDevice> StateTracker<D> {
    #[must_use]
    pub fn new(device: D) -> Self {
        Self {
            device,
            current_shader: None,
            current_blend: None,
            current_depth: None,
            current_rasterizer: None,
            stats: StateStats::default(),
        }
    }

    #[must_use]
    pub fn get_ref(&self) -> &D {
        &self.device
    }

    pub fn get_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[must_use]
    pub fn into_inner(self) -> D {
        self.device
    }

    #[must_use]
    pub fn stats(&self) -> StateStats {
        self.stats
    }

    // Returns true when `value` differs from the cached one and updates it.
    fn track<T: PartialEq + Copy>(current: &mut Option<T>, value: T, stats: &mut StateStats) -> bool {
        if *current == Some(value) {
            stats.skipped += 1;
            false
        } else {
            *current = Some(value);
            stats.applied += 1;
            true
        }
    }
}

impl<D: GraphicsDevice> StateHelper for StateTracker<D> {
    fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut self.device
    }

    fn apply(&mut self, state: &RenderState) {
        if Self::track(&mut self.current_shader, state.shader, &mut self.stats) {
            self.device.set_shader(state.shader);
        }
        if Self::track(&mut self.current_blend, state.blend, &mut self.stats) {
            self.device.set_blend_state(state.blend);
        }
        if Self::track(&mut self.current_depth, state.depth, &mut self.stats) {
            self.device.set_depth_state(state.depth);
        }
        if Self::track(&mut self.current_rasterizer, state.rasterizer, &mut self.stats) {
            self.device.set_rasterizer_state(state.rasterizer);
        }
    }

    fn invalidate(&mut self) {
        self.current_shader = None;
        self.current_blend = None;
        self.current_depth = None;
        self.current_rasterizer = None;
    }
}
