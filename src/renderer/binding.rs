//! Shader data binding
//!
//! Defines the [`ShaderData`] trait and the binding blocks used by the queue itself.

use smallvec::SmallVec;

use crate::renderer::defs::{SamplerStateId, TextureId};
use crate::renderer::state::StateHelper;

/// Texture slot the blit shader samples its source from.
pub const BLIT_SOURCE_SLOT: u32 = 0;

/// An object that binds a set of constants, textures and samplers.
///
/// Shader data is borrowed by the queue for a whole recording cycle and
/// applied once per command, after the command's render state.
pub trait ShaderData {
    fn apply(&self, helper: &mut dyn StateHelper);
}

/// Binds nothing. Handy as the command-local data of commands that carry
/// everything in their payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShaderData;

impl ShaderData for NoShaderData {
    fn apply(&self, _helper: &mut dyn StateHelper) {}
}

/// Source texture and sampler of a fullscreen blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitShaderData {
    pub source: TextureId,
    pub sampler: SamplerStateId,
}

impl BlitShaderData {
    #[must_use]
    pub fn new(source: TextureId, sampler: SamplerStateId) -> Self {
        Self { source, sampler }
    }
}

impl ShaderData for BlitShaderData {
    fn apply(&self, helper: &mut dyn StateHelper) {
        let device = helper.device();
        device.set_texture(BLIT_SOURCE_SLOT, self.source);
        device.set_sampler_state(BLIT_SOURCE_SLOT, self.sampler);
    }
}

/// A texture/sampler table, one pair per slot.
#[derive(Debug, Clone, Default)]
pub struct TextureBindings {
    // (slot, texture, sampler); most materials bind four or fewer maps
    entries: SmallVec<[(u32, TextureId, SamplerStateId); 4]>,
}

impl TextureBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `texture` and `sampler` at `slot`, replacing an earlier entry for the same slot.
    #[must_use]
    pub fn with(mut self, slot: u32, texture: TextureId, sampler: SamplerStateId) -> Self {
        self.set(slot, texture, sampler);
        self
    }

    pub fn set(&mut self, slot: u32, texture: TextureId, sampler: SamplerStateId) {
        if let Some(entry) = self.entries.iter_mut().find(|(s, _, _)| *s == slot) {
            *entry = (slot, texture, sampler);
        } else {
            self.entries.push((slot, texture, sampler));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ShaderData for TextureBindings {
    fn apply(&self, helper: &mut dyn StateHelper) {
        let device = helper.device();
        for &(slot, texture, sampler) in &self.entries {
            device.set_texture(slot, texture);
            device.set_sampler_state(slot, sampler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_bindings_replace_slot() {
        let bindings = TextureBindings::new()
            .with(0, TextureId(1), SamplerStateId(1))
            .with(1, TextureId(2), SamplerStateId(1))
            .with(0, TextureId(3), SamplerStateId(2));

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.entries[0], (0, TextureId(3), SamplerStateId(2)));
    }
}
