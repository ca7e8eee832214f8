//! Render Queue
//!
//! A per-pass command buffer. Scene code records commands in any order
//! during the frame, [`RenderQueue::sort`] orders them by key, and
//! [`RenderQueue::submit_all`] flushes them to the device in one pass:
//!
//! ```text
//! reset → bind targets → clear → per command {
//!     render state → command shader data → queue shader data → commit → routine
//! } → unbind targets → rewind
//! ```
//!
//! The queue owns its arena and target handles. Shader data is borrowed for
//! `'a`; the device and the state layer are borrowed per call.

pub mod commands;
pub mod encoding;
mod immediate;
pub mod key;

use std::any::TypeId;

use glam::Vec4;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{QueueError, Result};
use crate::renderer::binding::ShaderData;
use crate::renderer::defs::{MAX_MRTS, MAX_SHADER_DATA_PER_QUEUE, ResetFlags, TextureFormat, TextureId};
use crate::renderer::device::GraphicsDevice;
use crate::renderer::settings::{ClearSettings, QueueSettings};
use crate::renderer::state::{RenderState, StateHelper};

use self::commands::{BatchDraw, DrawCallState, DrawRoutine, RenderCommand, execute_erased};
use self::encoding::{CommandArena, DrawStateRecord};
use self::key::SortKey;

/// Reference to a recorded command, valid until the queue is submitted or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle {
    offset: u32,
    cycle: u32,
}

impl CommandHandle {
    /// Byte offset of the command record in the arena.
    #[must_use]
    pub fn offset(self) -> u32 {
        self.offset
    }
}

/// Where a queue is in its recording cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Empty,
    Recording,
    Sorted,
}

/// How a queue obtains its render targets.
#[derive(Debug, Clone, Copy)]
pub enum TargetSetup<'t> {
    /// Allocate `count` color targets (and optionally a depth target) on the device.
    Allocate {
        width: u32,
        height: u32,
        count: usize,
        color_format: TextureFormat,
        depth_format: Option<TextureFormat>,
    },
    /// Render into targets owned by someone else.
    Existing {
        targets: &'t [TextureId],
        depth: Option<TextureId>,
        face: Option<u32>,
    },
}

pub struct RenderQueue<'a> {
    settings: QueueSettings,
    arena: CommandArena,

    // parallel arrays: commands[i] is recorded with keys[i]
    commands: Vec<u32>,
    keys: Vec<SortKey>,
    sort_scratch: Vec<(SortKey, u32)>,

    // per-cycle tables referenced from command headers
    routines: Vec<DrawRoutine>,
    routine_slots: FxHashMap<TypeId, u32>,
    command_shader_data: Vec<&'a dyn ShaderData>,

    shader_data: SmallVec<[&'a dyn ShaderData; MAX_SHADER_DATA_PER_QUEUE]>,
    render_targets: SmallVec<[TextureId; MAX_MRTS]>,
    depth_target: TextureId,
    face: Option<u32>,
    clear: ClearSettings,

    cycle: u32,
    sorted: bool,
}

impl<'a> RenderQueue<'a> {
    /// Creates a queue with freshly allocated targets and default settings.
    pub fn allocate(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        count: usize,
        color_format: TextureFormat,
        depth_format: Option<TextureFormat>,
    ) -> Result<Self> {
        Self::with_settings(
            device,
            QueueSettings::default(),
            &TargetSetup::Allocate {
                width,
                height,
                count,
                color_format,
                depth_format,
            },
        )
    }

    /// Creates a queue that renders into existing targets, with default settings.
    ///
    /// `face` selects a cubemap/array slice and requires exactly one target.
    pub fn from_targets(
        targets: &[TextureId],
        depth: Option<TextureId>,
        face: Option<u32>,
    ) -> Result<Self> {
        let (render_targets, depth_target) = Self::existing_targets(targets, depth, face)?;
        Ok(Self::build(QueueSettings::default(), render_targets, depth_target, face))
    }

    pub fn with_settings(
        device: &mut dyn GraphicsDevice,
        settings: QueueSettings,
        setup: &TargetSetup<'_>,
    ) -> Result<Self> {
        settings.validate()?;

        match *setup {
            TargetSetup::Allocate {
                width,
                height,
                count,
                color_format,
                depth_format,
            } => {
                if count > MAX_MRTS {
                    return Err(QueueError::RenderTargetLimit {
                        requested: count,
                        max: MAX_MRTS,
                    });
                }
                if let Some(format) = depth_format.filter(|format| !format.is_depth()) {
                    return Err(QueueError::InvalidDepthFormat { format });
                }
                let render_targets = (0..count)
                    .map(|_| device.add_render_target(width, height, color_format))
                    .collect();
                let depth_target = depth_format.map_or(TextureId::NONE, |format| {
                    device.add_render_depth(width, height, 1, format)
                });
                Ok(Self::build(settings, render_targets, depth_target, None))
            }
            TargetSetup::Existing {
                targets,
                depth,
                face,
            } => {
                let (render_targets, depth_target) = Self::existing_targets(targets, depth, face)?;
                Ok(Self::build(settings, render_targets, depth_target, face))
            }
        }
    }

    fn existing_targets(
        targets: &[TextureId],
        depth: Option<TextureId>,
        face: Option<u32>,
    ) -> Result<(SmallVec<[TextureId; MAX_MRTS]>, TextureId)> {
        if targets.len() > MAX_MRTS {
            return Err(QueueError::RenderTargetLimit {
                requested: targets.len(),
                max: MAX_MRTS,
            });
        }
        if face.is_some() && targets.len() != 1 {
            return Err(QueueError::FaceRequiresSingleTarget {
                targets: targets.len(),
            });
        }
        Ok((SmallVec::from_slice(targets), depth.unwrap_or(TextureId::NONE)))
    }

    fn build(
        settings: QueueSettings,
        render_targets: SmallVec<[TextureId; MAX_MRTS]>,
        depth_target: TextureId,
        face: Option<u32>,
    ) -> Self {
        log::debug!(
            "RenderQueue: {} render target(s), depth {:?}, arena {} bytes, max {} commands",
            render_targets.len(),
            depth_target,
            settings.arena_capacity,
            settings.max_commands
        );

        Self {
            arena: CommandArena::new(settings.arena_capacity),
            commands: Vec::with_capacity(settings.max_commands),
            keys: Vec::with_capacity(settings.max_commands),
            sort_scratch: Vec::with_capacity(settings.max_commands),
            routines: Vec::new(),
            routine_slots: FxHashMap::default(),
            command_shader_data: Vec::with_capacity(settings.max_commands),
            shader_data: SmallVec::new(),
            render_targets,
            depth_target,
            face,
            clear: ClearSettings::default(),
            cycle: 0,
            sorted: false,
            settings,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_clear(&mut self, clear_color: bool, clear_depth: bool, color: Vec4, depth: f32) {
        self.clear = ClearSettings {
            color: clear_color,
            depth: clear_depth,
            color_value: color,
            depth_value: depth,
        };
    }

    #[must_use]
    pub fn clear_settings(&self) -> &ClearSettings {
        &self.clear
    }

    /// Registers shader data applied to every command of the pass, after the
    /// command's own data, in registration order.
    pub fn add_shader_data(&mut self, shader_data: &'a dyn ShaderData) -> Result<()> {
        if self.shader_data.len() >= self.settings.max_shader_data {
            return Err(QueueError::ShaderDataLimit {
                max: self.settings.max_shader_data,
            });
        }
        self.shader_data.push(shader_data);
        Ok(())
    }

    pub fn clear_shader_data(&mut self) {
        self.shader_data.clear();
    }

    #[must_use]
    pub fn shader_data_count(&self) -> usize {
        self.shader_data.len()
    }

    /// Selects the cubemap/array face rendered to, or `None` for the whole target.
    pub fn set_render_target_face(&mut self, face: Option<u32>) -> Result<()> {
        if face.is_some() && self.render_targets.len() != 1 {
            return Err(QueueError::FaceRequiresSingleTarget {
                targets: self.render_targets.len(),
            });
        }
        self.face = face;
        Ok(())
    }

    #[must_use]
    pub fn face(&self) -> Option<u32> {
        self.face
    }

    #[must_use]
    pub fn render_target(&self, index: usize) -> Option<TextureId> {
        self.render_targets.get(index).copied()
    }

    #[must_use]
    pub fn render_targets(&self) -> &[TextureId] {
        &self.render_targets
    }

    #[must_use]
    pub fn depth_target(&self) -> Option<TextureId> {
        self.depth_target.is_some().then_some(self.depth_target)
    }

    #[must_use]
    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Records a command with a `payload_size` byte payload and returns its handle.
    ///
    /// The payload starts zeroed; fill it through [`payload_mut`](Self::payload_mut).
    /// The command sorts with the default key.
    pub fn add_draw_command(
        &mut self,
        payload_size: usize,
        routine: DrawRoutine,
        draw_state: DrawCallState<'a>,
    ) -> Result<CommandHandle> {
        let routine_index = self.routines.len() as u32;
        let handle = self.push_command(SortKey::default(), payload_size, routine_index, draw_state)?;
        self.routines.push(routine);
        Ok(handle)
    }

    /// Records `command` with `key`.
    pub fn record<C: RenderCommand>(
        &mut self,
        key: impl Into<SortKey>,
        draw_state: DrawCallState<'a>,
        command: C,
    ) -> Result<CommandHandle> {
        let type_id = TypeId::of::<C>();
        let (routine_index, new_routine) = match self.routine_slots.get(&type_id) {
            Some(&index) => (index, false),
            None => (self.routines.len() as u32, true),
        };

        let handle = self.push_command(
            key.into(),
            std::mem::size_of::<C>(),
            routine_index,
            draw_state,
        )?;
        if new_routine {
            self.routines.push(execute_erased::<C>);
            self.routine_slots.insert(type_id, routine_index);
        }
        self.arena
            .payload_mut(handle.offset)
            .copy_from_slice(bytemuck::bytes_of(&command));
        Ok(handle)
    }

    /// Records one [`BatchDraw`] per batch, keyed `base_key`, `base_key + 1`, ...
    ///
    /// Returns the number of commands recorded. On error, the batches before
    /// the failing one stay recorded.
    pub fn record_batches<I>(
        &mut self,
        base_key: impl Into<SortKey>,
        render_state: RenderState,
        batches: I,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = (BatchDraw, &'a dyn ShaderData)>,
    {
        let base_key = base_key.into();
        let mut recorded = 0;
        for (batch, shader_data) in batches {
            let key = base_key.offset(recorded as u32);
            self.record(key, DrawCallState::new(render_state, shader_data), batch)?;
            recorded += 1;
        }
        Ok(recorded)
    }

    // Appends the arena record, the key and the shader data entry, or nothing at all.
    fn push_command(
        &mut self,
        key: SortKey,
        payload_size: usize,
        routine: u32,
        draw_state: DrawCallState<'a>,
    ) -> Result<CommandHandle> {
        if self.commands.len() >= self.settings.max_commands {
            return Err(QueueError::CommandLimit {
                max: self.settings.max_commands,
            });
        }

        let record = DrawStateRecord {
            render_state: draw_state.render_state,
            shader_data: self.command_shader_data.len() as u32,
        };
        let offset = self.arena.allocate(payload_size, routine, &record)?;
        log::trace!("RenderQueue: command at {offset}, payload {payload_size} bytes, key {key:?}");

        self.command_shader_data.push(draw_state.shader_data);
        self.commands.push(offset);
        self.keys.push(key);
        self.sorted = false;
        Ok(CommandHandle {
            offset,
            cycle: self.cycle,
        })
    }

    fn check_handle(&self, handle: CommandHandle) -> Result<()> {
        // handles are only minted for live records, so the cycle alone decides
        if handle.cycle == self.cycle {
            Ok(())
        } else {
            Err(QueueError::StaleHandle)
        }
    }

    pub fn payload(&self, handle: CommandHandle) -> Result<&[u8]> {
        self.check_handle(handle)?;
        Ok(self.arena.payload(handle.offset))
    }

    pub fn payload_mut(&mut self, handle: CommandHandle) -> Result<&mut [u8]> {
        self.check_handle(handle)?;
        Ok(self.arena.payload_mut(handle.offset))
    }

    /// Decodes the payload of `handle` as `C`.
    pub fn read_command<C: RenderCommand>(&self, handle: CommandHandle) -> Result<C> {
        let payload = self.payload(handle)?;
        if payload.len() != std::mem::size_of::<C>() {
            return Err(QueueError::PayloadMismatch {
                recorded: payload.len(),
                expected: std::mem::size_of::<C>(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(payload))
    }

    /// Overwrites the payload of `handle` with `command`.
    pub fn write_command<C: RenderCommand>(
        &mut self,
        handle: CommandHandle,
        command: &C,
    ) -> Result<()> {
        let payload = self.payload_mut(handle)?;
        if payload.len() != std::mem::size_of::<C>() {
            return Err(QueueError::PayloadMismatch {
                recorded: payload.len(),
                expected: std::mem::size_of::<C>(),
            });
        }
        payload.copy_from_slice(bytemuck::bytes_of(command));
        Ok(())
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Orders commands by ascending key. Equal keys keep no particular order.
    pub fn sort(&mut self) {
        self.sort_scratch.clear();
        self.sort_scratch
            .extend(self.keys.iter().copied().zip(self.commands.iter().copied()));
        self.sort_scratch.sort_unstable_by_key(|&(key, _)| key);

        self.keys.clear();
        self.commands.clear();
        for &(key, command) in &self.sort_scratch {
            self.keys.push(key);
            self.commands.push(command);
        }
        self.sorted = true;
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Flushes every recorded command to the device and starts a new cycle.
    ///
    /// Returns the number of commands executed. Handles and payloads of this
    /// cycle are invalid afterwards.
    pub fn submit_all(&mut self, helper: &mut dyn StateHelper) -> usize {
        debug_assert_eq!(self.arena.chain().count(), self.commands.len());

        helper.reset(ResetFlags::ALL);

        let faces = match (self.face, self.render_targets.len()) {
            (Some(face), 1) => Some([face]),
            _ => None,
        };
        let device = helper.device();
        device.change_render_targets(
            &self.render_targets,
            self.depth_target,
            faces.as_ref().map(<[u32; 1]>::as_slice),
        );
        if self.clear.any() {
            device.clear(
                self.clear.color,
                self.clear.depth,
                self.clear.color_value,
                self.clear.depth_value,
            );
        }

        for &command in &self.commands {
            let draw_state = self.arena.draw_state(command);
            let routine = self.routines[self.arena.routine(command) as usize];

            helper.apply(&draw_state.render_state);
            self.command_shader_data[draw_state.shader_data as usize].apply(helper);
            for shader_data in &self.shader_data {
                shader_data.apply(helper);
            }
            helper.device().apply();
            routine(helper, self.arena.payload(command));
        }

        helper
            .device()
            .change_render_targets(&[], TextureId::NONE, None);

        let executed = self.commands.len();
        log::debug!("RenderQueue: submitted {executed} command(s)");
        self.reset();
        executed
    }

    /// Drops every recorded command without submitting and starts a new cycle.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.keys.clear();
        self.sort_scratch.clear();
        self.routines.clear();
        self.routine_slots.clear();
        self.command_shader_data.clear();
        self.arena.rewind();
        self.cycle = self.cycle.wrapping_add(1);
        self.sorted = false;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> QueueState {
        if self.commands.is_empty() {
            QueueState::Empty
        } else if self.sorted {
            QueueState::Sorted
        } else {
            QueueState::Recording
        }
    }

    /// Sort keys in current submission order.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Command handles in current submission order, paired with `keys()`.
    pub fn handles(&self) -> impl Iterator<Item = CommandHandle> + '_ {
        self.commands.iter().map(|&offset| CommandHandle {
            offset,
            cycle: self.cycle,
        })
    }

    /// The used prefix of the command arena.
    #[must_use]
    pub fn arena_bytes(&self) -> &[u8] {
        self.arena.as_bytes()
    }

    /// Bytes still available for command records.
    #[must_use]
    pub fn arena_remaining(&self) -> usize {
        self.arena.remaining()
    }
}
