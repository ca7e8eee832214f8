//! Command Encoding
//!
//! Commands are packed back to back into one fixed-size byte arena. Every
//! record has the same header followed by a payload whose size depends on
//! the command type:
//!
//! ```text
//! offset  field        size
//! +0      next         4    offset of the following record
//! +4      routine      4    index into the queue's routine table
//! +8      draw state   20   RenderState + shader data index
//! +28     payload      n    command-specific bytes
//! ```
//!
//! The payload length is implied by `next`. A sentinel record with an empty
//! payload sits at offset 0; its `next` points at itself until the first
//! command is allocated. Each field is read and written through its own
//! byte range, so touching one field never disturbs its neighbours.

use std::mem::size_of;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::errors::{QueueError, Result};
use crate::renderer::state::RenderState;

/// Offset of the sentinel record.
pub const SENTINEL: u32 = 0;

/// Routine index stored in records that must never execute.
pub const NO_ROUTINE: u32 = u32::MAX;

pub const OFFSET_NEXT: usize = 0;
pub const OFFSET_ROUTINE: usize = OFFSET_NEXT + size_of::<u32>();
pub const OFFSET_DRAW_STATE: usize = OFFSET_ROUTINE + size_of::<u32>();
pub const HEADER_SIZE: usize = OFFSET_DRAW_STATE + size_of::<DrawStateRecord>();

/// Encoded draw-call state: the render state plus the index of the
/// command-local shader data in the queue's per-cycle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DrawStateRecord {
    pub render_state: RenderState,
    pub shader_data: u32,
}

/// Fixed-capacity arena holding one recording cycle of commands.
#[derive(Debug, Clone)]
pub struct CommandArena {
    bytes: Vec<u8>,
    tail: u32,
}

impl CommandArena {
    /// Allocates a zeroed arena of `capacity` bytes and writes the sentinel.
    ///
    /// `capacity` must be at least [`HEADER_SIZE`] and fit in `u32`;
    /// `QueueSettings::validate` checks both.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= HEADER_SIZE);
        let mut arena = Self {
            bytes: vec![0; capacity],
            tail: SENTINEL,
        };
        arena.rewind();
        arena
    }

    #[inline]
    fn field<T: Pod>(&self, command: u32, offset: usize) -> T {
        let at = command as usize + offset;
        bytemuck::pod_read_unaligned(&self.bytes[at..at + size_of::<T>()])
    }

    #[inline]
    fn store_field<T: Pod>(&mut self, command: u32, offset: usize, value: &T) {
        let at = command as usize + offset;
        self.bytes[at..at + size_of::<T>()].copy_from_slice(bytemuck::bytes_of(value));
    }

    #[inline]
    #[must_use]
    pub fn next(&self, command: u32) -> u32 {
        self.field(command, OFFSET_NEXT)
    }

    #[inline]
    #[must_use]
    pub fn routine(&self, command: u32) -> u32 {
        self.field(command, OFFSET_ROUTINE)
    }

    #[inline]
    #[must_use]
    pub fn draw_state(&self, command: u32) -> DrawStateRecord {
        self.field(command, OFFSET_DRAW_STATE)
    }

    pub fn store_next(&mut self, command: u32, next: u32) {
        self.store_field(command, OFFSET_NEXT, &next);
    }

    pub fn store_routine(&mut self, command: u32, routine: u32) {
        self.store_field(command, OFFSET_ROUTINE, &routine);
    }

    pub fn store_draw_state(&mut self, command: u32, draw_state: &DrawStateRecord) {
        self.store_field(command, OFFSET_DRAW_STATE, draw_state);
    }

    /// Byte range of the payload of the record at `command`.
    #[must_use]
    pub fn payload_range(&self, command: u32) -> Range<usize> {
        let start = command as usize + HEADER_SIZE;
        let next = self.next(command);
        if next == command {
            start..start
        } else {
            start..next as usize
        }
    }

    #[must_use]
    pub fn payload(&self, command: u32) -> &[u8] {
        let range = self.payload_range(command);
        &self.bytes[range]
    }

    pub fn payload_mut(&mut self, command: u32) -> &mut [u8] {
        let range = self.payload_range(command);
        &mut self.bytes[range]
    }

    /// Offset the next record will be written at.
    #[must_use]
    pub fn next_free(&self) -> usize {
        let next = self.next(self.tail);
        if next == self.tail {
            self.tail as usize + HEADER_SIZE
        } else {
            next as usize
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.next_free())
    }

    /// Appends a record with a zeroed `payload_len` byte payload and returns its offset.
    ///
    /// Nothing is written when the record does not fit.
    pub fn allocate(
        &mut self,
        payload_len: usize,
        routine: u32,
        draw_state: &DrawStateRecord,
    ) -> Result<u32> {
        if u32::try_from(payload_len).is_err() {
            return Err(QueueError::PayloadTooLarge { size: payload_len });
        }

        let location = self.next_free();
        let requested = HEADER_SIZE + payload_len;
        let end = location + requested;
        if end > self.capacity() {
            return Err(QueueError::ArenaExhausted {
                requested,
                remaining: self.remaining(),
            });
        }

        let command = location as u32;
        if self.next(self.tail) == self.tail {
            self.store_next(self.tail, command);
        }
        self.store_routine(command, routine);
        self.store_draw_state(command, draw_state);
        self.store_next(command, end as u32);
        self.bytes[location + HEADER_SIZE..end].fill(0);
        self.tail = command;
        Ok(command)
    }

    /// Moves the write cursor back to just after the sentinel.
    ///
    /// Bytes of the previous cycle stay in place until a new record covers them.
    pub fn rewind(&mut self) {
        self.tail = SENTINEL;
        self.store_next(SENTINEL, SENTINEL);
        self.store_routine(SENTINEL, NO_ROUTINE);
        self.store_draw_state(SENTINEL, &DrawStateRecord::zeroed());
    }

    /// The used prefix of the arena: sentinel plus every allocated record.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.next_free()]
    }

    /// Walks the `next` chain from the sentinel, in allocation order.
    #[must_use]
    pub fn chain(&self) -> Chain<'_> {
        let first = self.next(SENTINEL);
        Chain {
            arena: self,
            at: first,
            done: first == SENTINEL,
        }
    }
}

/// Iterator over record offsets in allocation order.
pub struct Chain<'a> {
    arena: &'a CommandArena,
    at: u32,
    done: bool,
}

impl Iterator for Chain<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.done {
            return None;
        }
        let current = self.at;
        if current == self.arena.tail {
            self.done = true;
        } else {
            self.at = self.arena.next(current);
        }
        Some(current)
    }
}
