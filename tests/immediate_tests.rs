//! Immediate Operation Tests
//!
//! Tests for:
//! - RenderQueue::dispatch_compute call sequence
//! - RenderQueue::blit call sequence
//! - Queued ComputeDispatch / FullscreenBlit commands

mod common;

use common::{DeviceCall, MARKER_SLOT, MarkerData, RecordingHelper, init_logger};
use render_queue::{
    ComputeDispatch, DispatchGroup, DrawCallState, FullscreenBlit, IndexBufferId, NoShaderData,
    Primitive, RenderQueue, RenderState, ResetFlags, SamplerStateId, ShaderData, ShaderId,
    StateTracker, TextureId, VertexBufferId,
};

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn immediate_dispatch_compute_sequence() {
    init_logger();
    let first = MarkerData(5);
    let second = MarkerData(6);
    let mut helper = RecordingHelper::new();

    RenderQueue::dispatch_compute(
        &mut helper,
        DispatchGroup::new(8, 4, 1),
        ShaderId(12),
        &[&first, &second],
    );

    assert_eq!(
        helper.device.calls,
        vec![
            DeviceCall::Reset(ResetFlags::RESOURCES),
            DeviceCall::SetShader(ShaderId(12)),
            DeviceCall::SetTexture(MARKER_SLOT, TextureId(5)),
            DeviceCall::SetTexture(MARKER_SLOT, TextureId(6)),
            DeviceCall::Apply,
            DeviceCall::DispatchCompute(8, 4, 1),
        ]
    );
}

#[test]
fn immediate_dispatch_without_shader_data() {
    init_logger();
    let mut helper = RecordingHelper::new();
    RenderQueue::dispatch_compute(&mut helper, DispatchGroup::new(1, 1, 1), ShaderId(2), &[]);
    assert_eq!(helper.device.calls.len(), 4);
    assert!(
        !helper
            .device
            .calls
            .contains(&DeviceCall::Reset(ResetFlags::ALL))
    );
}

// ============================================================================
// Blit
// ============================================================================

#[test]
fn immediate_blit_sequence() {
    init_logger();
    let extra = MarkerData(40);
    let mut helper = RecordingHelper::new();

    RenderQueue::blit(
        &mut helper,
        ShaderId(3),
        &[&extra as &dyn ShaderData],
        TextureId(10),
        SamplerStateId(2),
        TextureId(11),
    );

    assert_eq!(
        helper.device.calls,
        vec![
            DeviceCall::ChangeRenderTargets {
                targets: vec![TextureId(11)],
                depth: TextureId::NONE,
                faces: None,
            },
            DeviceCall::SetVertexBuffer(0, VertexBufferId::NONE),
            DeviceCall::SetIndexBuffer(IndexBufferId::NONE),
            DeviceCall::SetShader(ShaderId(3)),
            DeviceCall::SetTexture(0, TextureId(10)),
            DeviceCall::SetSamplerState(0, SamplerStateId(2)),
            DeviceCall::SetTexture(MARKER_SLOT, TextureId(40)),
            DeviceCall::Apply,
            DeviceCall::DrawArrays(Primitive::TriangleStrip, 0, 4),
        ]
    );
}

#[test]
fn immediate_blit_to_framebuffer() {
    init_logger();
    let mut helper = RecordingHelper::new();
    RenderQueue::blit(
        &mut helper,
        ShaderId(3),
        &[],
        TextureId(10),
        SamplerStateId(2),
        TextureId::FRAMEBUFFER,
    );
    assert_eq!(
        helper.device.calls[0],
        DeviceCall::ChangeRenderTargets {
            targets: vec![TextureId::FRAMEBUFFER],
            depth: TextureId::NONE,
            faces: None,
        }
    );
}

#[test]
fn immediate_blit_invalidates_tracked_shader() {
    init_logger();
    let mut tracker = StateTracker::new(common::RecordingDevice::new());
    let state = RenderState::with_shader(ShaderId(3));
    render_queue::StateHelper::apply(&mut tracker, &state);

    RenderQueue::blit(
        &mut tracker,
        ShaderId(9),
        &[],
        TextureId(10),
        SamplerStateId(2),
        TextureId(11),
    );
    tracker.get_mut().take();

    // the blit bound shader 9 behind the tracker's back, so shader 3 must be re-issued
    render_queue::StateHelper::apply(&mut tracker, &state);
    assert!(
        tracker
            .get_ref()
            .calls
            .contains(&DeviceCall::SetShader(ShaderId(3)))
    );
}

// ============================================================================
// Queued variants
// ============================================================================

#[test]
fn immediate_queued_dispatch_and_blit() {
    init_logger();
    static NO_DATA: NoShaderData = NoShaderData;
    let mut queue = RenderQueue::from_targets(&[TextureId(1)], None, None).unwrap();
    queue
        .record(
            1u32,
            DrawCallState::new(RenderState::with_shader(ShaderId(4)), &NO_DATA),
            FullscreenBlit::new(TextureId(8), SamplerStateId(1)),
        )
        .unwrap();
    queue
        .record(
            0u32,
            DrawCallState::new(RenderState::with_shader(ShaderId(5)), &NO_DATA),
            ComputeDispatch::new(16, 16, 1),
        )
        .unwrap();
    queue.sort();

    let mut helper = RecordingHelper::new();
    assert_eq!(queue.submit_all(&mut helper), 2);
    let calls = &helper.device.calls;

    let dispatch = calls
        .iter()
        .position(|call| *call == DeviceCall::DispatchCompute(16, 16, 1))
        .unwrap();
    let draw = calls
        .iter()
        .position(|call| *call == DeviceCall::DrawArrays(Primitive::TriangleStrip, 0, 4))
        .unwrap();
    assert!(dispatch < draw);
    assert_eq!(calls[draw - 1], DeviceCall::Apply);
    assert_eq!(calls[draw - 2], DeviceCall::SetSamplerState(0, SamplerStateId(1)));
    assert_eq!(calls[draw - 3], DeviceCall::SetTexture(0, TextureId(8)));
}
