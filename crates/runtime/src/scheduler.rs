use crate::animation::{group_rotation, text_bob_offset};
use crate::app::AppContext;
use crate::clock::Clock;
use bubbletext_render::{RenderView, Renderer};
use glam::Quat;
use std::time::Duration;

/// Result of one [`FrameScheduler::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome<T> {
    Rendered(T),
    Cancelled,
}

impl<T> TickOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TickOutcome::Cancelled)
    }
}

/// Drives the per-frame update: animate, step the camera, render once.
#[derive(Debug)]
pub struct FrameScheduler<C: Clock> {
    clock: C,
    last: Option<f64>,
}

impl<C: Clock> FrameScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    /// Run one frame unless the context has been cancelled.
    pub fn tick<R: Renderer>(
        &mut self,
        ctx: &mut AppContext,
        renderer: &mut R,
    ) -> TickOutcome<R::Output> {
        if ctx.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        let t = self.clock.elapsed_secs();

        if let Some(mesh) = ctx.text_mesh() {
            if let Some(transform) = ctx.scene.transform_mut(mesh.node) {
                transform.position.y = text_bob_offset(t);
            }
        }
        let bodies = ctx.bodies_node();
        if let Some(transform) = ctx.scene.transform_mut(bodies) {
            transform.rotation = Quat::from_rotation_y(group_rotation(t));
        }
        ctx.camera.update();

        let view = RenderView::from_camera(&ctx.camera);
        let output = renderer.render(&ctx.scene, &ctx.materials, &view);

        let dt = (t - self.last.unwrap_or(t)).max(0.0);
        self.last = Some(t);
        ctx.timer.record(Duration::from_secs_f64(dt));
        for event in ctx.scene.drain_events() {
            tracing::trace!(?event, "scene event");
        }
        ctx.finish_frame();
        tracing::trace!(frame = ctx.frame_count(), t, "frame rendered");

        TickOutcome::Rendered(output)
    }

    /// Tick until cancelled or `max_frames` frames were rendered. Returns
    /// the number rendered.
    pub fn run<R: Renderer>(
        &mut self,
        ctx: &mut AppContext,
        renderer: &mut R,
        max_frames: u64,
    ) -> u64 {
        let mut rendered = 0;
        while rendered < max_frames {
            if self.tick(ctx, renderer).is_cancelled() {
                break;
            }
            rendered += 1;
        }
        tracing::debug!(rendered, max_frames, "scheduler run finished");
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedStepClock, ManualClock};
    use crate::config::SceneConfig;
    use bubbletext_render::DebugTextRenderer;
    use std::f64::consts::FRAC_PI_2;

    fn context() -> AppContext {
        AppContext::new(SceneConfig {
            font: None,
            ..SceneConfig::default()
        })
    }

    #[test]
    fn tick_animates_text_and_bodies() {
        let mut ctx = context();
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(clock.clone());
        let mut renderer = DebugTextRenderer::new();

        clock.set(FRAC_PI_2);
        let out = scheduler.tick(&mut ctx, &mut renderer);
        assert!(matches!(out, TickOutcome::Rendered(ref s) if s.contains("frame=1")));

        let text = ctx.scene.get(ctx.text_mesh().unwrap().node).unwrap();
        assert!((text.transform.position.y - 0.5).abs() < 1e-6);

        clock.set(10.0);
        scheduler.tick(&mut ctx, &mut renderer);
        let bodies = ctx.scene.get(ctx.bodies_node()).unwrap();
        let (ry, _, _) = bodies.transform.rotation.to_euler(glam::EulerRot::YXZ);
        assert!((ry - 0.4).abs() < 1e-5);
        assert_eq!(ctx.frame_count(), 2);
    }

    #[test]
    fn fixed_step_run_renders_requested_frames() {
        let mut ctx = context();
        let mut scheduler = FrameScheduler::new(FixedStepClock::at_fps(60.0));
        let mut renderer = DebugTextRenderer::new();
        assert_eq!(scheduler.run(&mut ctx, &mut renderer, 30), 30);
        assert_eq!(renderer.frames(), 30);
        assert_eq!(ctx.frame_count(), 30);
        let avg = ctx.timer.average().as_secs_f64();
        // The first frame has no predecessor and records zero.
        assert!((avg - (29.0 / 30.0) / 60.0).abs() < 1e-6);
    }

    #[test]
    fn cancelled_context_renders_nothing() {
        let mut ctx = context();
        ctx.cancellation().cancel();
        let mut scheduler = FrameScheduler::new(FixedStepClock::at_fps(60.0));
        let mut renderer = DebugTextRenderer::new();
        assert!(scheduler.tick(&mut ctx, &mut renderer).is_cancelled());
        assert_eq!(scheduler.run(&mut ctx, &mut renderer, 10), 0);
        assert_eq!(renderer.frames(), 0);
    }

    #[test]
    fn teardown_mid_run_stops_rendering() {
        let mut ctx = context();
        let mut scheduler = FrameScheduler::new(FixedStepClock::at_fps(60.0));
        let mut renderer = DebugTextRenderer::new();
        scheduler.run(&mut ctx, &mut renderer, 5);
        ctx.teardown();
        assert_eq!(scheduler.run(&mut ctx, &mut renderer, 5), 0);
        assert_eq!(renderer.frames(), 5);
    }

    #[test]
    fn camera_damping_steps_once_per_frame() {
        let mut ctx = context();
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(clock);
        let mut renderer = DebugTextRenderer::new();
        let theta = ctx.camera.theta;
        ctx.pointer_drag(72.0, 0.0);
        scheduler.tick(&mut ctx, &mut renderer);
        let expected = -std::f32::consts::TAU * 72.0 / 720.0 * 0.05;
        assert!((ctx.camera.theta - theta - expected).abs() < 1e-6);
    }

    #[test]
    fn text_without_font_is_not_animated() {
        let mut ctx = AppContext::new(SceneConfig::default());
        let mut scheduler = FrameScheduler::new(FixedStepClock::at_fps(60.0));
        let mut renderer = DebugTextRenderer::new();
        scheduler.run(&mut ctx, &mut renderer, 3);
        assert!(ctx.text_mesh().is_none());
        assert_eq!(ctx.frame_count(), 3);
    }
}
