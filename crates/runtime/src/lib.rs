//! Runtime: the owned application context and the per-frame loop.
//!
//! # Invariants
//! - All scene, material and text state lives in one [`AppContext`] and is
//!   only mutated on the thread that owns it.
//! - Each [`FrameScheduler::tick`] reads the clock once and renders once.
//! - Once the context's [`CancellationToken`] is cancelled no further frame
//!   is rendered.

mod animation;
mod app;
mod cancel;
mod clock;
mod config;
mod scheduler;
mod timer;

pub use animation::{GROUP_SPIN_RATE, TEXT_BOB_AMPLITUDE, group_rotation, text_bob_offset};
pub use app::{AppContext, BODIES_NODE_NAME, FrameStats};
pub use cancel::CancellationToken;
pub use clock::{Clock, FixedStepClock, ManualClock, MonotonicClock};
pub use config::{ConfigError, SceneConfig, SphereConfig, WindowConfig};
pub use scheduler::{FrameScheduler, TickOutcome};
pub use timer::FrameTimer;
