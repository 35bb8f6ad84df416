//! Scene graph: the single owner of everything that gets drawn.
//!
//! Nodes are kept in a `BTreeMap` so iteration order (and therefore draw
//! order) is stable. Geometry lives in a pool keyed by [`GeometryHandle`];
//! whoever inserts geometry is responsible for releasing it.
//!
//! # Invariants
//! - Structural mutations (attach, detach, geometry insert/release,
//!   environment install) are recorded in the event log.
//! - Per-frame transform animation is not logged.
//! - A released geometry handle is never reused.

pub mod decor;
pub mod graph;
pub mod primitives;

pub use decor::{BodyGroup, DecorativeBody, ScatterParams};
pub use graph::{GeometryHandle, Node, NodeKind, SceneEvent, SceneGraph};
