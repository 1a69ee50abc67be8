//! saorsa-core: a retained-mode text-user-interface framework that drives
//! an ANSI/VT terminal.
//!
//! Applications describe their UI declaratively as an immutable
//! [`widget`] tree every frame. The framework reconciles that
//! description against a persistent [`node`] tree, runs a two-pass
//! constraint [`layout`], renders into a [`surface`] cell grid, diffs
//! against the previous frame, emits minimal ANSI escape sequences
//! through [`ansi`], and routes keyboard/mouse [`input`] through a
//! [`focus`] ring and a binding-resolution pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Application: a builder closure producing a Widget tree    │
//! └────────────────────────────────────────────────────────────┘
//!                             │ reconcile (widget.rs, reconcile.rs)
//!                             ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Node tree (node.rs, nodes/): persistent, arena-backed      │
//! └────────────────────────────────────────────────────────────┘
//!                 │ measure/arrange (layout.rs)
//!                 ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  render.rs → Surface (surface.rs) / CompositeSurface        │
//! │  (compositor.rs)                                            │
//! └────────────────────────────────────────────────────────────┘
//!                 │ diff (diff.rs) → emit (ansi/emitter.rs)
//!                 ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  pipeline/: workload + presentation adapters, filters,      │
//! │  snapshots, recording                                       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input flows the other way: TTY bytes → [`ansi::Tokenizer`] →
//! [`input::InputEvent`] → [`input::router::route`], which consults the
//! [`focus::FocusRing`] and each node's [`input::binding::BindingSet`]
//! before falling back to framework defaults (Tab cycling, Ctrl+C).
//!
//! [`app::App`] drives the whole cycle once per frame; see its docs for
//! the exact per-iteration sequence.

pub mod ansi;
pub mod app;
pub mod cell;
pub mod color;
pub mod compositor;
pub mod diff;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod node;
pub mod nodes;
pub mod pipeline;
pub mod reconcile;
pub mod render;
pub mod surface;
pub mod theme;
pub mod widget;
pub mod width;

pub use app::{App, AppOptions};
pub use cell::Cell;
pub use color::{Attrs, Color};
pub use error::{Error, Result};
pub use geometry::{Constraints, Rect, Size};
pub use node::{Key, Node, NodeId, Tree};
pub use surface::Surface;
pub use theme::Theme;
pub use widget::Widget;
