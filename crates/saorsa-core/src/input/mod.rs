//! The input pipeline: typed events, chordable bindings and the router
//! that resolves an event against the focus ring and binding sets
//! (§2 component "Input pipeline", §4.5-§4.7).

pub mod binding;
pub mod event;
pub mod router;

pub use binding::{BindingSet, ChordOutcome, ChordState};
pub use event::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent, ResizeEvent};
pub use router::{route, RouteOutcome, RouterState};
