//! Chordable key bindings and mouse bindings (§3 Data Model, §4.6).

use std::time::Duration;

use crate::input::event::{Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};

/// One step of a key chord: a key plus the exact modifier mask required.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChordStep {
    /// The key this step matches.
    pub key: Key,
    /// Modifiers on this chord step form an *equality mask*: a binding
    /// requiring no modifiers does not match e.g. Ctrl+key.
    pub modifiers: Modifiers,
}

impl ChordStep {
    /// A chord step with no modifiers required.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// A chord step requiring exactly the given modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.key && self.modifiers == event.modifiers
    }
}

/// A key binding: a non-empty chord sequence plus an action.
pub struct KeyBinding {
    /// The chord steps that must occur consecutively within the timeout.
    pub steps: Vec<ChordStep>,
    /// The action to run when the full chord matches.
    pub action: Box<dyn FnMut()>,
}

/// A mouse binding: matches on button/action/modifiers and a minimum click
/// count.
pub struct MouseBinding {
    /// Required button.
    pub button: MouseButton,
    /// Required action (Down/Up/Move).
    pub action: MouseAction,
    /// Required modifiers (equality mask).
    pub modifiers: Modifiers,
    /// Minimum click count; `1` matches any count.
    pub required_click_count: u8,
    /// The action to run on match, given the triggering event.
    pub handler: Box<dyn FnMut(MouseEvent)>,
}

impl MouseBinding {
    fn matches(&self, event: &MouseEvent) -> bool {
        self.button == event.button
            && self.action == event.action
            && self.modifiers == event.modifiers
            && event.click_count >= self.required_click_count.max(1)
    }
}

/// The bindings attached to a single node: key chords and mouse bindings.
#[derive(Default)]
pub struct BindingSet {
    keys: Vec<KeyBinding>,
    mice: Vec<MouseBinding>,
}

impl BindingSet {
    /// An empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered key bindings, used by the router to skip empty
    /// scopes without allocating a chord machine for them.
    pub fn key_binding_count(&self) -> usize {
        self.keys.len()
    }

    /// Register a key binding.
    pub fn bind_key(&mut self, steps: Vec<ChordStep>, action: impl FnMut() + 'static) {
        debug_assert!(!steps.is_empty(), "a key binding must have at least one step");
        self.keys.push(KeyBinding {
            steps,
            action: Box::new(action),
        });
    }

    /// Register a mouse binding.
    pub fn bind_mouse(
        &mut self,
        button: MouseButton,
        action: MouseAction,
        modifiers: Modifiers,
        required_click_count: u8,
        handler: impl FnMut(MouseEvent) + 'static,
    ) {
        self.mice.push(MouseBinding {
            button,
            action,
            modifiers,
            required_click_count,
            handler: Box::new(handler),
        });
    }

    /// Bindings whose first chord step matches `event`.
    fn matching_first_step(&mut self, event: &KeyEvent) -> Vec<usize> {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, b)| b.steps[0].matches(event))
            .map(|(i, _)| i)
            .collect()
    }

    /// Bindings whose step at `depth` matches `event`, among the given
    /// candidate indices.
    fn matching_step_at(&self, depth: usize, candidates: &[usize], event: &KeyEvent) -> Vec<usize> {
        candidates
            .iter()
            .copied()
            .filter(|&i| self.keys[i].steps.get(depth).is_some_and(|s| s.matches(event)))
            .collect()
    }

    fn run_mouse(&mut self, event: MouseEvent) -> bool {
        for binding in &mut self.mice {
            if binding.matches(&event) {
                (binding.handler)(event);
                return true;
            }
        }
        false
    }
}

/// Default timeout before a pending chord prefix is cleared (§4.6).
pub const DEFAULT_CHORD_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-router chord evaluation state (§4.6, §9 Design Notes): a tiny state
/// machine `{Idle, Pending(prefix, deadline)}` that avoids any timer
/// thread — the app loop's wait-for-event supplies the deadline.
pub struct ChordState {
    pending: Option<PendingChord>,
    timeout: Duration,
}

struct PendingChord {
    depth: usize,
    candidates: Vec<usize>,
    deadline: std::time::Instant,
}

/// The outcome of feeding a key event through a node's binding set.
#[derive(Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    /// No binding matched at all; the prefix (if any) was cleared.
    NoMatch,
    /// A multi-step chord is still pending; not yet handled.
    Pending,
    /// A binding's full chord matched and its action ran.
    Handled,
}

impl ChordState {
    /// Create chord state with the default 1-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_CHORD_TIMEOUT)
    }

    /// Create chord state with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            pending: None,
            timeout,
        }
    }

    /// True if a chord prefix is currently pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Clear any pending prefix (e.g. on an unrelated event or explicit
    /// cancellation).
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// If a pending chord's deadline has passed, clear it. Called from the
    /// app loop's event-wait deadline service.
    pub fn expire_if_elapsed(&mut self, now: std::time::Instant) {
        if let Some(p) = &self.pending {
            if now >= p.deadline {
                self.pending = None;
            }
        }
    }

    /// The deadline a caller should wait until, if a chord is pending.
    pub fn deadline(&self) -> Option<std::time::Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Evaluate `event` against `bindings`, advancing or resolving any
    /// pending chord.
    pub fn evaluate(&mut self, bindings: &mut BindingSet, event: &KeyEvent) -> ChordOutcome {
        let (depth, candidates) = if let Some(p) = self.pending.take() {
            (p.depth, bindings.matching_step_at(p.depth, &p.candidates, event))
        } else {
            (0, bindings.matching_first_step(event))
        };

        if candidates.is_empty() {
            self.pending = None;
            return ChordOutcome::NoMatch;
        }

        // A candidate whose total step count equals depth+1 is complete.
        if let Some(&complete) = candidates
            .iter()
            .find(|&&i| bindings.keys[i].steps.len() == depth + 1)
        {
            (bindings.keys[complete].action)();
            self.pending = None;
            return ChordOutcome::Handled;
        }

        self.pending = Some(PendingChord {
            depth: depth + 1,
            candidates,
            deadline: std::time::Instant::now() + self.timeout,
        });
        ChordOutcome::Pending
    }
}

impl Default for ChordState {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch a mouse event against a binding set.
pub fn dispatch_mouse(bindings: &mut BindingSet, event: MouseEvent) -> bool {
    bindings.run_mouse(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn single_step_binding_fires_immediately() {
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let mut bindings = BindingSet::new();
        bindings.bind_key(vec![ChordStep::plain(Key::Char('q'))], move || *f.borrow_mut() = true);

        let mut chord = ChordState::new();
        let outcome = chord.evaluate(&mut bindings, &KeyEvent::plain(Key::Char('q')));
        assert_eq!(outcome, ChordOutcome::Handled);
        assert!(*fired.borrow());
    }

    #[test]
    fn two_step_chord_fires_on_second_key() {
        let fired = Rc::new(RefCell::new(0));
        let f = fired.clone();
        let mut bindings = BindingSet::new();
        bindings.bind_key(
            vec![
                ChordStep::new(Key::Char('k'), Modifiers::CTRL),
                ChordStep::new(Key::Char('c'), Modifiers::CTRL),
            ],
            move || *f.borrow_mut() += 1,
        );
        let mut chord = ChordState::new();

        let first = chord.evaluate(&mut bindings, &KeyEvent::new(Key::Char('k'), Modifiers::CTRL));
        assert_eq!(first, ChordOutcome::Pending);
        assert_eq!(*fired.borrow(), 0);

        let second = chord.evaluate(&mut bindings, &KeyEvent::new(Key::Char('c'), Modifiers::CTRL));
        assert_eq!(second, ChordOutcome::Handled);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn expired_prefix_does_not_fire_on_stale_second_key() {
        let fired = Rc::new(RefCell::new(0));
        let f = fired.clone();
        let mut bindings = BindingSet::new();
        bindings.bind_key(
            vec![
                ChordStep::new(Key::Char('k'), Modifiers::CTRL),
                ChordStep::new(Key::Char('c'), Modifiers::CTRL),
            ],
            move || *f.borrow_mut() += 1,
        );
        let mut chord = ChordState::with_timeout(Duration::from_millis(10));
        chord.evaluate(&mut bindings, &KeyEvent::new(Key::Char('k'), Modifiers::CTRL));
        std::thread::sleep(Duration::from_millis(20));
        chord.expire_if_elapsed(std::time::Instant::now());
        assert!(!chord.is_pending());

        let outcome = chord.evaluate(&mut bindings, &KeyEvent::new(Key::Char('c'), Modifiers::CTRL));
        // With no pending prefix this is evaluated as a fresh first step,
        // which does not match 'c' as step 0, so nothing fires.
        assert_eq!(outcome, ChordOutcome::NoMatch);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn no_modifiers_binding_does_not_match_ctrl() {
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let mut bindings = BindingSet::new();
        bindings.bind_key(vec![ChordStep::plain(Key::Char('k'))], move || *f.borrow_mut() = true);
        let mut chord = ChordState::new();
        let outcome = chord.evaluate(&mut bindings, &KeyEvent::new(Key::Char('k'), Modifiers::CTRL));
        assert_eq!(outcome, ChordOutcome::NoMatch);
        assert!(!*fired.borrow());
    }

    #[test]
    fn mouse_binding_requires_minimum_click_count() {
        let fired = Rc::new(RefCell::new(0));
        let f = fired.clone();
        let mut bindings = BindingSet::new();
        bindings.bind_mouse(
            MouseButton::Left,
            MouseAction::Down,
            Modifiers::NONE,
            2,
            move |_| *f.borrow_mut() += 1,
        );
        let single = MouseEvent {
            button: MouseButton::Left,
            action: MouseAction::Down,
            x: 0,
            y: 0,
            modifiers: Modifiers::NONE,
            click_count: 1,
        };
        assert!(!dispatch_mouse(&mut bindings, single));
        let double = MouseEvent {
            click_count: 2,
            ..single
        };
        assert!(dispatch_mouse(&mut bindings, double));
        assert_eq!(*fired.borrow(), 1);
    }
}
