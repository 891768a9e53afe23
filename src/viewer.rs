//! Lightbox viewer navigation.
//!
//! A [`Viewer`] is either closed or open on a snapshot of items. The snapshot
//! is owned by the session, so whatever happens to the catalog or the
//! selected filter afterwards, navigation stays scoped to what was visible
//! when the viewer opened.
//!
//! ```text
//!            open(items, start)
//!   Closed ─────────────────────▶ Open { items, current }
//!     ▲                             │  next / previous / jump_to
//!     └──────── close() ────────────┘
//! ```
//!
//! Every transition is synchronous. Calls that make no sense in the current
//! state return a [`NavigationError`] and leave the viewer untouched.
//!
//! The generated viewer pages use the same stepping rules through
//! [`NavigationPolicy::step_forward`] and [`NavigationPolicy::step_back`],
//! so the static site and the in-memory core cannot disagree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("viewer is closed")]
    Closed,
    #[error("cannot open the viewer on an empty set")]
    EmptySnapshot,
    #[error("index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// What happens at the ends of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// Wrap from last to first and first to last.
    #[default]
    Circular,
    /// Stop at the ends; the control at a boundary is disabled.
    Clamped,
}

impl NavigationPolicy {
    /// Index after `current` in a list of `len` items.
    pub fn step_forward(self, current: usize, len: usize) -> usize {
        debug_assert!(current < len);
        match self {
            Self::Circular => (current + 1) % len,
            Self::Clamped => (current + 1).min(len - 1),
        }
    }

    /// Index before `current` in a list of `len` items.
    pub fn step_back(self, current: usize, len: usize) -> usize {
        debug_assert!(current < len);
        match self {
            Self::Circular => (current + len - 1) % len,
            Self::Clamped => current.saturating_sub(1),
        }
    }
}

/// Layout class of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Wider than tall is horizontal; square and taller are vertical.
    pub fn classify(width: u32, height: u32) -> Self {
        if width > height {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Keys the viewer reacts to while it has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Input events delivered to an open viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    Key(Key),
    /// Click on the dimmed area around the panel.
    BackdropClick,
    /// Click inside the content panel. Never reaches the backdrop handler.
    PanelClick,
    /// Click on a thumbnail in the strip.
    Thumbnail(usize),
    /// The displayed image finished loading.
    ImageLoaded { width: u32, height: u32 },
}

/// State of an open viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSession<T> {
    items: Vec<T>,
    current: usize,
    orientation: Orientation,
}

impl<T> ViewerSession<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &T {
        &self.items[self.current]
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn show(&mut self, index: usize) {
        if index != self.current {
            self.current = index;
            self.orientation = Orientation::default();
        }
    }
}

/// The lightbox state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer<T> {
    policy: NavigationPolicy,
    session: Option<ViewerSession<T>>,
}

impl<T> Viewer<T> {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            policy,
            session: None,
        }
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ViewerSession<T>> {
        self.session.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current)
    }

    pub fn current(&self) -> Option<&T> {
        self.session.as_ref().map(|s| s.current())
    }

    /// Open on `items` at `start`. Replaces any session already open.
    pub fn open(&mut self, items: Vec<T>, start: usize) -> Result<(), NavigationError> {
        if items.is_empty() {
            return Err(NavigationError::EmptySnapshot);
        }
        if start >= items.len() {
            return Err(NavigationError::OutOfRange {
                index: start,
                len: items.len(),
            });
        }
        self.session = Some(ViewerSession {
            items,
            current: start,
            orientation: Orientation::default(),
        });
        Ok(())
    }

    /// Close and drop the snapshot. Closing a closed viewer is fine.
    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn next(&mut self) -> Result<usize, NavigationError> {
        let policy = self.policy;
        let session = self.session.as_mut().ok_or(NavigationError::Closed)?;
        let target = policy.step_forward(session.current, session.items.len());
        session.show(target);
        Ok(target)
    }

    pub fn previous(&mut self) -> Result<usize, NavigationError> {
        let policy = self.policy;
        let session = self.session.as_mut().ok_or(NavigationError::Closed)?;
        let target = policy.step_back(session.current, session.items.len());
        session.show(target);
        Ok(target)
    }

    /// Show an arbitrary item, regardless of policy.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, NavigationError> {
        let session = self.session.as_mut().ok_or(NavigationError::Closed)?;
        if index >= session.items.len() {
            return Err(NavigationError::OutOfRange {
                index,
                len: session.items.len(),
            });
        }
        session.show(index);
        Ok(index)
    }

    /// Record the intrinsic size of the displayed image.
    pub fn image_loaded(&mut self, width: u32, height: u32) -> Result<Orientation, NavigationError> {
        let session = self.session.as_mut().ok_or(NavigationError::Closed)?;
        session.orientation = Orientation::classify(width, height);
        Ok(session.orientation)
    }

    /// Whether the forward control is live. Always true for circular.
    pub fn has_next(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.items.len() > 1
                && (self.policy == NavigationPolicy::Circular || s.current + 1 < s.items.len())
        })
    }

    /// Whether the back control is live. Always true for circular.
    pub fn has_previous(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.items.len() > 1 && (self.policy == NavigationPolicy::Circular || s.current > 0)
        })
    }

    /// Position label such as `"2 of 5"`.
    pub fn counter(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| format!("{} of {}", s.current + 1, s.items.len()))
    }

    /// Apply one input event.
    ///
    /// Panel clicks and unbound keys are absorbed without effect. Events
    /// reaching a closed viewer are rejected.
    pub fn handle(&mut self, event: ViewerEvent) -> Result<(), NavigationError> {
        if !self.is_open() {
            return Err(NavigationError::Closed);
        }
        match event {
            ViewerEvent::Key(Key::ArrowLeft) => self.previous().map(drop),
            ViewerEvent::Key(Key::ArrowRight) => self.next().map(drop),
            ViewerEvent::Key(Key::Escape) | ViewerEvent::BackdropClick => {
                self.close();
                Ok(())
            }
            ViewerEvent::Key(Key::Other) | ViewerEvent::PanelClick => Ok(()),
            ViewerEvent::Thumbnail(index) => self.jump_to(index).map(drop),
            ViewerEvent::ImageLoaded { width, height } => self.image_loaded(width, height).map(drop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_on(policy: NavigationPolicy, len: usize, start: usize) -> Viewer<usize> {
        let mut viewer = Viewer::new(policy);
        viewer.open((0..len).collect(), start).unwrap();
        viewer
    }

    // =========================================================================
    // Open / close lifecycle
    // =========================================================================

    #[test]
    fn starts_closed() {
        let viewer: Viewer<usize> = Viewer::new(NavigationPolicy::Circular);
        assert!(!viewer.is_open());
        assert_eq!(viewer.current_index(), None);
        assert_eq!(viewer.counter(), None);
    }

    #[test]
    fn open_rejects_empty_snapshot() {
        let mut viewer: Viewer<usize> = Viewer::new(NavigationPolicy::Circular);
        assert_eq!(viewer.open(vec![], 0), Err(NavigationError::EmptySnapshot));
        assert!(!viewer.is_open());
    }

    #[test]
    fn open_rejects_start_past_end() {
        let mut viewer = Viewer::new(NavigationPolicy::Circular);
        assert_eq!(
            viewer.open(vec!["a", "b"], 2),
            Err(NavigationError::OutOfRange { index: 2, len: 2 })
        );
        assert!(!viewer.is_open());
    }

    #[test]
    fn open_then_close() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 1);
        assert_eq!(viewer.current_index(), Some(1));
        assert_eq!(viewer.current(), Some(&1));
        viewer.close();
        assert!(!viewer.is_open());
        viewer.close();
        assert!(!viewer.is_open());
    }

    #[test]
    fn reopen_replaces_session() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 2);
        viewer.open(vec![10, 20], 0).unwrap();
        assert_eq!(viewer.current(), Some(&10));
        assert_eq!(viewer.session().unwrap().items(), &[10, 20]);
    }

    // =========================================================================
    // Circular policy
    // =========================================================================

    #[test]
    fn circular_previous_wraps_to_last_then_next_wraps_back() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 0);
        assert_eq!(viewer.previous(), Ok(2));
        assert_eq!(viewer.next(), Ok(0));
    }

    #[test]
    fn circular_n_steps_return_to_start() {
        for len in 1..=6 {
            for start in 0..len {
                let mut viewer = open_on(NavigationPolicy::Circular, len, start);
                for _ in 0..len {
                    viewer.next().unwrap();
                }
                assert_eq!(viewer.current_index(), Some(start), "len {len} start {start}");
                for _ in 0..len {
                    viewer.previous().unwrap();
                }
                assert_eq!(viewer.current_index(), Some(start), "len {len} start {start}");
            }
        }
    }

    #[test]
    fn circular_controls_always_live_with_several_items() {
        let viewer = open_on(NavigationPolicy::Circular, 3, 0);
        assert!(viewer.has_previous());
        assert!(viewer.has_next());
    }

    #[test]
    fn single_item_has_no_live_controls() {
        let mut viewer = open_on(NavigationPolicy::Circular, 1, 0);
        assert!(!viewer.has_next());
        assert!(!viewer.has_previous());
        assert_eq!(viewer.next(), Ok(0));
        assert_eq!(viewer.previous(), Ok(0));
    }

    // =========================================================================
    // Clamped policy
    // =========================================================================

    #[test]
    fn clamped_previous_at_start_stays() {
        let mut viewer = open_on(NavigationPolicy::Clamped, 3, 0);
        assert_eq!(viewer.previous(), Ok(0));
        assert_eq!(viewer.current_index(), Some(0));
    }

    #[test]
    fn clamped_n_steps_land_on_last_and_stay() {
        for len in 1..=6 {
            for start in 0..len {
                let mut viewer = open_on(NavigationPolicy::Clamped, len, start);
                for _ in 0..len {
                    viewer.next().unwrap();
                }
                assert_eq!(viewer.current_index(), Some(len - 1), "len {len} start {start}");
                viewer.next().unwrap();
                assert_eq!(viewer.current_index(), Some(len - 1));
            }
        }
    }

    #[test]
    fn clamped_controls_disabled_at_bounds() {
        let mut viewer = open_on(NavigationPolicy::Clamped, 3, 0);
        assert!(!viewer.has_previous());
        assert!(viewer.has_next());
        viewer.jump_to(2).unwrap();
        assert!(viewer.has_previous());
        assert!(!viewer.has_next());
    }

    // =========================================================================
    // Invalid calls
    // =========================================================================

    #[test]
    fn navigation_while_closed_is_rejected() {
        let mut viewer: Viewer<usize> = Viewer::new(NavigationPolicy::Circular);
        assert_eq!(viewer.next(), Err(NavigationError::Closed));
        assert_eq!(viewer.previous(), Err(NavigationError::Closed));
        assert_eq!(viewer.jump_to(0), Err(NavigationError::Closed));
        assert_eq!(viewer.image_loaded(10, 5), Err(NavigationError::Closed));
        assert!(!viewer.is_open());
    }

    #[test]
    fn jump_out_of_range_leaves_index_unchanged() {
        let mut viewer = open_on(NavigationPolicy::Circular, 4, 2);
        for bad in [4, 5, 100, usize::MAX] {
            assert_eq!(
                viewer.jump_to(bad),
                Err(NavigationError::OutOfRange { index: bad, len: 4 })
            );
            assert_eq!(viewer.current_index(), Some(2));
        }
    }

    #[test]
    fn jump_bypasses_policy() {
        let mut viewer = open_on(NavigationPolicy::Clamped, 5, 0);
        assert_eq!(viewer.jump_to(4), Ok(4));
        assert_eq!(viewer.counter().as_deref(), Some("5 of 5"));
    }

    // =========================================================================
    // Snapshot isolation
    // =========================================================================

    #[test]
    fn source_changes_after_open_do_not_leak_in() {
        let mut source = vec!["oak".to_string(), "tile".to_string(), "vinyl".to_string()];
        let mut viewer = Viewer::new(NavigationPolicy::Circular);
        viewer.open(source.clone(), 1).unwrap();

        source.clear();
        source.push("carpet".to_string());

        let session = viewer.session().unwrap();
        assert_eq!(session.items(), &["oak", "tile", "vinyl"]);
        assert_eq!(session.current_index(), 1);
        assert_eq!(viewer.current().map(String::as_str), Some("tile"));
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn arrow_keys_navigate() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 1);
        viewer.handle(ViewerEvent::Key(Key::ArrowRight)).unwrap();
        assert_eq!(viewer.current_index(), Some(2));
        viewer.handle(ViewerEvent::Key(Key::ArrowLeft)).unwrap();
        viewer.handle(ViewerEvent::Key(Key::ArrowLeft)).unwrap();
        assert_eq!(viewer.current_index(), Some(0));
    }

    #[test]
    fn escape_and_backdrop_close() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 1);
        viewer.handle(ViewerEvent::Key(Key::Escape)).unwrap();
        assert!(!viewer.is_open());

        let mut viewer = open_on(NavigationPolicy::Circular, 3, 1);
        viewer.handle(ViewerEvent::BackdropClick).unwrap();
        assert!(!viewer.is_open());
    }

    #[test]
    fn panel_click_and_other_keys_are_absorbed() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 1);
        viewer.handle(ViewerEvent::PanelClick).unwrap();
        viewer.handle(ViewerEvent::Key(Key::Other)).unwrap();
        assert!(viewer.is_open());
        assert_eq!(viewer.current_index(), Some(1));
    }

    #[test]
    fn thumbnail_event_jumps_and_rejects_bad_index() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 0);
        viewer.handle(ViewerEvent::Thumbnail(2)).unwrap();
        assert_eq!(viewer.current_index(), Some(2));
        assert!(viewer.handle(ViewerEvent::Thumbnail(3)).is_err());
        assert_eq!(viewer.current_index(), Some(2));
    }

    #[test]
    fn events_on_closed_viewer_are_rejected() {
        let mut viewer: Viewer<usize> = Viewer::new(NavigationPolicy::Clamped);
        assert_eq!(
            viewer.handle(ViewerEvent::Key(Key::ArrowRight)),
            Err(NavigationError::Closed)
        );
        assert_eq!(viewer.handle(ViewerEvent::BackdropClick), Err(NavigationError::Closed));
    }

    #[test]
    fn dom_key_names_map() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Enter"), Key::Other);
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    #[test]
    fn orientation_classification() {
        assert_eq!(Orientation::classify(1600, 1200), Orientation::Horizontal);
        assert_eq!(Orientation::classify(1200, 1600), Orientation::Vertical);
        assert_eq!(Orientation::classify(1000, 1000), Orientation::Vertical);
    }

    #[test]
    fn orientation_resets_when_item_changes() {
        let mut viewer = open_on(NavigationPolicy::Circular, 3, 0);
        viewer
            .handle(ViewerEvent::ImageLoaded {
                width: 600,
                height: 900,
            })
            .unwrap();
        assert_eq!(viewer.session().unwrap().orientation(), Orientation::Vertical);

        viewer.next().unwrap();
        assert_eq!(viewer.session().unwrap().orientation(), Orientation::Horizontal);
    }

    #[test]
    fn orientation_kept_when_item_unchanged() {
        let mut viewer = open_on(NavigationPolicy::Clamped, 2, 0);
        viewer.image_loaded(600, 900).unwrap();
        viewer.previous().unwrap();
        assert_eq!(viewer.session().unwrap().orientation(), Orientation::Vertical);
    }

    #[test]
    fn policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            navigation: NavigationPolicy,
        }
        let w: Wrapper = toml::from_str(r#"navigation = "clamped""#).unwrap();
        assert_eq!(w.navigation, NavigationPolicy::Clamped);
    }
}
