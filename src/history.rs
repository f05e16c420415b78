//! The history collaborator.
//!
//! The router never touches browser APIs directly. It writes entries through
//! the [`History`] trait on commit and is told about browser-initiated moves
//! (back/forward buttons) through the pop-state listener.
//!
//! [`MemoryHistory`] is an in-process implementation: a stack of entries with
//! a cursor. Pushing drops any forward entries. [`MemoryHistory::go_back`]
//! and [`MemoryHistory::go_forward`] simulate the browser buttons and fire
//! the listener the way a real `popstate` event would.

use crate::trace_log;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Called with the new location after a browser-initiated history move.
pub type PopStateListener = Rc<dyn Fn(String)>;

/// Session history as seen by the router.
///
/// All methods take `&self`; implementations use interior mutability so the
/// host can keep its own handle.
pub trait History {
    /// The current location (path plus query, base included).
    fn current_path(&self) -> String;

    /// Add an entry after the current one.
    fn push(&self, href: &str);

    /// Overwrite the current entry.
    fn replace(&self, href: &str);

    /// Step back one entry without notifying the pop-state listener.
    fn back(&self);

    /// The entry [`back`](Self::back) would move to, if known.
    ///
    /// Hosts that cannot see their own stack return `None`; the router then
    /// falls back to [`traverse_back`](Self::traverse_back).
    fn peek_back(&self) -> Option<String> {
        None
    }

    /// Step back the way the browser button does, notifying the pop-state
    /// listener once the move lands.
    ///
    /// Returns whether a notification will follow. The default cannot
    /// traverse and returns `false` without moving.
    fn traverse_back(&self) -> bool {
        false
    }

    /// Install or remove the listener for browser-initiated moves.
    fn on_pop_state(&self, listener: Option<PopStateListener>);
}

/// In-memory history stack.
///
/// # Example
///
/// ```
/// use spa_navigator::{History, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/about");
/// history.push("/contact");
/// history.back();
///
/// assert_eq!(history.current_path(), "/about");
/// assert_eq!(history.entries(), vec!["/", "/about", "/contact"]);
///
/// history.push("/blog");
/// assert_eq!(history.entries(), vec!["/", "/about", "/blog"]);
/// ```
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    current: Cell<usize>,
    listener: RefCell<Option<PopStateListener>>,
}

impl MemoryHistory {
    /// Create a history with a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(vec![initial.into()]),
            current: Cell::new(0),
            listener: RefCell::new(None),
        }
    }

    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Cursor position in [`entries`](Self::entries).
    pub fn index(&self) -> usize {
        self.current.get()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Always `false`; a history has at least its initial entry.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether there is an entry before the current one.
    pub fn can_go_back(&self) -> bool {
        self.current.get() > 0
    }

    /// Whether there is an entry after the current one.
    pub fn can_go_forward(&self) -> bool {
        self.current.get() + 1 < self.entries.borrow().len()
    }

    /// Whether a pop-state listener is installed.
    pub fn has_listener(&self) -> bool {
        self.listener.borrow().is_some()
    }

    /// Simulate the browser back button. Returns `false` at the start.
    pub fn go_back(&self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.current.set(self.current.get() - 1);
        self.notify();
        true
    }

    /// Simulate the browser forward button. Returns `false` at the end.
    pub fn go_forward(&self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.current.set(self.current.get() + 1);
        self.notify();
        true
    }

    fn notify(&self) {
        let path = self.current_path();
        // Clone out so the listener may re-enter this history.
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            trace_log!("History pop-state to '{}'", path);
            listener(path);
        }
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries.borrow()[self.current.get()].clone()
    }

    fn push(&self, href: &str) {
        let mut entries = self.entries.borrow_mut();
        entries.truncate(self.current.get() + 1);
        entries.push(href.to_string());
        self.current.set(entries.len() - 1);
    }

    fn replace(&self, href: &str) {
        self.entries.borrow_mut()[self.current.get()] = href.to_string();
    }

    fn back(&self) {
        if self.can_go_back() {
            self.current.set(self.current.get() - 1);
        }
    }

    fn traverse_back(&self) -> bool {
        self.go_back()
    }

    fn peek_back(&self) -> Option<String> {
        let current = self.current.get();
        if current > 0 {
            Some(self.entries.borrow()[current - 1].clone())
        } else {
            None
        }
    }

    fn on_pop_state(&self, listener: Option<PopStateListener>) {
        *self.listener.borrow_mut() = listener;
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("entries", &self.entries.borrow())
            .field("current", &self.current.get())
            .field("listener", &self.has_listener())
            .finish()
    }
}
