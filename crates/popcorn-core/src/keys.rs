//! Global keyboard shortcuts.
//!
//! A [`KeyBinder`] is the single listener for key presses. Views attach a
//! callback for one key with [`KeyBinder::bind`] and keep the returned
//! [`KeyBinding`] for as long as they are mounted; dropping it detaches the
//! callback. Replacing a binding (new key or new callback) is done by
//! replacing the guard, so a view never ends up bound twice.
//!
//! Everything here is single-threaded: callbacks run synchronously inside
//! [`KeyBinder::dispatch`] on the UI thread, in the order they were bound.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Tab => write!(f, "Tab"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

type Callback<S> = Rc<RefCell<dyn FnMut(&mut S)>>;

struct Binding<S> {
    id: u64,
    key: Key,
    callback: Callback<S>,
}

struct Registry<S> {
    next_id: u64,
    bindings: Vec<Binding<S>>,
}

impl<S> Registry<S> {
    fn is_bound(&self, id: u64) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }
}

/// Dispatches key presses to bound callbacks. Callbacks get `&mut S`.
pub struct KeyBinder<S> {
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S> Clone for KeyBinder<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<S: 'static> Default for KeyBinder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> KeyBinder<S> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                bindings: Vec::new(),
            })),
        }
    }

    /// Attach `callback` to `key` until the returned guard is dropped.
    #[must_use = "the binding is detached as soon as the guard is dropped"]
    pub fn bind<F>(&self, key: Key, callback: F) -> KeyBinding
    where
        F: FnMut(&mut S) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.bindings.push(Binding {
            id,
            key,
            callback: Rc::new(RefCell::new(callback)),
        });

        let weak: Weak<RefCell<Registry<S>>> = Rc::downgrade(&self.registry);
        KeyBinding {
            key,
            detach: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().bindings.retain(|b| b.id != id);
                }
            })),
        }
    }

    /// Run every callback bound to `key`. Returns how many ran.
    ///
    /// A callback may drop bindings (its own included); a binding detached
    /// mid-dispatch is skipped if it has not run yet.
    pub fn dispatch(&self, key: Key, state: &mut S) -> usize {
        let matching: Vec<(u64, Callback<S>)> = self
            .registry
            .borrow()
            .bindings
            .iter()
            .filter(|b| b.key == key)
            .map(|b| (b.id, Rc::clone(&b.callback)))
            .collect();

        let mut invoked = 0;
        for (id, callback) in matching {
            if !self.registry.borrow().is_bound(id) {
                continue;
            }
            // A callback dispatching its own key again is not re-entered
            let Ok(mut run) = callback.try_borrow_mut() else {
                continue;
            };
            (&mut *run)(state);
            invoked += 1;
        }
        invoked
    }

    pub fn is_bound(&self, key: Key) -> bool {
        self.registry.borrow().bindings.iter().any(|b| b.key == key)
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a callback attached; detaches it on drop.
pub struct KeyBinding {
    key: Key,
    detach: Option<Box<dyn FnOnce()>>,
}

impl KeyBinding {
    pub fn key(&self) -> Key {
        self.key
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding").field("key", &self.key).finish()
    }
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
