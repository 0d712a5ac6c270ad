//! Observable style surface.
//!
//! The style surface is the document-level presentation state shared by the
//! whole shell: a class marker on the root element (read by the theme
//! observer) and a set of string-valued style variables (written by the
//! background refresh). It is modelled as an explicit handle instead of
//! ambient global state so that every consumer can be given a fake.
//!
//! Observation follows the mutation-observer model: subscribers receive a
//! [`Mutation`] for every change, and the returned [`SurfaceSubscription`]
//! removes the subscriber when dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Attribute name reported for class marker changes.
pub const CLASS_ATTRIBUTE: &str = "class";

/// Attribute name reported for style variable changes.
pub const STYLE_ATTRIBUTE: &str = "style";

/// Callback invoked for each delivered mutation.
pub type MutationCallback = Box<dyn Fn(&Mutation) + Send + Sync>;

// =============================================================================
// MUTATIONS
// =============================================================================

/// Kind of structural change observed on the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// An attribute of the root element changed.
    Attribute {
        /// Name of the changed attribute.
        name: String,
    },
    /// Children were added or removed.
    ChildList,
    /// Text content changed.
    CharacterData,
}

impl MutationKind {
    /// Create an attribute mutation kind.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute { name: name.into() }
    }

    /// Check whether this is a change of the given attribute.
    pub fn is_attribute(&self, attribute: &str) -> bool {
        matches!(self, Self::Attribute { name } if name == attribute)
    }
}

/// A single change record delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// What changed.
    pub kind: MutationKind,
    /// Class attribute of the target at delivery time.
    pub target_classes: String,
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

/// Global, observable presentation state.
///
/// Class helpers have default implementations in terms of
/// [`class_attribute`](Self::class_attribute) and
/// [`set_class_attribute`](Self::set_class_attribute).
pub trait StyleSurface: Send + Sync {
    /// Current class attribute of the root element (space separated).
    fn class_attribute(&self) -> String;

    /// Replace the class attribute of the root element.
    fn set_class_attribute(&self, value: &str);

    /// Read a style variable.
    fn property(&self, name: &str) -> Option<String>;

    /// Write a style variable. Last write wins.
    fn set_property(&self, name: &str, value: &str);

    /// Remove a style variable.
    fn remove_property(&self, name: &str);

    /// Subscribe to mutations of the root element.
    fn subscribe(&self, callback: MutationCallback) -> SurfaceSubscription;

    /// Check whether the root element carries `class`.
    fn has_class(&self, class: &str) -> bool {
        self.class_attribute()
            .split_whitespace()
            .any(|token| token == class)
    }

    /// Add `class` to the root element if missing.
    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            let mut tokens = class_tokens(&self.class_attribute());
            tokens.push(class.to_string());
            self.set_class_attribute(&tokens.join(" "));
        }
    }

    /// Remove `class` from the root element if present.
    fn remove_class(&self, class: &str) {
        if self.has_class(class) {
            let tokens: Vec<String> = class_tokens(&self.class_attribute())
                .into_iter()
                .filter(|token| token != class)
                .collect();
            self.set_class_attribute(&tokens.join(" "));
        }
    }

    /// Toggle `class` and return whether it is present afterwards.
    fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }
}

/// Split a class attribute into unique tokens, keeping first occurrence order.
fn class_tokens(value: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in value.split_whitespace() {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

// =============================================================================
// SUBSCRIPTION GUARD
// =============================================================================

/// Scoped subscription to a [`StyleSurface`].
///
/// The subscriber is removed when the guard is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called, whichever comes first.
pub struct SurfaceSubscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl SurfaceSubscription {
    /// Create a guard that runs `release` exactly once.
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Whether the subscription still has to be released.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Release the subscription now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SurfaceSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for SurfaceSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// IN-PROCESS DOCUMENT
// =============================================================================

type SharedCallback = Arc<dyn Fn(&Mutation) + Send + Sync>;

#[derive(Default)]
struct DocumentInner {
    classes: Vec<String>,
    properties: BTreeMap<String, String>,
    observers: BTreeMap<u64, SharedCallback>,
    next_id: u64,
}

/// In-process style surface.
///
/// Clones share the same document. Callbacks run after the internal lock is
/// released, in subscription order, so they may read the surface freely.
#[derive(Clone, Default)]
pub struct DocumentStyle {
    inner: Arc<RwLock<DocumentInner>>,
}

impl DocumentStyle {
    /// Create an empty document (no classes, no style variables).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document whose root starts with the given class attribute.
    pub fn with_classes(classes: &str) -> Self {
        let document = Self::new();
        document.write().classes = class_tokens(classes);
        document
    }

    /// Deliver a mutation of `kind` to all subscribers.
    ///
    /// Class and style changes are emitted automatically; this is for other
    /// structural changes such as child list updates.
    pub fn emit(&self, kind: MutationKind) {
        self.notify(kind);
    }

    /// Number of live subscribers.
    pub fn observer_count(&self) -> usize {
        self.read().observers.len()
    }

    /// All style variables, sorted by name.
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.read().properties.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, DocumentInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocumentInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, kind: MutationKind) {
        let (mutation, observers) = {
            let inner = self.read();
            let mutation = Mutation {
                kind,
                target_classes: inner.classes.join(" "),
            };
            let observers: Vec<SharedCallback> = inner.observers.values().cloned().collect();
            (mutation, observers)
        };

        for observer in observers {
            observer(&mutation);
        }
    }
}

impl StyleSurface for DocumentStyle {
    fn class_attribute(&self) -> String {
        self.read().classes.join(" ")
    }

    fn set_class_attribute(&self, value: &str) {
        let tokens = class_tokens(value);
        {
            let mut inner = self.write();
            if inner.classes == tokens {
                return;
            }
            inner.classes = tokens;
        }
        self.notify(MutationKind::attribute(CLASS_ATTRIBUTE));
    }

    fn property(&self, name: &str) -> Option<String> {
        self.read().properties.get(name).cloned()
    }

    fn set_property(&self, name: &str, value: &str) {
        {
            let mut inner = self.write();
            if inner.properties.get(name).is_some_and(|v| v == value) {
                return;
            }
            inner
                .properties
                .insert(name.to_string(), value.to_string());
        }
        self.notify(MutationKind::attribute(STYLE_ATTRIBUTE));
    }

    fn remove_property(&self, name: &str) {
        if self.write().properties.remove(name).is_some() {
            self.notify(MutationKind::attribute(STYLE_ATTRIBUTE));
        }
    }

    fn subscribe(&self, callback: MutationCallback) -> SurfaceSubscription {
        let id = {
            let mut inner = self.write();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.insert(id, Arc::from(callback));
            id
        };

        let weak: Weak<RwLock<DocumentInner>> = Arc::downgrade(&self.inner);
        SurfaceSubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .observers
                    .remove(&id);
            }
        })
    }
}

impl fmt::Debug for DocumentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("DocumentStyle")
            .field("classes", &inner.classes)
            .field("properties", &inner.properties)
            .field("observers", &inner.observers.len())
            .finish()
    }
}
