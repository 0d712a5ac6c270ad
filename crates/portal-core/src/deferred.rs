//! Deferred module registry.
//!
//! Page modules are loaded on first use. Each registered module moves through
//! `Unloaded → Loading → Ready | Failed` independently, and a module is never
//! fetched twice concurrently: resolving a module that is already loading
//! hands back a clone of the same shared load.
//!
//! # Lifecycle
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Unloaded | `resolve` | Loading (loader invoked once) |
//! | Loading | `resolve` | Loading (same pending load) |
//! | Loading | `settle(Ok)` or finished load seen by `resolve` | Ready |
//! | Loading | `settle(Err)` or failed load seen by `resolve` | Failed |
//! | any | `reset` | Unloaded |
//!
//! Every started load gets a generation number. `settle` only applies a
//! result whose generation matches the load currently in flight, so the
//! outcome of a load abandoned by `reset` never lands on its successor.
//!
//! There is no retry at this layer; a failed module stays failed until the
//! host resets it.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use thiserror::Error;

/// Future returned by a module loader.
pub type LoadFuture<M> = BoxFuture<'static, Result<M, LoadError>>;

/// Produces a fresh load of one module each time it is called.
pub type ModuleLoader<M> = Arc<dyn Fn() -> LoadFuture<M> + Send + Sync>;

type SharedLoad<M> = Shared<BoxFuture<'static, Result<Arc<M>, LoadError>>>;

// =============================================================================
// ERRORS
// =============================================================================

/// A module failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load module {module}: {message}")]
pub struct LoadError {
    /// Module that failed.
    pub module: String,
    /// Loader-provided reason.
    pub message: String,
}

impl LoadError {
    /// Create a load error for `module`.
    pub fn new(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            message: message.into(),
        }
    }
}

/// Registry misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No loader was registered for the requested module.
    #[error("no loader registered for module {0}")]
    UnknownModule(String),
}

// =============================================================================
// STATES
// =============================================================================

/// Public view of a module's lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum ModuleState<M> {
    Unloaded,
    Loading { shared: SharedLoad<M>, generation: u64 },
    Ready(Arc<M>),
    Failed(LoadError),
}

impl<M> ModuleState<M> {
    fn status(&self) -> ModuleStatus {
        match self {
            Self::Unloaded => ModuleStatus::Unloaded,
            Self::Loading { .. } => ModuleStatus::Loading,
            Self::Ready(_) => ModuleStatus::Ready,
            Self::Failed(_) => ModuleStatus::Failed,
        }
    }
}

struct Entry<M> {
    loader: ModuleLoader<M>,
    state: ModuleState<M>,
    loads_started: usize,
}

/// Outcome of [`ModuleRegistry::resolve`].
#[derive(Debug)]
pub enum Resolution<M> {
    /// The module is loaded.
    Ready(Arc<M>),
    /// The module is loading.
    Pending(PendingLoad<M>),
    /// The module failed to load.
    Failed(LoadError),
}

impl<M> Resolution<M> {
    /// Check whether the module is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Check whether the module is still loading.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

// =============================================================================
// PENDING LOAD
// =============================================================================

/// Handle to an in-flight module load.
///
/// Every handle for the same load shares one underlying future; awaiting any
/// of them drives that single load.
pub struct PendingLoad<M> {
    module: String,
    shared: SharedLoad<M>,
    generation: u64,
    fresh: bool,
}

impl<M> PendingLoad<M> {
    /// Name of the module being loaded.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Whether this handle came from the call that started the load.
    ///
    /// Hosts schedule only fresh handles; joined handles are for waiting.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Generation of the load, passed back to [`ModuleRegistry::settle`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether both handles refer to the same underlying load.
    pub fn same_load(&self, other: &Self) -> bool {
        self.shared.ptr_eq(&other.shared)
    }

    /// Wait for the load to finish.
    pub fn wait(self) -> impl Future<Output = Result<Arc<M>, LoadError>> + Send + 'static
    where
        M: Send + Sync + 'static,
    {
        self.shared
    }
}

impl<M> Clone for PendingLoad<M> {
    fn clone(&self) -> Self {
        Self {
            module: self.module.clone(),
            shared: self.shared.clone(),
            generation: self.generation,
            fresh: false,
        }
    }
}

impl<M> fmt::Debug for PendingLoad<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("module", &self.module)
            .field("generation", &self.generation)
            .field("fresh", &self.fresh)
            .finish()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Maps module keys to lazily loaded modules.
pub struct ModuleRegistry<K, M> {
    entries: HashMap<K, Entry<M>>,
    next_generation: u64,
}

impl<K, M> Default for ModuleRegistry<K, M> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K, M> ModuleRegistry<K, M>
where
    K: Copy + Eq + Hash + fmt::Debug,
    M: Send + Sync + 'static,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the loader for `key`. The module starts unloaded.
    pub fn register(&mut self, key: K, loader: ModuleLoader<M>) {
        self.entries.insert(
            key,
            Entry {
                loader,
                state: ModuleState::Unloaded,
                loads_started: 0,
            },
        );
    }

    /// Register a loader from an async closure.
    pub fn register_fn<F, Fut>(&mut self, key: K, loader: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M, LoadError>> + Send + 'static,
    {
        self.register(key, Arc::new(move || loader().boxed()));
    }

    /// Resolve `key` to a ready module, a pending load, or a failure.
    ///
    /// Starts the load when the module is unloaded. While a load is in
    /// flight every call returns a handle to that same load.
    pub fn resolve(&mut self, key: K) -> Result<Resolution<M>, RegistryError> {
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RegistryError::UnknownModule(format!("{key:?}")))?;
        let module = format!("{key:?}");

        if let ModuleState::Loading { shared, .. } = &entry.state
            && let Some(result) = shared.peek().cloned()
        {
            entry.state = settled(&module, result);
        }

        let existing = match &entry.state {
            ModuleState::Ready(loaded) => Some(Resolution::Ready(Arc::clone(loaded))),
            ModuleState::Failed(err) => Some(Resolution::Failed(err.clone())),
            ModuleState::Loading { shared, generation } => Some(Resolution::Pending(PendingLoad {
                module: module.clone(),
                shared: shared.clone(),
                generation: *generation,
                fresh: false,
            })),
            ModuleState::Unloaded => None,
        };
        if let Some(resolution) = existing {
            return Ok(resolution);
        }

        let shared: SharedLoad<M> = (entry.loader)()
            .map(|result| result.map(Arc::new))
            .boxed()
            .shared();
        self.next_generation += 1;
        let generation = self.next_generation;
        entry.state = ModuleState::Loading {
            shared: shared.clone(),
            generation,
        };
        entry.loads_started += 1;
        tracing::debug!("Started loading module {} (generation {})", module, generation);

        Ok(Resolution::Pending(PendingLoad {
            module,
            shared,
            generation,
            fresh: true,
        }))
    }

    /// Record the result of a load started by [`resolve`](Self::resolve).
    ///
    /// Ignored unless `generation` is the load still in flight for `key`,
    /// so a late result cannot overwrite a module that was reset or reloaded
    /// in the meantime. Returns whether the result was applied.
    pub fn settle(&mut self, key: K, generation: u64, result: Result<Arc<M>, LoadError>) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        let current = matches!(
            entry.state,
            ModuleState::Loading { generation: live, .. } if live == generation
        );
        if !current {
            tracing::debug!("Ignoring stale load result for {:?} (generation {})", key, generation);
            return false;
        }
        entry.state = settled(&format!("{key:?}"), result);
        true
    }

    /// Drop whatever is held for `key` so the next resolve loads afresh.
    pub fn reset(&mut self, key: K) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.state = ModuleState::Unloaded;
            tracing::debug!("Reset module {:?}", key);
        }
    }

    /// Reset every module currently in the failed state.
    pub fn reset_failed(&mut self) -> Vec<K> {
        let failed: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry.state, ModuleState::Failed(_)))
            .map(|(key, _)| *key)
            .collect();
        for key in &failed {
            self.reset(*key);
        }
        failed
    }

    /// Lifecycle position of `key`, if registered.
    pub fn status(&self, key: K) -> Option<ModuleStatus> {
        self.entries.get(&key).map(|entry| entry.state.status())
    }

    /// How many loads were started for `key` since registration.
    pub fn loads_started(&self, key: K) -> usize {
        self.entries.get(&key).map_or(0, |entry| entry.loads_started)
    }

    /// Whether `key` has a registered loader.
    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }
}

fn settled<M>(module: &str, result: Result<Arc<M>, LoadError>) -> ModuleState<M> {
    match result {
        Ok(loaded) => {
            tracing::debug!("Module {} ready", module);
            ModuleState::Ready(loaded)
        }
        Err(err) => {
            tracing::error!("Module {} failed: {}", module, err);
            ModuleState::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Page {
        Home,
        Broken,
    }

    fn registry(calls: Arc<AtomicUsize>) -> ModuleRegistry<Page, String> {
        let mut registry = ModuleRegistry::new();
        registry.register_fn(Page::Home, move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("home".to_string()) }
        });
        registry.register_fn(Page::Broken, || async {
            Err(LoadError::new("Broken", "chunk missing"))
        });
        registry
    }

    #[test]
    fn test_resolve_starts_single_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = registry(Arc::clone(&calls));
        assert_eq!(registry.status(Page::Home), Some(ModuleStatus::Unloaded));

        let first = registry.resolve(Page::Home).unwrap();
        let second = registry.resolve(Page::Home).unwrap();

        let (Resolution::Pending(first), Resolution::Pending(second)) = (first, second) else {
            panic!("expected two pending resolutions");
        };
        assert!(first.is_fresh());
        assert!(!second.is_fresh());
        assert!(first.same_load(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.loads_started(Page::Home), 1);
        assert_eq!(registry.status(Page::Home), Some(ModuleStatus::Loading));
    }

    #[test]
    fn test_settle_makes_ready() {
        let mut registry = registry(Arc::new(AtomicUsize::new(0)));
        let Resolution::Pending(load) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };

        assert!(registry.settle(Page::Home, load.generation(), Ok(Arc::new("home".to_string()))));
        match registry.resolve(Page::Home).unwrap() {
            Resolution::Ready(module) => assert_eq!(module.as_str(), "home"),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(registry.loads_started(Page::Home), 1);
    }

    #[test]
    fn test_settle_ignored_after_reset() {
        let mut registry = registry(Arc::new(AtomicUsize::new(0)));
        let Resolution::Pending(load) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };
        registry.reset(Page::Home);

        assert!(!registry.settle(Page::Home, load.generation(), Ok(Arc::new("stale".to_string()))));
        assert_eq!(registry.status(Page::Home), Some(ModuleStatus::Unloaded));
    }

    #[test]
    fn test_result_of_abandoned_load_does_not_overwrite_reload() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = registry(Arc::clone(&calls));
        let Resolution::Pending(old) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };
        registry.reset(Page::Home);
        let Resolution::Pending(new) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };
        assert!(new.is_fresh());
        assert!(!new.same_load(&old));
        assert_ne!(old.generation(), new.generation());

        assert!(!registry.settle(Page::Home, old.generation(), Ok(Arc::new("stale".to_string()))));
        assert_eq!(registry.status(Page::Home), Some(ModuleStatus::Loading));

        assert!(registry.settle(Page::Home, new.generation(), Ok(Arc::new("fresh".to_string()))));
        match registry.resolve(Page::Home).unwrap() {
            Resolution::Ready(module) => assert_eq!(module.as_str(), "fresh"),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_module() {
        let mut registry: ModuleRegistry<Page, String> = ModuleRegistry::new();
        assert_eq!(
            registry.resolve(Page::Home).unwrap_err(),
            RegistryError::UnknownModule("Home".to_string())
        );
        assert!(!registry.settle(Page::Home, 1, Ok(Arc::new(String::new()))));
    }

    #[tokio::test]
    async fn test_waiting_settles_on_next_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = registry(Arc::clone(&calls));

        let Resolution::Pending(pending) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };
        let loaded = pending.wait().await.unwrap();
        assert_eq!(loaded.as_str(), "home");

        match registry.resolve(Page::Home).unwrap() {
            Resolution::Ready(module) => assert!(Arc::ptr_eq(&module, &loaded)),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_observable_and_sticky() {
        let mut registry = registry(Arc::new(AtomicUsize::new(0)));

        let Resolution::Pending(pending) = registry.resolve(Page::Broken).unwrap() else {
            panic!("expected pending");
        };
        let err = pending.wait().await.unwrap_err();
        assert_eq!(err.message, "chunk missing");

        assert!(matches!(
            registry.resolve(Page::Broken).unwrap(),
            Resolution::Failed(_)
        ));
        assert!(matches!(
            registry.resolve(Page::Broken).unwrap(),
            Resolution::Failed(_)
        ));
        assert_eq!(registry.loads_started(Page::Broken), 1);
    }

    #[test]
    fn test_reset_failed_allows_fresh_load() {
        let mut registry = registry(Arc::new(AtomicUsize::new(0)));
        let Resolution::Pending(load) = registry.resolve(Page::Broken).unwrap() else {
            panic!("expected pending");
        };
        registry.settle(
            Page::Broken,
            load.generation(),
            Err(LoadError::new("Broken", "chunk missing")),
        );

        assert_eq!(registry.reset_failed(), vec![Page::Broken]);
        let resolution = registry.resolve(Page::Broken).unwrap();
        assert!(matches!(&resolution, Resolution::Pending(p) if p.is_fresh()));
        assert_eq!(registry.loads_started(Page::Broken), 2);
    }

    #[test]
    fn test_cloned_handle_is_not_fresh() {
        let mut registry = registry(Arc::new(AtomicUsize::new(0)));
        let Resolution::Pending(pending) = registry.resolve(Page::Home).unwrap() else {
            panic!("expected pending");
        };
        let copy = pending.clone();
        assert!(!copy.is_fresh());
        assert!(copy.same_load(&pending));
        assert_eq!(copy.module(), "Home");
    }
}
