//! Suspension boundary over a matched route.
//!
//! The boundary resolves every module the matched route needs. If any of
//! them is still loading the host shows the fallback; the boundary does not
//! say which one. Only loads started by this evaluation are handed back for
//! scheduling, so repeated evaluations during a pending window never start a
//! second fetch of the same module. Loads started before a failing module
//! are handed back with the failure; otherwise nothing would ever drive them.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::deferred::{LoadError, ModuleRegistry, PendingLoad, RegistryError, Resolution};
use crate::route::RouteMatch;

/// What the host should render for a matched route.
#[derive(Debug)]
pub enum Boundary<M> {
    /// Every module is ready, outermost first.
    Ready(Vec<Arc<M>>),
    /// At least one module is pending; `started` holds loads begun by this
    /// evaluation.
    Suspended {
        /// Freshly started loads the host must drive.
        started: Vec<PendingLoad<M>>,
    },
    /// A module failed to load.
    Failed {
        /// First failure in chain order.
        error: LoadError,
        /// Loads begun by this evaluation before the failure was reached.
        started: Vec<PendingLoad<M>>,
    },
}

impl<M> Boundary<M> {
    /// Whether the fallback should be shown.
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended { .. })
    }

    /// Loads the host must drive, whatever is rendered.
    pub fn into_started(self) -> Vec<PendingLoad<M>> {
        match self {
            Self::Ready(_) => Vec::new(),
            Self::Suspended { started } | Self::Failed { started, .. } => started,
        }
    }
}

/// The single suspension boundary around the route tree.
pub struct SuspenseBoundary;

impl SuspenseBoundary {
    /// Resolve the modules of `route` and decide what to render.
    ///
    /// Modules are resolved in chain order. A failure wins over pending
    /// siblings so a broken page never hangs on the fallback.
    pub fn evaluate<K, M>(registry: &mut ModuleRegistry<K, M>, route: &RouteMatch<K>) -> Boundary<M>
    where
        K: Copy + Eq + Hash + fmt::Debug,
        M: Send + Sync + 'static,
    {
        let mut ready = Vec::with_capacity(route.chain.len());
        let mut started = Vec::new();
        let mut pending = false;

        for key in &route.chain {
            match registry.resolve(*key) {
                Ok(Resolution::Ready(module)) => ready.push(module),
                Ok(Resolution::Pending(load)) => {
                    pending = true;
                    if load.is_fresh() {
                        started.push(load);
                    }
                }
                Ok(Resolution::Failed(error)) => return Boundary::Failed { error, started },
                Err(RegistryError::UnknownModule(module)) => {
                    return Boundary::Failed {
                        error: LoadError::new(module, "no loader registered"),
                        started,
                    };
                }
            }
        }

        if pending {
            tracing::debug!(
                "Route {} suspended ({} new loads)",
                route.path,
                started.len()
            );
            Boundary::Suspended { started }
        } else {
            Boundary::Ready(ready)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Page {
        Admin,
        Catalog,
        Missing,
    }

    fn registry() -> ModuleRegistry<Page, &'static str> {
        let mut registry = ModuleRegistry::new();
        registry.register_fn(Page::Admin, || async { Ok("admin") });
        registry.register_fn(Page::Catalog, || async { Ok("catalog") });
        registry
    }

    fn route(chain: Vec<Page>) -> RouteMatch<Page> {
        RouteMatch {
            path: "/admin/categories".to_string(),
            chain,
        }
    }

    #[test]
    fn test_first_evaluation_starts_each_module_once() {
        let mut registry = registry();
        let route = route(vec![Page::Admin, Page::Catalog]);

        let Boundary::Suspended { started } = SuspenseBoundary::evaluate(&mut registry, &route) else {
            panic!("expected suspension");
        };
        assert_eq!(started.len(), 2);

        let Boundary::Suspended { started } = SuspenseBoundary::evaluate(&mut registry, &route) else {
            panic!("expected suspension");
        };
        assert!(started.is_empty());
        assert_eq!(registry.loads_started(Page::Catalog), 1);
    }

    #[test]
    fn test_ready_when_all_settled() {
        let mut registry = registry();
        let route = route(vec![Page::Admin, Page::Catalog]);
        for load in SuspenseBoundary::evaluate(&mut registry, &route).into_started() {
            let value = if load.module() == "Admin" { "admin" } else { "catalog" };
            let key = if load.module() == "Admin" { Page::Admin } else { Page::Catalog };
            assert!(registry.settle(key, load.generation(), Ok(Arc::new(value))));
        }

        let Boundary::Ready(modules) = SuspenseBoundary::evaluate(&mut registry, &route) else {
            panic!("expected ready");
        };
        let names: Vec<&str> = modules.iter().map(|m| **m).collect();
        assert_eq!(names, vec!["admin", "catalog"]);
    }

    #[test]
    fn test_failure_wins_over_pending() {
        let mut registry = registry();
        let route = route(vec![Page::Admin, Page::Catalog]);
        let started = SuspenseBoundary::evaluate(&mut registry, &route).into_started();
        let catalog = started.iter().find(|l| l.module() == "Catalog").unwrap();
        registry.settle(
            Page::Catalog,
            catalog.generation(),
            Err(LoadError::new("Catalog", "offline")),
        );

        let boundary = SuspenseBoundary::evaluate(&mut registry, &route);
        assert!(matches!(boundary, Boundary::Failed { ref error, .. } if error.module == "Catalog"));
    }

    #[test]
    fn test_unknown_module_fails() {
        let mut registry = registry();
        let boundary = SuspenseBoundary::evaluate(&mut registry, &route(vec![Page::Missing]));
        assert!(matches!(boundary, Boundary::Failed { ref error, .. } if error.module == "Missing"));
    }

    #[tokio::test]
    async fn test_load_started_before_failure_is_handed_back() {
        let mut registry = registry();

        let Boundary::Failed { error, started } =
            SuspenseBoundary::evaluate(&mut registry, &route(vec![Page::Admin, Page::Missing]))
        else {
            panic!("expected failure");
        };
        assert_eq!(error.module, "Missing");
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].module(), "Admin");
        assert!(started[0].is_fresh());

        let load = started.into_iter().next().unwrap();
        let generation = load.generation();
        let admin = load.wait().await.unwrap();
        assert!(registry.settle(Page::Admin, generation, Ok(admin)));

        let Boundary::Ready(modules) = SuspenseBoundary::evaluate(&mut registry, &route(vec![Page::Admin]))
        else {
            panic!("expected ready");
        };
        assert_eq!(*modules[0], "admin");
        assert_eq!(registry.loads_started(Page::Admin), 1);
    }
}
