//! Page modules and the route table.
//!
//! The real page content is out of scope for the shell; each page module
//! here carries only what the shell needs to render a placeholder for it.

use std::fmt;

use portal_core::{ModuleRegistry, RouteError, RouteNode, RouteTree};

/// Every page the shell can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    Login,
    Admin,
    Tools,
    Catalog,
    ApiToken,
    Settings,
}

impl PageId {
    pub const ALL: [PageId; 7] = [
        Self::Home,
        Self::Login,
        Self::Admin,
        Self::Tools,
        Self::Catalog,
        Self::ApiToken,
        Self::Settings,
    ];

    /// Get a human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Login",
            Self::Admin => "Admin",
            Self::Tools => "Tools",
            Self::Catalog => "Categories",
            Self::ApiToken => "API Token",
            Self::Settings => "Settings",
        }
    }

    /// Short description shown on the page.
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::Home => "Start page.",
            Self::Login => "Sign in to manage the site.",
            Self::Admin => "Administration.",
            Self::Tools => "Maintenance tools.",
            Self::Catalog => "Manage categories.",
            Self::ApiToken => "Create and revoke API tokens.",
            Self::Settings => "Site settings.",
        }
    }

    /// Whether this page renders nested pages inside itself.
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Find the page a registry module name refers to.
    ///
    /// The registry names modules by the `Debug` form of their key.
    pub fn for_module(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|page| format!("{page:?}") == name)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A loaded page module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModule {
    pub id: PageId,
    pub title: &'static str,
    pub summary: &'static str,
}

impl PageModule {
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            title: id.label(),
            summary: id.summary(),
        }
    }
}

/// Register one deferred loader per page.
pub fn register_pages(registry: &mut ModuleRegistry<PageId, PageModule>) {
    for page in PageId::ALL {
        registry.register_fn(page, move || async move {
            tracing::debug!("Loading page module {}", page);
            Ok(PageModule::new(page))
        });
    }
}

/// Tabs of the admin container: label and path.
pub const ADMIN_TABS: [(PageId, &str); 4] = [
    (PageId::Tools, "/admin/tools"),
    (PageId::Catalog, "/admin/categories"),
    (PageId::ApiToken, "/admin/api-token"),
    (PageId::Settings, "/admin/settings"),
];

/// Top navigation: label and path.
pub const NAV_LINKS: [(&str, &str); 3] = [("Home", "/"), ("Login", "/login"), ("Admin", "/admin")];

/// The shell's route table.
pub fn routes() -> Result<RouteTree<PageId>, RouteError> {
    RouteTree::new(vec![
        RouteNode::new("/", PageId::Home),
        RouteNode::new("/login", PageId::Login),
        RouteNode::new("/admin", PageId::Admin)
            .child(RouteNode::index(PageId::Tools))
            .child(RouteNode::new("tools", PageId::Tools))
            .child(RouteNode::new("categories", PageId::Catalog))
            .child(RouteNode::new("api-token", PageId::ApiToken))
            .child(RouteNode::new("settings", PageId::Settings)),
    ])
}
