//! Declarative route tree.
//!
//! The shell declares its routes once as a tree of [`RouteNode`]s; the tree
//! is validated on construction and immutable afterwards. Matching a URL
//! path yields the chain of modules to render, outermost first, so a nested
//! page is rendered inside its container.

use std::fmt;

use thiserror::Error;

// =============================================================================
// ROUTE NODES
// =============================================================================

/// A single route: a path segment pattern bound to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNode<K> {
    /// Path relative to the parent (`"/"`, `"login"`, `"api-token"`).
    /// Empty for index routes.
    pub path: String,
    /// Module rendered for this route.
    pub module: K,
    /// Whether this route matches its parent's path with no suffix.
    pub index: bool,
    /// Nested routes.
    pub children: Vec<RouteNode<K>>,
}

impl<K> RouteNode<K> {
    /// Create a route for `path`.
    pub fn new(path: impl Into<String>, module: K) -> Self {
        Self {
            path: path.into(),
            module,
            index: false,
            children: Vec::new(),
        }
    }

    /// Create an index route.
    pub fn index(module: K) -> Self {
        Self {
            path: String::new(),
            module,
            index: true,
            children: Vec::new(),
        }
    }

    /// Append a nested route.
    pub fn child(mut self, child: RouteNode<K>) -> Self {
        self.children.push(child);
        self
    }
}

/// Result of matching a path: modules to render, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<K> {
    /// Normalized path that was matched.
    pub path: String,
    /// Modules from the outermost route to the matched leaf.
    pub chain: Vec<K>,
}

impl<K: Copy> RouteMatch<K> {
    /// The innermost module.
    pub fn leaf(&self) -> Option<K> {
        self.chain.last().copied()
    }

    /// The outermost module.
    pub fn root(&self) -> Option<K> {
        self.chain.first().copied()
    }
}

/// Path matching engine.
pub trait Router<K> {
    /// Match `path` against the declared routes.
    fn match_path(&self, path: &str) -> Option<RouteMatch<K>>;
}

// =============================================================================
// ROUTE TREE
// =============================================================================

/// Invalid route declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouteError {
    /// Two siblings share a path.
    #[error("duplicate route path '{path}' under '{parent}'")]
    DuplicatePath {
        /// Parent route path.
        parent: String,
        /// Duplicated path.
        path: String,
    },

    /// More than one index route among siblings.
    #[error("more than one index route under '{parent}'")]
    MultipleIndex {
        /// Parent route path.
        parent: String,
    },

    /// An index route with a path or children.
    #[error("index route under '{parent}' must have no path and no children")]
    InvalidIndex {
        /// Parent route path.
        parent: String,
    },
}

/// Validated, immutable route tree.
#[derive(Debug, Clone)]
pub struct RouteTree<K> {
    roots: Vec<RouteNode<K>>,
}

/// A tree with no routes; every path is unmatched.
impl<K> Default for RouteTree<K> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<K: Copy + PartialEq + fmt::Debug> RouteTree<K> {
    /// Validate and build a tree from its top-level routes.
    pub fn new(roots: Vec<RouteNode<K>>) -> Result<Self, RouteError> {
        validate_siblings("/", &roots)?;
        Ok(Self { roots })
    }

    /// Top-level routes.
    pub fn roots(&self) -> &[RouteNode<K>] {
        &self.roots
    }

    /// Every module referenced by the tree, in declaration order, without repeats.
    pub fn modules(&self) -> Vec<K> {
        let mut modules = Vec::new();
        collect_modules(&self.roots, &mut modules);
        modules
    }
}

impl<K: Copy + PartialEq + fmt::Debug> Router<K> for RouteTree<K> {
    fn match_path(&self, path: &str) -> Option<RouteMatch<K>> {
        let segments = split_path(path);
        let mut chain = Vec::new();
        if match_nodes(&self.roots, &segments, &mut chain) {
            Some(RouteMatch {
                path: format!("/{}", segments.join("/")),
                chain,
            })
        } else {
            None
        }
    }
}

fn validate_siblings<K>(parent: &str, nodes: &[RouteNode<K>]) -> Result<(), RouteError> {
    let mut seen: Vec<String> = Vec::new();
    let mut index_count = 0;

    for node in nodes {
        if node.index {
            index_count += 1;
            if index_count > 1 {
                return Err(RouteError::MultipleIndex {
                    parent: parent.to_string(),
                });
            }
            if !node.path.is_empty() || !node.children.is_empty() {
                return Err(RouteError::InvalidIndex {
                    parent: parent.to_string(),
                });
            }
            continue;
        }

        let normalized = split_path(&node.path).join("/").to_ascii_lowercase();
        if seen.contains(&normalized) {
            return Err(RouteError::DuplicatePath {
                parent: parent.to_string(),
                path: node.path.clone(),
            });
        }
        seen.push(normalized);

        validate_siblings(&node.path, &node.children)?;
    }
    Ok(())
}

fn collect_modules<K: Copy + PartialEq>(nodes: &[RouteNode<K>], out: &mut Vec<K>) {
    for node in nodes {
        if !out.contains(&node.module) {
            out.push(node.module);
        }
        collect_modules(&node.children, out);
    }
}

/// Split a URL path into segments, dropping query, fragment and empty parts.
fn split_path(path: &str) -> Vec<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn match_nodes<K: Copy>(nodes: &[RouteNode<K>], segments: &[String], chain: &mut Vec<K>) -> bool {
    for node in nodes {
        if node.index {
            if segments.is_empty() {
                chain.push(node.module);
                return true;
            }
            continue;
        }

        let own = split_path(&node.path);
        let prefix_matches = own.len() <= segments.len()
            && own
                .iter()
                .zip(segments)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if !prefix_matches {
            continue;
        }

        let rest = &segments[own.len()..];
        chain.push(node.module);

        if rest.is_empty() {
            if let Some(index) = node.children.iter().find(|child| child.index) {
                chain.push(index.module);
            }
            return true;
        }
        if match_nodes(&node.children, rest, chain) {
            return true;
        }
        chain.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum M {
        Home,
        Login,
        Admin,
        Tools,
        Catalog,
    }

    fn tree() -> RouteTree<M> {
        RouteTree::new(vec![
            RouteNode::new("/", M::Home),
            RouteNode::new("/login", M::Login),
            RouteNode::new("/admin", M::Admin)
                .child(RouteNode::index(M::Tools))
                .child(RouteNode::new("tools", M::Tools))
                .child(RouteNode::new("categories", M::Catalog)),
        ])
        .unwrap()
    }

    #[test]
    fn test_match_top_level() {
        let tree = tree();
        assert_eq!(tree.match_path("/").unwrap().chain, vec![M::Home]);
        assert_eq!(tree.match_path("").unwrap().chain, vec![M::Home]);
        assert_eq!(tree.match_path("/login").unwrap().chain, vec![M::Login]);
        assert_eq!(tree.match_path("/login/").unwrap().path, "/login");
    }

    #[test]
    fn test_match_nested_and_index() {
        let tree = tree();
        let matched = tree.match_path("/admin/categories").unwrap();
        assert_eq!(matched.chain, vec![M::Admin, M::Catalog]);
        assert_eq!(matched.leaf(), Some(M::Catalog));
        assert_eq!(matched.root(), Some(M::Admin));

        assert_eq!(tree.match_path("/admin").unwrap().chain, vec![M::Admin, M::Tools]);
        assert_eq!(
            tree.match_path("/admin/tools").unwrap().chain,
            vec![M::Admin, M::Tools]
        );
    }

    #[test]
    fn test_match_ignores_query_case_and_fragment() {
        let tree = tree();
        assert_eq!(
            tree.match_path("/Admin/Categories?page=2#top").unwrap().chain,
            vec![M::Admin, M::Catalog]
        );
    }

    #[test]
    fn test_no_match() {
        let tree = tree();
        assert!(tree.match_path("/admin/unknown").is_none());
        assert!(tree.match_path("/nowhere").is_none());
        assert!(tree.match_path("/login/extra").is_none());
    }

    #[test]
    fn test_modules_deduplicated() {
        assert_eq!(
            tree().modules(),
            vec![M::Home, M::Login, M::Admin, M::Tools, M::Catalog]
        );
    }

    #[test]
    fn test_duplicate_sibling_paths_rejected() {
        let err = RouteTree::new(vec![
            RouteNode::new("/login", M::Login),
            RouteNode::new("login/", M::Home),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::DuplicatePath { .. }));
    }

    #[test]
    fn test_multiple_index_rejected() {
        let err = RouteTree::new(vec![
            RouteNode::new("/admin", M::Admin)
                .child(RouteNode::index(M::Tools))
                .child(RouteNode::index(M::Catalog)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteError::MultipleIndex {
                parent: "/admin".to_string()
            }
        );
    }

    #[test]
    fn test_index_with_children_rejected() {
        let mut index = RouteNode::index(M::Tools);
        index.children.push(RouteNode::new("x", M::Catalog));
        let err = RouteTree::new(vec![RouteNode::new("/admin", M::Admin).child(index)]).unwrap_err();
        assert!(matches!(err, RouteError::InvalidIndex { .. }));
    }

    #[test]
    fn test_same_path_under_different_parents_allowed() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/admin", M::Admin).child(RouteNode::new("tools", M::Tools)),
            RouteNode::new("/login", M::Login).child(RouteNode::new("tools", M::Catalog)),
        ]);
        assert!(tree.is_ok());
    }
}
