//! End-to-end behavior of the composition core without a GUI toolkit.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use portal_core::{
    Boundary, ClassMarkerCodec, DocumentStyle, FallbackPalette, FallbackRenderer, ModuleRegistry,
    ModuleStatus, RouteNode, RouteTree, Router, StyleSurface, SuspenseBoundary, ThemeObserver,
    ThemeState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Page {
    Home,
    Admin,
    Tools,
    Catalog,
}

fn routes() -> RouteTree<Page> {
    RouteTree::new(vec![
        RouteNode::new("/", Page::Home),
        RouteNode::new("/admin", Page::Admin)
            .child(RouteNode::index(Page::Tools))
            .child(RouteNode::new("tools", Page::Tools))
            .child(RouteNode::new("categories", Page::Catalog)),
    ])
    .unwrap()
}

fn registry(catalog_calls: Arc<AtomicUsize>) -> ModuleRegistry<Page, String> {
    let mut registry = ModuleRegistry::new();
    for page in [Page::Home, Page::Admin, Page::Tools] {
        registry.register_fn(page, move || async move { Ok(format!("{page:?}")) });
    }
    registry.register_fn(Page::Catalog, move || {
        catalog_calls.fetch_add(1, Ordering::SeqCst);
        async { Ok("Catalog".to_string()) }
    });
    registry
}

fn observer(surface: &DocumentStyle) -> ThemeObserver {
    ThemeObserver::activate(surface, Arc::new(ClassMarkerCodec::new(surface.clone())))
}

#[tokio::test]
async fn test_navigate_to_unloaded_page_shows_light_fallback_then_page() {
    let surface = DocumentStyle::new();
    let observer = observer(&surface);
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = registry(Arc::clone(&calls));
    let routes = routes();

    let matched = routes.match_path("/admin/categories").unwrap();
    let Boundary::Suspended { started } = SuspenseBoundary::evaluate(&mut registry, &matched) else {
        panic!("expected the fallback while modules load");
    };
    let fallback = FallbackRenderer::mount(&observer);
    assert_eq!(fallback.palette().background.to_css(), "#ffffff");

    // Second rapid navigation during the pending window.
    let again = routes.match_path("/admin/categories").unwrap();
    let boundary = SuspenseBoundary::evaluate(&mut registry, &again);
    assert!(matches!(boundary, Boundary::Suspended { ref started } if started.is_empty()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    for load in started {
        load.wait().await.unwrap();
    }

    let Boundary::Ready(modules) = SuspenseBoundary::evaluate(&mut registry, &matched) else {
        panic!("expected the page once loaded");
    };
    let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
    assert_eq!(names, vec!["Admin", "Catalog"]);
    assert_eq!(registry.status(Page::Catalog), Some(ModuleStatus::Ready));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_theme_toggle_flips_mounted_fallback() {
    let surface = DocumentStyle::new();
    let observer = observer(&surface);
    let mut registry = registry(Arc::new(AtomicUsize::new(0)));
    let matched = routes().match_path("/admin").unwrap();

    assert!(SuspenseBoundary::evaluate(&mut registry, &matched).is_suspended());
    let mut fallback = FallbackRenderer::mount(&observer);
    assert_eq!(fallback.palette(), FallbackPalette::LIGHT);

    surface.toggle_class("dark-mode");
    assert!(fallback.poll_changed());
    assert_eq!(fallback.palette(), FallbackPalette::DARK);
    assert_eq!(fallback.rendered_theme(), ThemeState::Dark);
}

#[test]
fn test_unrecognized_initial_marker_renders_light() {
    let surface = DocumentStyle::with_classes("sepia compact");
    let observer = observer(&surface);
    let fallback = FallbackRenderer::mount(&observer);
    assert_eq!(fallback.palette(), FallbackPalette::LIGHT);
}

#[test]
fn test_index_route_loads_container_and_index_page() {
    let mut registry = registry(Arc::new(AtomicUsize::new(0)));
    let matched = routes().match_path("/admin/").unwrap();
    assert_eq!(matched.chain, vec![Page::Admin, Page::Tools]);

    let Boundary::Suspended { started } = SuspenseBoundary::evaluate(&mut registry, &matched) else {
        panic!("expected suspension");
    };
    let modules: Vec<&str> = started.iter().map(|load| load.module()).collect();
    assert_eq!(modules, vec!["Admin", "Tools"]);
}
