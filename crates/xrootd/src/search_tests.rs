use super::*;
use wrench_core::FileRegistry;
use wrench_storage::SimpleStorageService;

fn storage() -> Arc<SimpleStorageService> {
    Arc::new(SimpleStorageService::new(1_000))
}

/// root -> {a, b}, each with one leaf storage child: a_leaf, b_leaf.
fn small_tree() -> (XRootDDeployment, NodeId, NodeId, NodeId) {
    let mut dep = XRootDDeployment::new();
    let root = dep.create_supervisor();
    let a = dep.create_supervisor();
    let b = dep.create_supervisor();
    let a_leaf = dep.create_storage_server(storage());
    let b_leaf = dep.create_storage_server(storage());
    dep.attach_child(root, a);
    dep.attach_child(root, b);
    dep.attach_child(a, a_leaf);
    dep.attach_child(b, b_leaf);
    (dep, root, a_leaf, b_leaf)
}

#[test]
fn broadcast_finds_a_file_registered_on_a_distant_leaf() {
    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let overlay = XRootDOverlay::new(dep);
    let outcome = overlay.find_file(root, file.id(), 0.0);

    let location = outcome.location.expect("file should be found");
    assert_eq!(location.file_id(), file.id());
    assert!(outcome.hops > 0);
}

#[test]
fn unregistered_file_is_not_found() {
    let (dep, root, _a_leaf, _b_leaf) = small_tree();
    let overlay = XRootDOverlay::new(dep);
    let outcome = overlay.find_file(root, FileId::new(), 0.0);
    assert!(outcome.location.is_none());
}

#[test]
fn second_lookup_hits_the_warmed_cache() {
    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let overlay = XRootDOverlay::new(dep);
    let first = overlay.find_file(root, file.id(), 0.0);
    assert!(first.hops > 0);

    let second = overlay.find_file(root, file.id(), 1.0);
    assert_eq!(second.hops, 0);
    assert_eq!(second.location.unwrap().file_id(), file.id());
}

#[test]
fn reduced_simulation_mode_skips_the_broadcast() {
    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let mut overlay = XRootDOverlay::new(dep);
    overlay.reduced_simulation = true;
    let outcome = overlay.find_file(root, file.id(), 0.0);

    assert_eq!(outcome.hops, 0);
    assert_eq!(outcome.location.unwrap().file_id(), file.id());
}

#[test]
fn stale_cache_entry_is_not_reused() {
    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let overlay = XRootDOverlay::new(dep);
    let first = overlay.find_file(root, file.id(), 0.0);
    assert!(first.hops > 0);

    let far_future = crate::cache::CACHE_MAX_LIFETIME_SECS + 1.0;
    let second = overlay.find_file(root, file.id(), far_future);
    assert!(second.hops > 0, "stale cache entry should trigger a fresh broadcast");
}

#[test]
fn with_properties_honors_a_shorter_configured_cache_lifetime() {
    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let overlay = XRootDOverlay::with_properties(dep, false, 1.0);
    let first = overlay.find_file(root, file.id(), 0.0);
    assert!(first.hops > 0);

    let second = overlay.find_file(root, file.id(), 1.5);
    assert!(second.hops > 0, "entry past the configured 1s lifetime should be treated as stale");
}

#[test]
fn a_broadcast_search_charges_its_configured_overheads() {
    use wrench_config::properties::{CACHE_LOOKUP_OVERHEAD, MESSAGE_OVERHEAD, SEARCH_BROADCAST_OVERHEAD, UPDATE_CACHE_OVERHEAD};

    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let mut props = PropertyMap::storage_service();
    props.set(CACHE_LOOKUP_OVERHEAD, "0.1").unwrap();
    props.set(MESSAGE_OVERHEAD, "0.2").unwrap();
    props.set(SEARCH_BROADCAST_OVERHEAD, "1.0").unwrap();
    props.set(UPDATE_CACHE_OVERHEAD, "0.05").unwrap();

    let overlay = XRootDOverlay::from_properties(dep, &props);
    let first = overlay.find_file(root, file.id(), 0.0);
    let expected = Duration::from_secs_f64(0.1 + 1.0 + first.hops as f64 * (0.2 + 0.05));
    assert_eq!(first.duration, expected);
}

#[test]
fn a_cache_hit_charges_exactly_one_cache_lookup_overhead() {
    use wrench_config::properties::CACHE_LOOKUP_OVERHEAD;

    let (mut dep, root, a_leaf, _b_leaf) = small_tree();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 4_096);
    dep.register_file_location(file.clone(), a_leaf, "/data/f");

    let mut props = PropertyMap::storage_service();
    props.set(CACHE_LOOKUP_OVERHEAD, "0.1").unwrap();

    let overlay = XRootDOverlay::from_properties(dep, &props);
    overlay.find_file(root, file.id(), 0.0);

    let second = overlay.find_file(root, file.id(), 1.0);
    assert_eq!(second.hops, 0);
    assert_eq!(second.duration, Duration::from_secs_f64(0.1));
}
