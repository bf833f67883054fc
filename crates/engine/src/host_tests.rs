use super::*;

#[test]
fn unregistered_host_has_no_capacity() {
    let catalog = HostCatalog::new();
    let host = HostId::new();
    assert_eq!(catalog.cores(host), None);
    assert_eq!(catalog.compute_duration(host, 1.0, 1), None);
}

#[test]
fn compute_duration_scales_with_flops() {
    let mut catalog = HostCatalog::new();
    let host = HostId::new();
    catalog.register_host(host, 4, 1024.0, 1.0e9);
    let d1 = catalog.compute_duration(host, 1.0e9, 1).unwrap();
    let d2 = catalog.compute_duration(host, 2.0e9, 1).unwrap();
    assert!(d2 > d1);
}

#[test]
fn more_threads_shortens_duration_up_to_core_count() {
    let mut catalog = HostCatalog::new();
    let host = HostId::new();
    catalog.register_host(host, 4, 1024.0, 4.0e9);
    let one_thread = catalog.compute_duration(host, 4.0e9, 1).unwrap();
    let four_threads = catalog.compute_duration(host, 4.0e9, 4).unwrap();
    assert!(four_threads < one_thread);
}

#[test]
fn thread_count_is_capped_at_host_core_count() {
    let mut catalog = HostCatalog::new();
    let host = HostId::new();
    catalog.register_host(host, 2, 1024.0, 2.0e9);
    let capped = catalog.compute_duration(host, 2.0e9, 100).unwrap();
    let at_cap = catalog.compute_duration(host, 2.0e9, 2).unwrap();
    assert_eq!(capped, at_cap);
}

#[tokio::test]
async fn set_state_notifies_subscribers() {
    let catalog = HostCatalog::new();
    let host = HostId::new();
    let mut rx = catalog.subscribe();
    catalog.set_state(host, HostState::Down);
    rx.changed().await.unwrap();
    let (changed_host, state) = *rx.borrow();
    assert_eq!(changed_host, host);
    assert_eq!(state, HostState::Down);
}
