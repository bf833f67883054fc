use super::*;

#[test]
fn files_with_different_ids_are_not_equal() {
    let registry = FileRegistry::new();
    let a = registry.add_file("a.dat", 100);
    let b = registry.add_file("b.dat", 100);
    assert_ne!(a, b);
}

#[test]
fn same_handle_is_equal_to_itself() {
    let registry = FileRegistry::new();
    let a = registry.add_file("a.dat", 100);
    let looked_up = registry.get(a.id()).unwrap();
    assert_eq!(a, looked_up);
    assert_eq!(a.size_in_bytes(), 100);
}

#[test]
fn unknown_id_is_absent() {
    let registry = FileRegistry::new();
    assert!(registry.get(FileId::new()).is_none());
}

#[test]
fn registry_tracks_len() {
    let registry = FileRegistry::new();
    assert!(registry.is_empty());
    registry.add_file("a.dat", 1);
    registry.add_file("b.dat", 1);
    assert_eq!(registry.len(), 2);
}
