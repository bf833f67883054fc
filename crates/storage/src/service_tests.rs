use super::*;
use wrench_core::FileRegistry;

fn file(registry: &FileRegistry, name: &str, size: u64) -> Arc<DataFile> {
    registry.add_file(name, size)
}

#[test]
fn write_then_lookup_finds_the_file() {
    let registry = FileRegistry::new();
    let svc = SimpleStorageService::new(1_000);
    let f = file(&registry, "a", 100);
    svc.write_file(f.clone(), Path::new("/data")).unwrap();
    assert!(svc.lookup_file(f.id(), Path::new("/data")));
    assert!(!svc.lookup_file(f.id(), Path::new("/other")));
}

#[test]
fn write_over_capacity_fails() {
    let registry = FileRegistry::new();
    let svc = SimpleStorageService::new(50);
    let f = file(&registry, "big", 100);
    let err = svc.write_file(f.clone(), Path::new("/data")).unwrap_err();
    assert_eq!(err, FailureCause::StorageServiceNotEnoughSpace { file: f.id(), storage_service: svc.id() });
}

#[test]
fn writing_the_same_file_twice_does_not_double_charge_capacity() {
    let registry = FileRegistry::new();
    let svc = SimpleStorageService::new(100);
    let f = file(&registry, "a", 60);
    svc.write_file(f.clone(), Path::new("/data")).unwrap();
    svc.write_file(f.clone(), Path::new("/data")).unwrap();
    assert_eq!(svc.occupied_space(), 60);
}

#[test]
fn delete_frees_capacity() {
    let registry = FileRegistry::new();
    let svc = SimpleStorageService::new(100);
    let f = file(&registry, "a", 60);
    svc.write_file(f.clone(), Path::new("/data")).unwrap();
    svc.delete_file(f.id(), Path::new("/data")).unwrap();
    assert_eq!(svc.occupied_space(), 0);
    assert!(!svc.lookup_file(f.id(), Path::new("/data")));
}

#[test]
fn delete_unknown_file_fails_with_file_not_found() {
    let svc = SimpleStorageService::new(100);
    let missing = FileId::new();
    let err = svc.delete_file(missing, Path::new("/data")).unwrap_err();
    assert_eq!(err, FailureCause::FileNotFound { file: missing, location: "/data".to_string() });
}

#[test]
fn read_file_fails_when_absent() {
    let svc = SimpleStorageService::new(100);
    let missing = FileId::new();
    assert!(svc.read_file(missing, Path::new("/data")).is_err());
}

#[test]
fn copy_file_moves_between_services() {
    let registry = FileRegistry::new();
    let src = SimpleStorageService::new(100);
    let dst = SimpleStorageService::new(100);
    let f = file(&registry, "a", 60);
    src.write_file(f.clone(), Path::new("/src")).unwrap();
    src.copy_file(f.clone(), Path::new("/src"), &dst, Path::new("/dst")).unwrap();
    assert!(dst.lookup_file(f.id(), Path::new("/dst")));
}

#[test]
fn copy_missing_source_file_fails() {
    let registry = FileRegistry::new();
    let src = SimpleStorageService::new(100);
    let dst = SimpleStorageService::new(100);
    let f = file(&registry, "a", 60);
    let err = src.copy_file(f.clone(), Path::new("/src"), &dst, Path::new("/dst")).unwrap_err();
    assert_eq!(err, FailureCause::FileNotFound { file: f.id(), location: "/src".to_string() });
}
