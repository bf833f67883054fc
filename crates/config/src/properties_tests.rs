use super::*;

#[test]
fn unrecognized_key_is_rejected() {
    let mut props = PropertyMap::storage_service();
    let err = props.set("NOT_A_REAL_PROPERTY", "1").unwrap_err();
    assert_eq!(err, PropertyError::Unrecognized("NOT_A_REAL_PROPERTY".to_string()));
}

#[test]
fn scheduler_properties_are_scoped_separately_from_storage_properties() {
    let mut scheduler = PropertyMap::scheduler();
    assert!(scheduler.set(CACHE_MAX_LIFETIME, "1").is_err());
    scheduler.set(TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN, "true").unwrap();
    assert_eq!(scheduler.as_bool(TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN, false).unwrap(), true);
}

#[test]
fn missing_key_falls_back_to_the_supplied_default() {
    let props = PropertyMap::storage_service();
    assert_eq!(props.as_bool(REDUCED_SIMULATION, false).unwrap(), false);
    assert_eq!(props.as_duration(CACHE_MAX_LIFETIME, Duration::from_secs(300)).unwrap(), Duration::from_secs(300));
}

#[test]
fn as_duration_parses_fractional_seconds() {
    let mut props = PropertyMap::storage_service();
    props.set(CACHE_MAX_LIFETIME, "1.5").unwrap();
    assert_eq!(props.as_duration(CACHE_MAX_LIFETIME, Duration::ZERO).unwrap(), Duration::from_secs_f64(1.5));
}

#[test]
fn as_bytes_rejects_a_non_integer_value() {
    let mut props = PropertyMap::storage_service();
    props.set(BUFFER_SIZE, "not-a-number").unwrap();
    let err = props.as_bytes(BUFFER_SIZE, 0).unwrap_err();
    assert!(matches!(err, PropertyError::InvalidValue { expected: "bytes", .. }));
}

#[test]
fn as_bool_rejects_a_non_bool_value() {
    let mut props = PropertyMap::storage_service();
    props.set(REDUCED_SIMULATION, "yes").unwrap();
    let err = props.as_bool(REDUCED_SIMULATION, false).unwrap_err();
    assert!(matches!(err, PropertyError::InvalidValue { expected: "bool", .. }));
}
