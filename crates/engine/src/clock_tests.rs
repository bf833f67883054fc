use super::*;

#[test]
fn fake_clock_starts_at_zero() {
    let clock = FakeClock::new();
    assert_eq!(clock.now(), 0.0);
}

#[test]
fn fake_clock_advance_moves_now_forward() {
    let clock = FakeClock::new();
    clock.advance(Duration::from_secs(30));
    assert_eq!(clock.now(), 30.0);
}

#[test]
fn fake_clock_set_overrides_absolute_time() {
    let clock = FakeClock::new();
    clock.set(100.0);
    assert_eq!(clock.now(), 100.0);
}

#[tokio::test]
async fn fake_clock_sleep_for_advances_time_without_waiting() {
    let clock = FakeClock::new();
    clock.sleep_for(Duration::from_secs(10)).await;
    assert_eq!(clock.now(), 10.0);
}

#[tokio::test(start_paused = true)]
async fn virtual_clock_sleep_for_advances_paused_time() {
    let clock = VirtualClock::new();
    let before = clock.now();
    clock.sleep_for(Duration::from_secs(5)).await;
    let after = clock.now();
    assert!(after - before >= 5.0);
}
