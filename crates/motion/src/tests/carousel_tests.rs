use super::*;

fn at(t0: Instant, millis: u64) -> Instant {
    t0 + Duration::from_millis(millis)
}

#[test]
fn empty_carousel_renders_nothing_and_never_wakes() {
    let mut carousel: Carousel<&str> = Carousel::new(Vec::new());
    let now = Instant::now();
    assert!(carousel.frame(now).is_none());
    assert!(carousel.next_deadline().is_none());
}

#[test]
fn single_slide_is_static() {
    let mut carousel = Carousel::new(vec!["only"]);
    let t0 = Instant::now();
    for millis in [0, 5_000, 60_000] {
        let frame = carousel.frame(at(t0, millis)).expect("frame");
        assert_eq!(*frame.current, "only");
        assert!(frame.previous.is_none());
        assert_eq!(frame.blend, 1.0);
    }
    assert!(carousel.next_deadline().is_none());
}

#[test]
fn no_deadline_before_first_observation() {
    let carousel = Carousel::new(vec!["a", "b"]);
    assert!(carousel.next_deadline().is_none());
}

#[test]
fn advances_once_per_interval() {
    let mut carousel = Carousel::new(vec!["a", "b", "c"]);
    let t0 = Instant::now();

    let frame = carousel.frame(t0).expect("frame");
    assert_eq!(*frame.current, "a");
    assert_eq!(frame.blend, 1.0);
    assert_eq!(carousel.next_deadline(), Some(at(t0, 5_000)));

    let frame = carousel.frame(at(t0, 5_000)).expect("frame");
    assert_eq!(*frame.current, "b");
    assert_eq!(frame.previous.copied(), Some("a"));
    assert_eq!(frame.blend, 0.0);
}

#[test]
fn crossfade_blend_ramps_over_its_window() {
    let mut carousel = Carousel::new(vec!["a", "b"]);
    let t0 = Instant::now();
    let _ = carousel.frame(t0);

    let frame = carousel.frame(at(t0, 5_500)).expect("frame");
    assert!((frame.blend - 0.5).abs() < 1e-9);
    assert_eq!(frame.previous.copied(), Some("a"));
    // While fading, the next wakeup is the end of the fade.
    assert_eq!(carousel.next_deadline(), Some(at(t0, 6_000)));

    let frame = carousel.frame(at(t0, 6_100)).expect("frame");
    assert_eq!(frame.blend, 1.0);
    assert!(frame.previous.is_none());
    assert_eq!(carousel.next_deadline(), Some(at(t0, 10_000)));
}

#[test]
fn wraps_back_to_the_first_slide() {
    let mut carousel = Carousel::new(vec!["a", "b", "c"]);
    let t0 = Instant::now();
    let _ = carousel.frame(t0);
    let _ = carousel.frame(at(t0, 5_000));
    let _ = carousel.frame(at(t0, 10_000));
    let frame = carousel.frame(at(t0, 15_000)).expect("frame");
    assert_eq!(*frame.current, "a");
    assert_eq!(carousel.index(), 0);
}

#[test]
fn catches_up_after_a_long_pause() {
    let mut carousel = Carousel::new(vec!["a", "b", "c"]);
    let t0 = Instant::now();
    let _ = carousel.frame(t0);

    // 15.5s later: three whole intervals elapsed, fade half done.
    let frame = carousel.frame(at(t0, 15_500)).expect("frame");
    assert_eq!(*frame.current, "a");
    assert_eq!(frame.previous.copied(), Some("c"));
    assert!((frame.blend - 0.5).abs() < 1e-9);
}
