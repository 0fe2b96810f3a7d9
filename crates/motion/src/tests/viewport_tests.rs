use super::*;

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

#[test]
fn fully_contained_target_reports_one() {
    let target = Rect::new(100.0, 100.0, 300.0, 200.0);
    assert_eq!(visible_fraction(target, VIEWPORT, Margin::ZERO), 1.0);
}

#[test]
fn disjoint_target_reports_zero() {
    let target = Rect::new(0.0, 700.0, 100.0, 760.0);
    assert_eq!(visible_fraction(target, VIEWPORT, Margin::ZERO), 0.0);
}

#[test]
fn partial_overlap_reports_area_fraction() {
    // Bottom half of the target hangs below the viewport.
    let target = Rect::new(0.0, 550.0, 100.0, 650.0);
    let fraction = visible_fraction(target, VIEWPORT, Margin::ZERO);
    assert!((fraction - 0.5).abs() < 1e-9);
}

#[test]
fn positive_margin_extends_the_region() {
    let target = Rect::new(0.0, -20.0, 100.0, -10.0);
    assert_eq!(visible_fraction(target, VIEWPORT, Margin::ZERO), 0.0);
    assert_eq!(visible_fraction(target, VIEWPORT, Margin::top_only(30.0)), 1.0);
}

#[test]
fn negative_margin_shrinks_the_region() {
    let target = Rect::new(0.0, 10.0, 100.0, 40.0);
    assert_eq!(visible_fraction(target, VIEWPORT, Margin::ZERO), 1.0);
    assert_eq!(
        visible_fraction(target, VIEWPORT, Margin::top_only(-50.0)),
        0.0
    );
}

#[test]
fn zero_area_sentinel_degenerates_to_point_test() {
    let on_screen = Rect::new(50.0, 100.0, 250.0, 100.0);
    assert_eq!(visible_fraction(on_screen, VIEWPORT, Margin::ZERO), 1.0);

    let off_screen = Rect::new(50.0, -10.0, 250.0, -10.0);
    assert_eq!(visible_fraction(off_screen, VIEWPORT, Margin::ZERO), 0.0);
}

#[test]
fn zero_threshold_still_requires_overlap() {
    let outside = Rect::new(0.0, 700.0, 100.0, 750.0);
    assert!(!sentinel_visible(outside, VIEWPORT, Margin::ZERO, 0.0));

    let sliver = Rect::new(0.0, 599.0, 100.0, 650.0);
    assert!(sentinel_visible(sliver, VIEWPORT, Margin::ZERO, 0.0));
}

#[test]
fn fractional_threshold_gates_on_visible_share() {
    let half = Rect::new(0.0, 550.0, 100.0, 650.0);
    assert!(sentinel_visible(half, VIEWPORT, Margin::ZERO, 0.5));
    assert!(!sentinel_visible(half, VIEWPORT, Margin::ZERO, 0.6));
}
