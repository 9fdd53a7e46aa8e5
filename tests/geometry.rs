use cultivate::geometry::*;

#[test]
fn test_manhattan_is_symmetric() {
    let a = Position::new(-4, 9);
    let b = Position::new(3, 1);
    assert_eq!(distance_manhattan(a, b), distance_manhattan(b, a));
    assert_eq!(distance_manhattan(a, b), 15);
}

#[test]
fn test_chebyshev_never_exceeds_manhattan() {
    for (x, y) in [(0, 0), (3, 4), (-7, 2), (10, -10)] {
        let p = Position::new(x, y);
        assert!(distance_chebyshev(Position::ZERO, p) <= distance_manhattan(Position::ZERO, p));
    }
}

#[test]
fn test_reach_is_a_square() {
    let o = Position::new(0, 0);
    assert!(within_reach(o, Position::new(48, 48), 48));
    assert!(within_reach(o, Position::new(-48, 48), 48));
    assert!(!within_reach(o, Position::new(49, 0), 48));
}

#[test]
fn test_rect_edges() {
    let r = Rect::new(269, 333, 16, 16);
    assert_eq!(r.right(), 285);
    assert_eq!(r.bottom(), 349);
    assert!(!r.is_empty());
    assert!(Rect::new(0, 0, 0, 16).is_empty());
}
