use super::*;
use crate::shape::Point;

fn square(x: i32, y: i32, side: i32) -> Shape {
    Shape::rectangle(x, y, x + side, y + side, Color::BLACK)
}

// =============================================================
// Id assignment
// =============================================================

#[test]
fn new_sketch_is_empty_and_starts_at_zero() {
    let sketch = Sketch::new();
    assert!(sketch.is_empty());
    assert_eq!(sketch.next_id(), Some(0));
}

#[test]
fn ids_are_sequential_from_zero() {
    let mut sketch = Sketch::new();
    assert_eq!(sketch.add_shape(square(0, 0, 1)), Some(0));
    assert_eq!(sketch.add_shape(square(0, 0, 1)), Some(1));
    assert_eq!(sketch.add_shape(square(0, 0, 1)), Some(2));
    assert_eq!(sketch.len(), 3);
}

#[test]
fn ids_are_never_reused_after_delete() {
    let mut sketch = Sketch::new();
    let a = sketch.add_shape(square(0, 0, 1));
    let b = sketch.add_shape(square(0, 0, 1));
    assert!(sketch.delete_shape(b.unwrap()));
    let c = sketch.add_shape(square(0, 0, 1));
    assert_eq!((a, b, c), (Some(0), Some(1), Some(2)));
}

#[test]
fn exhausted_sketch_refuses_adds_instead_of_reusing_ids() {
    let mut sketch = Sketch { next_id: ShapeId::MAX - 1, ..Sketch::default() };
    assert_eq!(sketch.add_shape(square(0, 0, 1)), Some(ShapeId::MAX - 1));
    assert_eq!(sketch.add_shape(square(0, 0, 1)), Some(ShapeId::MAX));
    assert_eq!(sketch.next_id(), None);

    assert!(sketch.delete_shape(ShapeId::MAX));
    assert_eq!(sketch.add_shape(square(0, 0, 1)), None);
    assert_eq!(sketch.len(), 1);
    assert_eq!(sketch.get(ShapeId::MAX), None);
}

#[test]
fn separate_sketches_have_independent_counters() {
    let mut a = Sketch::new();
    let mut b = Sketch::new();
    a.add_shape(square(0, 0, 1));
    a.add_shape(square(0, 0, 1));
    assert_eq!(b.add_shape(square(0, 0, 1)), Some(0));
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn move_translates_in_place() {
    let mut sketch = Sketch::new();
    let id = sketch.add_shape(Shape::ellipse(10, 10, 20, 20, Color::BLACK)).unwrap();
    assert!(sketch.move_shape(id, 5, 5));
    assert_eq!(sketch.get(id), Some(&Shape::ellipse(15, 15, 25, 25, Color::BLACK)));
}

#[test]
fn recolor_sets_color() {
    let mut sketch = Sketch::new();
    let id = sketch.add_shape(square(0, 0, 5)).unwrap();
    assert!(sketch.recolor_shape(id, Color::BLUE));
    assert_eq!(sketch.get(id).map(Shape::color), Some(Color::BLUE));
}

#[test]
fn stale_mutations_leave_sketch_unchanged() {
    let mut sketch = Sketch::new();
    let id = sketch.add_shape(square(0, 0, 5)).unwrap();
    sketch.add_shape(square(10, 10, 5));
    assert!(sketch.delete_shape(id));
    let before = sketch.clone();

    assert!(!sketch.delete_shape(id));
    assert!(!sketch.move_shape(id, 3, 3));
    assert!(!sketch.recolor_shape(id, Color::RED));
    assert!(!sketch.move_shape(99, 1, 1));

    assert_eq!(sketch, before);
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn snapshot_is_insertion_ordered() {
    let mut sketch = Sketch::new();
    sketch.add_shape(square(0, 0, 1));
    sketch.add_shape(square(5, 5, 1));
    sketch.add_shape(square(9, 9, 1));
    sketch.delete_shape(1);

    let ids: Vec<ShapeId> = sketch.snapshot().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![0, 2]);
    assert_eq!(sketch.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn topmost_hit_prefers_latest_shape() {
    let mut sketch = Sketch::new();
    let a = sketch.add_shape(square(0, 0, 20)).unwrap();
    let b = sketch.add_shape(square(10, 10, 20)).unwrap();
    assert_eq!(sketch.topmost_hit_at(15, 15), Some(b));
    assert_eq!(sketch.topmost_hit_at(5, 5), Some(a));
    assert_eq!(sketch.topmost_hit_at(100, 100), None);
}

#[test]
fn topmost_hit_falls_through_after_delete() {
    let mut sketch = Sketch::new();
    let a = sketch.add_shape(square(0, 0, 20)).unwrap();
    let b = sketch.add_shape(square(0, 0, 20)).unwrap();
    sketch.delete_shape(b);
    assert_eq!(sketch.topmost_hit_at(10, 10), Some(a));
}

#[test]
fn topmost_hit_on_polyline_stroke() {
    let mut sketch = Sketch::new();
    let mut line = Shape::polyline(Point::new(0, 0), Color::BLACK);
    line.push_point(Point::new(50, 0));
    line.push_point(Point::new(50, 50));
    let id = sketch.add_shape(line).unwrap();
    assert_eq!(sketch.topmost_hit_at(48, 25), Some(id));
    assert_eq!(sketch.topmost_hit_at(25, 25), None);
}

#[test]
fn identical_sequences_produce_identical_snapshots() {
    fn run(sketch: &mut Sketch) {
        let a = sketch.add_shape(Shape::ellipse(0, 0, 10, 10, Color::BLACK)).unwrap();
        let b = sketch.add_shape(Shape::segment(0, 0, 5, 5, Color::RED)).unwrap();
        sketch.move_shape(a, 3, -2);
        sketch.recolor_shape(b, Color::GREEN);
        sketch.delete_shape(a);
        sketch.move_shape(a, 1, 1);
        sketch.add_shape(square(1, 1, 1));
    }

    let mut left = Sketch::new();
    let mut right = Sketch::new();
    run(&mut left);
    run(&mut right);
    assert_eq!(left.snapshot(), right.snapshot());
    assert_eq!(left.next_id(), right.next_id());
}
