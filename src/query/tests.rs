use std::sync::Arc;

use super::{bounding_box_of, contained_in, containing, id_order, ids_of, intersected_by};
use crate::test_util::Shape;
use crate::{Entity, Point, Rect};

fn sample() -> Vec<Arc<Shape>> {
    vec![
        Shape::with_id(3, "inner", Rect::new(10, 10, 20, 20)),
        Shape::with_id(1, "overlap", Rect::new(90, 90, 50, 50)),
        Shape::with_id(2, "outside", Rect::new(200, 200, 5, 5)),
    ]
}

fn labels<'t>(shapes: &[&'t Arc<Shape>]) -> Vec<&'t str> {
    shapes.iter().map(|&shape| shape.label.as_str()).collect()
}

#[test]
fn test_bounding_box_of() {
    let shapes = sample();

    assert_eq!(bounding_box_of(&shapes), Some(Rect::new(10, 10, 195, 195)));
    assert_eq!(bounding_box_of(shapes.iter().take(1)), Some(Rect::new(10, 10, 20, 20)));
    assert_eq!(bounding_box_of(Vec::<Arc<Shape>>::new()), None);
}

#[test]
fn test_contained_in_excludes_partial_overlap() {
    let shapes = sample();
    let canvas = Rect::new(0, 0, 100, 100);

    assert_eq!(labels(&contained_in(&shapes, &canvas)), ["inner"]);
    assert_eq!(labels(&intersected_by(&shapes, &canvas)), ["inner", "overlap"]);
}

#[test]
fn test_results_follow_encounter_order() {
    let shapes = sample();
    let everything = Rect::new(0, 0, 1000, 1000);

    assert_eq!(labels(&contained_in(shapes.iter().rev(), &everything)), [
        "outside", "overlap", "inner"
    ]);
}

#[test]
fn test_empty_results() {
    let shapes = sample();

    assert!(contained_in(&shapes, &Rect::new(500, 500, 10, 10)).is_empty());
    assert!(intersected_by(&shapes, &Rect::new(500, 500, 10, 10)).is_empty());
    assert!(containing(&shapes, Point::new(-1, -1)).is_empty());
}

#[test]
fn test_containing() {
    let shapes = sample();

    assert_eq!(labels(&containing(&shapes, Point::new(15, 15))), ["inner"]);
    assert_eq!(labels(&containing(&shapes, Point::new(100, 100))), ["overlap"]);
}

#[test]
fn test_borrowed_entities() {
    let shapes = sample();
    let borrowed: Vec<&Shape> = shapes.iter().map(|shape| &**shape).collect();

    let found = containing(borrowed, Point::new(202, 202));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), 2);
}

#[test]
fn test_id_order_on_heterogeneous_entities() {
    let mut entities: Vec<Arc<dyn Entity>> = vec![
        Shape::with_id(9, "nine", Rect::new(0, 0, 1, 1)),
        Arc::new(crate::test_util::Broken { id: crate::Identity::with_id(4), panic: false }),
        Shape::with_id(6, "six", Rect::new(0, 0, 1, 1)),
    ];

    entities.sort_by(|a, b| id_order(&**a, &**b));
    assert_eq!(entities.iter().map(|entity| entity.id()).collect::<Vec<_>>(), [4, 6, 9]);
}

#[test]
fn test_ids_of() {
    let mut shapes = sample();
    shapes.sort_by(id_order);

    assert_eq!(ids_of(Some(&shapes)), "[#1#2#3]");
    assert_eq!(ids_of(Some(Vec::<Arc<Shape>>::new())), "[]");
    assert_eq!(ids_of(None::<Vec<Arc<Shape>>>), "");
}
