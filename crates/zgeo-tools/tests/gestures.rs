//! 通过 Session 驱动完整手势

use zgeo_core::prelude::*;
use zgeo_tools::{
    BisectorMode, CircleMode, EngineConfig, Key, PerpendicularMode, RejectReason, Session,
    ToolEvent, ToolKind, ToolState,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// 关闭网格捕捉，避免点击位置被吸附
fn session() -> Session {
    init_tracing();
    let config = EngineConfig {
        snap_to_grid: false,
        ..EngineConfig::default()
    };
    Session::new(config).expect("valid config")
}

fn click(session: &mut Session, x: f64, y: f64) -> zgeo_tools::EventOutcome {
    session.handle(ToolEvent::pointer_down(Point2::new(x, y)))
}

fn geometry(session: &Session, id: EntityId) -> Geometry {
    session.construction().get(id).expect("entity").geometry.clone()
}

#[test]
fn test_triangle_polygon_with_enter() {
    let mut s = session();
    s.set_tool(ToolKind::Polygon);

    click(&mut s, 0.0, 0.0);
    click(&mut s, 100.0, 0.0);
    click(&mut s, 50.0, 80.0);
    let outcome = s.handle(ToolEvent::key(Key::Enter));

    assert_eq!(outcome.committed.len(), 1);
    let Geometry::Polygon(polygon) = geometry(&s, outcome.committed[0]) else {
        panic!("expected polygon");
    };
    assert_eq!(polygon.vertex_count(), 3);
    assert_eq!(s.tool().state(), ToolState::Idle);
}

#[test]
fn test_circle_three_points_and_undo_redo() {
    let mut s = session();
    s.set_tool(ToolKind::Circle(CircleMode::ThreePoints));

    click(&mut s, 0.0, 0.0);
    click(&mut s, 200.0, 0.0);
    let outcome = click(&mut s, 100.0, 100.0);
    let id = outcome.committed[0];
    let Geometry::Circle(circle) = geometry(&s, id) else {
        panic!("expected circle");
    };
    assert!((circle.center - Point2::new(100.0, 0.0)).norm() < 1e-6);
    assert!((circle.radius - 100.0).abs() < 1e-6);

    let before = s.construction().get(id).cloned();
    assert!(s.undo());
    assert!(s.construction().get(id).is_none());
    assert!(s.redo());
    assert_eq!(s.construction().get(id).cloned(), before);
    assert!(!s.redo());
}

#[test]
fn test_execute_after_undo_discards_tail() {
    let mut s = session();
    s.set_tool(ToolKind::Point);
    for x in [0.0, 100.0, 200.0] {
        click(&mut s, x, 500.0);
    }
    assert!(s.undo());
    assert!(s.undo());
    let position = s.history().position();

    click(&mut s, 300.0, 500.0);
    assert_eq!(s.history().len(), position + 1);
    assert!(!s.can_redo());
}

#[test]
fn test_escape_discards_picks() {
    let mut s = session();
    s.set_tool(ToolKind::AngleBisector(BisectorMode::ThreePoints));

    click(&mut s, 0.0, 0.0);
    click(&mut s, 10.0, 0.0);
    let outcome = s.handle(ToolEvent::key(Key::Escape));
    assert!(outcome.is_cancelled());
    assert!(s.construction().is_empty());

    // 重新开始需要完整的三次拾取
    click(&mut s, 0.0, 100.0);
    click(&mut s, 100.0, 100.0);
    let outcome = click(&mut s, 100.0, 200.0);
    let Geometry::Line(ray) = geometry(&s, outcome.committed[0]) else {
        panic!("expected ray");
    };
    assert_eq!(ray.line_type, LineType::Ray);
    assert_eq!(ray.start, Point2::new(100.0, 100.0));
}

#[test]
fn test_perpendicular_from_drawn_line() {
    let mut s = session();
    s.set_tool(ToolKind::Line);
    click(&mut s, 0.0, 0.0);
    let line_id = click(&mut s, 100.0, 0.0).committed[0];

    s.set_tool(ToolKind::Perpendicular(PerpendicularMode::PointToLine));
    let miss = click(&mut s, 50.0, 300.0);
    assert_eq!(miss.rejected, Some(RejectReason::NoObject));

    click(&mut s, 50.0, 2.0);
    // 远离直线的点，不会被捕捉到直线上
    let outcome = click(&mut s, 40.0, 60.0);
    let Geometry::Line(perp) = geometry(&s, outcome.committed[0]) else {
        panic!("expected line");
    };
    assert_eq!(perp.start, Point2::new(40.0, 60.0));
    assert!((perp.end - Point2::new(40.0, 0.0)).norm() < 1e-10);
    assert!(s.construction().contains(line_id));
}

#[test]
fn test_intersection_of_two_circles() {
    let mut s = session();
    s.set_tool(ToolKind::Compass);
    click(&mut s, 0.0, 0.0);
    click(&mut s, 50.0, 0.0);
    let a = click(&mut s, 0.0, 0.0).committed[0];
    let b = click(&mut s, 80.0, 0.0).committed[0];
    s.handle(ToolEvent::key(Key::Escape));

    s.set_tool(ToolKind::Intersection);
    click(&mut s, -50.0, 0.0);
    let outcome = click(&mut s, 130.0, 0.0);
    assert_eq!(outcome.committed.len(), 2);
    for id in &outcome.committed {
        let Geometry::Point(p) = geometry(&s, *id) else {
            panic!("expected point");
        };
        assert!((p.position.x - 40.0).abs() < 1e-9);
        assert!((p.position.y.abs() - 30.0).abs() < 1e-9);
    }
    assert!(s.construction().contains(a) && s.construction().contains(b));

    // 两个交点作为一步撤销
    assert!(s.undo());
    assert_eq!(s.construction().len(), 2);
}

#[test]
fn test_box_select_then_delete_and_undo() {
    let mut s = session();
    s.set_tool(ToolKind::Point);
    let inside = click(&mut s, 50.0, 50.0).committed[0];
    let outside = click(&mut s, 500.0, 500.0).committed[0];

    s.set_tool(ToolKind::Select);
    click(&mut s, 0.0, 0.0);
    s.handle(ToolEvent::pointer_move(Point2::new(100.0, 100.0)));
    s.handle(ToolEvent::pointer_up(Point2::new(100.0, 100.0)));
    assert_eq!(s.construction().selected_ids(), vec![inside]);

    let outcome = s.handle(ToolEvent::key(Key::Delete));
    assert_eq!(outcome.deleted, vec![inside]);
    assert!(!s.construction().contains(inside));
    assert!(s.construction().contains(outside));

    assert!(s.undo());
    assert!(s.construction().contains(inside));
}

#[test]
fn test_text_follows_target() {
    let mut s = session();
    s.set_tool(ToolKind::Point);
    let point = click(&mut s, 10.0, 10.0).committed[0];

    s.set_tool(ToolKind::Text);
    let text = click(&mut s, 10.0, 10.0).committed[0];
    let Geometry::Text(label) = geometry(&s, text) else {
        panic!("expected text");
    };
    assert_eq!(label.target, Some(point));

    let anchor = s.construction().text_position(text).unwrap();
    assert_eq!(anchor, Point2::new(10.0, 10.0) + zgeo_core::construction::label_offset());
}
