//! 交点工具
//!
//! 拾取两个不同的直线或圆，为每个交点创建一个点对象。没有交点时
//! 手势照常完成，不创建任何对象。

use crate::tool::{
    Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse, ToolState,
};
use tracing::debug;
use zgeo_core::entity::EntityId;
use zgeo_core::geometry::{Geometry, Point};

/// 交点工具
pub struct IntersectionTool {
    first: Option<EntityId>,
}

impl IntersectionTool {
    pub fn new() -> Self {
        Self { first: None }
    }

    /// 拾取的对象必须是直线或圆
    fn pick_object<'a>(ctx: &ToolContext<'a>, pick: &Pick) -> Result<(EntityId, &'a Geometry), RejectReason> {
        let id = pick.hit.ok_or(RejectReason::NoObject)?;
        let entity = ctx.entity(id).ok_or(RejectReason::NoObject)?;
        match entity.geometry {
            Geometry::Line(_) | Geometry::Circle(_) => Ok((id, &entity.geometry)),
            _ => Err(RejectReason::WrongObjectType),
        }
    }
}

impl Default for IntersectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for IntersectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Intersection
    }

    fn state(&self) -> ToolState {
        if self.first.is_some() {
            ToolState::Active
        } else {
            ToolState::Idle
        }
    }

    fn reset(&mut self) {
        self.first = None;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let (id, geometry) = match Self::pick_object(ctx, pick) {
            Ok(hit) => hit,
            Err(reason) => return ToolResponse::Rejected(reason),
        };

        let Some(first_id) = self.first else {
            self.first = Some(id);
            return ToolResponse::Continue;
        };
        if first_id == id {
            return ToolResponse::Rejected(RejectReason::SameObject);
        }
        let Some(first) = ctx.entity(first_id) else {
            // 第一个对象已不存在，改用本次拾取重新开始
            self.first = Some(id);
            return ToolResponse::Continue;
        };

        let points = first.geometry.intersect(geometry);
        debug!("{} 与 {} 的交点数: {}", first_id, id, points.len());
        self.reset();
        ToolResponse::Commit(
            points
                .into_iter()
                .map(|p| Geometry::Point(Point::from_point2(p)))
                .collect(),
        )
    }

    fn prompt(&self) -> &str {
        match self.first {
            None => "选择第一个对象:",
            Some(_) => "选择第二个对象:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let Some(first) = self.first.and_then(|id| ctx.entity(id)) else {
            return vec![];
        };
        let mut previews = vec![PreviewGeometry::reference(first.geometry.clone())];
        // 悬停在第二个对象上时显示交点
        if let Ok((id, geometry)) = Self::pick_object(ctx, pick) {
            if id != first.id {
                previews.extend(
                    first
                        .geometry
                        .intersect(geometry)
                        .into_iter()
                        .map(|p| PreviewGeometry::new(Geometry::Point(Point::from_point2(p)))),
                );
            }
        }
        previews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use zgeo_core::construction::Construction;
    use zgeo_core::geometry::{Circle, Line};
    use zgeo_core::math::Point2;

    fn add(c: &mut Construction, geometry: Geometry) -> EntityId {
        let entity = c.new_entity(geometry).unwrap();
        let id = entity.id;
        c.insert(entity).unwrap();
        id
    }

    fn hit(id: EntityId) -> Pick {
        Pick {
            hit: Some(id),
            ..Pick::at(Point2::new(0.0, 0.0))
        }
    }

    #[test]
    fn test_line_line() {
        let mut c = Construction::new();
        let a = add(&mut c, Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0))));
        let b = add(&mut c, Geometry::Line(Line::new(Point2::new(0.0, 4.0), Point2::new(4.0, 0.0))));
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = IntersectionTool::new();

        assert_eq!(tool.on_pointer_down(&ctx, &hit(a)), ToolResponse::Continue);
        assert_eq!(
            tool.on_pointer_down(&ctx, &hit(a)),
            ToolResponse::Rejected(RejectReason::SameObject)
        );
        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &hit(b)) else {
            panic!("expected commit");
        };
        assert_eq!(geoms.len(), 1);
        let Geometry::Point(point) = &geoms[0] else {
            panic!("expected point");
        };
        assert!((point.position - Point2::new(2.0, 2.0)).norm() < 1e-10);
        assert_eq!(tool.state(), ToolState::Idle);
    }

    #[test]
    fn test_line_circle_two_points() {
        let mut c = Construction::new();
        let line = add(&mut c, Geometry::Line(Line::new(Point2::new(-20.0, 0.0), Point2::new(20.0, 0.0))));
        let circle = add(&mut c, Geometry::Circle(Circle::new(Point2::new(0.0, 0.0), 10.0)));
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = IntersectionTool::new();

        tool.on_pointer_down(&ctx, &hit(line));
        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &hit(circle)) else {
            panic!("expected commit");
        };
        assert_eq!(geoms.len(), 2);
    }

    #[test]
    fn test_parallel_commits_nothing() {
        let mut c = Construction::new();
        let a = add(&mut c, Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0))));
        let b = add(&mut c, Geometry::Line(Line::new(Point2::new(0.0, 5.0), Point2::new(4.0, 9.0))));
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = IntersectionTool::new();

        tool.on_pointer_down(&ctx, &hit(a));
        assert_eq!(tool.on_pointer_down(&ctx, &hit(b)), ToolResponse::Commit(vec![]));
        assert_eq!(tool.state(), ToolState::Idle);
    }

    #[test]
    fn test_wrong_type() {
        let mut c = Construction::new();
        let p = add(&mut c, Geometry::Point(Point::new(1.0, 1.0)));
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = IntersectionTool::new();

        assert_eq!(
            tool.on_pointer_down(&ctx, &hit(p)),
            ToolResponse::Rejected(RejectReason::WrongObjectType)
        );
        assert_eq!(tool.state(), ToolState::Idle);
    }

    #[test]
    fn test_preview_hovered_intersections() {
        let mut c = Construction::new();
        let line = add(&mut c, Geometry::Line(Line::new(Point2::new(-20.0, 0.0), Point2::new(20.0, 0.0))));
        let circle = add(&mut c, Geometry::Circle(Circle::new(Point2::new(0.0, 0.0), 10.0)));
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = IntersectionTool::new();

        tool.on_pointer_down(&ctx, &hit(line));
        let previews = tool.preview(&ctx, &Pick::at(Point2::new(50.0, 50.0)));
        assert_eq!(previews.len(), 1);
        assert!(previews[0].is_reference);

        let previews = tool.preview(&ctx, &hit(circle));
        assert_eq!(previews.len(), 3);
        assert!(previews[1..]
            .iter()
            .all(|p| matches!(p.geometry, Geometry::Point(_)) && !p.is_reference));
    }
}
