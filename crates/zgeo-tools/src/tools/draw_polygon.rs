//! 多边形工具
//!
//! 逐点添加顶点；至少3个顶点后，双击、回车或点击首顶点附近时闭合。

use crate::tool::{
    Key, Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse,
    ToolState,
};
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Geometry, Line, Polygon};
use zgeo_core::math::{points_coincide, Point2, EPSILON};

/// 多边形工具
pub struct PolygonTool {
    vertices: Vec<Point2>,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 闭合并提交
    fn close(&mut self) -> ToolResponse {
        if self.vertices.len() < 3 {
            return ToolResponse::Rejected(RejectReason::Degenerate(GeometryError::InvalidSides(
                self.vertices.len(),
            )));
        }
        let polygon = Polygon::new(std::mem::take(&mut self.vertices));
        ToolResponse::Commit(vec![Geometry::Polygon(polygon)])
    }
}

impl Default for PolygonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PolygonTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polygon
    }

    fn state(&self) -> ToolState {
        if self.vertices.is_empty() {
            ToolState::Idle
        } else {
            ToolState::Active
        }
    }

    fn reset(&mut self) {
        self.vertices.clear();
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let point = pick.position;

        if self.vertices.len() >= 3 {
            let near_first = points_coincide(&self.vertices[0], &point, ctx.config.tools.close_distance);
            if pick.double_click || near_first {
                return self.close();
            }
        }

        // 检查是否与已有顶点重合
        if self.vertices.iter().any(|v| points_coincide(v, &point, EPSILON)) {
            return ToolResponse::Rejected(RejectReason::DuplicatePoint);
        }

        self.vertices.push(point);
        ToolResponse::Continue
    }

    fn on_key(&mut self, _ctx: &ToolContext, key: Key) -> ToolResponse {
        match key {
            Key::Enter if !self.vertices.is_empty() => self.close(),
            Key::Backspace if !self.vertices.is_empty() => {
                self.vertices.pop();
                ToolResponse::Continue
            }
            _ => ToolResponse::Ignored,
        }
    }

    fn prompt(&self) -> &str {
        match self.vertices.len() {
            0 => "指定第一个顶点:",
            1 | 2 => "指定下一个顶点 或 [放弃(Backspace)]:",
            _ => "指定下一个顶点 或 [闭合(Enter)/放弃(Backspace)]:",
        }
    }

    fn preview(&self, _ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        let mut previews = Vec::new();

        // 已确定的边
        for pair in self.vertices.windows(2) {
            previews.push(PreviewGeometry::new(Geometry::Line(Line::new(pair[0], pair[1]))));
        }

        // 当前正在绘制的边，以及回到首顶点的参考线
        if let (Some(&first), Some(&last)) = (self.vertices.first(), self.vertices.last()) {
            if !points_coincide(&last, &cursor, EPSILON) {
                previews.push(PreviewGeometry::new(Geometry::Line(Line::new(last, cursor))));
            }
            if self.vertices.len() >= 2 && !points_coincide(&first, &cursor, EPSILON) {
                previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(cursor, first))));
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

    fn feed(tool: &mut PolygonTool, ctx: &ToolContext, points: &[(f64, f64)]) {
        for &(x, y) in points {
            assert_eq!(
                tool.on_pointer_down(ctx, &Pick::at(Point2::new(x, y))),
                ToolResponse::Continue
            );
        }
    }

    #[test]
    fn test_close_on_first_vertex() {
        let c = Construction::new();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = PolygonTool::new();

        feed(&mut tool, &ctx, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let resp = tool.on_pointer_down(&ctx, &Pick::at(Point2::new(3.0, 2.0)));
        let ToolResponse::Commit(geoms) = resp else {
            panic!("expected commit");
        };
        let Geometry::Polygon(polygon) = &geoms[0] else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(tool.state(), ToolState::Idle);
    }

    #[test]
    fn test_close_on_enter_and_double_click() {
        let c = Construction::new();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);

        let mut tool = PolygonTool::new();
        feed(&mut tool, &ctx, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        assert!(matches!(tool.on_key(&ctx, Key::Enter), ToolResponse::Commit(_)));

        let mut tool = PolygonTool::new();
        feed(&mut tool, &ctx, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let mut dbl = Pick::at(Point2::new(0.0, 100.0));
        dbl.double_click = true;
        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &dbl) else {
            panic!("expected commit");
        };
        let Geometry::Polygon(polygon) = &geoms[0] else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.vertex_count(), 4);
    }

    #[test]
    fn test_too_few_vertices() {
        let c = Construction::new();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = PolygonTool::new();

        feed(&mut tool, &ctx, &[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(
            tool.on_key(&ctx, Key::Enter),
            ToolResponse::Rejected(RejectReason::Degenerate(GeometryError::InvalidSides(2)))
        );
        assert_eq!(tool.vertex_count(), 2);
    }

    #[test]
    fn test_duplicate_and_backspace() {
        let c = Construction::new();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = PolygonTool::new();

        feed(&mut tool, &ctx, &[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(
            tool.on_pointer_down(&ctx, &Pick::at(Point2::new(100.0, 0.0))),
            ToolResponse::Rejected(RejectReason::DuplicatePoint)
        );

        tool.on_key(&ctx, Key::Backspace);
        tool.on_key(&ctx, Key::Backspace);
        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(tool.on_key(&ctx, Key::Backspace), ToolResponse::Ignored);
    }
}
