//! 正多边形工具
//!
//! 两次拾取：中心、外接圆上一点。边数、朝向和星形跨度取自工具默认参数。

use crate::config::ToolDefaults;
use crate::tool::{
    Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse, ToolState,
};
use zgeo_core::construct;
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Geometry, Line, Polygon};
use zgeo_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// 等待中心
    SetCenter,
    /// 等待半径参考点
    SetRadius { center: Point2 },
}

/// 正多边形工具
///
/// 第二次拾取只决定外接圆半径；朝向由 `ToolDefaults::polygon_orientation`
/// 决定，与第二点相对中心的方向无关。
pub struct RegularPolygonTool {
    status: Status,
}

impl RegularPolygonTool {
    pub fn new() -> Self {
        Self {
            status: Status::SetCenter,
        }
    }

    /// 按默认参数生成顶点
    fn build(defaults: &ToolDefaults, center: Point2, radius: f64) -> Result<Polygon, GeometryError> {
        if defaults.polygon_sides < 3 {
            return Err(GeometryError::InvalidSides(defaults.polygon_sides));
        }
        if radius < EPSILON {
            return Err(GeometryError::ZeroVector);
        }
        let vertices = match defaults.star_skip {
            Some(skip) if skip >= 2 => construct::star_polygon_vertices(
                defaults.polygon_sides,
                &center,
                radius,
                skip,
                defaults.polygon_orientation,
            ),
            _ => construct::regular_polygon_vertices(
                defaults.polygon_sides,
                &center,
                radius,
                defaults.polygon_orientation,
            ),
        };
        Ok(Polygon::new(vertices))
    }
}

impl Default for RegularPolygonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for RegularPolygonTool {
    fn kind(&self) -> ToolKind {
        ToolKind::RegularPolygon
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::SetCenter => ToolState::Idle,
            Status::SetRadius { .. } => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetCenter;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        match self.status {
            Status::SetCenter => {
                self.status = Status::SetRadius {
                    center: pick.position,
                };
                ToolResponse::Continue
            }
            Status::SetRadius { center } => {
                let radius = (pick.position - center).norm();
                match Self::build(&ctx.config.tools, center, radius) {
                    Ok(polygon) => {
                        self.reset();
                        ToolResponse::Commit(vec![Geometry::Polygon(polygon)])
                    }
                    Err(e) => ToolResponse::Rejected(RejectReason::Degenerate(e)),
                }
            }
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::SetCenter => "指定正多边形的中心点:",
            Status::SetRadius { .. } => "指定外接圆半径:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        let Status::SetRadius { center } = self.status else {
            return vec![];
        };
        let radius = (cursor - center).norm();
        match Self::build(&ctx.config.tools, center, radius) {
            Ok(polygon) => vec![
                PreviewGeometry::new(Geometry::Polygon(polygon)),
                PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor))),
            ],
            Err(_) => vec![],
        }
    }
}
