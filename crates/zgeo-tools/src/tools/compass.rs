//! 圆规工具
//!
//! 两次拾取量取半径，之后每次点击以该半径在点击处创建一个圆，
//! 直到按 Escape 取消。

use crate::tool::{
    Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse, ToolState,
};
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Circle, Geometry, Line};
use zgeo_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// 等待半径的第一点
    SetRadiusStart,
    /// 等待半径的第二点
    SetRadiusEnd { start: Point2 },
    /// 放置圆心
    PlaceCenter { radius: f64 },
}

/// 圆规工具
pub struct CompassTool {
    status: Status,
}

impl CompassTool {
    pub fn new() -> Self {
        Self {
            status: Status::SetRadiusStart,
        }
    }

    /// 已量取的半径
    pub fn radius(&self) -> Option<f64> {
        match self.status {
            Status::PlaceCenter { radius } => Some(radius),
            _ => None,
        }
    }
}

impl Default for CompassTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CompassTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Compass
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::SetRadiusStart => ToolState::Idle,
            _ => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetRadiusStart;
    }

    fn on_pointer_down(&mut self, _ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let point = pick.position;
        match self.status {
            Status::SetRadiusStart => {
                self.status = Status::SetRadiusEnd { start: point };
                ToolResponse::Continue
            }
            Status::SetRadiusEnd { start } => {
                let radius = (point - start).norm();
                if radius < EPSILON {
                    return ToolResponse::Rejected(RejectReason::Degenerate(
                        GeometryError::ZeroVector,
                    ));
                }
                self.status = Status::PlaceCenter { radius };
                ToolResponse::Continue
            }
            Status::PlaceCenter { radius } => {
                ToolResponse::Commit(vec![Geometry::Circle(Circle::new(point, radius))])
            }
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::SetRadiusStart => "指定半径的第一点:",
            Status::SetRadiusEnd { .. } => "指定半径的第二点:",
            Status::PlaceCenter { .. } => "指定圆心 或 [退出(Esc)]:",
        }
    }

    fn preview(&self, _ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        match self.status {
            Status::SetRadiusStart => vec![],
            Status::SetRadiusEnd { start } => {
                let radius = (cursor - start).norm();
                if radius < EPSILON {
                    return vec![];
                }
                vec![
                    PreviewGeometry::reference(Geometry::Line(Line::new(start, cursor))),
                    PreviewGeometry::reference(Geometry::Circle(Circle::new(start, radius))),
                ]
            }
            Status::PlaceCenter { radius } => {
                vec![PreviewGeometry::new(Geometry::Circle(Circle::new(cursor, radius)))]
            }
        }
    }
}
