//! 直线工具
//!
//! 两次拾取：起点、终点。直线类型取自工具默认参数。

use crate::tool::{
    Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse, ToolState,
};
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Geometry, Line};
use zgeo_core::math::{points_coincide, Point2, EPSILON};

/// 直线绘制状态
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// 等待设置起点
    SetStartpoint,
    /// 等待设置终点
    SetEndpoint { start: Point2 },
}

/// 直线工具
pub struct LineTool {
    status: Status,
}

impl LineTool {
    pub fn new() -> Self {
        Self {
            status: Status::SetStartpoint,
        }
    }
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::SetStartpoint => ToolState::Idle,
            Status::SetEndpoint { .. } => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        match self.status {
            Status::SetStartpoint => {
                self.status = Status::SetEndpoint {
                    start: pick.position,
                };
                ToolResponse::Continue
            }
            Status::SetEndpoint { start } => {
                if points_coincide(&start, &pick.position, EPSILON) {
                    return ToolResponse::Rejected(RejectReason::Degenerate(
                        GeometryError::DegenerateLine,
                    ));
                }
                let line = Line::with_type(start, pick.position, ctx.config.tools.line_type);
                self.reset();
                ToolResponse::Commit(vec![Geometry::Line(line)])
            }
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::SetStartpoint => "指定第一点:",
            Status::SetEndpoint { .. } => "指定下一点:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        match self.status {
            Status::SetEndpoint { start } if !points_coincide(&start, &cursor, EPSILON) => {
                let line = Line::with_type(start, cursor, ctx.config.tools.line_type);
                vec![PreviewGeometry::new(Geometry::Line(line))]
            }
            _ => vec![],
        }
    }
}
