//! 垂线工具
//!
//! 先拾取一条直线，再拾取一点：
//! - 点到直线：从该点到直线上的垂足
//! - 过点：从该点沿法线方向延伸固定长度

use crate::tool::{
    PerpendicularMode, Pick, PreviewGeometry, Tool, ToolContext, ToolKind, ToolResponse,
    ToolState,
};
use zgeo_core::construct;
use zgeo_core::entity::EntityId;
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Geometry, Line};
use zgeo_core::math::Point2;

#[derive(Debug, Clone, PartialEq)]
enum Status {
    /// 等待选择参考直线
    SelectLine,
    /// 等待指定点
    SetPoint { line_id: EntityId, line: Line },
}

/// 垂线工具
pub struct PerpendicularTool {
    mode: PerpendicularMode,
    status: Status,
}

impl PerpendicularTool {
    pub fn new(mode: PerpendicularMode) -> Self {
        Self {
            mode,
            status: Status::SelectLine,
        }
    }

    fn build(&self, ctx: &ToolContext, point: &Point2, line: &Line) -> Result<Line, GeometryError> {
        match self.mode {
            PerpendicularMode::PointToLine => construct::perpendicular_foot(point, line),
            PerpendicularMode::ThroughPoint => {
                construct::perpendicular_through(point, line, ctx.config.tools.nominal_length)
            }
        }
    }
}

impl Tool for PerpendicularTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Perpendicular(self.mode)
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::SelectLine => ToolState::Idle,
            Status::SetPoint { .. } => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::SelectLine;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        match &self.status {
            Status::SelectLine => match ctx.hit_line(pick) {
                Ok((line_id, line)) => {
                    self.status = Status::SetPoint { line_id, line };
                    ToolResponse::Continue
                }
                Err(reason) => ToolResponse::Rejected(reason),
            },
            Status::SetPoint { line, .. } => match self.build(ctx, &pick.position, line) {
                Ok(perp) => {
                    self.reset();
                    ToolResponse::Commit(vec![Geometry::Line(perp)])
                }
                Err(e) => ToolResponse::Rejected(e.into()),
            },
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::SelectLine => "选择参考直线:",
            Status::SetPoint { .. } => match self.mode {
                PerpendicularMode::PointToLine => "指定垂线起点:",
                PerpendicularMode::ThroughPoint => "指定垂线通过的点:",
            },
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        match &self.status {
            Status::SelectLine => vec![],
            Status::SetPoint { line, .. } => self
                .build(ctx, &cursor, line)
                .map(|perp| vec![PreviewGeometry::new(Geometry::Line(perp))])
                .unwrap_or_default(),
        }
    }
}
