//! 画圆工具
//!
//! 支持四种模式：
//! - 圆心 + 圆上一点
//! - 直径两端点
//! - 固定半径（每次点击创建一个圆，工具保持激活）
//! - 三点

use crate::tool::{
    CircleMode, Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse,
    ToolState,
};
use zgeo_core::construct;
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Circle, Geometry, Line};
use zgeo_core::math::{points_coincide, Point2, EPSILON};

/// 画圆状态
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// 等待第一点
    SetFirst,
    /// 等待第二点
    SetSecond { first: Point2 },
    /// 等待第三点（仅三点模式）
    SetThird { first: Point2, second: Point2 },
    /// 固定半径模式已创建过圆
    Repeating,
}

/// 画圆工具
pub struct CircleTool {
    mode: CircleMode,
    status: Status,
}

impl CircleTool {
    pub fn new(mode: CircleMode) -> Self {
        Self {
            mode,
            status: Status::SetFirst,
        }
    }

    pub fn mode(&self) -> CircleMode {
        self.mode
    }

    /// 两点模式下由前两点构造圆
    fn two_point_circle(&self, first: Point2, second: Point2) -> Result<Circle, GeometryError> {
        match self.mode {
            CircleMode::Diameter => construct::circle_from_diameter(&first, &second),
            _ => {
                let radius = (second - first).norm();
                if radius < EPSILON {
                    return Err(GeometryError::ZeroVector);
                }
                Ok(Circle::new(first, radius))
            }
        }
    }

    fn fixed_circle(ctx: &ToolContext, center: Point2) -> Result<Circle, GeometryError> {
        let radius = ctx.config.tools.fixed_radius;
        if radius.is_nan() || radius < EPSILON {
            return Err(GeometryError::ZeroVector);
        }
        Ok(Circle::new(center, radius))
    }

    fn commit(&mut self, circle: Circle) -> ToolResponse {
        self.status = match self.mode {
            CircleMode::FixedRadius => Status::Repeating,
            _ => Status::SetFirst,
        };
        ToolResponse::Commit(vec![Geometry::Circle(circle)])
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle(self.mode)
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::SetFirst => ToolState::Idle,
            _ => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetFirst;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let point = pick.position;

        if self.mode == CircleMode::FixedRadius {
            return match Self::fixed_circle(ctx, point) {
                Ok(circle) => self.commit(circle),
                Err(e) => ToolResponse::Rejected(e.into()),
            };
        }

        match self.status {
            Status::SetFirst | Status::Repeating => {
                self.status = Status::SetSecond { first: point };
                ToolResponse::Continue
            }
            Status::SetSecond { first } => {
                if self.mode == CircleMode::ThreePoints {
                    if points_coincide(&first, &point, EPSILON) {
                        return ToolResponse::Rejected(RejectReason::DuplicatePoint);
                    }
                    self.status = Status::SetThird {
                        first,
                        second: point,
                    };
                    return ToolResponse::Continue;
                }
                match self.two_point_circle(first, point) {
                    Ok(circle) => self.commit(circle),
                    Err(e) => ToolResponse::Rejected(e.into()),
                }
            }
            Status::SetThird { first, second } => {
                if points_coincide(&first, &point, EPSILON)
                    || points_coincide(&second, &point, EPSILON)
                {
                    return ToolResponse::Rejected(RejectReason::DuplicatePoint);
                }
                match construct::circle_through_three_points(&first, &second, &point) {
                    Ok(circle) => self.commit(circle),
                    Err(e) => ToolResponse::Rejected(e.into()),
                }
            }
        }
    }

    fn prompt(&self) -> &str {
        match (self.mode, self.status) {
            (CircleMode::FixedRadius, _) => "指定圆心:",
            (_, Status::SetFirst | Status::Repeating) => match self.mode {
                CircleMode::Diameter => "指定直径的第一个端点:",
                CircleMode::ThreePoints => "指定圆上的第一个点:",
                _ => "指定圆心:",
            },
            (CircleMode::Diameter, Status::SetSecond { .. }) => "指定直径的第二个端点:",
            (CircleMode::ThreePoints, Status::SetSecond { .. }) => "指定圆上的第二个点:",
            (_, Status::SetSecond { .. }) => "指定圆的半径:",
            (_, Status::SetThird { .. }) => "指定圆上的第三个点:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        if self.mode == CircleMode::FixedRadius {
            return Self::fixed_circle(ctx, cursor)
                .map(|c| vec![PreviewGeometry::new(Geometry::Circle(c))])
                .unwrap_or_default();
        }

        match self.status {
            Status::SetFirst | Status::Repeating => vec![],
            Status::SetSecond { first } => {
                let mut previews = Vec::new();
                if self.mode == CircleMode::ThreePoints {
                    if !points_coincide(&first, &cursor, EPSILON) {
                        previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(
                            first, cursor,
                        ))));
                    }
                    return previews;
                }
                if let Ok(circle) = self.two_point_circle(first, cursor) {
                    previews.push(PreviewGeometry::new(Geometry::Circle(circle)));
                    previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(
                        first, cursor,
                    ))));
                }
                previews
            }
            Status::SetThird { first, second } => {
                match construct::circle_through_three_points(&first, &second, &cursor) {
                    Ok(circle) => vec![PreviewGeometry::new(Geometry::Circle(circle))],
                    Err(_) => vec![PreviewGeometry::reference(Geometry::Line(Line::new(
                        first, second,
                    )))],
                }
            }
        }
    }
}
