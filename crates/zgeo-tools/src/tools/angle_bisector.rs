//! 角平分线工具
//!
//! 三点模式：第二点为顶点，提交从顶点出发的射线。
//! 两直线模式：拾取两条不同的直线，提交平分射线。

use crate::tool::{
    BisectorMode, Pick, PreviewGeometry, RejectReason, Tool, ToolContext, ToolKind, ToolResponse,
    ToolState,
};
use zgeo_core::construct::{self, Bisector};
use zgeo_core::entity::EntityId;
use zgeo_core::geometry::{Geometry, Line};
use zgeo_core::math::{points_coincide, Point2, EPSILON};

#[derive(Debug, Clone, PartialEq)]
enum Status {
    /// 等待第一次拾取
    Start,
    /// 三点模式：已有第一点
    SetVertex { first: Point2 },
    /// 三点模式：已有第一点和顶点
    SetThird { first: Point2, vertex: Point2 },
    /// 两直线模式：已选第一条直线
    SelectSecondLine { first_id: EntityId, first: Line },
}

/// 角平分线工具
pub struct AngleBisectorTool {
    mode: BisectorMode,
    status: Status,
}

impl AngleBisectorTool {
    pub fn new(mode: BisectorMode) -> Self {
        Self {
            mode,
            status: Status::Start,
        }
    }

    fn commit(&mut self, ctx: &ToolContext, bisector: Bisector) -> ToolResponse {
        self.reset();
        let ray = bisector.to_ray(ctx.config.tools.nominal_length);
        ToolResponse::Commit(vec![Geometry::Line(ray)])
    }

    fn three_points_down(&mut self, ctx: &ToolContext, point: Point2) -> ToolResponse {
        match self.status {
            Status::Start => {
                self.status = Status::SetVertex { first: point };
                ToolResponse::Continue
            }
            Status::SetVertex { first } => {
                if points_coincide(&first, &point, EPSILON) {
                    return ToolResponse::Rejected(RejectReason::DuplicatePoint);
                }
                self.status = Status::SetThird {
                    first,
                    vertex: point,
                };
                ToolResponse::Continue
            }
            Status::SetThird { first, vertex } => {
                match construct::angle_bisector_three_points(&first, &vertex, &point) {
                    Ok(bisector) => self.commit(ctx, bisector),
                    Err(e) => ToolResponse::Rejected(e.into()),
                }
            }
            Status::SelectSecondLine { .. } => ToolResponse::Ignored,
        }
    }

    fn two_lines_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let (id, line) = match ctx.hit_line(pick) {
            Ok(hit) => hit,
            Err(reason) => return ToolResponse::Rejected(reason),
        };

        match &self.status {
            Status::SelectSecondLine { first_id, first } => {
                if *first_id == id {
                    return ToolResponse::Rejected(RejectReason::SameObject);
                }
                match construct::angle_bisector_two_lines(first, &line) {
                    Ok(bisector) => self.commit(ctx, bisector),
                    Err(e) => ToolResponse::Rejected(e.into()),
                }
            }
            _ => {
                self.status = Status::SelectSecondLine {
                    first_id: id,
                    first: line,
                };
                ToolResponse::Continue
            }
        }
    }
}

impl Tool for AngleBisectorTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AngleBisector(self.mode)
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::Start => ToolState::Idle,
            _ => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::Start;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        match self.mode {
            BisectorMode::ThreePoints => self.three_points_down(ctx, pick.position),
            BisectorMode::TwoLines => self.two_lines_down(ctx, pick),
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::Start => match self.mode {
                BisectorMode::ThreePoints => "指定角的第一条边上的点:",
                BisectorMode::TwoLines => "选择第一条直线:",
            },
            Status::SetVertex { .. } => "指定角的顶点:",
            Status::SetThird { .. } => "指定角的第二条边上的点:",
            Status::SelectSecondLine { .. } => "选择第二条直线:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        let length = ctx.config.tools.nominal_length;
        match &self.status {
            Status::Start => vec![],
            Status::SelectSecondLine { first_id, first } => {
                let mut previews = vec![PreviewGeometry::reference(Geometry::Line(first.clone()))];
                // 悬停在另一条直线上时显示平分射线
                if let Ok((id, line)) = ctx.hit_line(pick) {
                    if id != *first_id {
                        if let Ok(bisector) = construct::angle_bisector_two_lines(first, &line) {
                            previews.push(PreviewGeometry::new(Geometry::Line(
                                bisector.to_ray(length),
                            )));
                        }
                    }
                }
                previews
            }
            Status::SetVertex { first } => {
                if points_coincide(first, &cursor, EPSILON) {
                    return vec![];
                }
                vec![PreviewGeometry::reference(Geometry::Line(Line::new(
                    *first, cursor,
                )))]
            }
            Status::SetThird { first, vertex } => {
                let mut previews = vec![PreviewGeometry::reference(Geometry::Line(Line::new(
                    *first, *vertex,
                )))];
                if let Ok(bisector) = construct::angle_bisector_three_points(first, vertex, &cursor)
                {
                    previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(
                        *vertex, cursor,
                    ))));
                    previews.push(PreviewGeometry::new(Geometry::Line(bisector.to_ray(length))));
                }
                previews
            }
        }
    }
}
