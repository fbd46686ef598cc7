//! 选择工具
//!
//! 点选、框选、拖动已选直线的端点、删除所选对象。

use crate::tool::{
    Key, Pick, PreviewGeometry, Tool, ToolContext, ToolKind, ToolResponse, ToolState,
};
use zgeo_core::entity::EntityId;
use zgeo_core::geometry::{Endpoint, Geometry, Line, Polygon};
use zgeo_core::math::{points_coincide, BoundingBox2, Point2, EPSILON};

/// 选择状态
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// 空闲，等待选择
    Idle,
    /// 正在框选
    BoxSelect { start: Point2 },
    /// 正在拖动直线端点
    DragEndpoint {
        id: EntityId,
        which: Endpoint,
        origin: Point2,
    },
}

/// 选择工具
pub struct SelectTool {
    status: Status,
}

impl SelectTool {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
        }
    }

    /// 是否正在框选
    pub fn is_box_selecting(&self) -> bool {
        matches!(self.status, Status::BoxSelect { .. })
    }

    /// 光标附近的已选、未锁定直线的端点
    fn endpoint_under(ctx: &ToolContext, raw: &Point2) -> Option<(EntityId, Endpoint, Point2)> {
        let tolerance = ctx.config.snap_tolerance;
        ctx.construction
            .iter()
            .filter(|e| e.selected && e.visible && !e.locked)
            .filter_map(|e| match &e.geometry {
                Geometry::Line(line) => Some((e.id, line)),
                _ => None,
            })
            .flat_map(|(id, line)| {
                [Endpoint::Endpoint1, Endpoint::Endpoint2]
                    .into_iter()
                    .map(move |which| (id, which, line.endpoint(which)))
            })
            .find(|(_, _, pos)| points_coincide(pos, raw, tolerance))
    }

    fn rectangle(a: Point2, b: Point2) -> Polygon {
        Polygon::new(vec![
            a,
            Point2::new(b.x, a.y),
            b,
            Point2::new(a.x, b.y),
        ])
    }
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn state(&self) -> ToolState {
        match self.status {
            Status::Idle => ToolState::Idle,
            _ => ToolState::Active,
        }
    }

    fn reset(&mut self) {
        self.status = Status::Idle;
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        if let Some((id, which, origin)) = Self::endpoint_under(ctx, &pick.raw) {
            self.status = Status::DragEndpoint { id, which, origin };
            return ToolResponse::Continue;
        }

        match pick.hit {
            Some(id) => ToolResponse::Select {
                ids: vec![id],
                additive: pick.modifiers.shift,
            },
            None => {
                self.status = Status::BoxSelect { start: pick.raw };
                ToolResponse::Continue
            }
        }
    }

    fn on_pointer_up(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let status = self.status;
        self.status = Status::Idle;

        match status {
            Status::Idle => ToolResponse::Ignored,
            Status::BoxSelect { start } => {
                let additive = pick.modifiers.shift;
                if points_coincide(&start, &pick.raw, EPSILON) {
                    // 单击空白处
                    return ToolResponse::Select {
                        ids: vec![],
                        additive,
                    };
                }
                let rect = BoundingBox2::from_points([start, pick.raw]);
                ToolResponse::Select {
                    ids: ctx.construction.query_rect(&rect),
                    additive,
                }
            }
            Status::DragEndpoint { id, which, origin } => {
                if points_coincide(&origin, &pick.position, EPSILON) {
                    return ToolResponse::Continue;
                }
                ToolResponse::MoveEndpoint {
                    id,
                    which,
                    to: pick.position,
                }
            }
        }
    }

    fn on_key(&mut self, ctx: &ToolContext, key: Key) -> ToolResponse {
        match key {
            Key::Delete | Key::Backspace => {
                let ids: Vec<EntityId> = ctx
                    .construction
                    .iter()
                    .filter(|e| e.selected && !e.locked)
                    .map(|e| e.id)
                    .collect();
                if ids.is_empty() {
                    ToolResponse::Ignored
                } else {
                    ToolResponse::Delete(ids)
                }
            }
            Key::Escape => ToolResponse::Select {
                ids: vec![],
                additive: false,
            },
            _ => ToolResponse::Ignored,
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::Idle => "选择对象:",
            Status::BoxSelect { .. } => "指定对角点:",
            Status::DragEndpoint { .. } => "指定端点新位置:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        match self.status {
            Status::Idle => vec![],
            Status::BoxSelect { start } => {
                vec![PreviewGeometry::reference(Geometry::Polygon(Self::rectangle(
                    start, cursor,
                )))]
            }
            Status::DragEndpoint { id, which, .. } => {
                let Some(Geometry::Line(line)) = ctx.entity(id).map(|e| &e.geometry) else {
                    return vec![];
                };
                let mut moved: Line = line.clone();
                moved.set_endpoint(which, cursor);
                vec![PreviewGeometry::new(Geometry::Line(moved))]
            }
        }
    }

    fn snap_exclusions(&self) -> Vec<EntityId> {
        match self.status {
            Status::DragEndpoint { id, .. } => vec![id],
            _ => vec![],
        }
    }
}
