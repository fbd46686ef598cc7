//! 平行线工具
//!
//! 先拾取参考直线，再拾取通过点。通过点两侧各延伸 nominal_length，
//! 预览附带到参考直线的距离。

use crate::tool::{Pick, PreviewGeometry, Tool, ToolContext, ToolKind, ToolResponse, ToolState};
use zgeo_core::construct;
use zgeo_core::geometry::{Geometry, Line};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
enum Status {
    SelectLine,
    SetPoint { line: Line },
}

/// 平行线工具
pub struct ParallelTool {
    status: Status,
}

impl ParallelTool {
    pub fn new() -> Self {
        Self {
            status: Status::SelectLine,
        }
    }
}

impl Default for ParallelTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ParallelTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Parallel
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
                Ok((_, line)) => {
                    self.status = Status::SetPoint { line };
                    ToolResponse::Continue
                }
                Err(reason) => ToolResponse::Rejected(reason),
            },
            Status::SetPoint { line } => {
                let length = ctx.config.tools.nominal_length;
                match construct::parallel_through(&pick.position, line, length) {
                    Ok(parallel) => {
                        debug!("平行线距离: {:.4}", parallel.distance);
                        self.reset();
                        ToolResponse::Commit(vec![Geometry::Line(parallel.line)])
                    }
                    Err(e) => ToolResponse::Rejected(e.into()),
                }
            }
        }
    }

    fn prompt(&self) -> &str {
        match self.status {
            Status::SelectLine => "选择参考直线:",
            Status::SetPoint { .. } => "指定通过点:",
        }
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let cursor = pick.position;
        let Status::SetPoint { line } = &self.status else {
            return vec![];
        };
        let length = ctx.config.tools.nominal_length;
        match construct::parallel_through(&cursor, line, length) {
            Ok(parallel) => vec![PreviewGeometry::new(Geometry::Line(parallel.line))
                .with_annotation(format!("{:.2}", parallel.distance))],
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use zgeo_core::construction::Construction;
    use zgeo_core::entity::EntityId;
    use zgeo_core::math::Point2;

    fn setup() -> (Construction, EntityId) {
        let mut c = Construction::new();
        let line = c.new_entity(Geometry::Line(Line::new(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
        ))).unwrap();
        let id = line.id;
        c.insert(line).unwrap();
        (c, id)
    }

    #[test]
    fn test_parallel_through_point() {
        let (c, line_id) = setup();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = ParallelTool::new();

        let first = Pick {
            hit: Some(line_id),
            ..Pick::at(Point2::new(50.0, 0.0))
        };
        assert_eq!(tool.on_pointer_down(&ctx, &first), ToolResponse::Continue);

        let previews = tool.preview(&ctx, &Pick::at(Point2::new(10.0, 20.0)));
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].annotation.as_deref(), Some("20.00"));

        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &Pick::at(Point2::new(10.0, 20.0))) else {
            panic!("expected commit");
        };
        let line = geoms[0].as_line().unwrap();
        assert!((line.start.y - 20.0).abs() < 1e-10);
        assert!((line.end.y - 20.0).abs() < 1e-10);
        assert!((line.midpoint() - Point2::new(10.0, 20.0)).norm() < 1e-10);
        let nominal = config.tools.nominal_length;
        assert!((line.length() - 2.0 * nominal).abs() < 1e-10);
        let through = Point2::new(10.0, 20.0);
        assert!(((line.start - through).norm() - nominal).abs() < 1e-10);
        assert!(((line.end - through).norm() - nominal).abs() < 1e-10);

        let preview_line = previews[0].geometry.as_line().unwrap();
        assert!((preview_line.length() - 2.0 * nominal).abs() < 1e-10);
    }

    #[test]
    fn test_first_pick_must_hit_line() {
        let (c, _) = setup();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = ParallelTool::new();

        assert!(matches!(
            tool.on_pointer_down(&ctx, &Pick::at(Point2::new(500.0, 500.0))),
            ToolResponse::Rejected(_)
        ));
        assert_eq!(tool.state(), ToolState::Idle);
    }
}
