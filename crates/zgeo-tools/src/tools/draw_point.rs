//! 点工具

use crate::tool::{Pick, PreviewGeometry, Tool, ToolContext, ToolKind, ToolResponse, ToolState};
use zgeo_core::geometry::{Geometry, Point};

/// 点工具
pub struct PointTool;

impl PointTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PointTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PointTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Point
    }

    fn state(&self) -> ToolState {
        ToolState::Idle
    }

    fn reset(&mut self) {
        // 点工具无状态
    }

    fn on_pointer_down(&mut self, _ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        let point = Point::from_point2(pick.position);
        ToolResponse::Commit(vec![Geometry::Point(point)])
    }

    fn prompt(&self) -> &str {
        "指定点的位置:"
    }

    fn preview(&self, _ctx: &ToolContext, _pick: &Pick) -> Vec<PreviewGeometry> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use zgeo_core::construction::Construction;
    use zgeo_core::math::Point2;

    #[test]
    fn test_every_click_commits() {
        let c = Construction::new();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = PointTool::new();

        for x in [0.0, 10.0] {
            let resp = tool.on_pointer_down(&ctx, &Pick::at(Point2::new(x, 5.0)));
            assert_eq!(resp, ToolResponse::Commit(vec![Geometry::Point(Point::new(x, 5.0))]));
            assert_eq!(tool.state(), ToolState::Idle);
        }
    }
}
