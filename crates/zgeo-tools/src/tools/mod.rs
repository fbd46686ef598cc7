//! 具体的 Tool 实现
//!
//! 每个构造模式对应一个 Tool 实现

mod angle_bisector;
mod compass;
mod draw_circle;
mod draw_line;
mod draw_point;
mod draw_polygon;
mod draw_text;
mod intersection;
mod parallel;
mod perpendicular;
mod regular_polygon;
mod select;

pub use angle_bisector::AngleBisectorTool;
pub use compass::CompassTool;
pub use draw_circle::CircleTool;
pub use draw_line::LineTool;
pub use draw_point::PointTool;
pub use draw_polygon::PolygonTool;
pub use draw_text::TextTool;
pub use intersection::IntersectionTool;
pub use parallel::ParallelTool;
pub use perpendicular::PerpendicularTool;
pub use regular_polygon::RegularPolygonTool;
pub use select::SelectTool;

use crate::tool::{Tool, ToolKind};

/// 创建指定类型的 Tool
pub fn create_tool(kind: ToolKind) -> Box<dyn Tool> {
    match kind {
        ToolKind::Select => Box::new(SelectTool::new()),
        ToolKind::Point => Box::new(PointTool::new()),
        ToolKind::Line => Box::new(LineTool::new()),
        ToolKind::Polygon => Box::new(PolygonTool::new()),
        ToolKind::RegularPolygon => Box::new(RegularPolygonTool::new()),
        ToolKind::Circle(mode) => Box::new(CircleTool::new(mode)),
        ToolKind::Perpendicular(mode) => Box::new(PerpendicularTool::new(mode)),
        ToolKind::Parallel => Box::new(ParallelTool::new()),
        ToolKind::AngleBisector(mode) => Box::new(AngleBisectorTool::new(mode)),
        ToolKind::Compass => Box::new(CompassTool::new()),
        ToolKind::Intersection => Box::new(IntersectionTool::new()),
        ToolKind::Text => Box::new(TextTool::new()),
    }
}
