//! 文本工具
//!
//! 单击放置文本。点击到非文本对象时，文本关联该对象并自动定位。

use crate::tool::{Pick, PreviewGeometry, Tool, ToolContext, ToolKind, ToolResponse, ToolState};
use zgeo_core::geometry::{Geometry, Text};
use zgeo_core::construction::label_offset;

/// 文本工具
pub struct TextTool;

impl TextTool {
    pub fn new() -> Self {
        Self
    }

    fn build(ctx: &ToolContext, pick: &Pick) -> Text {
        let defaults = &ctx.config.tools;
        let text = Text::new(pick.position, defaults.text_content.clone(), defaults.text_height);

        let target = pick
            .hit
            .and_then(|id| ctx.entity(id))
            .filter(|e| !matches!(e.geometry, Geometry::Text(_)));
        match target {
            Some(entity) => text.attached_to(entity.id),
            None => text,
        }
    }
}

impl Default for TextTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn state(&self) -> ToolState {
        ToolState::Idle
    }

    fn reset(&mut self) {
        // 文本工具无状态
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse {
        ToolResponse::Commit(vec![Geometry::Text(Self::build(ctx, pick))])
    }

    fn prompt(&self) -> &str {
        "指定文字的插入点:"
    }

    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry> {
        let mut text = Self::build(ctx, pick);
        // 关联对象时按自动定位后的位置显示
        if let Some(target) = text.target.and_then(|id| ctx.entity(id)) {
            text.position = target.geometry.label_anchor() + label_offset();
        }
        vec![PreviewGeometry::new(Geometry::Text(text))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use zgeo_core::construction::Construction;
    use zgeo_core::math::Point2;
    use zgeo_core::entity::EntityId;
    use zgeo_core::geometry::Point;

    #[test]
    fn test_place_free_text() {
        let c = Construction::new();
        let mut config = EngineConfig::default();
        config.tools.text_content = "A".to_string();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = TextTool::new();

        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &Pick::at(Point2::new(10.0, 10.0))) else {
            panic!("expected commit");
        };
        let Geometry::Text(text) = &geoms[0] else {
            panic!("expected text");
        };
        assert_eq!(text.content, "A");
        assert_eq!(text.height, config.tools.text_height);
        assert_eq!(text.target, None);
        assert!(!text.auto_position);
        assert_eq!(tool.state(), ToolState::Idle);
    }

    #[test]
    fn test_attach_to_object() {
        let mut c = Construction::new();
        let point = c.new_entity(Geometry::Point(Point::new(10.0, 10.0))).unwrap();
        let point_id = point.id;
        c.insert(point).unwrap();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = TextTool::new();

        let pick = Pick {
            hit: Some(point_id),
            ..Pick::at(Point2::new(10.0, 10.0))
        };
        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &pick) else {
            panic!("expected commit");
        };
        let Geometry::Text(text) = &geoms[0] else {
            panic!("expected text");
        };
        assert_eq!(text.target, Some(point_id));
        assert!(text.auto_position);
    }

    #[test]
    fn test_preview_shows_attached_position() {
        let mut c = Construction::new();
        let point = c.new_entity(Geometry::Point(Point::new(10.0, 10.0))).unwrap();
        let point_id = point.id;
        c.insert(point).unwrap();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let tool = TextTool::new();

        let hover = Pick {
            hit: Some(point_id),
            ..Pick::at(Point2::new(12.0, 11.0))
        };
        let previews = tool.preview(&ctx, &hover);
        let Geometry::Text(text) = &previews[0].geometry else {
            panic!("expected text");
        };
        assert_eq!(text.target, Some(point_id));
        assert_eq!(text.position, Point2::new(10.0, 10.0) + label_offset());

        // 未命中对象时跟随光标
        let previews = tool.preview(&ctx, &Pick::at(Point2::new(40.0, 40.0)));
        let Geometry::Text(text) = &previews[0].geometry else {
            panic!("expected text");
        };
        assert_eq!(text.position, Point2::new(40.0, 40.0));
    }

    #[test]
    fn test_never_attach_to_text() {
        let mut c = Construction::new();
        let label = c.new_entity(Geometry::Text(Text::new(Point2::new(0.0, 0.0), "L", 12.0))).unwrap();
        let label_id: EntityId = label.id;
        c.insert(label).unwrap();
        let config = EngineConfig::default();
        let ctx = ToolContext::new(&c, &config);
        let mut tool = TextTool::new();

        let pick = Pick {
            hit: Some(label_id),
            ..Pick::at(Point2::new(0.0, 0.0))
        };
        let ToolResponse::Commit(geoms) = tool.on_pointer_down(&ctx, &pick) else {
            panic!("expected commit");
        };
        let Geometry::Text(text) = &geoms[0] else {
            panic!("expected text");
        };
        assert_eq!(text.target, None);
    }
}
