//! 实体定义
//!
//! 实体 = 稳定ID + 几何数据 + 显示状态 + 样式 + 元数据。

use crate::geometry::Geometry;
use crate::math::{BoundingBox2, Point2};
use crate::properties::Style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 实体唯一标识符
///
/// 创建时分配，永不复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 构造中的一个几何对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// 显示名称
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// 锁定后工具不能修改或删除
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub style: Style,
    /// 自由格式的附加信息
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub geometry: Geometry,
}

fn default_true() -> bool {
    true
}

impl Entity {
    pub fn new(id: EntityId, geometry: Geometry) -> Self {
        Self {
            id,
            name: None,
            visible: true,
            locked: false,
            selected: false,
            style: Style::default(),
            metadata: BTreeMap::new(),
            geometry,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.geometry.type_name()
    }

    /// 显示标签：名称优先，否则为类型+ID
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.type_name(), self.id),
        }
    }

    pub fn distance_to(&self, point: &Point2) -> f64 {
        self.geometry.distance_to(point)
    }

    /// 命中测试，容差按线宽放宽
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        self.geometry
            .contains_point(point, tolerance + self.style.hit_padding())
    }

    /// 按线宽扩展后的包围盒
    pub fn bounds(&self) -> BoundingBox2 {
        self.geometry.bounds().expanded(self.style.hit_padding())
    }

    pub fn intersect(&self, other: &Entity) -> Vec<Point2> {
        self.geometry.intersect(&other.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Line, Point};

    #[test]
    fn test_entity_label() {
        let e = Entity::new(EntityId(7), Geometry::Point(Point::new(1.0, 2.0)));
        assert_eq!(e.label(), "Point #7");
        let named = e.with_name("A");
        assert_eq!(named.label(), "A");
    }

    #[test]
    fn test_bounds_padded_by_stroke() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let mut e = Entity::new(EntityId(1), Geometry::Line(line));
        e.style.width = 4.0;
        let bbox = e.bounds();
        assert_eq!(bbox.min, Point2::new(-2.0, -2.0));
        assert_eq!(bbox.max, Point2::new(12.0, 2.0));
    }

    #[test]
    fn test_entity_json_roundtrip_keeps_id() {
        let e = Entity::new(EntityId(3), Geometry::Point(Point::new(1.5, -2.0)));
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["id"], serde_json::json!(3));
        assert_eq!(value["geometry"]["type"], serde_json::json!("Point"));
        let back: Entity = serde_json::from_value(value).unwrap();
        assert_eq!(back, e);
    }
}
