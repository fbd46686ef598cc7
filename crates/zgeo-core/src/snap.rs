//! 捕捉系统
//!
//! 把原始光标位置解析为网格点或已有对象上的精确点。
//!
//! 对象捕捉优先于网格捕捉：
//! - 点：直接重合
//! - 直线：按直线类型截断的投影
//! - 圆：径向投影
//! - 多边形：最近顶点
//! - 文本：插入点

use crate::entity::{Entity, EntityId};
use crate::geometry::Geometry;
use crate::math::Point2;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnapKind {
    /// 未捕捉
    #[default]
    None,
    /// 网格点
    Grid,
    /// 对象
    Object,
}

impl SnapKind {
    /// 获取捕捉类型的名称
    pub fn name(&self) -> &'static str {
        match self {
            SnapKind::None => "无",
            SnapKind::Grid => "网格点",
            SnapKind::Object => "对象",
        }
    }
}

/// 捕捉结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// 解析后的世界坐标
    pub position: Point2,
    pub kind: SnapKind,
    /// 捕捉到的对象（仅对象捕捉）
    pub target: Option<EntityId>,
    /// 原始位置到捕捉目标的距离
    pub distance: f64,
}

impl SnapResult {
    /// 未捕捉：原样返回原始位置
    pub fn none(raw: Point2) -> Self {
        Self {
            position: raw,
            kind: SnapKind::None,
            target: None,
            distance: 0.0,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.kind != SnapKind::None
    }
}

/// 捕捉配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub snap_to_grid: bool,
    pub snap_to_objects: bool,
    /// 捕捉容差（世界单位）
    pub snap_tolerance: f64,
    /// 网格间距
    pub grid_spacing: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            snap_to_objects: true,
            snap_tolerance: 10.0,
            grid_spacing: 50.0,
        }
    }
}

/// 捕捉引擎
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    /// 获取配置
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// 获取配置（可变）
    pub fn config_mut(&mut self) -> &mut SnapConfig {
        &mut self.config
    }

    /// 解析捕捉点
    ///
    /// # 参数
    /// - `raw`: 原始世界坐标
    /// - `entities`: 按迭代顺序扫描的实体，距离相等时取先出现者
    /// - `exclude`: 不参与捕捉的实体（例如正在拖动的对象）
    pub fn resolve<'a>(
        &self,
        raw: Point2,
        entities: impl IntoIterator<Item = &'a Entity>,
        exclude: &[EntityId],
    ) -> SnapResult {
        if self.config.snap_to_objects {
            if let Some(result) = self.snap_to_objects(raw, entities, exclude) {
                trace!(entity = ?result.target, distance = result.distance, "object snap");
                return result;
            }
        }

        if self.config.snap_to_grid {
            if let Some(result) = self.snap_to_grid(raw) {
                return result;
            }
        }

        SnapResult::none(raw)
    }

    /// 对象捕捉：容差内距离最近的对象
    fn snap_to_objects<'a>(
        &self,
        raw: Point2,
        entities: impl IntoIterator<Item = &'a Entity>,
        exclude: &[EntityId],
    ) -> Option<SnapResult> {
        let tolerance = self.config.snap_tolerance;
        let mut best: Option<(&Entity, f64)> = None;

        for entity in entities {
            if !entity.visible || exclude.contains(&entity.id) {
                continue;
            }
            let dist = entity.distance_to(&raw);
            if dist > tolerance {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((entity, dist)),
            }
        }

        best.map(|(entity, dist)| SnapResult {
            position: Self::snap_point_on(&entity.geometry, raw),
            kind: SnapKind::Object,
            target: Some(entity.id),
            distance: dist,
        })
    }

    /// 对象上的精确捕捉点
    pub fn snap_point_on(geometry: &Geometry, raw: Point2) -> Point2 {
        match geometry {
            Geometry::Point(p) => p.position,
            Geometry::Line(line) => line.closest_point(&raw),
            Geometry::Circle(circle) => circle.nearest_point(&raw),
            Geometry::Polygon(polygon) => polygon.nearest_vertex(&raw).unwrap_or(raw),
            Geometry::Text(text) => text.position,
        }
    }

    /// 网格捕捉
    fn snap_to_grid(&self, raw: Point2) -> Option<SnapResult> {
        let spacing = self.config.grid_spacing;
        if spacing <= 0.0 {
            return None;
        }

        let grid_x = (raw.x / spacing).round() * spacing;
        let grid_y = (raw.y / spacing).round() * spacing;
        let grid_point = Point2::new(grid_x, grid_y);

        let dist = (grid_point - raw).norm();
        if dist <= self.config.snap_tolerance {
            Some(SnapResult {
                position: grid_point,
                kind: SnapKind::Grid,
                target: None,
                distance: dist,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line, Point, Polygon};
    use crate::math::EPSILON;

    fn entity(id: u64, geometry: Geometry) -> Entity {
        Entity::new(EntityId(id), geometry)
    }

    #[test]
    fn test_grid_snap() {
        let engine = SnapEngine::default();
        let result = engine.resolve(Point2::new(95.0, 95.0), std::iter::empty(), &[]);
        assert_eq!(result.position, Point2::new(100.0, 100.0));
        assert_eq!(result.kind, SnapKind::Grid);
        assert_eq!(result.target, None);
    }

    #[test]
    fn test_object_snap_wins_over_grid() {
        let engine = SnapEngine::default();
        let entities = vec![entity(1, Geometry::Point(Point::new(100.0, 100.0)))];
        let result = engine.resolve(Point2::new(96.0, 96.0), &entities, &[]);
        assert_eq!(result.position, Point2::new(100.0, 100.0));
        assert_eq!(result.kind, SnapKind::Object);
        assert_eq!(result.target, Some(EntityId(1)));
    }

    #[test]
    fn test_no_snap_returns_raw() {
        let engine = SnapEngine::default();
        let raw = Point2::new(25.0, 25.0);
        let result = engine.resolve(raw, std::iter::empty(), &[]);
        assert_eq!(result, SnapResult::none(raw));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_excluded_and_hidden_entities_ignored() {
        let engine = SnapEngine::default();
        let mut hidden = entity(2, Geometry::Point(Point::new(27.0, 27.0)));
        hidden.visible = false;
        let entities = vec![entity(1, Geometry::Point(Point::new(26.0, 26.0))), hidden];

        let result = engine.resolve(Point2::new(25.0, 25.0), &entities, &[EntityId(1)]);
        assert_eq!(result.kind, SnapKind::None);
    }

    #[test]
    fn test_line_snap_projects() {
        let engine = SnapEngine::default();
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(30.0, 0.0));
        let entities = vec![entity(1, Geometry::Line(line))];
        let result = engine.resolve(Point2::new(12.0, 4.0), &entities, &[]);
        assert_eq!(result.kind, SnapKind::Object);
        assert!((result.position.x - 12.0).abs() < EPSILON);
        assert!(result.position.y.abs() < EPSILON);
    }

    #[test]
    fn test_circle_snap_radial() {
        let engine = SnapEngine::default();
        let circle = Circle::new(Point2::new(0.0, 0.0), 20.0);
        let entities = vec![entity(1, Geometry::Circle(circle))];
        let result = engine.resolve(Point2::new(0.0, 23.0), &entities, &[]);
        assert!((result.position.y - 20.0).abs() < EPSILON);
        assert!(result.position.x.abs() < EPSILON);
    }

    #[test]
    fn test_polygon_snaps_to_vertex() {
        let engine = SnapEngine::default();
        let polygon = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(20.0, 20.0),
        ]);
        let entities = vec![entity(1, Geometry::Polygon(polygon))];
        let result = engine.resolve(Point2::new(17.0, 3.0), &entities, &[]);
        assert_eq!(result.position, Point2::new(20.0, 0.0));
    }

    #[test]
    fn test_nearest_object_wins_first_on_tie() {
        let engine = SnapEngine::default();
        let entities = vec![
            entity(1, Geometry::Point(Point::new(23.0, 20.0))),
            entity(2, Geometry::Point(Point::new(21.0, 20.0))),
            entity(3, Geometry::Point(Point::new(19.0, 20.0))),
        ];
        let result = engine.resolve(Point2::new(20.0, 20.0), &entities, &[]);
        assert_eq!(result.target, Some(EntityId(2)));
    }

    #[test]
    fn test_disabled_grid() {
        let engine = SnapEngine::new(SnapConfig {
            grid_spacing: 0.0,
            ..SnapConfig::default()
        });
        let raw = Point2::new(1.0, 1.0);
        assert_eq!(engine.resolve(raw, std::iter::empty(), &[]).kind, SnapKind::None);
    }
}
