//! 构造集合
//!
//! 一次编辑会话中所有存活对象及其选择状态。对象按 ID 存放，
//! 命令只保存 ID 和快照，不持有对象引用。

use crate::entity::{Entity, EntityId};
use crate::error::CommandError;
use crate::geometry::Geometry;
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::snap::{SnapEngine, SnapResult};
use std::collections::BTreeMap;

/// 文本自动定位时相对锚点的偏移
pub fn label_offset() -> Vector2 {
    Vector2::new(5.0, -5.0)
}

/// 存活对象集合
#[derive(Debug, Clone, Default)]
pub struct Construction {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Construction {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// 分配新ID（永不复用）
    ///
    /// ID 空间耗尽时返回错误，不会回绕。
    pub fn allocate_id(&mut self) -> Result<EntityId, CommandError> {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0.checked_add(1).ok_or(CommandError::IdExhausted(id))?;
        Ok(id)
    }

    /// 用新ID创建实体（尚未插入）
    pub fn new_entity(&mut self, geometry: Geometry) -> Result<Entity, CommandError> {
        let id = self.allocate_id()?;
        Ok(Entity::new(id, geometry))
    }

    /// 插入实体，返回被替换的旧实体
    ///
    /// ID 之后没有可分配的 ID 时拒绝插入，集合不变。
    pub fn insert(&mut self, entity: Entity) -> Result<Option<Entity>, CommandError> {
        if entity.id.0 >= self.next_id {
            self.next_id = entity
                .id
                .0
                .checked_add(1)
                .ok_or(CommandError::IdExhausted(entity.id))?;
        }
        Ok(self.entities.insert(entity.id, entity))
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// 按ID顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 命中测试：光标处容差内距离最近的可见对象
    pub fn hit_test(&self, pos: &Point2, tolerance: f64) -> Option<EntityId> {
        let mut best: Option<(EntityId, f64)> = None;
        for entity in self.entities.values() {
            if !entity.visible || !entity.contains_point(pos, tolerance) {
                continue;
            }
            let dist = entity.distance_to(pos);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((entity.id, dist)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// 包围盒完全位于矩形内的可见对象
    pub fn query_rect(&self, rect: &BoundingBox2) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.visible && rect.contains_box(&e.bounds()))
            .map(|e| e.id)
            .collect()
    }

    /// 捕捉解析
    pub fn snap(&self, engine: &SnapEngine, raw: Point2, exclude: &[EntityId]) -> SnapResult {
        engine.resolve(raw, self.entities.values(), exclude)
    }

    // ========== 选择 ==========

    pub fn select(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.selected = true;
                true
            }
            None => false,
        }
    }

    pub fn deselect(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.selected = false;
        }
    }

    pub fn toggle_selection(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.selected = !entity.selected;
        }
    }

    pub fn clear_selection(&mut self) {
        for entity in self.entities.values_mut() {
            entity.selected = false;
        }
    }

    /// 用给定ID替换（或追加到）当前选择
    pub fn set_selection(&mut self, ids: &[EntityId], additive: bool) {
        if !additive {
            self.clear_selection();
        }
        for id in ids {
            self.select(*id);
        }
    }

    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.selected)
            .map(|e| e.id)
            .collect()
    }

    // ========== 文本关联 ==========

    /// 文本的实际显示位置
    ///
    /// 开启自动定位且目标仍存在时，跟随目标的标注锚点；否则使用存储的位置。
    pub fn text_position(&self, id: EntityId) -> Option<Point2> {
        let Geometry::Text(text) = &self.entities.get(&id)?.geometry else {
            return None;
        };
        if text.auto_position {
            if let Some(target) = text.target.and_then(|t| self.entities.get(&t)) {
                return Some(target.geometry.label_anchor() + label_offset());
            }
        }
        Some(text.position)
    }
}
