//! 命令模式
//!
//! 所有对构造的持久修改都通过命令完成，以支持撤销/重做。
//! 命令只保存实体ID和序列化快照，从不持有实体引用。

use crate::construction::Construction;
use crate::entity::{Entity, EntityId};
use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, CommandError>;

/// 允许创建新键的顶层属性
const EXTENSIBLE_ROOT: &str = "metadata";

/// 可撤销的修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Command {
    /// 创建实体，保存创建时的完整快照
    Create { entity: Entity },
    /// 删除实体，执行后保存被删除的快照
    Delete {
        id: EntityId,
        #[serde(default)]
        snapshot: Option<Entity>,
    },
    /// 修改属性
    ///
    /// `path` 是序列化实体上的点分路径，例如 `style.width`、`geometry.start`。
    /// `old` 在执行时记录；为 None 表示该键原本不存在。
    ModifyProperty {
        id: EntityId,
        path: String,
        #[serde(default)]
        old: Option<Value>,
        new: Value,
    },
    /// 组合命令，作为一个原子步骤执行/撤销
    Compound { label: String, commands: Vec<Command> },
}

impl Command {
    pub fn create(entity: Entity) -> Self {
        Command::Create { entity }
    }

    pub fn delete(id: EntityId) -> Self {
        Command::Delete { id, snapshot: None }
    }

    pub fn modify_property(id: EntityId, path: impl Into<String>, value: Value) -> Self {
        Command::ModifyProperty {
            id,
            path: path.into(),
            old: None,
            new: value,
        }
    }

    pub fn compound(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Command::Compound {
            label: label.into(),
            commands,
        }
    }

    /// 显示用的描述
    pub fn label(&self) -> String {
        match self {
            Command::Create { entity } => format!("Create {}", entity.label()),
            Command::Delete { id, snapshot } => match snapshot {
                Some(entity) => format!("Delete {}", entity.label()),
                None => format!("Delete {}", id),
            },
            Command::ModifyProperty { id, path, .. } => format!("Modify {} of {}", path, id),
            Command::Compound { label, .. } => label.clone(),
        }
    }

    /// 受影响的实体
    pub fn affected_ids(&self) -> Vec<EntityId> {
        match self {
            Command::Create { entity } => vec![entity.id],
            Command::Delete { id, .. } | Command::ModifyProperty { id, .. } => vec![*id],
            Command::Compound { commands, .. } => {
                commands.iter().flat_map(|c| c.affected_ids()).collect()
            }
        }
    }

    /// 执行
    pub fn execute(&mut self, construction: &mut Construction) -> Result<()> {
        match self {
            Command::Create { entity } => {
                if construction.contains(entity.id) {
                    return Err(CommandError::DuplicateId(entity.id));
                }
                construction.insert(entity.clone())?;
                Ok(())
            }
            Command::Delete { id, snapshot } => {
                let removed = construction
                    .remove(*id)
                    .ok_or(CommandError::EntityNotFound(*id))?;
                *snapshot = Some(removed);
                Ok(())
            }
            Command::ModifyProperty { id, path, old, new } => {
                *old = set_property(construction, *id, path, Some(new.clone()))?;
                Ok(())
            }
            Command::Compound { commands, .. } => {
                for i in 0..commands.len() {
                    if let Err(err) = commands[i].execute(construction) {
                        rollback(&mut commands[..i], construction);
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    /// 撤销
    pub fn undo(&mut self, construction: &mut Construction) -> Result<()> {
        match self {
            Command::Create { entity } => {
                construction
                    .remove(entity.id)
                    .ok_or(CommandError::EntityNotFound(entity.id))?;
                Ok(())
            }
            Command::Delete { id, snapshot } => {
                let entity = snapshot.clone().ok_or(CommandError::EntityNotFound(*id))?;
                if construction.contains(entity.id) {
                    return Err(CommandError::DuplicateId(entity.id));
                }
                construction.insert(entity)?;
                Ok(())
            }
            Command::ModifyProperty { id, path, old, .. } => {
                set_property(construction, *id, path, old.clone())?;
                Ok(())
            }
            Command::Compound { commands, .. } => {
                let n = commands.len();
                for i in (0..n).rev() {
                    if let Err(err) = commands[i].undo(construction) {
                        // 恢复已撤销的部分
                        for cmd in commands[i + 1..].iter_mut() {
                            if let Err(e) = cmd.execute(construction) {
                                warn!(error = %e, "failed to restore compound command");
                            }
                        }
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    /// 重做
    pub fn redo(&mut self, construction: &mut Construction) -> Result<()> {
        self.execute(construction)
    }
}

/// 按逆序撤销已执行的子命令
fn rollback(applied: &mut [Command], construction: &mut Construction) {
    for cmd in applied.iter_mut().rev() {
        if let Err(e) = cmd.undo(construction) {
            warn!(error = %e, "rollback of compound command failed");
        }
    }
}

/// 设置（value 为 Some）或删除（None）属性，返回原来的值
fn set_property(
    construction: &mut Construction,
    id: EntityId,
    path: &str,
    value: Option<Value>,
) -> Result<Option<Value>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(CommandError::InvalidPath(path.to_string()));
    }
    if segments[0] == "id" {
        return Err(CommandError::ImmutableProperty(path.to_string()));
    }

    let entity = construction
        .get(id)
        .ok_or(CommandError::EntityNotFound(id))?;
    let mut doc = serde_json::to_value(entity)?;

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| CommandError::InvalidPath(path.to_string()))?;
    let mut cursor = &mut doc;
    for segment in parents {
        cursor = child_mut(cursor, segment).ok_or_else(|| CommandError::InvalidPath(path.to_string()))?;
    }

    let extensible = segments[0] == EXTENSIBLE_ROOT && segments.len() == 2;
    let previous = match cursor {
        Value::Object(map) => match value {
            Some(v) => {
                if !map.contains_key(*last) && !extensible {
                    return Err(CommandError::InvalidPath(path.to_string()));
                }
                map.insert(last.to_string(), v)
            }
            None => {
                if !extensible {
                    return Err(CommandError::InvalidPath(path.to_string()));
                }
                map.remove(*last)
            }
        },
        Value::Array(items) => {
            let index: usize = last
                .parse()
                .map_err(|_| CommandError::InvalidPath(path.to_string()))?;
            let slot = items
                .get_mut(index)
                .ok_or_else(|| CommandError::InvalidPath(path.to_string()))?;
            match value {
                Some(v) => Some(std::mem::replace(slot, v)),
                None => return Err(CommandError::InvalidPath(path.to_string())),
            }
        }
        _ => return Err(CommandError::InvalidPath(path.to_string())),
    };

    let updated: Entity = serde_json::from_value(doc)?;
    debug!(%id, path, "property updated");
    construction.insert(updated)?;
    Ok(previous)
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Endpoint, Geometry, Line, Point};
    use crate::math::Point2;
    use serde_json::json;

    fn construction_with_line() -> (Construction, EntityId) {
        let mut c = Construction::new();
        let e = c.new_entity(Geometry::Line(Line::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        ))).unwrap();
        let id = e.id;
        c.insert(e).unwrap();
        (c, id)
    }

    #[test]
    fn test_create_undo_redo() {
        let mut c = Construction::new();
        let e = c.new_entity(Geometry::Point(Point::new(1.0, 2.0))).unwrap();
        let id = e.id;
        let mut cmd = Command::create(e.clone());

        cmd.execute(&mut c).unwrap();
        assert_eq!(c.get(id), Some(&e));
        cmd.undo(&mut c).unwrap();
        assert!(c.get(id).is_none());
        cmd.redo(&mut c).unwrap();
        assert_eq!(c.get(id), Some(&e));
    }

    #[test]
    fn test_create_duplicate_fails() {
        let (mut c, id) = construction_with_line();
        let dup = c.get(id).cloned().unwrap();
        let mut cmd = Command::create(dup);
        assert!(matches!(cmd.execute(&mut c), Err(CommandError::DuplicateId(_))));
    }

    #[test]
    fn test_delete_restores_snapshot() {
        let (mut c, id) = construction_with_line();
        let before = c.get(id).cloned().unwrap();

        let mut cmd = Command::delete(id);
        cmd.execute(&mut c).unwrap();
        assert!(c.get(id).is_none());
        assert_eq!(cmd.label(), format!("Delete Line {}", id));

        cmd.undo(&mut c).unwrap();
        assert_eq!(c.get(id), Some(&before));
    }

    #[test]
    fn test_delete_missing_entity() {
        let mut c = Construction::new();
        let mut cmd = Command::delete(EntityId(9));
        assert!(matches!(cmd.execute(&mut c), Err(CommandError::EntityNotFound(_))));
    }

    #[test]
    fn test_modify_nested_style_field() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::modify_property(id, "style.width", json!(5.0));

        cmd.execute(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().style.width, 5.0);
        cmd.undo(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().style.width, 2.0);
        cmd.redo(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().style.width, 5.0);
    }

    #[test]
    fn test_modify_endpoint_moves_one_end() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::modify_property(id, Endpoint::Endpoint2.property_path(), json!([4.0, 3.0]));
        cmd.execute(&mut c).unwrap();

        let line = c.get(id).unwrap().geometry.as_line().cloned().unwrap();
        assert_eq!(line.start, Point2::new(0.0, 0.0));
        assert_eq!(line.end, Point2::new(4.0, 3.0));
    }

    #[test]
    fn test_modify_array_index() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::modify_property(id, "geometry.start.1", json!(7.0));
        cmd.execute(&mut c).unwrap();
        let line = c.get(id).unwrap().geometry.as_line().cloned().unwrap();
        assert_eq!(line.start, Point2::new(0.0, 7.0));
    }

    #[test]
    fn test_metadata_key_created_and_removed() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::modify_property(id, "metadata.source", json!("intersection"));

        cmd.execute(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().metadata["source"], json!("intersection"));
        cmd.undo(&mut c).unwrap();
        assert!(c.get(id).unwrap().metadata.is_empty());
    }

    #[test]
    fn test_unknown_path_rejected() {
        let (mut c, id) = construction_with_line();
        let before = c.get(id).cloned();
        let mut cmd = Command::modify_property(id, "style.nope", json!(1));
        assert!(matches!(cmd.execute(&mut c), Err(CommandError::InvalidPath(_))));
        assert_eq!(c.get(id).cloned(), before);
    }

    #[test]
    fn test_id_is_immutable() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::modify_property(id, "id", json!(99));
        assert!(matches!(cmd.execute(&mut c), Err(CommandError::ImmutableProperty(_))));
    }

    #[test]
    fn test_type_mismatch_leaves_entity_untouched() {
        let (mut c, id) = construction_with_line();
        let before = c.get(id).cloned();
        let mut cmd = Command::modify_property(id, "style.width", json!("wide"));
        assert!(matches!(cmd.execute(&mut c), Err(CommandError::Serialization(_))));
        assert_eq!(c.get(id).cloned(), before);
    }

    #[test]
    fn test_compound_undo_in_reverse() {
        let (mut c, id) = construction_with_line();
        let mut cmd = Command::compound(
            "Restyle",
            vec![
                Command::modify_property(id, "style.width", json!(3.0)),
                Command::modify_property(id, "style.width", json!(4.0)),
            ],
        );
        cmd.execute(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().style.width, 4.0);
        cmd.undo(&mut c).unwrap();
        assert_eq!(c.get(id).unwrap().style.width, 2.0);
        assert_eq!(cmd.label(), "Restyle");
    }

    #[test]
    fn test_compound_is_atomic() {
        let (mut c, id) = construction_with_line();
        let point = c.new_entity(Geometry::Point(Point::new(0.0, 0.0))).unwrap();
        let point_id = point.id;

        let mut cmd = Command::compound(
            "Broken",
            vec![
                Command::create(point),
                Command::modify_property(id, "style.width", json!(9.0)),
                Command::delete(EntityId(999)),
            ],
        );
        assert!(cmd.execute(&mut c).is_err());
        assert!(c.get(point_id).is_none());
        assert_eq!(c.get(id).unwrap().style.width, 2.0);
    }

    #[test]
    fn test_command_serializes() {
        let cmd = Command::modify_property(EntityId(3), "style.width", json!(1.5));
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["kind"], json!("ModifyProperty"));
        let back: Command = serde_json::from_value(value).unwrap();
        assert_eq!(back, cmd);
    }
}
