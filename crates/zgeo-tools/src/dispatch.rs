//! 事件分发
//!
//! 把输入事件交给当前工具，并把工具的响应落实到构造集合上。
//! 创建、删除、端点移动都经由命令日志执行，选择状态直接修改。

use crate::config::EngineConfig;
use crate::tool::{
    Key, Modifiers, MouseButton, Pick, PreviewGeometry, RejectReason, Tool, ToolContext,
    ToolEvent, ToolResponse, ToolState,
};
use serde_json::json;
use tracing::{debug, warn};
use zgeo_core::command::Command;
use zgeo_core::construction::Construction;
use zgeo_core::entity::EntityId;
use zgeo_core::geometry::{Endpoint, EndpointMoved, Geometry};
use zgeo_core::history::History;
use zgeo_core::math::Point2;
use zgeo_core::snap::{SnapEngine, SnapResult};

/// 手势结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 手势完成（可能没有创建任何对象，例如没有交点）
    Completed,
    /// 被 Escape 取消，累积的拾取全部丢弃
    Cancelled,
}

/// 一次事件的处理结果
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// 新创建的对象
    pub committed: Vec<EntityId>,
    pub deleted: Vec<EntityId>,
    pub endpoint_moved: Option<(EntityId, EndpointMoved)>,
    pub preview: Vec<PreviewGeometry>,
    /// 指针事件的捕捉结果
    pub snap: Option<SnapResult>,
    /// 处理后的工具状态
    pub state: ToolState,
    pub transition: Option<Transition>,
    pub rejected: Option<RejectReason>,
    /// 关闭连续创建时，完成手势后应切回选择工具
    pub deactivate: bool,
}

impl EventOutcome {
    fn new(state: ToolState) -> Self {
        Self {
            committed: Vec::new(),
            deleted: Vec::new(),
            endpoint_moved: None,
            preview: Vec::new(),
            snap: None,
            state,
            transition: None,
            rejected: None,
            deactivate: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.transition == Some(Transition::Cancelled)
    }

    pub fn is_completed(&self) -> bool {
        self.transition == Some(Transition::Completed)
    }
}

/// 为指针位置生成拾取：捕捉 + 命中测试
pub fn make_pick(
    construction: &Construction,
    tool: &dyn Tool,
    config: &EngineConfig,
    pos: Point2,
    double_click: bool,
    modifiers: Modifiers,
) -> Pick {
    let engine = SnapEngine::new(config.snap_config());
    let snap = construction.snap(&engine, pos, &tool.snap_exclusions());
    let hit = construction.hit_test(&pos, config.snap_tolerance);
    Pick {
        position: snap.position,
        raw: pos,
        snap,
        hit,
        double_click,
        modifiers,
    }
}

/// 处理一个输入事件
///
/// 事件严格按到达顺序同步处理；工具只读构造集合，所有修改在工具返回后进行。
pub fn apply_event(
    construction: &mut Construction,
    history: &mut History,
    tool: &mut dyn Tool,
    config: &EngineConfig,
    event: &ToolEvent,
) -> EventOutcome {
    // Escape：非空闲时取消当前手势
    if let ToolEvent::KeyPress(Key::Escape) = event {
        if tool.state() != ToolState::Idle {
            tool.reset();
            debug!("{} 已取消", tool.name());
            let mut outcome = EventOutcome::new(tool.state());
            outcome.transition = Some(Transition::Cancelled);
            return outcome;
        }
    }

    let pick = match *event {
        ToolEvent::PointerDown { button, .. } if button != MouseButton::Left => {
            return EventOutcome::new(tool.state());
        }
        ToolEvent::PointerDown {
            pos,
            double_click,
            modifiers,
            ..
        } => Some(make_pick(construction, tool, config, pos, double_click, modifiers)),
        ToolEvent::PointerMove { pos } => {
            Some(make_pick(construction, tool, config, pos, false, Modifiers::default()))
        }
        ToolEvent::PointerUp { pos, modifiers } => {
            Some(make_pick(construction, tool, config, pos, false, modifiers))
        }
        ToolEvent::KeyPress(_) => None,
    };

    let response = {
        let ctx = ToolContext::new(construction, config);
        match (event, &pick) {
            (ToolEvent::PointerDown { .. }, Some(pick)) => tool.on_pointer_down(&ctx, pick),
            (ToolEvent::PointerMove { .. }, Some(pick)) => tool.on_pointer_move(&ctx, pick),
            (ToolEvent::PointerUp { .. }, Some(pick)) => tool.on_pointer_up(&ctx, pick),
            (ToolEvent::KeyPress(key), _) => tool.on_key(&ctx, *key),
            _ => ToolResponse::Ignored,
        }
    };

    let mut outcome = EventOutcome::new(tool.state());
    apply_response(construction, history, tool, config, response, &mut outcome);
    outcome.state = tool.state();

    outcome.deactivate = !config.continuous_creation
        && outcome.is_completed()
        && outcome.state == ToolState::Idle;

    if let Some(pick) = pick {
        outcome.snap = Some(pick.snap);
        if config.show_preview {
            let ctx = ToolContext::new(construction, config);
            outcome.preview = tool.preview(&ctx, &pick);
        }
    }

    outcome
}

fn apply_response(
    construction: &mut Construction,
    history: &mut History,
    tool: &dyn Tool,
    config: &EngineConfig,
    response: ToolResponse,
    outcome: &mut EventOutcome,
) {
    match response {
        ToolResponse::Ignored | ToolResponse::Continue => {}
        ToolResponse::Rejected(reason) => {
            debug!("{} 拒绝拾取: {:?}", tool.name(), reason);
            outcome.rejected = Some(reason);
        }
        ToolResponse::Commit(geometries) => {
            outcome.committed = commit(construction, history, config, geometries);
            outcome.transition = Some(Transition::Completed);
            debug!("{} 完成, 创建 {} 个对象", tool.name(), outcome.committed.len());
        }
        ToolResponse::Select { ids, additive } => {
            construction.set_selection(&ids, additive);
        }
        ToolResponse::Delete(ids) => {
            outcome.deleted = delete(construction, history, &ids);
        }
        ToolResponse::MoveEndpoint { id, which, to } => {
            outcome.endpoint_moved = move_endpoint(construction, history, id, which, to);
            outcome.transition = Some(Transition::Completed);
        }
    }
}

/// 创建对象：单个对象一条 Create，多个对象一条组合命令
fn commit(
    construction: &mut Construction,
    history: &mut History,
    config: &EngineConfig,
    geometries: Vec<Geometry>,
) -> Vec<EntityId> {
    if geometries.is_empty() {
        return vec![];
    }

    let entities = match geometries
        .into_iter()
        .map(|g| construction.new_entity(g).map(|e| e.with_style(config.style.clone())))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(entities) => entities,
        Err(e) => {
            warn!("分配对象ID失败: {}", e);
            return vec![];
        }
    };
    let ids: Vec<EntityId> = entities.iter().map(|e| e.id).collect();

    let mut creates: Vec<Command> = entities.into_iter().map(Command::create).collect();
    let command = if creates.len() == 1 {
        creates.remove(0)
    } else {
        Command::compound(format!("Create {} objects", creates.len()), creates)
    };

    match history.execute(command, construction) {
        Ok(()) => ids,
        Err(e) => {
            warn!("创建对象失败: {}", e);
            vec![]
        }
    }
}

/// 删除未锁定的对象
fn delete(construction: &mut Construction, history: &mut History, ids: &[EntityId]) -> Vec<EntityId> {
    let ids: Vec<EntityId> = ids
        .iter()
        .copied()
        .filter(|id| construction.get(*id).is_some_and(|e| !e.locked))
        .collect();

    let command = match ids.as_slice() {
        [] => return vec![],
        [id] => Command::delete(*id),
        _ => Command::compound(
            format!("Delete {} objects", ids.len()),
            ids.iter().map(|id| Command::delete(*id)).collect(),
        ),
    };

    match history.execute(command, construction) {
        Ok(()) => ids,
        Err(e) => {
            warn!("删除对象失败: {}", e);
            vec![]
        }
    }
}

/// 移动直线端点，记录为一条属性修改命令
fn move_endpoint(
    construction: &mut Construction,
    history: &mut History,
    id: EntityId,
    which: Endpoint,
    to: Point2,
) -> Option<(EntityId, EndpointMoved)> {
    let entity = construction.get(id).filter(|e| !e.locked)?;
    let mut line = entity.geometry.as_line()?.clone();
    let moved = line.set_endpoint(which, to);

    let command = Command::modify_property(
        id,
        moved.which.property_path(),
        json!([moved.new_pos.x, moved.new_pos.y]),
    );
    match history.execute(command, construction) {
        Ok(()) => Some((id, moved)),
        Err(e) => {
            warn!("移动端点失败: {}", e);
            None
        }
    }
}
