//! Tool 系统 - 多手势构造状态机
//!
//! 每个构造模式是一个独立的 Tool 实现，按状态机处理指针/键盘事件。
//! 工具只读取构造集合，所有持久修改通过返回的 [`ToolResponse`]
//! 交给事件分发层，再由命令日志执行。

use crate::config::EngineConfig;
use zgeo_core::construction::Construction;
use zgeo_core::entity::{Entity, EntityId};
use zgeo_core::error::GeometryError;
use zgeo_core::geometry::{Endpoint, Geometry, Line};
use zgeo_core::math::Point2;
use zgeo_core::snap::SnapResult;

/// 画圆模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CircleMode {
    /// 圆心 + 圆上一点
    #[default]
    CenterPoint,
    /// 直径两端点
    Diameter,
    /// 固定半径
    FixedRadius,
    /// 三点
    ThreePoints,
}

/// 垂线模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PerpendicularMode {
    /// 从点到直线的垂足
    #[default]
    PointToLine,
    /// 过点作垂直于直线的线
    ThroughPoint,
}

/// 角平分线模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BisectorMode {
    /// 三点（第二点为顶点）
    #[default]
    ThreePoints,
    /// 两条直线
    TwoLines,
}

/// 工具类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Select,
    Point,
    Line,
    Polygon,
    RegularPolygon,
    Circle(CircleMode),
    Perpendicular(PerpendicularMode),
    Parallel,
    AngleBisector(BisectorMode),
    Compass,
    Intersection,
    Text,
}

impl ToolKind {
    /// 获取工具名称
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Point => "Point",
            ToolKind::Line => "Line",
            ToolKind::Polygon => "Polygon",
            ToolKind::RegularPolygon => "Regular Polygon",
            ToolKind::Circle(CircleMode::CenterPoint) => "Circle",
            ToolKind::Circle(CircleMode::Diameter) => "Circle (Diameter)",
            ToolKind::Circle(CircleMode::FixedRadius) => "Circle (Fixed Radius)",
            ToolKind::Circle(CircleMode::ThreePoints) => "Circle (3 Points)",
            ToolKind::Perpendicular(PerpendicularMode::PointToLine) => "Perpendicular",
            ToolKind::Perpendicular(PerpendicularMode::ThroughPoint) => "Perpendicular (Through Point)",
            ToolKind::Parallel => "Parallel",
            ToolKind::AngleBisector(BisectorMode::ThreePoints) => "Angle Bisector",
            ToolKind::AngleBisector(BisectorMode::TwoLines) => "Angle Bisector (Two Lines)",
            ToolKind::Compass => "Compass",
            ToolKind::Intersection => "Intersection",
            ToolKind::Text => "Text",
        }
    }

    /// 获取快捷键
    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            ToolKind::Select => Some("Space"),
            ToolKind::Point => Some("."),
            ToolKind::Line => Some("L"),
            ToolKind::Polygon => Some("P"),
            ToolKind::RegularPolygon => Some("RP"),
            ToolKind::Circle(CircleMode::CenterPoint) => Some("C"),
            ToolKind::Circle(CircleMode::ThreePoints) => Some("C3"),
            ToolKind::Perpendicular(_) => Some("PE"),
            ToolKind::Parallel => Some("PA"),
            ToolKind::AngleBisector(_) => Some("B"),
            ToolKind::Compass => Some("CO"),
            ToolKind::Intersection => Some("I"),
            ToolKind::Text => Some("T"),
            ToolKind::Circle(_) => None,
        }
    }

    /// 所有工具
    pub fn all() -> Vec<ToolKind> {
        vec![
            ToolKind::Select,
            ToolKind::Point,
            ToolKind::Line,
            ToolKind::Polygon,
            ToolKind::RegularPolygon,
            ToolKind::Circle(CircleMode::CenterPoint),
            ToolKind::Circle(CircleMode::Diameter),
            ToolKind::Circle(CircleMode::FixedRadius),
            ToolKind::Circle(CircleMode::ThreePoints),
            ToolKind::Perpendicular(PerpendicularMode::PointToLine),
            ToolKind::Perpendicular(PerpendicularMode::ThroughPoint),
            ToolKind::Parallel,
            ToolKind::AngleBisector(BisectorMode::ThreePoints),
            ToolKind::AngleBisector(BisectorMode::TwoLines),
            ToolKind::Compass,
            ToolKind::Intersection,
            ToolKind::Text,
        ]
    }
}

/// 工具生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolState {
    /// 等待第一次拾取
    Idle,
    /// 正在累积拾取
    Active,
}

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// 修饰键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// 按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Delete,
    Char(char),
}

/// 输入事件（世界坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolEvent {
    PointerDown {
        pos: Point2,
        button: MouseButton,
        double_click: bool,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point2,
    },
    PointerUp {
        pos: Point2,
        modifiers: Modifiers,
    },
    KeyPress(Key),
}

impl ToolEvent {
    /// 左键按下
    pub fn pointer_down(pos: Point2) -> Self {
        ToolEvent::PointerDown {
            pos,
            button: MouseButton::Left,
            double_click: false,
            modifiers: Modifiers::default(),
        }
    }

    pub fn double_click(pos: Point2) -> Self {
        ToolEvent::PointerDown {
            pos,
            button: MouseButton::Left,
            double_click: true,
            modifiers: Modifiers::default(),
        }
    }

    pub fn pointer_move(pos: Point2) -> Self {
        ToolEvent::PointerMove { pos }
    }

    pub fn pointer_up(pos: Point2) -> Self {
        ToolEvent::PointerUp {
            pos,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key(key: Key) -> Self {
        ToolEvent::KeyPress(key)
    }

    /// 事件携带的光标位置
    pub fn position(&self) -> Option<Point2> {
        match self {
            ToolEvent::PointerDown { pos, .. }
            | ToolEvent::PointerMove { pos }
            | ToolEvent::PointerUp { pos, .. } => Some(*pos),
            ToolEvent::KeyPress(_) => None,
        }
    }
}

/// 一次拾取：捕捉后的位置 + 光标下的对象
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// 捕捉后的位置
    pub position: Point2,
    /// 原始光标位置
    pub raw: Point2,
    pub snap: SnapResult,
    /// 原始光标处命中的可见对象
    pub hit: Option<EntityId>,
    pub double_click: bool,
    pub modifiers: Modifiers,
}

impl Pick {
    /// 不经捕捉的拾取
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            raw: position,
            snap: SnapResult::none(position),
            hit: None,
            double_click: false,
            modifiers: Modifiers::default(),
        }
    }
}

/// Tool 上下文 - 传递给 Tool 的只读运行时信息
pub struct ToolContext<'a> {
    pub construction: &'a Construction,
    pub config: &'a EngineConfig,
}

impl<'a> ToolContext<'a> {
    pub fn new(construction: &'a Construction, config: &'a EngineConfig) -> Self {
        Self {
            construction,
            config,
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.construction.get(id)
    }

    /// 拾取命中的直线
    pub fn hit_line(&self, pick: &Pick) -> Result<(EntityId, Line), RejectReason> {
        let id = pick.hit.ok_or(RejectReason::NoObject)?;
        match self.entity(id).map(|e| &e.geometry) {
            Some(Geometry::Line(line)) => Ok((id, line.clone())),
            Some(_) => Err(RejectReason::WrongObjectType),
            None => Err(RejectReason::NoObject),
        }
    }
}

/// 拾取被拒绝的原因
///
/// 工具保持 Active 并保留已累积的拾取。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 需要拾取对象，但光标下没有
    NoObject,
    /// 对象类型不符
    WrongObjectType,
    /// 重复拾取同一对象
    SameObject,
    /// 与已有拾取点重合
    DuplicatePoint,
    /// 几何退化
    Degenerate(GeometryError),
}

impl From<GeometryError> for RejectReason {
    fn from(err: GeometryError) -> Self {
        RejectReason::Degenerate(err)
    }
}

/// Tool 对事件的响应
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// 事件与当前工具无关
    Ignored,
    /// 继续当前手势
    Continue,
    /// 拾取无效
    Rejected(RejectReason),
    /// 完成手势，创建几何对象
    Commit(Vec<Geometry>),
    /// 修改选择
    Select { ids: Vec<EntityId>, additive: bool },
    /// 删除对象
    Delete(Vec<EntityId>),
    /// 移动直线的一个端点
    MoveEndpoint {
        id: EntityId,
        which: Endpoint,
        to: Point2,
    },
}

/// 预览几何体
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewGeometry {
    pub geometry: Geometry,
    /// 是否是参考线（虚线显示）
    pub is_reference: bool,
    /// 附加说明（例如平行线距离）
    pub annotation: Option<String>,
}

impl PreviewGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: false,
            annotation: None,
        }
    }

    pub fn reference(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: true,
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, text: impl Into<String>) -> Self {
        self.annotation = Some(text.into());
        self
    }
}

/// Tool trait - 所有构造工具的核心接口
pub trait Tool: Send {
    /// 获取工具类型
    fn kind(&self) -> ToolKind;

    /// 获取工具名称
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// 当前生命周期状态
    fn state(&self) -> ToolState;

    /// 丢弃所有累积的拾取，回到 Idle
    fn reset(&mut self);

    // ========== 事件处理 ==========

    /// 指针按下（已捕捉）
    fn on_pointer_down(&mut self, ctx: &ToolContext, pick: &Pick) -> ToolResponse;

    /// 指针移动
    fn on_pointer_move(&mut self, _ctx: &ToolContext, _pick: &Pick) -> ToolResponse {
        ToolResponse::Continue
    }

    /// 指针释放
    fn on_pointer_up(&mut self, _ctx: &ToolContext, _pick: &Pick) -> ToolResponse {
        ToolResponse::Ignored
    }

    /// 按键（Escape 由分发层统一处理）
    fn on_key(&mut self, _ctx: &ToolContext, _key: Key) -> ToolResponse {
        ToolResponse::Ignored
    }

    // ========== UI 提示 ==========

    /// 获取当前状态的提示文本
    fn prompt(&self) -> &str;

    // ========== 预览 ==========

    /// 悬停拾取处的预览，只读，不修改构造
    ///
    /// pick 与指针按下时的拾取相同（已捕捉，带命中对象）。
    fn preview(&self, ctx: &ToolContext, pick: &Pick) -> Vec<PreviewGeometry>;

    /// 捕捉时需要排除的对象
    fn snap_exclusions(&self) -> Vec<EntityId> {
        vec![]
    }
}
