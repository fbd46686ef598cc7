//! ZGEO 交互工具
//!
//! 多手势构造工具的状态机、事件分发和编辑会话。
//! 工具只读构造集合，修改统一经由 `zgeo_core` 的命令日志。

pub mod config;
pub mod dispatch;
pub mod session;
pub mod tool;
pub mod tools;

pub use config::{EngineConfig, ToolDefaults};
pub use dispatch::{apply_event, EventOutcome, Transition};
pub use session::Session;
pub use tool::{
    BisectorMode, CircleMode, Key, Modifiers, MouseButton, PerpendicularMode, Pick,
    PreviewGeometry, RejectReason, Tool, ToolContext, ToolEvent, ToolKind, ToolResponse,
    ToolState,
};
pub use tools::create_tool;
