//! 编辑会话
//!
//! 持有构造集合、命令历史、配置和当前工具，是宿主程序的主要入口。

use crate::config::EngineConfig;
use crate::dispatch::{apply_event, EventOutcome};
use crate::tool::{Tool, ToolEvent, ToolKind};
use crate::tools::create_tool;
use tracing::{debug, info};
use zgeo_core::command::{self, Command};
use zgeo_core::construction::Construction;
use zgeo_core::error::ConfigError;
use zgeo_core::history::History;

/// 一次编辑会话
pub struct Session {
    construction: Construction,
    history: History,
    config: EngineConfig,
    tool: Box<dyn Tool>,
}

impl Session {
    /// 校验配置并创建会话，初始工具为选择
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            construction: Construction::new(),
            history: History::new(),
            config,
            tool: create_tool(ToolKind::Select),
        })
    }

    pub fn construction(&self) -> &Construction {
        &self.construction
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tool(&self) -> &dyn Tool {
        self.tool.as_ref()
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// 切换工具，丢弃旧工具未完成的手势
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() != kind {
            info!("切换工具: {} -> {}", self.tool.name(), kind.name());
        }
        self.tool = create_tool(kind);
    }

    /// 当前提示
    pub fn prompt(&self) -> &str {
        self.tool.prompt()
    }

    /// 处理一个输入事件
    pub fn handle(&mut self, event: ToolEvent) -> EventOutcome {
        let outcome = apply_event(
            &mut self.construction,
            &mut self.history,
            self.tool.as_mut(),
            &self.config,
            &event,
        );
        if outcome.deactivate && self.tool.kind() != ToolKind::Select {
            self.set_tool(ToolKind::Select);
        }
        outcome
    }

    /// 直接执行命令（例如属性面板的修改）
    pub fn execute(&mut self, command: Command) -> command::Result<()> {
        self.tool.reset();
        self.history.execute(command, &mut self.construction)
    }

    pub fn undo(&mut self) -> bool {
        self.tool.reset();
        let done = self.history.undo(&mut self.construction);
        debug!("undo: {}", done);
        done
    }

    pub fn redo(&mut self) -> bool {
        self.tool.reset();
        let done = self.history.redo(&mut self.construction);
        debug!("redo: {}", done);
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// 清空历史（不影响构造集合）
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            construction: Construction::new(),
            history: History::new(),
            config: EngineConfig::default(),
            tool: create_tool(ToolKind::Select),
        }
    }
}
