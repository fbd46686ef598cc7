//! 撤销/重做历史
//!
//! 严格线性：撤销后执行新命令会丢弃整个重做尾部。

use crate::command::{Command, Result};
use crate::construction::Construction;
use tracing::{debug, warn};

/// 命令历史
#[derive(Debug, Clone)]
pub struct History {
    commands: Vec<Command>,
    /// 最后一个已应用命令的下标，-1 表示没有
    index: isize,
    /// 最大深度（超出时丢弃最旧的命令）
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: -1,
            limit: None,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// 执行并记录命令
    ///
    /// 执行失败时历史保持不变。
    pub fn execute(&mut self, mut command: Command, construction: &mut Construction) -> Result<()> {
        command.execute(construction)?;
        debug!(label = %command.label(), "execute");

        // 截断 redo 历史
        self.commands.truncate(self.position());
        self.commands.push(command);

        if let Some(limit) = self.limit {
            if self.commands.len() > limit {
                let excess = self.commands.len() - limit;
                self.commands.drain(..excess);
            }
        }
        self.index = self.commands.len() as isize - 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.index >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.commands.len() as isize
    }

    /// 撤销；没有可撤销的命令时返回 false
    pub fn undo(&mut self, construction: &mut Construction) -> bool {
        if !self.can_undo() {
            return false;
        }
        let command = &mut self.commands[self.index as usize];
        if let Err(e) = command.undo(construction) {
            warn!(error = %e, label = %command.label(), "undo failed");
            return false;
        }
        debug!(label = %command.label(), "undo");
        self.index -= 1;
        true
    }

    /// 重做；重做尾部为空时返回 false
    pub fn redo(&mut self, construction: &mut Construction) -> bool {
        if !self.can_redo() {
            return false;
        }
        let command = &mut self.commands[(self.index + 1) as usize];
        if let Err(e) = command.redo(construction) {
            warn!(error = %e, label = %command.label(), "redo failed");
            return false;
        }
        debug!(label = %command.label(), "redo");
        self.index += 1;
        true
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.index = -1;
    }

    /// 记录的命令总数（含可重做部分）
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 已应用的命令数
    pub fn position(&self) -> usize {
        (self.index + 1) as usize
    }

    pub fn undo_label(&self) -> Option<String> {
        self.can_undo()
            .then(|| self.commands[self.index as usize].label())
    }

    pub fn redo_label(&self) -> Option<String> {
        self.can_redo()
            .then(|| self.commands[(self.index + 1) as usize].label())
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
