//! 错误定义

use crate::entity::EntityId;
use thiserror::Error;

/// 几何退化情况
///
/// 这些错误总是在本地恢复（空结果或回退几何），不会中断构造会话。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Points are collinear")]
    CollinearPoints,

    #[error("Line has zero length")]
    DegenerateLine,

    #[error("Zero-length direction vector")]
    ZeroVector,

    #[error("A polygon needs at least 3 sides, got {0}")]
    InvalidSides(usize),
}

/// 命令执行错误
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity already exists: {0}")]
    DuplicateId(EntityId),

    #[error("No entity id left after {0}")]
    IdExhausted(EntityId),

    #[error("Invalid property path: {0}")]
    InvalidPath(String),

    #[error("Property is immutable: {0}")]
    ImmutableProperty(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Grid spacing must not be negative, got {0}")]
    InvalidGridSpacing(f64),

    #[error("Snap tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("A polygon needs at least 3 sides, got {0}")]
    InvalidSides(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
