//! ZGEO 核心几何引擎
//!
//! 交互式二维几何构造的纯内存模型：几何对象、构造算法、
//! 对象捕捉以及带撤销/重做的命令日志。
//!
//! # 架构设计
//!
//! - `Entity`: 稳定ID + 几何数据 + 显示状态
//! - `Geometry`: 点、直线、圆、多边形、文本的封闭枚举
//! - `Construction`: 按ID存放的存活对象集合
//! - `Command` / `History`: 所有持久修改的唯一入口
//!
//! # 示例
//!
//! ```rust
//! use zgeo_core::prelude::*;
//!
//! let l1 = Line::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0));
//! let l2 = Line::new(Point2::new(0.0, 4.0), Point2::new(4.0, 0.0));
//!
//! let p = construct::line_line_intersection(&l1, &l2).unwrap();
//! assert!((p.x - 2.0).abs() < 1e-9);
//! ```

pub mod command;
pub mod construct;
pub mod construction;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod history;
pub mod math;
pub mod properties;
pub mod snap;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::command::Command;
    pub use crate::construct::{self, Bisector, ParallelLine, PolygonOrientation, NOMINAL_LENGTH};
    pub use crate::construction::Construction;
    pub use crate::entity::{Entity, EntityId};
    pub use crate::error::{CommandError, ConfigError, GeometryError};
    pub use crate::geometry::{
        Circle, Endpoint, EndpointMoved, Geometry, Line, LineType, Point, Polygon, Text,
    };
    pub use crate::history::History;
    pub use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
    pub use crate::properties::{Color, DashPattern, Font, Style};
    pub use crate::snap::{SnapConfig, SnapEngine, SnapKind, SnapResult};
}
