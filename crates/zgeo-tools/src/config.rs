//! 引擎配置
//!
//! 所有配置都以显式结构体传入，没有环境变量或文件读取。

use serde::{Deserialize, Serialize};
use zgeo_core::construct::{PolygonOrientation, NOMINAL_LENGTH};
use zgeo_core::error::ConfigError;
use zgeo_core::geometry::LineType;
use zgeo_core::properties::Style;
use zgeo_core::snap::SnapConfig;

/// 工具默认参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    /// 直线工具创建的直线类型
    pub line_type: LineType,
    /// 固定半径画圆的半径
    pub fixed_radius: f64,
    /// 多边形点击首顶点附近时闭合的距离
    pub close_distance: f64,
    /// 正多边形边数
    pub polygon_sides: usize,
    pub polygon_orientation: PolygonOrientation,
    /// 星形跨度，None 表示普通正多边形
    pub star_skip: Option<usize>,
    /// 垂线、平行线、角平分线的长度
    pub nominal_length: f64,
    pub text_content: String,
    pub text_height: f64,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            line_type: LineType::Segment,
            fixed_radius: 50.0,
            close_distance: 10.0,
            polygon_sides: 5,
            polygon_orientation: PolygonOrientation::VertexTop,
            star_skip: None,
            nominal_length: NOMINAL_LENGTH,
            text_content: "Text".to_string(),
            text_height: 12.0,
        }
    }
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub snap_to_grid: bool,
    pub snap_to_objects: bool,
    pub snap_tolerance: f64,
    pub grid_spacing: f64,
    /// 完成构造后是否保持当前工具
    pub continuous_creation: bool,
    pub show_preview: bool,
    pub tools: ToolDefaults,
    /// 新建对象的样式
    pub style: Style,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let snap = SnapConfig::default();
        Self {
            snap_to_grid: snap.snap_to_grid,
            snap_to_objects: snap.snap_to_objects,
            snap_tolerance: snap.snap_tolerance,
            grid_spacing: snap.grid_spacing,
            continuous_creation: true,
            show_preview: true,
            tools: ToolDefaults::default(),
            style: Style::default(),
        }
    }
}

impl EngineConfig {
    /// 从 JSON 解析，缺省字段取默认值
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_spacing.is_nan() || self.grid_spacing < 0.0 {
            return Err(ConfigError::InvalidGridSpacing(self.grid_spacing));
        }
        if self.snap_tolerance.is_nan() || self.snap_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.snap_tolerance));
        }
        if self.tools.polygon_sides < 3 {
            return Err(ConfigError::InvalidSides(self.tools.polygon_sides));
        }
        Ok(())
    }

    /// 捕捉引擎使用的配置
    pub fn snap_config(&self) -> SnapConfig {
        SnapConfig {
            snap_to_grid: self.snap_to_grid,
            snap_to_objects: self.snap_to_objects,
            snap_tolerance: self.snap_tolerance,
            grid_spacing: self.grid_spacing,
        }
    }
}
