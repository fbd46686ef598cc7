//! 视觉样式
//!
//! 样式对核心算法是不透明的：只有线宽参与命中测试的包围盒扩展。

use serde::{Deserialize, Serialize};

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从 0xRRGGBB 创建
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// 虚线样式
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DashPattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// 自定义：交替的实线/空白长度
    Custom(Vec<f64>),
}

/// 字体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

/// 对象样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// 描边颜色
    pub stroke: Color,
    /// 填充颜色（None 表示不填充）
    pub fill: Option<Color>,
    /// 线宽
    pub width: f64,
    /// 虚线样式
    pub dash: DashPattern,
    /// 字体（仅文本使用）
    pub font: Option<Font>,
}

impl Style {
    pub fn with_stroke(stroke: Color) -> Self {
        Self {
            stroke,
            ..Self::default()
        }
    }

    /// 命中测试时对包围盒的扩展量
    pub fn hit_padding(&self) -> f64 {
        (self.width / 2.0).max(0.0)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: None,
            width: 2.0,
            dash: DashPattern::Solid,
            font: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!((c.r, c.g, c.b, c.a), (255, 128, 0, 255));
    }

    #[test]
    fn test_hit_padding() {
        let style = Style {
            width: 4.0,
            ..Style::default()
        };
        assert_eq!(style.hit_padding(), 2.0);
    }
}
