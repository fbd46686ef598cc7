//! 几何对象模型
//!
//! 支持的基本图元：
//! - 点 (Point)
//! - 直线 (Line)：线段、射线、无限直线
//! - 圆 (Circle)
//! - 多边形 (Polygon)
//! - 文本 (Text)
//!
//! 所有查询都是纯函数，没有副作用。直线端点是独立的坐标值，
//! 不引用任何 Point 对象。

use crate::construct;
use crate::entity::EntityId;
use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};

/// 参数 t 的判定容差（线段端点处的交点）
const PARAM_EPSILON: f64 = 1e-9;

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Polygon(Polygon),
    Text(Text),
}

impl Geometry {
    /// 获取几何的包围盒（未扩展线宽）
    pub fn bounds(&self) -> BoundingBox2 {
        match self {
            Geometry::Point(p) => p.bounding_box(),
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Polygon(pg) => pg.bounding_box(),
            Geometry::Text(t) => t.bounding_box(),
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Text(_) => "Text",
        }
    }

    /// 点到几何的距离
    pub fn distance_to(&self, point: &Point2) -> f64 {
        match self {
            Geometry::Point(p) => (p.position - point).norm(),
            Geometry::Line(l) => l.distance_to_point(point),
            Geometry::Circle(c) => c.distance_to_point(point),
            Geometry::Polygon(pg) => pg.distance_to_point(point),
            Geometry::Text(t) => t.distance_to_point(point),
        }
    }

    /// 检查点是否在几何上（考虑容差）
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        match self {
            Geometry::Point(p) => (p.position - point).norm() <= tolerance,
            Geometry::Line(l) => l.distance_to_point(point) <= tolerance,
            Geometry::Circle(c) => c.contains_point(point, tolerance),
            Geometry::Polygon(pg) => pg.contains_point(point, tolerance),
            Geometry::Text(t) => t.contains_point(point, tolerance),
        }
    }

    /// 求两个几何的交点
    ///
    /// 支持 直线-直线、直线-圆、圆-圆；其他组合或无交点时返回空。
    pub fn intersect(&self, other: &Geometry) -> Vec<Point2> {
        match (self, other) {
            (Geometry::Line(l1), Geometry::Line(l2)) => {
                construct::line_line_intersection(l1, l2).into_iter().collect()
            }
            (Geometry::Line(line), Geometry::Circle(circle))
            | (Geometry::Circle(circle), Geometry::Line(line)) => {
                construct::line_circle_intersection(line, circle)
            }
            (Geometry::Circle(c1), Geometry::Circle(c2)) => {
                construct::circle_circle_intersection(c1, c2)
            }
            _ => vec![],
        }
    }

    /// 标注锚点（文本自动定位时使用）
    pub fn label_anchor(&self) -> Point2 {
        match self {
            Geometry::Point(p) => p.position,
            Geometry::Line(l) => l.midpoint(),
            Geometry::Circle(c) => Point2::new(c.center.x, c.center.y - c.radius),
            Geometry::Polygon(pg) => pg.centroid().unwrap_or_else(Point2::origin),
            Geometry::Text(t) => t.position,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Geometry::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Geometry::Circle(c) => Some(c),
            _ => None,
        }
    }
}

/// 点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Point2,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    pub fn from_point2(position: Point2) -> Self {
        Self { position }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.position, self.position)
    }
}

/// 直线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineType {
    /// 线段：t ∈ [0, 1]
    #[default]
    Segment,
    /// 射线：t ∈ [0, ∞)
    Ray,
    /// 无限直线
    Infinite,
}

/// 直线端点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Endpoint1,
    Endpoint2,
}

impl Endpoint {
    /// 该端点在序列化实体中的属性路径
    pub fn property_path(&self) -> &'static str {
        match self {
            Endpoint::Endpoint1 => "geometry.start",
            Endpoint::Endpoint2 => "geometry.end",
        }
    }
}

/// 端点移动结果
///
/// 每次只移动一个端点，调用方据此得知是哪一个。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointMoved {
    pub which: Endpoint,
    pub new_pos: Point2,
}

/// 直线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
    #[serde(default)]
    pub line_type: LineType,
}

impl Line {
    /// 创建线段
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            line_type: LineType::Segment,
        }
    }

    pub fn with_type(start: Point2, end: Point2, line_type: LineType) -> Self {
        Self {
            start,
            end,
            line_type,
        }
    }

    /// 计算两端点间的长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 零长度直线
    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    /// 单位方向向量（零长度时为 None）
    pub fn direction(&self) -> Option<Vector2> {
        (self.end - self.start).try_normalize(EPSILON)
    }

    /// 计算两端点中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    pub fn endpoint(&self, which: Endpoint) -> Point2 {
        match which {
            Endpoint::Endpoint1 => self.start,
            Endpoint::Endpoint2 => self.end,
        }
    }

    /// 移动单个端点
    pub fn set_endpoint(&mut self, which: Endpoint, pos: Point2) -> EndpointMoved {
        match which {
            Endpoint::Endpoint1 => self.start = pos,
            Endpoint::Endpoint2 => self.end = pos,
        }
        EndpointMoved {
            which,
            new_pos: pos,
        }
    }

    /// P(t) = start + t·(end − start)
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    /// 点在直线上的投影参数（未截断）
    pub fn parameter_of(&self, point: &Point2) -> f64 {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 < EPSILON {
            return 0.0;
        }
        (point - self.start).dot(&d) / len2
    }

    /// 按直线类型截断参数
    pub fn clamp_parameter(&self, t: f64) -> f64 {
        match self.line_type {
            LineType::Segment => t.clamp(0.0, 1.0),
            LineType::Ray => t.max(0.0),
            LineType::Infinite => t,
        }
    }

    /// 参数是否落在直线的有效范围内
    pub fn accepts_parameter(&self, t: f64) -> bool {
        match self.line_type {
            LineType::Segment => (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&t),
            LineType::Ray => t >= -PARAM_EPSILON,
            LineType::Infinite => true,
        }
    }

    /// 直线上离给定点最近的点
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        construct::project_point_on_line(point, self)
    }

    /// 计算点到直线的距离（按直线类型截断）
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start, self.end]);
        let d = self.end - self.start;
        let forward = matches!(self.line_type, LineType::Ray | LineType::Infinite);
        let backward = self.line_type == LineType::Infinite;

        if forward {
            extend_axis(&mut bbox.min.x, &mut bbox.max.x, d.x);
            extend_axis(&mut bbox.min.y, &mut bbox.max.y, d.y);
        }
        if backward {
            extend_axis(&mut bbox.min.x, &mut bbox.max.x, -d.x);
            extend_axis(&mut bbox.min.y, &mut bbox.max.y, -d.y);
        }
        bbox
    }
}

/// 沿方向分量把包围盒的一侧推到无穷远
fn extend_axis(min: &mut f64, max: &mut f64, component: f64) {
    if component > EPSILON {
        *max = f64::INFINITY;
    } else if component < -EPSILON {
        *min = f64::NEG_INFINITY;
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.radius < EPSILON
    }

    /// 计算周长
    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius
    }

    /// 计算面积
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// 点到圆周的径向距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        ((point - self.center).norm() - self.radius).abs()
    }

    /// 点是否在圆周上（容差内）
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        self.distance_to_point(point) <= tolerance
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 圆周上离给定点最近的点（径向投影）
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        match (point - self.center).try_normalize(EPSILON) {
            Some(dir) => self.center + dir * self.radius,
            None => self.point_at_angle(0.0),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 多边形
///
/// 顶点少于3个时是构造中的临时状态，不会作为最终对象提交。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 是否构成闭合多边形
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// 闭合环上的所有边
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.vertices.len();
        let count = if n >= 3 { n } else { n.saturating_sub(1) };
        (0..count).map(move |i| Line::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// 离给定点最近的顶点
    pub fn nearest_vertex(&self, point: &Point2) -> Option<Point2> {
        self.vertices.iter().copied().min_by(|a, b| {
            (a - point)
                .norm()
                .partial_cmp(&(b - point).norm())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// 点到顶点的最小距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.nearest_vertex(point)
            .map(|v| (v - point).norm())
            .unwrap_or(f64::MAX)
    }

    /// 点到边的最小距离
    pub fn edge_distance(&self, point: &Point2) -> f64 {
        if self.vertices.len() == 1 {
            return (self.vertices[0] - point).norm();
        }
        self.edges()
            .map(|edge| edge.distance_to_point(point))
            .fold(f64::MAX, f64::min)
    }

    /// 奇偶规则判断点是否在多边形内部
    pub fn contains_interior(&self, point: &Point2) -> bool {
        if !self.is_closed() {
            return false;
        }
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y) {
                let x_cross = vj.x + (point.y - vj.y) * (vi.x - vj.x) / (vi.y - vj.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// 点在边界附近或在内部
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        self.edge_distance(point) <= tolerance || self.contains_interior(point)
    }

    /// 顶点平均值
    pub fn centroid(&self) -> Option<Point2> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as f64;
        let sum = self
            .vertices
            .iter()
            .fold(Vector2::zeros(), |acc, v| acc + v.coords);
        Some(Point2::from(sum / n))
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.vertices.iter().copied())
    }
}

/// 文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// 插入点（左上角）
    pub position: Point2,
    /// 文本内容
    pub content: String,
    /// 文本高度
    pub height: f64,
    /// 关联对象（弱引用，仅记录关系）
    #[serde(default)]
    pub target: Option<EntityId>,
    /// 是否跟随关联对象自动定位
    #[serde(default)]
    pub auto_position: bool,
}

impl Text {
    /// 创建新的文本对象
    pub fn new(position: Point2, content: impl Into<String>, height: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            target: None,
            auto_position: false,
        }
    }

    /// 关联到目标对象
    pub fn attached_to(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self.auto_position = true;
        self
    }

    /// 估算文本宽度（英文约为高度的0.6倍，CJK字符约等于高度）
    pub fn estimated_width(&self) -> f64 {
        let char_count = self.content.chars().count();
        let cjk_count = self.content.chars().filter(|c| Self::is_cjk(*c)).count();
        let ascii_count = char_count - cjk_count;

        (cjk_count as f64 * self.height) + (ascii_count as f64 * self.height * 0.6)
    }

    /// 检查是否是CJK字符
    fn is_cjk(c: char) -> bool {
        matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            self.position,
            Point2::new(
                self.position.x + self.estimated_width(),
                self.position.y + self.height,
            ),
        )
    }

    /// 点到文本包围盒的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.bounding_box().distance_to(point)
    }

    /// 检查点是否在文本包围盒内
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        self.bounding_box().expanded(tolerance).contains(point)
    }
}
