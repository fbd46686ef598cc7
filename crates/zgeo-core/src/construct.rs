//! 计算几何库
//!
//! 构造工具使用的纯函数：交点、投影、垂线、平行线、角平分线、
//! 三点圆以及正多边形/星形顶点布局。
//!
//! 所有函数都是确定性的；退化输入返回空结果、约定的回退几何，
//! 或者 [`GeometryError`]，从不 panic。

use crate::error::GeometryError;
use crate::geometry::{Circle, Line, LineType};
use crate::math::{cross, Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 垂线、平行线、角平分线的默认长度
pub const NOMINAL_LENGTH: f64 = 100.0;

pub type Result<T> = std::result::Result<T, GeometryError>;

/// 直线一般式 a·x + b·y + c = 0 的系数
pub fn line_coefficients(line: &Line) -> (f64, f64, f64) {
    let (x1, y1) = (line.start.x, line.start.y);
    let (x2, y2) = (line.end.x, line.end.y);
    (y2 - y1, x1 - x2, x2 * y1 - x1 * y2)
}

/// 直线-直线交点
///
/// 用克莱姆法则求解，然后按各自的直线类型检查参数 t。
pub fn line_line_intersection(l1: &Line, l2: &Line) -> Option<Point2> {
    let (a1, b1, c1) = line_coefficients(l1);
    let (a2, b2, c2) = line_coefficients(l2);

    let det = a1 * b2 - a2 * b1;
    // 平行或退化
    if det.abs() < EPSILON {
        return None;
    }

    let x = (b1 * c2 - b2 * c1) / det;
    let y = (a2 * c1 - a1 * c2) / det;
    let p = Point2::new(x, y);

    if l1.accepts_parameter(l1.parameter_of(&p)) && l2.accepts_parameter(l2.parameter_of(&p)) {
        Some(p)
    } else {
        None
    }
}

/// 直线-圆交点
pub fn line_circle_intersection(line: &Line, circle: &Circle) -> Vec<Point2> {
    let d = line.end - line.start;
    let f = line.start - circle.center;

    let a = d.dot(&d);
    if a < EPSILON {
        return vec![];
    }
    let b = 2.0 * f.dot(&d);
    let c = f.dot(&f) - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return vec![];
    }

    let roots = if discriminant.abs() < EPSILON {
        // 相切
        vec![-b / (2.0 * a)]
    } else {
        let sqrt_disc = discriminant.sqrt();
        vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
    };

    roots
        .into_iter()
        .filter(|t| line.accepts_parameter(*t))
        .map(|t| line.point_at(t))
        .collect()
}

/// 圆-圆交点
pub fn circle_circle_intersection(c1: &Circle, c2: &Circle) -> Vec<Point2> {
    let d = (c2.center - c1.center).norm();

    // 分离、内含或同心
    if d > c1.radius + c2.radius || d < (c1.radius - c2.radius).abs() || d < EPSILON {
        return vec![];
    }

    let a = (c1.radius * c1.radius - c2.radius * c2.radius + d * d) / (2.0 * d);
    let h = (c1.radius * c1.radius - a * a).max(0.0).sqrt();

    let dir = (c2.center - c1.center) / d;
    let p = c1.center + dir * a;
    let perp = Vector2::new(-dir.y, dir.x);

    if h < EPSILON {
        vec![p]
    } else {
        vec![p + perp * h, p - perp * h]
    }
}

/// 点在直线上的投影，按直线类型截断
///
/// 零长度直线返回起点。
pub fn project_point_on_line(point: &Point2, line: &Line) -> Point2 {
    if line.is_degenerate() {
        return line.start;
    }
    let t = line.clamp_parameter(line.parameter_of(point));
    line.point_at(t)
}

/// 点到无限直线的距离 |A·x0 + B·y0 + C| / sqrt(A² + B²)
pub fn distance_point_to_line(point: &Point2, line: &Line) -> f64 {
    let (a, b, c) = line_coefficients(line);
    let norm = a.hypot(b);
    if norm < EPSILON {
        return (point - line.start).norm();
    }
    (a * point.x + b * point.y + c).abs() / norm
}

/// 垂线（点到直线）：从给定点到其在直线上的截断投影
pub fn perpendicular_foot(point: &Point2, line: &Line) -> Result<Line> {
    if line.is_degenerate() {
        return Err(GeometryError::DegenerateLine);
    }
    let foot = project_point_on_line(point, line);
    if (foot - point).norm() < EPSILON {
        return Err(GeometryError::DegenerateLine);
    }
    Ok(Line::new(*point, foot))
}

/// 垂线（过点）：把直线方向旋转 90° 后，从给定点延伸 length
pub fn perpendicular_through(point: &Point2, line: &Line, length: f64) -> Result<Line> {
    let dir = line.direction().ok_or(GeometryError::DegenerateLine)?;
    let normal = Vector2::new(-dir.y, dir.x);
    Ok(Line::new(*point, point + normal * length))
}

/// 平行线构造结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelLine {
    pub line: Line,
    /// 到参考直线的距离
    pub distance: f64,
}

/// 平行线：过给定点，两侧各延伸 half_length
pub fn parallel_through(point: &Point2, line: &Line, half_length: f64) -> Result<ParallelLine> {
    let dir = line.direction().ok_or(GeometryError::DegenerateLine)?;
    Ok(ParallelLine {
        line: Line::new(point - dir * half_length, point + dir * half_length),
        distance: distance_point_to_line(point, line),
    })
}

/// 角平分线：原点 + 单位方向
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisector {
    pub origin: Point2,
    pub direction: Vector2,
}

impl Bisector {
    /// 转为从原点出发的射线
    pub fn to_ray(&self, length: f64) -> Line {
        Line::with_type(
            self.origin,
            self.origin + self.direction * length,
            LineType::Ray,
        )
    }
}

/// 两个单位向量的平分方向；接近反向时取 u1 的垂直方向
fn bisect_units(u1: &Vector2, u2: &Vector2) -> Vector2 {
    let sum = u1 + u2;
    if sum.norm() < EPSILON {
        Vector2::new(-u1.y, u1.x)
    } else {
        sum.normalize()
    }
}

/// 三点角平分线，顶点为 vertex
pub fn angle_bisector_three_points(p1: &Point2, vertex: &Point2, p3: &Point2) -> Result<Bisector> {
    let u1 = (p1 - vertex)
        .try_normalize(EPSILON)
        .ok_or(GeometryError::ZeroVector)?;
    let u2 = (p3 - vertex)
        .try_normalize(EPSILON)
        .ok_or(GeometryError::ZeroVector)?;

    Ok(Bisector {
        origin: *vertex,
        direction: bisect_units(&u1, &u2),
    })
}

/// 两直线角平分线
///
/// 原点取两条直线（按无限直线延长）的交点；平行时退回四个端点的
/// 中点和水平方向。
pub fn angle_bisector_two_lines(l1: &Line, l2: &Line) -> Result<Bisector> {
    let d1 = l1.direction().ok_or(GeometryError::DegenerateLine)?;
    let d2 = l2.direction().ok_or(GeometryError::DegenerateLine)?;

    let inf1 = Line::with_type(l1.start, l1.end, LineType::Infinite);
    let inf2 = Line::with_type(l2.start, l2.end, LineType::Infinite);

    match line_line_intersection(&inf1, &inf2) {
        Some(origin) => Ok(Bisector {
            origin,
            direction: bisect_units(&d1, &d2),
        }),
        None => {
            let sum = l1.start.coords + l1.end.coords + l2.start.coords + l2.end.coords;
            Ok(Bisector {
                origin: Point2::from(sum / 4.0),
                direction: Vector2::new(1.0, 0.0),
            })
        }
    }
}

/// 中垂线：竖直（x = 常数）或斜率形式
enum PerpendicularBisector {
    Vertical { x: f64 },
    Sloped { slope: f64, through: Point2 },
}

impl PerpendicularBisector {
    fn of_segment(a: &Point2, b: &Point2) -> Self {
        let mid = Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dy.abs() < EPSILON {
            // 水平线段的中垂线竖直
            PerpendicularBisector::Vertical { x: mid.x }
        } else {
            PerpendicularBisector::Sloped {
                slope: -dx / dy,
                through: mid,
            }
        }
    }

    fn y_at(slope: f64, through: &Point2, x: f64) -> f64 {
        slope * (x - through.x) + through.y
    }
}

/// 三点确定圆
pub fn circle_through_three_points(p1: &Point2, p2: &Point2, p3: &Point2) -> Result<Circle> {
    let area = cross(&(p2 - p1), &(p3 - p1)) / 2.0;
    if area.abs() < EPSILON {
        return Err(GeometryError::CollinearPoints);
    }

    let b1 = PerpendicularBisector::of_segment(p1, p2);
    let b2 = PerpendicularBisector::of_segment(p2, p3);

    let center = match (b1, b2) {
        (PerpendicularBisector::Vertical { .. }, PerpendicularBisector::Vertical { .. }) => {
            return Err(GeometryError::CollinearPoints);
        }
        (PerpendicularBisector::Vertical { x }, PerpendicularBisector::Sloped { slope, through })
        | (PerpendicularBisector::Sloped { slope, through }, PerpendicularBisector::Vertical { x }) => {
            Point2::new(x, PerpendicularBisector::y_at(slope, &through, x))
        }
        (
            PerpendicularBisector::Sloped { slope: m1, through: q1 },
            PerpendicularBisector::Sloped { slope: m2, through: q2 },
        ) => {
            if (m1 - m2).abs() < EPSILON {
                return Err(GeometryError::CollinearPoints);
            }
            let x = (m1 * q1.x - m2 * q2.x + q2.y - q1.y) / (m1 - m2);
            Point2::new(x, PerpendicularBisector::y_at(m1, &q1, x))
        }
    };

    Ok(Circle::new(center, (p1 - center).norm()))
}

/// 以两点为直径的圆
pub fn circle_from_diameter(a: &Point2, b: &Point2) -> Result<Circle> {
    let radius = (b - a).norm() / 2.0;
    if radius < EPSILON {
        return Err(GeometryError::ZeroVector);
    }
    Ok(Circle::new(
        Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
        radius,
    ))
}

/// 正多边形朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PolygonOrientation {
    /// 顶点朝上
    #[default]
    VertexTop,
    /// 边朝上
    SideTop,
}

impl PolygonOrientation {
    fn offset(&self, sides: usize) -> f64 {
        match self {
            PolygonOrientation::VertexTop => PI / 2.0,
            PolygonOrientation::SideTop => PI / 2.0 + PI / sides as f64,
        }
    }
}

fn vertex_at(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y - radius * angle.sin(),
    )
}

/// 正多边形顶点
///
/// 少于3条边时返回空。
pub fn regular_polygon_vertices(
    sides: usize,
    center: &Point2,
    radius: f64,
    orientation: PolygonOrientation,
) -> Vec<Point2> {
    if sides < 3 {
        return vec![];
    }
    let offset = orientation.offset(sides);
    let step = 2.0 * PI / sides as f64;
    (0..sides)
        .map(|i| vertex_at(center, radius, offset + step * i as f64))
        .collect()
}

/// 星形内径
///
/// skip = 2 的五角星得到黄金比例 1/φ²。
pub fn star_inner_radius(points: usize, outer_radius: f64, skip: usize) -> f64 {
    let n = points as f64;
    let k = skip as f64;
    outer_radius * (PI * k / n).cos() / (PI * (k - 1.0) / n).cos()
}

/// 星形顶点：外顶点与内顶点交替，共 2·points 个
pub fn star_polygon_vertices(
    points: usize,
    center: &Point2,
    outer_radius: f64,
    skip: usize,
    orientation: PolygonOrientation,
) -> Vec<Point2> {
    if points < 3 {
        return vec![];
    }
    let max_skip = ((points - 1) / 2).max(1);
    let skip = skip.clamp(1, max_skip);
    let inner_radius = star_inner_radius(points, outer_radius, skip);

    let offset = orientation.offset(points);
    let step = 2.0 * PI / points as f64;

    let mut vertices = Vec::with_capacity(points * 2);
    for i in 0..points {
        let angle = offset + step * i as f64;
        vertices.push(vertex_at(center, outer_radius, angle));
        vertices.push(vertex_at(center, inner_radius, angle + step / 2.0));
    }
    vertices
}
