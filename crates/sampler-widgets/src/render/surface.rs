use iced::widget::canvas::{Frame, Path, Stroke};
use iced::{Color, Point, Size};

/// Minimal drawing target for the renderers
pub trait Surface {
    fn size(&self) -> Size;

    /// Paint the whole surface with `color`, discarding anything drawn before
    fn clear(&mut self, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color);

    /// Fill a closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color);
}

impl Surface for Frame {
    fn size(&self) -> Size {
        Frame::size(self)
    }

    fn clear(&mut self, color: Color) {
        let size = Frame::size(self);
        self.fill_rectangle(Point::ORIGIN, size, color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.stroke(
            &Path::line(from, to),
            Stroke::default().with_color(color).with_width(width),
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let path = Path::new(|builder| {
            builder.move_to(*first);
            for point in rest {
                builder.line_to(*point);
            }
            builder.close();
        });
        self.fill(&path, color);
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color) {
        self.fill_rectangle(top_left, size, color);
    }
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Rect {
        top_left: Point,
        size: Size,
        color: Color,
    },
}

/// Surface that records operations instead of rasterising
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    size: Size,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn polygons(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Polygon { .. }))
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. }))
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color) {
        self.ops.push(DrawOp::Rect {
            top_left,
            size,
            color,
        });
    }
}
