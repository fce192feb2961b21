//! SVG output

use crate::geometry::{Color, Renderer, Shape};

const STROKE_WIDTH: u32 = 2;
const POINT_RADIUS: i32 = 3;

/// [`Renderer`] collecting shapes into an SVG document
pub struct SvgRenderer {
    width: u32,
    height: u32,
    body: String,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Complete document, white background behind everything drawn so far
    pub fn finish(self) -> String {
        format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
                "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n",
                "{body}",
                "</svg>\n"
            ),
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

impl Renderer for SvgRenderer {
    fn draw(&mut self, shape: Shape, color: Color) {
        let element = match shape {
            Shape::Line(line) => format!(
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>\n",
                line.start.x,
                line.start.y,
                line.end.x,
                line.end.y,
                color.name(),
                STROKE_WIDTH
            ),
            Shape::Point(point) => format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                point.x - POINT_RADIUS,
                point.y - POINT_RADIUS,
                2 * POINT_RADIUS,
                2 * POINT_RADIUS,
                color.name()
            ),
        };
        self.body.push_str(&element);
    }
}
