//! SVG rendering of a stitching template.
//!
//! The card is laid out in pixels at 96 px per inch and emitted at twice
//! that size. Each sequence gets its own group holding its stitches, the
//! visit numbers around the holes and a shell outline that separates its
//! numbers from the next sequence's.

use circlestitch::{
    Defaults, Template,
    geometry::Point,
    pattern::MM_PER_INCH,
    plan::SequencePlan,
    sequence::Stitch,
    thread::SequenceTally,
};
use svg::{
    Document,
    node::element::{Circle, Group, Line, Link, Path, Rectangle, Style, Text, path::Data},
};

/// Pixels per inch, as defined by SVG.
pub const PX_PER_INCH: f64 = 96.0;
/// Project home page, linked from every template.
pub const URL: &str = "https://github.com/rbedia/circle-stitcher";
/// Name and version stamped on every template.
pub const SOFTWARE_NAME: &str = concat!("circle-stitcher ", env!("CARGO_PKG_VERSION"));

/// Output size multiplier relative to the view box.
const SCALING: f64 = 2.0;
/// Radius of a stitch hole marker, px.
const HOLE_RADIUS: f64 = 2.0;
/// Stroke width of a stitch.
const CHORD_WIDTH: &str = "1px";
/// Left edge of the summary text block, px.
const SUMMARY_X: f64 = 10.0;
/// Baseline of the first summary line, px.
const SUMMARY_Y: f64 = 15.0;
/// Summary font size, px.
const SUMMARY_FONT_SIZE: f64 = 12.0;
/// Left edge of the instructions caption, px.
const COMMANDS_X: f64 = 10.0;
/// Distance of the instructions caption from the bottom edge, px.
const COMMANDS_INSET: f64 = 5.0;
/// Font size of hole visit numbers, px. Also the spacing between rings.
const HOLE_FONT_SIZE: f64 = 8.0;
/// Font size of the software name, px.
const LOGO_FONT_SIZE: f64 = 10.0;

/// Unit of length used by the pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    /// Inches.
    Inch,
    /// Millimetres.
    Millimetre,
}

impl Units {
    /// Pixels per unit.
    pub fn px_per_unit(self) -> f64 {
        match self {
            Self::Inch => PX_PER_INCH,
            Self::Millimetre => PX_PER_INCH / MM_PER_INCH,
        }
    }

    /// Suffix used when printing lengths.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Inch => "\"",
            Self::Millimetre => "mm",
        }
    }

    /// Pattern defaults expressed in this unit.
    pub fn defaults(self) -> &'static Defaults {
        match self {
            Self::Inch => &Defaults::INCH,
            Self::Millimetre => &Defaults::MILLIMETRE,
        }
    }

    /// A thread length rounded up to a whole unit, with suffix.
    pub fn format_length(self, length: f64) -> String {
        format!("{}{}", length.ceil(), self.suffix())
    }
}

/// Colours used for a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Software name text.
    pub name_color: &'static str,
    /// Punched centre hole fill.
    pub empty_circle_fill: &'static str,
    /// Punched centre hole and shell outline stroke.
    pub empty_circle_stroke: &'static str,
    /// Card background.
    pub card_color: &'static str,
    /// Stitch hole fill.
    pub hole_fill: &'static str,
    /// Stitch hole outline.
    pub hole_stroke: &'static str,
    /// Stitches on the front face.
    pub chord_front_color: &'static str,
    /// Stitches on the back face.
    pub chord_back_color: &'static str,
    /// Text colours cycled through by sequence.
    pub sequence_colors: [&'static str; 4],
}

/// The standard colour scheme.
pub const DEFAULT_THEME: Theme = Theme {
    name_color: "#777777",
    empty_circle_fill: "#EBE4D6",
    empty_circle_stroke: "#dddddd",
    card_color: "#ffffff",
    hole_fill: "#EBE4D6",
    hole_stroke: "#333333",
    chord_front_color: "#2B8FF3",
    chord_back_color: "#F50C00",
    sequence_colors: ["#000000", "#099A3C", "#8B1828", "#515F45"],
};

impl Theme {
    /// CSS for the classes used by the renderer.
    fn stylesheet(&self) -> String {
        let mut css = format!(
            ".hole {{ fill: {}; stroke: {}; r: {HOLE_RADIUS}px; }}\n\
             .index {{ font-size: {HOLE_FONT_SIZE}px; text-anchor: middle; }}\n\
             .front {{ stroke: {}; stroke-width: {CHORD_WIDTH}; }}\n\
             .back {{ stroke: {}; stroke-width: {CHORD_WIDTH}; }}\n\
             .summary {{ font-size: {SUMMARY_FONT_SIZE}px; }}\n",
            self.hole_fill, self.hole_stroke, self.chord_front_color, self.chord_back_color,
        );
        for (i, color) in self.sequence_colors.iter().enumerate() {
            css.push_str(&format!(".seq{i} {{ fill: {color}; }}\n"));
        }
        css
    }

    /// CSS class for the sequence at `index`.
    fn sequence_class(&self, index: usize) -> String {
        format!("seq{}", index % self.sequence_colors.len())
    }
}

/// Round to one decimal place.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Pixel-space drawing state for one template.
struct Canvas<'a> {
    /// The template being drawn.
    template: &'a Template,
    /// Colours.
    theme: &'a Theme,
    /// Unit of the pattern's lengths.
    units: Units,
    /// Card width and height, px.
    size: f64,
    /// Nominal hole outline radius, px.
    circle_r: f64,
    /// Label rings already used by earlier sequences.
    outer_ring: u32,
    /// Baseline of the next summary line, px.
    summary_y: f64,
}

impl<'a> Canvas<'a> {
    /// Set up a canvas for `template`.
    fn new(template: &'a Template, theme: &'a Theme, units: Units) -> Self {
        let px = units.px_per_unit();
        Self {
            template,
            theme,
            units,
            size: template.config.image_size * px,
            circle_r: template.config.outer_circle_radius * px,
            outer_ring: 0,
            summary_y: SUMMARY_Y,
        }
    }

    /// Centre of the card, px.
    fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    /// Position of hole `hole`, px.
    fn hole_xy(&self, hole: u32) -> Point {
        let c = self.center();
        self.template.holes.positions()[hole as usize]
            .scale(self.units.px_per_unit())
            .offset(c.x, c.y)
    }

    /// Position on the outline through `hole` scaled to `radius` px.
    fn ring_xy(&self, hole: u32, radius: f64) -> Point {
        let c = self.center();
        self.template.holes.shape().point(hole, radius).offset(c.x, c.y)
    }

    /// Card, punched centre and stitch holes.
    fn background(&self) -> Group {
        let c = self.center();
        let inner_r = self.template.config.inner_circle_radius * self.units.px_per_unit();

        let card = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", self.size)
            .set("height", self.size)
            .set("fill", self.theme.card_color);
        let punch = Circle::new()
            .set("cx", round1(c.x))
            .set("cy", round1(c.y))
            .set("r", round1(inner_r))
            .set("fill", self.theme.empty_circle_fill)
            .set("stroke", self.theme.empty_circle_stroke);

        (0..self.template.holes.len())
            .map(|hole| {
                let p = self.hole_xy(hole);
                Circle::new()
                    .set("cx", round1(p.x))
                    .set("cy", round1(p.y))
                    .set("r", HOLE_RADIUS)
                    .set("class", "hole")
            })
            .fold(
                Group::new().set("id", "card").add(card).add(punch),
                |g, hole| g.add(hole),
            )
    }

    /// Rotated software name along the right edge, linked to the home page.
    fn logo(&self) -> Link {
        let x = self.size - 10.0;
        let y = 5.0;
        Link::new().set("href", URL).add(
            Text::new(SOFTWARE_NAME)
                .set("fill", self.theme.name_color)
                .set("font-size", LOGO_FONT_SIZE)
                .set("x", round1(x))
                .set("y", y)
                .set("transform", format!("rotate(90 {} {y})", round1(x))),
        )
    }

    /// The pattern string along the bottom edge.
    fn caption(&self, pattern: &str) -> Text {
        Text::new(format!("Instructions: {pattern}"))
            .set("x", COMMANDS_X)
            .set("y", round1(self.size - COMMANDS_INSET))
            .set("class", "summary")
    }

    /// A stitch line.
    fn chord(&self, stitch: &Stitch) -> Line {
        let a = self.hole_xy(stitch.from);
        let b = self.hole_xy(stitch.to);
        Line::new()
            .set("x1", round1(a.x))
            .set("y1", round1(a.y))
            .set("x2", round1(b.x))
            .set("y2", round1(b.y))
            .set("class", stitch.side.name())
    }

    /// Visit number `count` next to `hole`, pushed outward past earlier labels.
    fn label(&self, hole: u32, count: usize, uses: &mut [u32], class: &str) -> Text {
        let slot = &mut uses[hole as usize];
        let offset = HOLE_FONT_SIZE * f64::from(self.outer_ring + *slot + 1) + 1.0;
        *slot += 1;

        let p = self.ring_xy(hole, self.circle_r + offset);
        // Bottom of the text faces the centre.
        let angle = self.template.holes.shape().angle_degrees(hole) + 90.0;
        let (x, y) = (round1(p.x), round1(p.y));
        Text::new(count.to_string())
            .set("x", x)
            .set("y", y)
            .set("class", format!("index {class}"))
            .set("transform", format!("rotate({} {x} {y})", round1(angle)))
    }

    /// Two summary lines: the skip list and the thread length.
    fn summary(&mut self, seq: &SequencePlan, tally: &SequenceTally, class: &str) -> [Text; 2] {
        let skips = seq
            .spec
            .skips
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let line = |text: String, y: f64| {
            Text::new(text)
                .set("x", SUMMARY_X)
                .set("y", y)
                .set("class", format!("summary {class}"))
        };

        let first = line(format!("Sequence: {skips}"), self.summary_y);
        self.summary_y += SUMMARY_FONT_SIZE;
        let second = line(
            format!("Length: {}", self.units.format_length(tally.length)),
            self.summary_y,
        );
        self.summary_y += SUMMARY_FONT_SIZE;
        [first, second]
    }

    /// Closed outline just outside the labels placed so far.
    fn shell(&self) -> Path {
        let r = self.circle_r + HOLE_FONT_SIZE * f64::from(self.outer_ring + 1);
        let mut data = Data::new();
        for hole in 0..self.template.holes.len() {
            let p = self.ring_xy(hole, r);
            let xy = (round1(p.x), round1(p.y));
            data = if hole == 0 {
                data.move_to(xy)
            } else {
                data.line_to(xy)
            };
        }
        Path::new()
            .set("d", data.close())
            .set("fill-opacity", 0)
            .set("stroke", self.theme.empty_circle_stroke)
    }

    /// Stitches, visit numbers, summary and shell for one sequence.
    fn sequence(&mut self, index: usize, seq: &SequencePlan, tally: &SequenceTally) -> Group {
        let class = self.theme.sequence_class(index);
        let mut uses = vec![0u32; self.template.holes.len() as usize];
        let mut group = Group::new().set("id", format!("sequence_{index}"));

        if let Some(first) = seq.stitches.first() {
            group = group.add(self.label(first.from, 1, &mut uses, &class));
        }
        for (i, stitch) in seq.stitches.iter().enumerate() {
            group = group
                .add(self.chord(stitch))
                .add(self.label(stitch.to, i + 2, &mut uses, &class));
        }
        debug_assert_eq!(uses, tally.visits, "label slots disagree with visit counts");

        for text in self.summary(seq, tally, &class) {
            group = group.add(text);
        }
        self.outer_ring += tally.busiest();
        group.add(self.shell())
    }
}

/// Render `template` as an SVG document. `pattern` is printed on the card.
pub fn render(template: &Template, pattern: &str, units: Units, theme: &Theme) -> Document {
    let mut canvas = Canvas::new(template, theme, units);
    let size = canvas.size;

    let mut doc = Document::new()
        .set("width", size * SCALING)
        .set("height", size * SCALING)
        .set("viewBox", (0, 0, size, size))
        .add(Style::new(theme.stylesheet()))
        .add(canvas.background())
        .add(canvas.logo())
        .add(canvas.caption(pattern));

    for (i, (seq, tally)) in template
        .plan
        .sequences()
        .iter()
        .zip(&template.thread.sequences)
        .enumerate()
    {
        doc = doc.add(canvas.sequence(i, seq, tally));
    }
    doc
}

/// Serialise `doc` with the provenance comment header.
pub fn document_text(doc: &Document) -> String {
    format!("<!--\nMade with {SOFTWARE_NAME}\n{URL}\n-->\n{doc}\n")
}

#[cfg(test)]
mod tests {
    use circlestitch::template_from_str;

    use super::*;

    fn rendered(pattern: &str) -> String {
        let template = template_from_str(pattern).expect("valid pattern");
        document_text(&render(&template, pattern, Units::Inch, &DEFAULT_THEME))
    }

    #[test]
    fn one_line_per_stitch_and_one_marker_per_hole() {
        let text = rendered("H 16 L 7,1 S 2 ; L 4 C 2");
        // 4 + 2 stitches, each sequence starting on the front.
        assert_eq!(text.matches("class=\"front\"").count(), 2 + 1);
        assert_eq!(text.matches("class=\"back\"").count(), 2 + 1);
        assert_eq!(text.matches("class=\"hole\"").count(), 16);
        // One number per visit: stitches + 1 per sequence.
        assert_eq!(text.matches("class=\"index seq0\"").count(), 5);
        assert_eq!(text.matches("class=\"index seq1\"").count(), 3);
        assert_eq!(text.matches("<path").count(), 2);
    }

    #[test]
    fn header_summary_and_caption() {
        let text = rendered("H 16 L 7,1 S 2 ; L 4 C 2");
        assert!(text.starts_with("<!--\nMade with circle-stitcher "));
        assert!(text.contains(URL));
        assert!(text.contains("Sequence: 7, 1"));
        assert!(text.contains("Sequence: 4"));
        assert!(text.contains("Length: "));
        assert!(text.contains("Instructions: H 16 L 7,1 S 2 ; L 4 C 2"));
    }

    #[test]
    fn card_size_follows_image_size() {
        let text = rendered("W 2 L 10,1");
        assert!(text.contains("width=\"384\""));
        assert!(text.contains("viewBox=\"0 0 192 192\""));
    }

    #[test]
    fn lengths_round_up() {
        assert_eq!(Units::Inch.format_length(3.2), "4\"");
        assert_eq!(Units::Inch.format_length(4.0), "4\"");
        assert_eq!(Units::Millimetre.format_length(101.01), "102mm");
    }

    #[test]
    fn unit_scales() {
        assert_eq!(Units::Inch.px_per_unit(), 96.0);
        assert!((Units::Millimetre.px_per_unit() * 25.4 - 96.0).abs() < 1e-9);
        assert_eq!(Units::Millimetre.defaults(), &Defaults::MILLIMETRE);
    }

    #[test]
    fn sequence_classes_cycle() {
        assert_eq!(DEFAULT_THEME.sequence_class(0), "seq0");
        assert_eq!(DEFAULT_THEME.sequence_class(5), "seq1");
        assert!(DEFAULT_THEME.stylesheet().contains(".seq3 { fill: #515F45; }"));
    }

    #[test]
    fn rounding() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(-0.04), -0.0);
    }
}
