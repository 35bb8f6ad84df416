//! Text outline extrusion.
//!
//! Glyph outlines are flattened into closed polylines, the caps are filled
//! with lyon's tessellator (non-zero rule, as TrueType expects) and the sides
//! are stitched from rings: a quarter-circle bevel at the front, straight
//! walls, a mirrored bevel at the back.

use crate::TextError;
use crate::typeface::Typeface;
use bubbletext_common::MeshData;
use glam::{Vec2, Vec3};
use lyon_tessellation::math::point;
use lyon_tessellation::path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use std::f32::consts::FRAC_PI_2;
use ttf_parser::OutlineBuilder;

/// Longest miter, in multiples of the offset, before sharp spikes are cut.
const MITER_LIMIT: f32 = 4.0;

/// Extrusion and bevel parameters, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShape {
    /// Em size.
    pub size: f32,
    /// Extrusion depth between the bevels.
    pub depth: f32,
    /// Straight segments per outline curve.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// How far the bevel extends along Z beyond each cap.
    pub bevel_thickness: f32,
    /// How far the bevel extends outward from the outline.
    pub bevel_size: f32,
    /// Outward offset applied to the outline before bevelling.
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl TextShape {
    /// The fixed shape used for the scene's label.
    pub const LABEL: TextShape = TextShape {
        size: 0.5,
        depth: 0.2,
        curve_segments: 12,
        bevel_enabled: true,
        bevel_thickness: 0.03,
        bevel_size: 0.02,
        bevel_offset: 0.0,
        bevel_segments: 5,
    };
}

impl Default for TextShape {
    fn default() -> Self {
        Self::LABEL
    }
}

/// Collects flattened contours from a typeface, mapping font units into
/// world units at the current pen position.
struct ContourSink {
    contours: Vec<Vec<Vec2>>,
    current: Vec<Vec2>,
    last: Vec2,
    scale: f32,
    origin: Vec2,
    curve_segments: u32,
}

impl ContourSink {
    fn map(&self, x: f32, y: f32) -> Vec2 {
        self.origin + Vec2::new(x, y) * self.scale
    }

    fn finish(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        contour.dedup();
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }

    fn push(&mut self, p: Vec2) {
        self.current.push(p);
        self.last = p;
    }
}

impl OutlineBuilder for ContourSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish();
        let p = self.map(x, y);
        self.push(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.push(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (p0, c, p1) = (self.last, self.map(x1, y1), self.map(x, y));
        let n = self.curve_segments.max(1);
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            self.push(p0 * mt * mt + c * 2.0 * mt * t + p1 * t * t);
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (p0, c1, c2, p1) = (self.last, self.map(x1, y1), self.map(x2, y2), self.map(x, y));
        let n = self.curve_segments.max(1);
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            self.push(
                p0 * mt * mt * mt + c1 * 3.0 * mt * mt * t + c2 * 3.0 * mt * t * t + p1 * t * t * t,
            );
        }
    }

    fn close(&mut self) {
        self.finish();
    }
}

fn signed_area(contour: &[Vec2]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| contour[i].perp_dot(contour[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Per-vertex outward miter vectors. Offsetting a vertex by `m * d` moves
/// both adjacent edges outward by `d`.
///
/// `outward_left` selects which side of the travel direction faces away
/// from the filled area.
fn miter_vectors(contour: &[Vec2], outward_left: bool) -> Vec<Vec2> {
    let n = contour.len();
    let edge_normal = |i: usize| {
        let d = (contour[(i + 1) % n] - contour[i]).normalize_or_zero();
        if outward_left { d.perp() } else { -d.perp() }
    };
    (0..n)
        .map(|i| {
            let prev = edge_normal((i + n - 1) % n);
            let next = edge_normal(i);
            let sum = prev + next;
            if sum.length_squared() < 1e-12 {
                return next;
            }
            let dir = sum.normalize();
            let cos_half = dir.dot(next).max(1.0 / MITER_LIMIT);
            dir / cos_half
        })
        .collect()
}

/// Lay out `text` with `typeface` and collect its flattened contours.
fn layout(text: &str, typeface: &dyn Typeface, shape: &TextShape) -> Vec<Vec<Vec2>> {
    let scale = shape.size / typeface.units_per_em().max(1.0);
    let line_advance = typeface.line_height() * scale;
    let mut sink = ContourSink {
        contours: Vec::new(),
        current: Vec::new(),
        last: Vec2::ZERO,
        scale,
        origin: Vec2::ZERO,
        curve_segments: shape.curve_segments,
    };

    let mut pen = Vec2::ZERO;
    for ch in text.chars() {
        if ch == '\n' {
            pen = Vec2::new(0.0, pen.y - line_advance);
            continue;
        }
        sink.origin = pen;
        if let Some(advance) = typeface.outline(ch, &mut sink) {
            sink.finish();
            pen.x += advance * scale;
        }
    }
    sink.finish();
    sink.contours
}

/// A side-wall ring: depth, outward offset and the normal's blend between
/// the contour normal and the Z axis.
struct Ring {
    z: f32,
    offset: f32,
    radial: f32,
    axial: f32,
}

fn rings(shape: &TextShape) -> Vec<Ring> {
    if !shape.bevel_enabled {
        return vec![
            Ring { z: shape.depth, offset: 0.0, radial: 1.0, axial: 0.0 },
            Ring { z: 0.0, offset: 0.0, radial: 1.0, axial: 0.0 },
        ];
    }
    let segments = shape.bevel_segments.max(1);
    let angle = |k: u32| k as f32 / segments as f32 * FRAC_PI_2;
    let front = (0..=segments).map(|k| {
        let a = angle(k);
        Ring {
            z: shape.depth + shape.bevel_thickness * a.cos(),
            offset: shape.bevel_size * a.sin(),
            radial: a.sin(),
            axial: a.cos(),
        }
    });
    let back = (0..=segments).rev().map(|k| {
        let a = angle(k);
        Ring {
            z: -shape.bevel_thickness * a.cos(),
            offset: shape.bevel_size * a.sin(),
            radial: a.sin(),
            axial: -a.cos(),
        }
    });
    front.chain(back).collect()
}

/// Build the extruded mesh for `text`. The result is not centered.
///
/// Characters the typeface cannot draw are skipped; text without any
/// drawable glyph yields an empty mesh.
pub fn build_text_geometry(
    text: &str,
    typeface: &dyn Typeface,
    shape: &TextShape,
) -> Result<MeshData, TextError> {
    let mut contours = layout(text, typeface, shape);
    let mut mesh = MeshData::default();
    if contours.is_empty() {
        return Ok(mesh);
    }

    // The largest contour is an outer one; its winding tells which side
    // the fill is on for every contour in this typeface.
    let largest = contours
        .iter()
        .map(|c| signed_area(c))
        .fold(0.0f32, |acc, a| if a.abs() > acc.abs() { a } else { acc });
    let outward_left = largest < 0.0;

    let miters: Vec<Vec<Vec2>> = contours
        .iter()
        .map(|c| miter_vectors(c, outward_left))
        .collect();

    if shape.bevel_enabled && shape.bevel_offset != 0.0 {
        for (contour, ms) in contours.iter_mut().zip(&miters) {
            for (p, m) in contour.iter_mut().zip(ms) {
                *p += *m * shape.bevel_offset;
            }
        }
    }

    // Caps.
    let mut builder = Path::builder();
    for contour in &contours {
        builder.begin(point(contour[0].x, contour[0].y));
        for p in &contour[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut cap: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(0.001).with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut cap, |v: FillVertex| v.position().to_array()),
        )
        .map_err(|e| TextError::Tessellation(format!("{e:?}")))?;

    let (front_z, back_z) = if shape.bevel_enabled {
        (shape.depth + shape.bevel_thickness, -shape.bevel_thickness)
    } else {
        (shape.depth, 0.0)
    };

    let front_base = mesh.vertex_count() as u32;
    for p in &cap.vertices {
        mesh.push_vertex(Vec3::new(p[0], p[1], front_z), Vec3::Z);
    }
    mesh.indices
        .extend(cap.indices.iter().map(|i| front_base + i));

    let back_base = mesh.vertex_count() as u32;
    for p in &cap.vertices {
        mesh.push_vertex(Vec3::new(p[0], p[1], back_z), Vec3::NEG_Z);
    }
    for tri in cap.indices.chunks_exact(3) {
        mesh.indices
            .extend_from_slice(&[back_base + tri[0], back_base + tri[2], back_base + tri[1]]);
    }

    // Sides.
    let rings = rings(shape);
    for (contour, ms) in contours.iter().zip(&miters) {
        let n = contour.len() as u32;
        let base = mesh.vertex_count() as u32;
        for ring in &rings {
            for (p, m) in contour.iter().zip(ms) {
                let pos = *p + *m * ring.offset;
                let radial = m.normalize_or_zero().extend(0.0);
                let normal = (radial * ring.radial + Vec3::Z * ring.axial).normalize_or_zero();
                mesh.push_vertex(Vec3::new(pos.x, pos.y, ring.z), normal);
            }
        }
        for r in 0..rings.len() as u32 - 1 {
            let row0 = base + r * n;
            let row1 = base + (r + 1) * n;
            for i in 0..n {
                let j = (i + 1) % n;
                mesh.indices.extend_from_slice(&[
                    row0 + i,
                    row0 + j,
                    row1 + j,
                    row0 + i,
                    row1 + j,
                    row1 + i,
                ]);
            }
        }
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::PlaceholderTypeface;

    #[test]
    fn label_shape_constants() {
        let s = TextShape::default();
        assert_eq!(s.size, 0.5);
        assert_eq!(s.depth, 0.2);
        assert_eq!(s.curve_segments, 12);
        assert_eq!(s.bevel_thickness, 0.03);
        assert_eq!(s.bevel_size, 0.02);
        assert_eq!(s.bevel_offset, 0.0);
        assert_eq!(s.bevel_segments, 5);
    }

    #[test]
    fn empty_and_blank_text_build_nothing() {
        let shape = TextShape::default();
        assert!(build_text_geometry("", &PlaceholderTypeface, &shape).unwrap().is_empty());
        assert!(build_text_geometry("  \n ", &PlaceholderTypeface, &shape).unwrap().is_empty());
    }

    #[test]
    fn single_glyph_has_caps_and_bevelled_sides() {
        let shape = TextShape::default();
        let mesh = build_text_geometry("A", &PlaceholderTypeface, &shape).unwrap();
        // 4 outline points across 12 rings for the sides; the rest are caps.
        let side_vertices = 12 * 4;
        let cap_vertices = mesh.vertex_count() - side_vertices;
        assert!(cap_vertices >= 8 && cap_vertices % 2 == 0);
        // 11 ring gaps * 4 edges * 2 triangles, plus at least 2 per cap.
        assert!(mesh.triangle_count() >= 11 * 4 * 2 + 4);
        assert_eq!((mesh.triangle_count() - 11 * 4 * 2) % 2, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn extents_include_bevel() {
        let shape = TextShape::default();
        let mesh = build_text_geometry("A", &PlaceholderTypeface, &shape).unwrap();
        let bb = mesh.bounding_box().unwrap();
        assert!((bb.min.z + 0.03).abs() < 1e-6);
        assert!((bb.max.z - 0.23).abs() < 1e-6);
        // Box glyph spans 0.025..0.275 in X before the 0.02 bevel.
        assert!((bb.min.x - 0.005).abs() < 1e-4);
        assert!((bb.max.x - 0.295).abs() < 1e-4);
    }

    #[test]
    fn bevel_pushes_outward_for_either_winding() {
        struct CounterClockwise;
        impl Typeface for CounterClockwise {
            fn units_per_em(&self) -> f32 {
                1000.0
            }
            fn line_height(&self) -> f32 {
                1000.0
            }
            fn outline(&self, _ch: char, sink: &mut dyn OutlineBuilder) -> Option<f32> {
                sink.move_to(0.0, 0.0);
                sink.line_to(1000.0, 0.0);
                sink.line_to(1000.0, 1000.0);
                sink.line_to(0.0, 1000.0);
                sink.close();
                Some(1000.0)
            }
        }
        let shape = TextShape::default();
        let bb = build_text_geometry("x", &CounterClockwise, &shape)
            .unwrap()
            .bounding_box()
            .unwrap();
        assert!(bb.min.x < 0.0 && bb.max.x > 0.5);
    }

    #[test]
    fn glyphs_advance_and_lines_wrap() {
        let shape = TextShape::default();
        let one = build_text_geometry("A", &PlaceholderTypeface, &shape).unwrap();
        let two = build_text_geometry("AA", &PlaceholderTypeface, &shape).unwrap();
        let wide = two.bounding_box().unwrap();
        assert!(wide.size().x > one.bounding_box().unwrap().size().x + 0.25);

        let stacked = build_text_geometry("A\nA", &PlaceholderTypeface, &shape)
            .unwrap()
            .bounding_box()
            .unwrap();
        assert!(stacked.size().y > 0.6);
        assert!((stacked.size().x - one.bounding_box().unwrap().size().x).abs() < 1e-5);
    }

    #[test]
    fn flat_extrusion_without_bevel() {
        let shape = TextShape {
            bevel_enabled: false,
            ..TextShape::default()
        };
        let mesh = build_text_geometry("A", &PlaceholderTypeface, &shape).unwrap();
        let bb = mesh.bounding_box().unwrap();
        assert_eq!(bb.min.z, 0.0);
        assert!((bb.max.z - 0.2).abs() < 1e-6);
        assert!(mesh.triangle_count() >= 4 * 2 + 4);
    }

    #[test]
    fn curves_are_flattened_into_segments() {
        struct Hump;
        impl Typeface for Hump {
            fn units_per_em(&self) -> f32 {
                1000.0
            }
            fn line_height(&self) -> f32 {
                1000.0
            }
            fn outline(&self, _ch: char, sink: &mut dyn OutlineBuilder) -> Option<f32> {
                sink.move_to(0.0, 0.0);
                sink.quad_to(500.0, 1000.0, 1000.0, 0.0);
                sink.close();
                Some(1000.0)
            }
        }
        let mut sink = ContourSink {
            contours: Vec::new(),
            current: Vec::new(),
            last: Vec2::ZERO,
            scale: 1.0,
            origin: Vec2::ZERO,
            curve_segments: 12,
        };
        Hump.outline('a', &mut sink);
        assert_eq!(sink.contours.len(), 1);
        // Start point plus 12 samples.
        assert_eq!(sink.contours[0].len(), 13);
    }
}
