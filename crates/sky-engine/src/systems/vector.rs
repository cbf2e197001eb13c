//! Lyon-based tessellation of the sky's discs, lines and bands.
//!
//! Drawing commands append triangles to a flat vertex list that the host
//! uploads as-is (`x, y, r, g, b, a` per vertex, triangle list order).
//!
//! ```ignore
//! let mut layer = VectorState::new();
//! layer.fill_circle(Vec2::new(120.0, 80.0), 2.4, VectorColor::WHITE.with_alpha(0.8));
//! layer.stroke_segment(a, b, 1.5, VectorColor::rgba8(74, 158, 255, 0.22));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, LineCap, LineJoin,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

/// Tessellation tolerance in pixels.
const TOLERANCE: f32 = 0.25;

/// Per-vertex data. 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(position: lyon::math::Point, color: VectorColor) -> Self {
        Self {
            x: position.x,
            y: position.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// CSS-style `rgba(r, g, b, a)`: 0-255 channels, alpha in 0.0 - 1.0.
    pub fn rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a.clamp(0.0, 1.0) as f32,
        }
    }

    /// Same as [`VectorColor::rgba8`] for a `[r, g, b]` triple.
    pub fn from_rgb8(rgb: [u8; 3], a: f64) -> Self {
        Self::rgba8(rgb[0], rgb[1], rgb[2], a)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

struct StrokeVertexCtor {
    color: VectorColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

/// One drawing layer.
///
/// Holds lyon tessellators and the output vertex list; cleared each frame
/// and populated by drawing commands.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    vertices: Vec<VectorVertex>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            vertices: Vec::with_capacity(1 << 16),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangle-list vertices produced so far.
    pub fn vertices(&self) -> &[VectorVertex] {
        &self.vertices
    }

    /// Vertices as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw pointer to the flat float buffer, for zero-copy reads from JS.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }

    /// Expand indexed geometry into the triangle list.
    fn flush_geometry(&mut self) {
        let VertexBuffers { vertices, indices } = &mut self.geometry;
        self.vertices.extend(indices.iter().map(|&i| vertices[i as usize]));
        vertices.clear();
        indices.clear();
    }

    /// Fill a closed polygon (convex or concave).
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 || color.a <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
        self.fill_path(&builder.build(), color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(&builder.build(), color);
    }

    fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::debug!("fill tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Stroke a single line segment with round caps.
    pub fn stroke_segment(&mut self, a: Vec2, b: Vec2, width: f32, color: VectorColor) {
        self.stroke_polyline(&[a, b], width, color);
    }

    /// Stroke an open polyline with round caps and joins.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 2 || width <= 0.0 || color.a <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        self.stroke_path(&builder.build(), width, color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius <= 0.0 || width <= 0.0 || color.a <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.stroke_path(&builder.build(), width, color);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        let options = StrokeOptions::tolerance(TOLERANCE)
            .with_line_width(width)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);
        let result = self.stroke_tess.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::debug!("stroke tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}
