//! Persistent drawing surfaces.
//!
//! `vello_cpu` rasterizes each batch of draws into a fresh buffer, so a [`Surface`] keeps its
//! accumulated pixels in a persistent pixmap and premul-overs every painted batch onto it.
//! That is what lets trail fades build up across frames.

use crate::foundation::core::{Point, Rect, Rgba, Viewport};
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::composite::{fade_to_black_in_place, over_in_place};
use vello_cpu::kurbo::Shape as _;

/// An exclusively-owned, full-viewport premultiplied RGBA8 surface.
pub struct Surface {
    viewport: Viewport,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Acquire a surface for `viewport`. Fails for dimensions the rasterizer cannot address.
    pub fn new(viewport: Viewport) -> DeckResult<Self> {
        let (w, h) = surface_dims(viewport)?;
        Ok(Self {
            viewport,
            pixmap: vello_cpu::Pixmap::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: None,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Composite translucent black over the whole surface (motion trails).
    pub fn fade(&mut self, alpha: f32) {
        fade_to_black_in_place(self.pixmap.data_as_u8_slice_mut(), alpha);
    }

    /// Record draws through a [`Painter`] and composite them over the current contents.
    pub fn paint<R>(&mut self, f: impl FnOnce(&mut Painter<'_>) -> R) -> DeckResult<R> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let mut painter = Painter {
            ctx: &mut ctx,
            draws: 0,
        };
        let out = f(&mut painter);
        let draws = painter.draws;

        if draws > 0 {
            ctx.flush();
            self.scratch.data_as_u8_slice_mut().fill(0);
            ctx.render_to_pixmap(&mut self.scratch);
            over_in_place(
                self.pixmap.data_as_u8_slice_mut(),
                self.scratch.data_as_u8_slice(),
                1.0,
            )?;
        }
        self.ctx = Some(ctx);
        Ok(out)
    }
}

fn surface_dims(viewport: Viewport) -> DeckResult<(u16, u16)> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(DeckError::surface("surface must be non-empty"));
    }
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| DeckError::surface("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| DeckError::surface("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Immediate-mode drawing calls, roughly the subset of a 2D canvas the visuals need.
///
/// Colors are straight alpha; the alpha channel doubles as the per-draw global alpha.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    draws: usize,
}

impl Painter<'_> {
    /// Number of primitives recorded so far.
    #[cfg(test)]
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if radius <= 0.0 || !self.set_color(color) {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new(cpu_pt(center), radius).to_path(0.1);
        self.ctx.fill_path(&path);
        self.draws += 1;
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 || !self.set_color(color) {
            return;
        }
        self.ctx.fill_rect(&cpu_rect(rect));
        self.draws += 1;
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba) {
        if width <= 0.0 || !self.set_color(color) {
            return;
        }
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_rect(&cpu_rect(rect));
        self.draws += 1;
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        if width <= 0.0 || !self.set_color(color) {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(cpu_pt(from));
        path.line_to(cpu_pt(to));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        self.draws += 1;
    }

    pub fn stroke_quad(&mut self, from: Point, ctrl: Point, to: Point, width: f64, color: Rgba) {
        if width <= 0.0 || !self.set_color(color) {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(cpu_pt(from));
        path.quad_to(cpu_pt(ctrl), cpu_pt(to));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        self.draws += 1;
    }

    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        let Some(path) = polygon_path(points) else {
            return;
        };
        if !self.set_color(color) {
            return;
        }
        self.ctx.fill_path(&path);
        self.draws += 1;
    }

    pub fn stroke_polygon(&mut self, points: &[Point], width: f64, color: Rgba) {
        let Some(path) = polygon_path(points) else {
            return;
        };
        if width <= 0.0 || !self.set_color(color) {
            return;
        }
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        self.draws += 1;
    }

    fn set_color(&mut self, color: Rgba) -> bool {
        let [r, g, b, a] = color.to_rgba8();
        if a == 0 {
            return false;
        }
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        true
    }
}

fn polygon_path(points: &[Point]) -> Option<vello_cpu::kurbo::BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.len() < 2 {
        return None;
    }
    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(cpu_pt(*first));
    for p in rest {
        path.line_to(cpu_pt(*p));
    }
    path.close_path();
    Some(path)
}

fn cpu_pt(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn cpu_rect(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
