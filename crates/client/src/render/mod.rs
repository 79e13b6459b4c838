// Canvas rendering - world background, avatars, name labels
use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::Camera;

pub mod cache;
pub mod sprite;

pub use cache::SpriteCache;
pub use sprite::SpritePlacement;

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { canvas, ctx })
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    #[inline]
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[inline]
    pub fn clear(&self, background: &str) {
        self.ctx.set_fill_style_str(background);
        self.ctx.fill_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
    }

    /// Copy the part of the world image under the camera 1:1 onto the canvas.
    pub fn draw_background(&self, image: &HtmlImageElement, camera: &Camera) {
        let (w, h) = (camera.viewport.x as f64, camera.viewport.y as f64);
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                camera.offset.x as f64,
                camera.offset.y as f64,
                w,
                h,
                0.0,
                0.0,
                w,
                h,
            );
    }

    pub fn draw_avatar(&self, image: &HtmlImageElement, placement: &SpritePlacement) {
        let size = placement.size;
        if !placement.mirrored {
            let origin = placement.top_left();
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image,
                origin.x as f64,
                origin.y as f64,
                size.x as f64,
                size.y as f64,
            );
            return;
        }

        let m = placement.transform();
        self.ctx.save();
        let _ = self.ctx.transform(
            m.matrix2.x_axis.x as f64,
            m.matrix2.x_axis.y as f64,
            m.matrix2.y_axis.x as f64,
            m.matrix2.y_axis.y as f64,
            m.translation.x as f64,
            m.translation.y as f64,
        );
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            0.0,
            0.0,
            size.x as f64,
            size.y as f64,
        );
        self.ctx.restore();
    }

    /// Outlined text centered on `anchor.x`, sitting on `anchor.y`.
    pub fn draw_label(&self, text: &str, anchor: Vec2, font: &str) {
        if text.is_empty() {
            return;
        }

        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("bottom");

        self.ctx.set_line_width(3.0);
        self.ctx.set_stroke_style_str("black");
        let _ = self.ctx.stroke_text(text, anchor.x as f64, anchor.y as f64);

        self.ctx.set_fill_style_str("white");
        let _ = self.ctx.fill_text(text, anchor.x as f64, anchor.y as f64);
    }
}
