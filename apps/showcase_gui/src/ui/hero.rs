//! Pinned hero stage: scroll-driven clip and fade transforms over a rotating
//! set of property slides.

use std::time::{Duration, Instant};

use eframe::egui;
use motion::carousel::Carousel;
use motion::kurbo;
use motion::scroll::{ScrollRange, TransformFrame, HERO_SECTION_HEIGHT_FACTOR};

pub const HERO_TITLE: &str = "Wohnen, wo Zuhause beginnt";
pub const HERO_DESCRIPTION: &str =
    "Faire Mieten, digitale Verwaltung und alle Dokumente an einem Ort.";

pub struct HeroSlide {
    pub headline: &'static str,
    pub fill: egui::Color32,
}

fn default_slides() -> Vec<HeroSlide> {
    vec![
        HeroSlide {
            headline: "Altbauwohnung, Leipzig Südvorstadt",
            fill: egui::Color32::from_rgb(0x2f, 0x4f, 0x43),
        },
        HeroSlide {
            headline: "Neubauquartier, Freiburg Vauban",
            fill: egui::Color32::from_rgb(0x3a, 0x3f, 0x58),
        },
        HeroSlide {
            headline: "Reihenhaus, Hamburg Ottensen",
            fill: egui::Color32::from_rgb(0x5a, 0x3d, 0x33),
        },
        HeroSlide {
            headline: "Hofgarten-Apartments, Dresden",
            fill: egui::Color32::from_rgb(0x2c, 0x4a, 0x5e),
        },
    ]
}

pub struct HeroSection {
    carousel: Carousel<HeroSlide>,
}

impl HeroSection {
    pub fn new() -> Self {
        Self {
            carousel: Carousel::new(default_slides()),
        }
    }

    /// Reserves the tall hero section inside the landing scroll page and
    /// paints the pinned stage for the current scroll offset.
    pub fn show(&mut self, ui: &mut egui::Ui, now: Instant) {
        let viewport = ui.clip_rect();
        let viewport_h = viewport.height();
        let section_height = viewport_h * HERO_SECTION_HEIGHT_FACTOR as f32;
        let width = ui.available_width();
        let (_, section_rect) = ui.allocate_space(egui::vec2(width, section_height));

        // Rects are in screen coordinates, so the distance the section top
        // has travelled above the viewport top is the scroll offset into it.
        let offset = (viewport.top() - section_rect.top()) as f64;
        let range = ScrollRange::for_pinned_section(0.0, section_height as f64, viewport_h as f64);
        let frame = TransformFrame::at(range.progress(offset));

        let top = stage_top(
            section_rect.top(),
            section_rect.bottom(),
            viewport.top(),
            viewport_h,
        );
        let stage_rect = egui::Rect::from_min_size(
            egui::pos2(section_rect.left(), top),
            egui::vec2(section_rect.width(), viewport_h),
        );

        let fading = self.paint_stage(ui, stage_rect, &frame, now);

        // A fade in flight needs frame-rate repaints; otherwise one wakeup at
        // the next slide transition is enough.
        if fading {
            ui.ctx().request_repaint_after(Duration::from_millis(16));
        } else if let Some(deadline) = self.carousel.next_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn paint_stage(
        &mut self,
        ui: &mut egui::Ui,
        stage_rect: egui::Rect,
        frame: &TransformFrame,
        now: Instant,
    ) -> bool {
        let bounds = kurbo::Rect::new(
            stage_rect.left() as f64,
            stage_rect.top() as f64,
            stage_rect.right() as f64,
            stage_rect.bottom() as f64,
        );
        let clip = frame.clip_shape(bounds);
        let clip_rect = egui::Rect::from_min_max(
            egui::pos2(clip.rect().x0 as f32, clip.rect().y0 as f32),
            egui::pos2(clip.rect().x1 as f32, clip.rect().y1 as f32),
        );
        let rounding = egui::CornerRadius::same(clip.radii().top_left as u8);

        let mut fading = false;
        let painter = ui.painter();
        if let Some(slide_frame) = self.carousel.frame(now) {
            if let Some(previous) = slide_frame.previous {
                painter.rect_filled(clip_rect, rounding, previous.fill);
                fading = true;
            }
            let blend = slide_frame.blend as f32;
            painter.rect_filled(
                clip_rect,
                rounding,
                slide_frame.current.fill.gamma_multiply(blend),
            );
            painter.text(
                clip_rect.left_bottom() + egui::vec2(24.0, -20.0),
                egui::Align2::LEFT_BOTTOM,
                slide_frame.current.headline,
                egui::FontId::proportional(15.0),
                egui::Color32::WHITE.gamma_multiply(blend * 0.9),
            );
        } else {
            painter.rect_filled(clip_rect, rounding, ui.visuals().extreme_bg_color);
        }

        if frame.title_opacity > 0.0 {
            painter.text(
                egui::pos2(
                    stage_rect.center().x,
                    stage_rect.top() + stage_rect.height() * 0.38,
                ),
                egui::Align2::CENTER_CENTER,
                HERO_TITLE,
                egui::FontId::proportional(44.0),
                egui::Color32::WHITE.gamma_multiply(frame.title_opacity as f32),
            );
        }
        if frame.description_opacity > 0.0 {
            painter.text(
                egui::pos2(
                    stage_rect.center().x,
                    stage_rect.top() + stage_rect.height() * 0.54,
                ),
                egui::Align2::CENTER_CENTER,
                HERO_DESCRIPTION,
                egui::FontId::proportional(18.0),
                egui::Color32::from_white_alpha(230)
                    .gamma_multiply(frame.description_opacity as f32),
            );
        }

        fading
    }
}

impl Default for HeroSection {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen-space top of the pinned stage: rides with the viewport while the
/// section spans it, then parks at the section's end.
fn stage_top(section_top: f32, section_bottom: f32, viewport_top: f32, viewport_h: f32) -> f32 {
    let park = (section_bottom - viewport_h).max(section_top);
    viewport_top.clamp(section_top, park)
}

#[cfg(test)]
mod tests {
    use super::{default_slides, stage_top};

    #[test]
    fn stage_stays_at_section_start_before_scrolling() {
        assert_eq!(stage_top(100.0, 1860.0, 40.0, 800.0), 100.0);
    }

    #[test]
    fn stage_rides_the_viewport_while_pinned() {
        assert_eq!(stage_top(100.0, 1860.0, 500.0, 800.0), 500.0);
        assert_eq!(stage_top(100.0, 1860.0, 1060.0, 800.0), 1060.0);
    }

    #[test]
    fn stage_parks_at_the_section_end() {
        assert_eq!(stage_top(100.0, 1860.0, 1400.0, 800.0), 1060.0);
    }

    #[test]
    fn short_sections_never_invert_the_pin_range() {
        assert_eq!(stage_top(100.0, 500.0, 300.0, 800.0), 100.0);
    }

    #[test]
    fn rotation_has_slides_to_show() {
        assert!(default_slides().len() >= 2);
    }
}
