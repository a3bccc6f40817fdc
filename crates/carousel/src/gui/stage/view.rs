use super::model::{Card, Stage};
use super::{CARD_CORNER_RADIUS, ICON_FILL, ICON_SIZE, LABEL_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use orbit::Point;
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, PI};

struct CardRenderer<'a> {
    card: &'a Card,
    center: Point,
    size: f64,
    main: bool,
}

impl<'a> CardRenderer<'a> {
    fn new(card: &'a Card, origin: Point, main: bool) -> Self {
        Self {
            card,
            center: card.visual.center(origin),
            size: card.visual.size(),
            main,
        }
    }

    /// Paints the card into a group so opacity applies to the whole card.
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.size <= 0.0 {
            return Ok(());
        }

        cr.push_group();
        self.draw_background(cr, colors)?;
        self.draw_content(cr, colors)?;
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.card.visual.placement.opacity.clamp(0.0, 1.0))
    }

    fn rounded_rect(&self, cr: &Context) {
        let half = self.size / 2.0;
        let r = (CARD_CORNER_RADIUS * self.card.visual.placement.scale).min(half);
        let (left, top) = (self.center.x - half, self.center.y - half);
        let (right, bottom) = (self.center.x + half, self.center.y + half);

        cr.new_sub_path();
        cr.arc(right - r, top + r, r, -FRAC_PI_2, 0.0);
        cr.arc(right - r, bottom - r, r, 0.0, FRAC_PI_2);
        cr.arc(left + r, bottom - r, r, FRAC_PI_2, PI);
        cr.arc(left + r, top + r, r, PI, 3.0 * FRAC_PI_2);
        cr.close_path();
    }

    fn draw_background(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let fill = if self.main {
            colors.main_card
        } else {
            colors.card
        };
        self.rounded_rect(cr);
        set_source(cr, fill);
        cr.fill_preserve()?;
        set_source(cr, colors.outline);
        cr.set_line_width(1.0);
        cr.stroke()
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if let Some(pixbuf) = &self.card.pixbuf {
            self.draw_icon(cr, pixbuf)
        } else {
            self.draw_label(cr, colors)
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let icon_scale = (self.size * ICON_FILL) / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );
        let (ix, iy) = (self.center.x - iw / 2.0, self.center.y - ih / 2.0);

        cr.save()?;
        cr.translate(ix, iy);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let text = self.card.label.as_str();
        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE * self.card.visual.placement.scale);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(
                self.center.x - ext.width() / 2.0 - ext.x_bearing(),
                self.center.y + ext.height() / 2.0,
            );
            cr.show_text(text)?;
        }
        Ok(())
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Draws every card back to front around `origin`, the circle's center.
pub fn draw(
    cr: &Context,
    stage: &Stage,
    colors: &ThemeColors,
    origin: Point,
) -> Result<(), cairo::Error> {
    for index in stage.draw_order() {
        CardRenderer::new(&stage.cards[index], origin, index == 0).draw(cr, colors)?;
    }
    Ok(())
}
