use crate::gui::theme::ThemeColors;
use cairo::Context;
use hueshape::WedgeFrame;

/// Outline width in screen pixels, kept constant under the shape scale.
const OUTLINE_WIDTH: f64 = 1.0;

struct WedgeRenderer<'a> {
    frame: &'a WedgeFrame,
}

impl<'a> WedgeRenderer<'a> {
    fn new(frame: &'a WedgeFrame) -> Self {
        Self { frame }
    }

    fn is_visible(&self) -> bool {
        self.frame.scale > 0.0 && self.frame.radius > 0.0
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        if !self.is_visible() {
            return Ok(());
        }
        let frame = self.frame;

        cr.save()?;
        cr.translate(frame.center.x, frame.center.y);
        cr.scale(frame.scale, frame.scale);

        cr.move_to(0.0, 0.0);
        cr.arc(0.0, 0.0, frame.radius, frame.start_angle, frame.end_angle);
        cr.close_path();

        let (r, g, b, a) = frame.color.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.fill_preserve()?;
        // seams between neighbouring wedges disappear under the stroke
        cr.set_line_width(OUTLINE_WIDTH / frame.scale);
        cr.stroke()?;

        cr.restore()
    }
}

/// Paints the theme background and then `frames` in order, back to front.
pub fn draw(cr: &Context, frames: &[WedgeFrame], colors: &ThemeColors) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.background.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;

    for frame in frames {
        WedgeRenderer::new(frame).draw(cr)?;
    }
    Ok(())
}
