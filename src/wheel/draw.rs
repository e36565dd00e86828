use super::layout::SectorGeometry;
use super::view::RenderModel;
use super::ITEM_SIZE;
use cairo::{Context, Format, ImageSurface};
use palette::Srgba;
use std::f64::consts::PI;
use std::path::Path;
use thiserror::Error;

// css angles start at 12 o'clock, cairo's at 3 o'clock
const START_OFFSET: f64 = -PI / 2.0;
const HUB_RADIUS: f64 = 10.0;
const POINTER_HEAD: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 13.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Cairo(#[from] cairo::Error),
    #[error(transparent)]
    Png(#[from] cairo::IoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn to_radians(css_degrees: f64) -> f64 {
    START_OFFSET + css_degrees.to_radians()
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct SectorRenderer<'a> {
    sector: &'a SectorGeometry,
    radius: f64,
    label_radius: f64,
    highlighted: bool,
}

impl<'a> SectorRenderer<'a> {
    fn new(sector: &'a SectorGeometry, model: &RenderModel) -> Self {
        Self {
            sector,
            radius: model.layout.radius,
            label_radius: model.layout.label_radius,
            highlighted: model
                .labels
                .get(sector.index)
                .is_some_and(|label| label.highlighted),
        }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_wedge(cr)?;
        self.draw_label(cr)
    }

    fn draw_wedge(&self, cr: &Context) -> Result<(), cairo::Error> {
        set_source(cr, self.sector.color.srgba());
        cr.move_to(0.0, 0.0);
        cr.arc(
            0.0,
            0.0,
            self.radius,
            to_radians(self.sector.start),
            to_radians(self.sector.end),
        );
        cr.close_path();
        cr.fill()
    }

    fn draw_label(&self, cr: &Context) -> Result<(), cairo::Error> {
        let angle = to_radians(self.sector.midpoint);
        let (x, y) = (
            self.label_radius * angle.cos(),
            self.label_radius * angle.sin(),
        );

        let badge = if self.highlighted {
            Srgba::new(0.95, 0.55, 0.2, 0.95)
        } else {
            Srgba::new(1.0, 1.0, 1.0, 0.9)
        };
        set_source(cr, badge);
        cr.arc(x, y, ITEM_SIZE / 2.0, 0.0, 2.0 * PI);
        cr.fill()?;

        let text = self.sector.number().to_string();
        cr.set_source_rgb(0.15, 0.15, 0.15);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE);
        if let Ok(ext) = cr.text_extents(&text) {
            cr.move_to(
                x - ext.width() / 2.0 - ext.x_bearing(),
                y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(&text)?;
        }
        Ok(())
    }
}

/// Draws the wheel rotated by the model's current rotation, with the pointer
/// fixed on top.
pub fn draw(cr: &Context, model: &RenderModel) -> Result<(), cairo::Error> {
    let center = model.layout.size / 2.0;

    cr.save()?;
    cr.translate(center, center);
    cr.rotate(model.rotation.to_radians());

    set_source(cr, Srgba::new(0.96, 0.96, 0.96, 0.3));
    cr.arc(0.0, 0.0, model.layout.radius, 0.0, 2.0 * PI);
    cr.fill()?;

    for sector in &model.layout.sectors {
        SectorRenderer::new(sector, model).draw(cr)?;
    }
    cr.restore()?;

    draw_pointer(cr, model, center)
}

fn draw_pointer(cr: &Context, model: &RenderModel, center: f64) -> Result<(), cairo::Error> {
    let tip = center - model.layout.pointer_length;

    cr.set_source_rgb(0.85, 0.2, 0.2);
    cr.set_line_width(3.0);
    cr.move_to(center, center);
    cr.line_to(center, tip);
    cr.stroke()?;

    cr.move_to(center, tip - POINTER_HEAD);
    cr.line_to(center - POINTER_HEAD / 2.0, tip);
    cr.line_to(center + POINTER_HEAD / 2.0, tip);
    cr.close_path();
    cr.fill()?;

    cr.arc(center, center, HUB_RADIUS, 0.0, 2.0 * PI);
    cr.fill()
}

pub fn render_png(model: &RenderModel, path: &Path) -> Result<(), RenderError> {
    let side = model.layout.size.ceil().max(1.0) as i32;
    let surface = ImageSurface::create(Format::ARgb32, side, side)?;
    {
        let cr = Context::new(&surface)?;
        draw(&cr, model)?;
    }
    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    Ok(())
}
