//! Draws the crosshair onto the overlay window

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    CapStyle, ConnectionExt, CreateGCAux, JoinStyle, LineStyle, Segment,
};

use super::display::DisplayConnection;
use super::surface::OverlaySurface;
use crate::crosshair::{CrosshairSpec, LineSegment, ScreenGeometry};

pub struct Renderer {
    spec: CrosshairSpec,
    /// Colormap pixel, allocated on first paint
    pixel: Option<u32>,
}

fn to_x11_segment(line: &LineSegment) -> Result<Segment> {
    Ok(Segment {
        x1: i16::try_from(line.x1).context("Line x1 out of range")?,
        y1: i16::try_from(line.y1).context("Line y1 out of range")?,
        x2: i16::try_from(line.x2).context("Line x2 out of range")?,
        y2: i16::try_from(line.y2).context("Line y2 out of range")?,
    })
}

impl Renderer {
    pub fn new(spec: CrosshairSpec) -> Self {
        Self { spec, pixel: None }
    }

    fn color_pixel(&mut self, display: &DisplayConnection) -> Result<u32> {
        if let Some(pixel) = self.pixel {
            return Ok(pixel);
        }

        let reply = display
            .conn()
            .alloc_named_color(display.screen().default_colormap, self.spec.color.as_bytes())
            .context("Failed to send AllocNamedColor")?
            .reply()
            .with_context(|| format!("Failed to allocate color '{}'", self.spec.color))?;

        log::debug!("Allocated '{}' as pixel 0x{:06x}", self.spec.color, reply.pixel);
        self.pixel = Some(reply.pixel);
        Ok(reply.pixel)
    }

    /// Draw both lines and flush. Repeated calls give the same picture.
    pub fn paint(
        &mut self,
        display: &DisplayConnection,
        surface: &OverlaySurface,
        geometry: ScreenGeometry,
    ) -> Result<()> {
        let pixel = self.color_pixel(display)?;
        let conn = display.conn();

        let segments = self
            .spec
            .segments(geometry)
            .iter()
            .map(to_x11_segment)
            .collect::<Result<Vec<_>>>()?;

        let gc = conn.generate_id().context("Failed to allocate GC id")?;
        conn.create_gc(
            gc,
            surface.window(),
            &CreateGCAux::new()
                .foreground(pixel)
                .line_width(self.spec.line_width)
                .line_style(LineStyle::SOLID)
                .cap_style(CapStyle::ROUND)
                .join_style(JoinStyle::ROUND),
        )
        .context("Failed to create crosshair GC")?;

        conn.poly_segment(surface.window(), gc, &segments)
            .context("Failed to draw crosshair")?;
        conn.free_gc(gc).context("Failed to free crosshair GC")?;
        conn.flush().context("Failed to flush X11 connection")?;

        log::trace!("Painted crosshair");
        Ok(())
    }
}
