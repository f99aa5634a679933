//! Override-redirect overlay window shaped by a [`HitMask`]

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::shape::{self, ConnectionExt as ShapeExt};
use x11rb::protocol::xproto::{
    AtomEnum, ChangeGCAux, ConfigureWindowAux, ConnectionExt, CreateGCAux, CreateWindowAux, EventMask,
    Pixmap, PropMode, Rectangle, StackMode, Window, WindowClass,
};
use x11rb::wrapper::ConnectionExt as WrapperExt;

use super::display::DisplayConnection;
use crate::crosshair::ScreenGeometry;
use crate::mask::{HitMask, Rect};

const WINDOW_NAME: &[u8] = b"crosshair";
const WINDOW_CLASS: &[u8] = b"crosshair\0crosshair\0";

pub struct OverlaySurface {
    window: Window,
    geometry: ScreenGeometry,
}

/// SHAPE 1.1 added the input region
fn require_input_shape(display: &DisplayConnection) -> Result<()> {
    let version = display
        .conn()
        .shape_query_version()
        .context("SHAPE extension not available")?
        .reply()
        .context("Failed to query SHAPE version")?;

    log::debug!(
        "SHAPE extension {}.{}",
        version.major_version,
        version.minor_version
    );

    if (version.major_version, version.minor_version) < (1, 1) {
        anyhow::bail!(
            "SHAPE {}.{} does not support input regions (need 1.1)",
            version.major_version,
            version.minor_version
        );
    }
    Ok(())
}

fn to_x11_rect(rect: &Rect) -> Result<Rectangle> {
    Ok(Rectangle {
        x: i16::try_from(rect.x).context("Mask rectangle x out of range")?,
        y: i16::try_from(rect.y).context("Mask rectangle y out of range")?,
        width: u16::try_from(rect.width).context("Mask rectangle width out of range")?,
        height: u16::try_from(rect.height).context("Mask rectangle height out of range")?,
    })
}

impl OverlaySurface {
    /// Full-screen, undecorated, initially unmapped window at the origin.
    pub fn create(display: &DisplayConnection, geometry: ScreenGeometry) -> Result<Self> {
        require_input_shape(display)?;

        let conn = display.conn();
        let screen = display.screen();
        let window = conn.generate_id().context("Failed to allocate window id")?;

        let width = u16::try_from(geometry.width).context("Screen width out of range")?;
        let height = u16::try_from(geometry.height).context("Screen height out of range")?;

        let aux = CreateWindowAux::new()
            .override_redirect(1)
            .background_pixel(0)
            .border_pixel(0)
            .event_mask(EventMask::EXPOSURE | EventMask::KEY_PRESS);

        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            0,
            0,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &aux,
        )
        .context("Failed to send CreateWindow")?
        .check()
        .context("Failed to create overlay window")?;

        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            WINDOW_NAME,
        )
        .context("Failed to set WM_NAME")?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            WINDOW_CLASS,
        )
        .context("Failed to set WM_CLASS")?;

        log::debug!("Created overlay window 0x{:x}", window);

        Ok(Self { window, geometry })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Shape both the input and the visible region to the crosshair bars.
    pub fn apply_mask(&self, display: &DisplayConnection, mask: &HitMask) -> Result<()> {
        let bitmap = self.render_bitmap(display, mask)?;

        let shaped = self
            .set_input_region(display, bitmap)
            .and_then(|()| self.set_paint_region(display, bitmap));

        let _ = display.conn().free_pixmap(bitmap);
        shaped
    }

    /// Pointer events outside the mask fall through to the windows below.
    pub fn set_input_region(&self, display: &DisplayConnection, bitmap: Pixmap) -> Result<()> {
        self.set_shape(display, shape::SK::INPUT, bitmap)
            .context("Failed to set input shape")
    }

    /// Nothing outside the mask is drawn.
    pub fn set_paint_region(&self, display: &DisplayConnection, bitmap: Pixmap) -> Result<()> {
        self.set_shape(display, shape::SK::BOUNDING, bitmap)
            .context("Failed to set bounding shape")
    }

    fn set_shape(&self, display: &DisplayConnection, kind: shape::SK, bitmap: Pixmap) -> Result<()> {
        display
            .conn()
            .shape_mask(shape::SO::SET, kind, self.window, 0, 0, bitmap)?
            .check()?;
        Ok(())
    }

    /// Depth-1 pixmap: 0 everywhere, 1 on the bars.
    fn render_bitmap(&self, display: &DisplayConnection, mask: &HitMask) -> Result<Pixmap> {
        let conn = display.conn();
        let width = u16::try_from(self.geometry.width).context("Screen width out of range")?;
        let height = u16::try_from(self.geometry.height).context("Screen height out of range")?;

        let pixmap = conn.generate_id().context("Failed to allocate pixmap id")?;
        conn.create_pixmap(1, pixmap, self.window, width, height)
            .context("Failed to send CreatePixmap")?
            .check()
            .context("Failed to create mask pixmap")?;

        let gc = conn.generate_id().context("Failed to allocate GC id")?;
        conn.create_gc(gc, pixmap, &CreateGCAux::new().foreground(0))
            .context("Failed to create mask GC")?;

        let bars = mask
            .rects()
            .iter()
            .filter(|r| r.area() > 0)
            .map(to_x11_rect)
            .collect::<Result<Vec<_>>>()?;

        conn.poly_fill_rectangle(
            pixmap,
            gc,
            &[Rectangle {
                x: 0,
                y: 0,
                width,
                height,
            }],
        )
        .context("Failed to clear mask")?;
        conn.change_gc(gc, &ChangeGCAux::new().foreground(1))
            .context("Failed to update mask GC")?;
        conn.poly_fill_rectangle(pixmap, gc, &bars)
            .context("Failed to draw mask")?;
        conn.free_gc(gc).context("Failed to free mask GC")?;

        Ok(pixmap)
    }

    /// Map, raise above siblings, and flush.
    pub fn show(&self, display: &DisplayConnection) -> Result<()> {
        let conn = display.conn();
        conn.map_window(self.window)
            .context("Failed to map overlay window")?;
        conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
        )
        .context("Failed to raise overlay window")?;
        conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    /// Best-effort: errors are ignored since we're exiting anyway.
    pub fn destroy(self, display: &DisplayConnection) {
        let conn = display.conn();
        let _ = conn.destroy_window(self.window);
        let _ = conn.flush();
        log::debug!("Destroyed overlay window 0x{:x}", self.window);
    }
}
