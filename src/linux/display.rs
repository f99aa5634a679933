//! Linux X11 display connection

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::Screen;
use x11rb::rust_connection::RustConnection;

use crate::crosshair::ScreenGeometry;

pub struct DisplayConnection {
    conn: RustConnection,
    screen_num: usize,
}

impl DisplayConnection {
    /// Connect to `name`, or `$DISPLAY` when `None`.
    pub fn open(name: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(name).with_context(|| {
            format!(
                "Cannot open display {}",
                name.map(str::to_string)
                    .or_else(|| std::env::var("DISPLAY").ok())
                    .unwrap_or_else(|| "(unset)".to_string())
            )
        })?;

        log::debug!("Connected to X11 display, default screen {}", screen_num);

        Ok(Self { conn, screen_num })
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    pub fn geometry(&self) -> ScreenGeometry {
        let screen = self.screen();
        ScreenGeometry::new(
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        )
    }

    /// Release the connection. Anything still queued is flushed first,
    /// failures are ignored.
    pub fn close(self) {
        let _ = self.conn.flush();
        drop(self.conn);
        log::debug!("X11 connection closed");
    }
}
