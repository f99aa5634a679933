//! Linux X11 support module
//!
//! Display connection, the shaped overlay window, crosshair rendering and
//! the global hotkey grab, plus the glue that runs them under the event loop.

pub mod display;
pub mod hotkey;
pub mod renderer;
pub mod surface;

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::Event;

use crate::cli::Cli;
use crate::crosshair::{CrosshairSpec, ScreenGeometry};
use crate::event_loop::{EventLoop, EventSource, OverlayEvent, POLL_INTERVAL};
use crate::hotkey::{KeyCombo, KeyStroke, Keymap};
use crate::mask::build_mask;
use crate::shutdown::ShutdownFlag;

pub use display::DisplayConnection;
pub use renderer::Renderer;
pub use surface::OverlaySurface;

/// Feeds X11 events into the event loop
pub struct X11EventSource<'a> {
    display: &'a DisplayConnection,
    surface: &'a OverlaySurface,
    renderer: &'a mut Renderer,
    keymap: &'a Keymap,
    geometry: ScreenGeometry,
}

/// Reduce an X11 event to what the event loop dispatches on.
pub fn translate(keymap: &Keymap, event: Event) -> OverlayEvent {
    match event {
        Event::Expose(_) => OverlayEvent::Expose,
        Event::KeyPress(key) => OverlayEvent::KeyPress(KeyStroke {
            modifiers: u16::from(key.state),
            keysym: keymap.keysym(key.detail),
        }),
        Event::Error(e) => {
            log::warn!("X11 error: {:?}", e);
            OverlayEvent::Other
        }
        _ => OverlayEvent::Other,
    }
}

impl EventSource for X11EventSource<'_> {
    fn poll_event(&mut self) -> Result<Option<OverlayEvent>> {
        let event = self
            .display
            .conn()
            .poll_for_event()
            .context("Lost connection to X11 display")?;
        Ok(event.map(|e| translate(self.keymap, e)))
    }

    fn repaint(&mut self) -> Result<()> {
        self.renderer.paint(self.display, self.surface, self.geometry)
    }
}

/// Bring the overlay up, run until shutdown is requested, tear down.
pub fn run(cli: &Cli) -> Result<()> {
    let shutdown = ShutdownFlag::new();
    let signal_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        signal_flag.request();
    })
    .context("Failed to set termination handler")?;

    log::info!("Starting crosshair overlay...");

    let display = DisplayConnection::open(cli.display.as_deref())?;
    let geometry = display.geometry();
    let (cx, cy) = geometry.center();
    log::info!("Screen size: {}x{}", geometry.width, geometry.height);
    log::info!("Center: {}x{}", cx, cy);

    let spec = CrosshairSpec::default();
    let mask = build_mask(geometry, spec.line_width);
    log::debug!("Hit mask: {:?} ({} px)", mask.rects(), mask.area());
    debug_assert!(
        geometry.width == 0 || geometry.height == 0 || mask.contains(cx, cy),
        "screen center must lie on the crosshair"
    );

    let surface = OverlaySurface::create(&display, geometry)?;
    surface.apply_mask(&display, &mask)?;
    surface.show(&display)?;

    let mut renderer = Renderer::new(spec);
    renderer.paint(&display, &surface, geometry)?;

    let combo = KeyCombo::quit();
    let keymap = hotkey::load_keymap(&display)?;
    let hotkey_active = hotkey::register_global(&display, &combo, &keymap) > 0;

    if hotkey_active {
        log::info!(
            "Crosshair overlay started. Press {} or Ctrl+C in terminal to exit.",
            combo.describe()
        );
    } else {
        log::info!("Crosshair overlay started. Press Ctrl+C in terminal to exit.");
    }

    let result = {
        let mut source = X11EventSource {
            display: &display,
            surface: &surface,
            renderer: &mut renderer,
            keymap: &keymap,
            geometry,
        };
        let mut event_loop = EventLoop::new(&shutdown, combo, POLL_INTERVAL);
        let result = event_loop.run(&mut source);
        log::debug!("Event loop exited in state {:?}", event_loop.state());
        result
    };

    surface.destroy(&display);
    display.close();

    match &result {
        Ok(()) => log::info!("Crosshair overlay stopped"),
        Err(e) => log::error!("Crosshair overlay stopped: {:#}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{CONTROL_MASK, LOCK_MASK, XK_Q_LOWER, XK_Q_UPPER};
    use x11rb::protocol::xproto::{
        ExposeEvent, KeyButMask, KeyPressEvent, MapNotifyEvent, EXPOSE_EVENT, KEY_PRESS_EVENT,
        MAP_NOTIFY_EVENT,
    };

    const XK_W: u32 = 0x0077;

    /// keycode 24: q/Q, 25: w/W
    fn keymap() -> Keymap {
        Keymap::new(24, 2, vec![XK_Q_LOWER, XK_Q_UPPER, XK_W, 0x57])
    }

    fn key_press(detail: u8, state: KeyButMask) -> Event {
        Event::KeyPress(KeyPressEvent {
            response_type: KEY_PRESS_EVENT,
            detail,
            sequence: 0,
            time: 0,
            root: 1,
            event: 1,
            child: 0,
            root_x: 0,
            root_y: 0,
            event_x: 0,
            event_y: 0,
            state,
            same_screen: true,
        })
    }

    #[test]
    fn test_translate_ctrl_q_with_caps_lock() {
        let translated = translate(&keymap(), key_press(24, KeyButMask::CONTROL | KeyButMask::LOCK));
        assert_eq!(
            translated,
            OverlayEvent::KeyPress(KeyStroke {
                modifiers: CONTROL_MASK | LOCK_MASK,
                keysym: XK_Q_LOWER,
            })
        );
        if let OverlayEvent::KeyPress(stroke) = translated {
            assert!(KeyCombo::quit().matches(&stroke));
        }
    }

    #[test]
    fn test_translate_ctrl_w() {
        let translated = translate(&keymap(), key_press(25, KeyButMask::CONTROL));
        assert_eq!(
            translated,
            OverlayEvent::KeyPress(KeyStroke {
                modifiers: CONTROL_MASK,
                keysym: XK_W,
            })
        );
        if let OverlayEvent::KeyPress(stroke) = translated {
            assert!(!KeyCombo::quit().matches(&stroke));
        }
    }

    #[test]
    fn test_translate_expose() {
        let event = Event::Expose(ExposeEvent {
            response_type: EXPOSE_EVENT,
            sequence: 0,
            window: 1,
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            count: 0,
        });
        assert_eq!(translate(&keymap(), event), OverlayEvent::Expose);
    }

    #[test]
    fn test_translate_unhandled_event() {
        let event = Event::MapNotify(MapNotifyEvent {
            response_type: MAP_NOTIFY_EVENT,
            sequence: 0,
            event: 1,
            window: 1,
            override_redirect: true,
        });
        assert_eq!(translate(&keymap(), event), OverlayEvent::Other);
    }
}
