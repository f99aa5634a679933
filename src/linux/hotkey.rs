//! Root-window key grab for the quit combination

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, GrabMode, ModMask};

use super::display::DisplayConnection;
use crate::hotkey::{self, KeyCombo, Keymap};

pub fn load_keymap(display: &DisplayConnection) -> Result<Keymap> {
    let setup = display.conn().setup();
    let min = setup.min_keycode;
    let count = setup.max_keycode - min + 1;

    let reply = display
        .conn()
        .get_keyboard_mapping(min, count)
        .context("Failed to send GetKeyboardMapping")?
        .reply()
        .context("Failed to get keyboard mapping")?;

    Ok(Keymap::new(min, reply.keysyms_per_keycode, reply.keysyms))
}

/// Modifier bit NumLock is bound to on this server
fn detect_numlock_mask(display: &DisplayConnection, keymap: &Keymap) -> u16 {
    match display
        .conn()
        .get_modifier_mapping()
        .map_err(anyhow::Error::from)
        .and_then(|cookie| cookie.reply().map_err(anyhow::Error::from))
    {
        Ok(reply) => hotkey::numlock_mask(keymap, &reply.keycodes, reply.keycodes_per_modifier()),
        Err(e) => {
            log::debug!("Modifier mapping unavailable ({}), assuming NumLock is Mod2", e);
            hotkey::MOD2_MASK
        }
    }
}

/// Grab `combo` on the root window so it arrives regardless of focus.
///
/// Returns the number of grabs the server accepted. Zero means the hotkey
/// won't work, but the overlay can still be stopped by a signal.
pub fn register_global(display: &DisplayConnection, combo: &KeyCombo, keymap: &Keymap) -> usize {
    let keycodes = keymap.keycodes_for_combo(combo);
    if keycodes.is_empty() {
        log::warn!("No keycode produces {}, hotkey disabled", combo.describe());
        return 0;
    }

    let numlock = detect_numlock_mask(display, keymap);
    let root = display.screen().root;
    let mut accepted = 0;

    for &keycode in &keycodes {
        for modifiers in hotkey::lock_variants(combo.modifiers, numlock) {
            let grabbed = display
                .conn()
                .grab_key(
                    false,
                    root,
                    ModMask::from(modifiers),
                    keycode,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )
                .map_err(anyhow::Error::from)
                .and_then(|cookie| cookie.check().map_err(anyhow::Error::from));

            match grabbed {
                Ok(()) => accepted += 1,
                Err(e) => log::warn!(
                    "Failed to grab keycode {} with modifiers 0x{:x}: {}",
                    keycode,
                    modifiers,
                    e
                ),
            }
        }
    }

    log::debug!(
        "Registered {} global grab(s) for {} on keycodes {:?}",
        accepted,
        combo.describe(),
        keycodes
    );
    accepted
}
