//! Global hotkey classification
//!
//! Everything here works on plain keycodes, keysyms and modifier bits so it
//! can be exercised with synthetic events. Registering the grab with the X
//! server lives in `linux::hotkey`.

/// Core protocol modifier bits (the `state` field of key events)
pub const SHIFT_MASK: u16 = 1 << 0;
pub const LOCK_MASK: u16 = 1 << 1;
pub const CONTROL_MASK: u16 = 1 << 2;
pub const MOD1_MASK: u16 = 1 << 3;
pub const MOD2_MASK: u16 = 1 << 4;

pub const XK_Q_UPPER: u32 = 0x0051;
pub const XK_Q_LOWER: u32 = 0x0071;
pub const XK_NUM_LOCK: u32 = 0xff7f;
pub const NO_SYMBOL: u32 = 0;

/// A key press reduced to what the classifier needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub modifiers: u16,
    pub keysym: u32,
}

/// Modifier + key combination delivered regardless of focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifiers: u16,
    pub keysyms: Vec<u32>,
}

impl KeyCombo {
    /// Ctrl+Q, either case
    pub fn quit() -> Self {
        Self {
            modifiers: CONTROL_MASK,
            keysyms: vec![XK_Q_LOWER, XK_Q_UPPER],
        }
    }

    /// True when every combo modifier is held and the key is one of ours.
    /// Extra modifiers (Shift, CapsLock, ...) don't prevent a match.
    pub fn matches(&self, stroke: &KeyStroke) -> bool {
        stroke.modifiers & self.modifiers == self.modifiers && self.keysyms.contains(&stroke.keysym)
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers & CONTROL_MASK != 0 {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers & SHIFT_MASK != 0 {
            parts.push("Shift".to_string());
        }
        if self.modifiers & MOD1_MASK != 0 {
            parts.push("Alt".to_string());
        }
        if let Some(&keysym) = self.keysyms.iter().max() {
            match char::from_u32(keysym) {
                Some(c) if c.is_ascii_graphic() => parts.push(c.to_string()),
                _ => parts.push(format!("0x{:x}", keysym)),
            }
        }
        parts.join("+")
    }
}

/// Snapshot of the server's keycode -> keysyms table
#[derive(Debug, Clone)]
pub struct Keymap {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl Keymap {
    pub fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<u32>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    fn row(&self, keycode: u8) -> &[u32] {
        let per = self.keysyms_per_keycode as usize;
        if per == 0 || keycode < self.min_keycode {
            return &[];
        }
        let start = (keycode - self.min_keycode) as usize * per;
        self.keysyms.get(start..start + per).unwrap_or(&[])
    }

    /// Unshifted keysym for a keycode, like `XLookupKeysym(.., 0)`.
    pub fn keysym(&self, keycode: u8) -> u32 {
        self.row(keycode).first().copied().unwrap_or(NO_SYMBOL)
    }

    /// Keycodes whose unshifted keysym is `keysym`.
    ///
    /// Reads the same column as [`Keymap::keysym`], so a grabbed keycode is
    /// always one the classifier can match.
    pub fn keycodes_for(&self, keysym: u32) -> Vec<u8> {
        let per = self.keysyms_per_keycode as usize;
        if per == 0 {
            return Vec::new();
        }
        self.keysyms
            .chunks(per)
            .enumerate()
            .filter(|(_, row)| row.first() == Some(&keysym))
            .filter_map(|(i, _)| u8::try_from(self.min_keycode as usize + i).ok())
            .collect()
    }

    /// Keycodes for any of the combo's keysyms, deduplicated.
    pub fn keycodes_for_combo(&self, combo: &KeyCombo) -> Vec<u8> {
        let mut keycodes: Vec<u8> = combo
            .keysyms
            .iter()
            .flat_map(|&keysym| self.keycodes_for(keysym))
            .collect();
        keycodes.sort_unstable();
        keycodes.dedup();
        keycodes
    }
}

/// Find the modifier bit NumLock is bound to.
///
/// `modifier_keycodes` is the `GetModifierMapping` table: 8 modifiers with
/// `keycodes_per_modifier` entries each. Falls back to Mod2, the usual binding.
pub fn numlock_mask(keymap: &Keymap, modifier_keycodes: &[u8], keycodes_per_modifier: u8) -> u16 {
    let per = keycodes_per_modifier as usize;
    if per == 0 {
        return MOD2_MASK;
    }
    modifier_keycodes
        .chunks(per)
        .take(8)
        .position(|keycodes| {
            keycodes
                .iter()
                .any(|&kc| kc != 0 && keymap.keysym(kc) == XK_NUM_LOCK)
        })
        .map(|index| 1u16 << index)
        .unwrap_or(MOD2_MASK)
}

/// Modifier sets to grab so CapsLock/NumLock state doesn't hide the combo.
pub fn lock_variants(base: u16, numlock: u16) -> [u16; 4] {
    [
        base,
        base | LOCK_MASK,
        base | numlock,
        base | LOCK_MASK | numlock,
    ]
}
