//! Hit/paint region for the overlay window
//!
//! The same [`HitMask`] drives both the input shape (where clicks land on the
//! overlay) and the bounding shape (where the overlay is visible).

use crate::crosshair::ScreenGeometry;

/// Half-open pixel rectangle: covers `x..x+width` and `y..y+height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x - self.x < self.width && y >= self.y && y - self.y < self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 > x1 && y2 > y1 {
            Some(Rect {
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
            })
        } else {
            None
        }
    }
}

/// Union of the vertical and horizontal crosshair bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitMask {
    pub vertical: Rect,
    pub horizontal: Rect,
}

impl HitMask {
    pub fn rects(&self) -> [Rect; 2] {
        [self.vertical, self.horizontal]
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.vertical.contains(x, y) || self.horizontal.contains(x, y)
    }

    /// Covered pixel count, with the overlap counted once.
    pub fn area(&self) -> u64 {
        let overlap = self
            .vertical
            .intersection(&self.horizontal)
            .map(|r| r.area())
            .unwrap_or(0);
        self.vertical.area() + self.horizontal.area() - overlap
    }
}

/// Place a band of `line_width` pixels centered on `center`, clamped to `0..extent`.
fn band(center: u32, line_width: u32, extent: u32) -> (u32, u32) {
    let start = center.saturating_sub(line_width / 2).min(extent);
    let len = line_width.min(extent - start);
    (start, len)
}

pub fn build_mask(geometry: ScreenGeometry, line_width: u32) -> HitMask {
    let (cx, cy) = geometry.center();
    let (x, width) = band(cx, line_width, geometry.width);
    let (y, height) = band(cy, line_width, geometry.height);

    HitMask {
        vertical: Rect {
            x,
            y: 0,
            width,
            height: geometry.height,
        },
        horizontal: Rect {
            x: 0,
            y,
            width: geometry.width,
            height,
        },
    }
}
