//! Crosshair geometry shared by the mask and the renderer

/// Thickness of both bars, in pixels
pub const LINE_WIDTH: u32 = 2;

/// Color name looked up in the display's colormap
pub const COLOR: &str = "red";

/// Size of the screen the overlay covers. Read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Integer center. Odd sizes truncate toward the origin.
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// A line segment in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosshairSpec {
    pub line_width: u32,
    pub color: &'static str,
}

impl Default for CrosshairSpec {
    fn default() -> Self {
        Self {
            line_width: LINE_WIDTH,
            color: COLOR,
        }
    }
}

impl CrosshairSpec {
    /// The vertical and horizontal lines through the screen center.
    pub fn segments(&self, geometry: ScreenGeometry) -> [LineSegment; 2] {
        let (cx, cy) = geometry.center();
        [
            LineSegment {
                x1: cx,
                y1: 0,
                x2: cx,
                y2: geometry.height,
            },
            LineSegment {
                x1: 0,
                y1: cy,
                x2: geometry.width,
                y2: cy,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_full_hd() {
        let geometry = ScreenGeometry::new(1920, 1080);
        assert_eq!(geometry.center(), (960, 540));
    }

    #[test]
    fn test_center_truncates_odd_sizes() {
        let geometry = ScreenGeometry::new(1921, 1081);
        assert_eq!(geometry.center(), (960, 540));
    }

    #[test]
    fn test_default_spec() {
        let spec = CrosshairSpec::default();
        assert_eq!(spec.line_width, 2);
        assert_eq!(spec.color, "red");
    }

    #[test]
    fn test_segments_span_full_screen() {
        let spec = CrosshairSpec::default();
        let [vertical, horizontal] = spec.segments(ScreenGeometry::new(1920, 1080));

        assert_eq!(
            vertical,
            LineSegment {
                x1: 960,
                y1: 0,
                x2: 960,
                y2: 1080
            }
        );
        assert_eq!(
            horizontal,
            LineSegment {
                x1: 0,
                y1: 540,
                x2: 1920,
                y2: 540
            }
        );
    }

    #[test]
    fn test_segments_are_stable_across_calls() {
        // Repainting must reproduce the exact same strokes
        let spec = CrosshairSpec::default();
        let geometry = ScreenGeometry::new(2560, 1440);
        assert_eq!(spec.segments(geometry), spec.segments(geometry));
    }
}
