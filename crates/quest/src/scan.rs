//! Scan dispatch and on-screen alignment.
//!
//! Camera capture and QR decoding happen outside this crate; they hand over
//! a decoded string plus the detected code's corners. The alignment check
//! decides whether a detection sits inside the on-screen target box, so only
//! deliberately aimed codes are accepted.

/// What the next decoded scan is interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// A setup code defining the form fields.
    #[default]
    Setup,
    /// A field-data code filling empty fields of the current entry.
    FieldData,
}

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }
}

/// Corners of a detected QR code, in the video's intrinsic pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QrLocation {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl QrLocation {
    pub fn center(&self) -> Point {
        Point::new(
            (self.top_left.x + self.bottom_right.x) / 2.0,
            (self.top_left.y + self.bottom_right.y) / 2.0,
        )
    }
}

/// Size of the video stream and where it is displayed on screen.
///
/// The stream fills its display box preserving aspect ratio and cropping
/// the overflow (cover fit), centered on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoGeometry {
    pub intrinsic_width: f64,
    pub intrinsic_height: f64,
    pub display: Rect,
}

/// Returns true if the code's centre falls inside the on-screen target box.
///
/// `target` is in the same screen coordinates as `video.display`.
pub fn is_in_target_area(location: &QrLocation, video: &VideoGeometry, target: &Rect) -> bool {
    let (iw, ih) = (video.intrinsic_width, video.intrinsic_height);
    let (dw, dh) = (video.display.width, video.display.height);
    if iw <= 0.0 || ih <= 0.0 || dw <= 0.0 || dh <= 0.0 {
        return false;
    }

    let (scale, offset_x, offset_y) = if iw / ih > dw / dh {
        let scale = dh / ih;
        (scale, (dw - iw * scale) / 2.0, 0.0)
    } else {
        let scale = dw / iw;
        (scale, 0.0, (dh - ih * scale) / 2.0)
    };

    let target_intrinsic = Rect::new(
        (target.left - video.display.left - offset_x) / scale,
        (target.top - video.display.top - offset_y) / scale,
        target.width / scale,
        target.height / scale,
    );
    target_intrinsic.contains(location.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr(x0: f64, y0: f64, x1: f64, y1: f64) -> QrLocation {
        QrLocation {
            top_left: Point::new(x0, y0),
            bottom_right: Point::new(x1, y1),
        }
    }

    #[test]
    fn test_same_aspect_ratio() {
        let video = VideoGeometry {
            intrinsic_width: 1920.0,
            intrinsic_height: 1080.0,
            display: Rect::new(0.0, 0.0, 960.0, 540.0),
        };
        let target = Rect::new(330.0, 120.0, 300.0, 300.0);
        assert!(is_in_target_area(&qr(700.0, 300.0, 1200.0, 800.0), &video, &target));
        assert!(!is_in_target_area(&qr(0.0, 0.0, 100.0, 100.0), &video, &target));
    }

    #[test]
    fn test_cover_crop_offsets() {
        // Wide stream in a square box: sides are cropped.
        let video = VideoGeometry {
            intrinsic_width: 1280.0,
            intrinsic_height: 720.0,
            display: Rect::new(20.0, 50.0, 400.0, 400.0),
        };
        let target = Rect::new(120.0, 150.0, 200.0, 200.0);
        // Target maps to roughly x 460..820, y 180..540 in stream pixels.
        assert!(is_in_target_area(&qr(600.0, 320.0, 680.0, 400.0), &video, &target));
        assert!(!is_in_target_area(&qr(260.0, 320.0, 340.0, 400.0), &video, &target));
    }

    #[test]
    fn test_tall_stream() {
        let video = VideoGeometry {
            intrinsic_width: 720.0,
            intrinsic_height: 1280.0,
            display: Rect::new(0.0, 0.0, 400.0, 400.0),
        };
        let target = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert!(is_in_target_area(&qr(300.0, 600.0, 420.0, 680.0), &video, &target));
        assert!(!is_in_target_area(&qr(300.0, 100.0, 420.0, 200.0), &video, &target));
    }

    #[test]
    fn test_zero_sized_video() {
        let video = VideoGeometry::default();
        let target = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!is_in_target_area(&qr(0.0, 0.0, 1.0, 1.0), &video, &target));
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(ScanMode::default(), ScanMode::Setup);
    }
}
