/// Axis-aligned box in frame pixel coordinates, origin top-left.
///
/// Detector backends may report boxes that poke past the frame edge, so
/// coordinates are signed; [`Rect::clamp_to`] produces the visible part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersects with a `frame_width` × `frame_height` frame.
    ///
    /// Returns `None` when nothing of the box is visible.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<Rect> {
        let fw = i32::try_from(frame_width).unwrap_or(i32::MAX);
        let fh = i32::try_from(frame_height).unwrap_or(i32::MAX);
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = self.right().clamp(0, fw);
        let y2 = self.bottom().clamp(0, fh);
        let clamped = Rect::new(x1, y1, x2 - x1, y2 - y1);
        (!clamped.is_empty()).then_some(clamped)
    }

    pub fn is_within(&self, frame_width: u32, frame_height: u32) -> bool {
        !self.is_empty()
            && self.x >= 0
            && self.y >= 0
            && i64::from(self.right()) <= i64::from(frame_width)
            && i64::from(self.bottom()) <= i64::from(frame_height)
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// The faces found by a single detection call.
///
/// The redactor blurs exactly these rectangles and prints `len()` in the
/// overlay, so both always come from the same instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceSet {
    faces: Vec<Rect>,
}

impl FaceSet {
    pub fn new(faces: Vec<Rect>) -> Self {
        Self { faces }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rect> {
        self.faces.iter()
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.faces
    }
}

impl<'a> IntoIterator for &'a FaceSet {
    type Item = &'a Rect;
    type IntoIter = std::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter()
    }
}
