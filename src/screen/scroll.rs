/// Top-left corner of the viewport in the endless tile plane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scroll {
    pub x: i32,
    pub y: i32,
}

impl Scroll {
    pub fn new(x: i32, y: i32) -> Self {
        Scroll { x, y }
    }

    /// Move by `delta`. Wraps at the integer range; the map repeats every
    /// `MAP_WIDTH * 8` pixels, which divides 2^32, so the picture is seamless.
    pub fn advance(&mut self, delta: Scroll) {
        self.x = self.x.wrapping_add(delta.x);
        self.y = self.y.wrapping_add(delta.y);
    }
}
