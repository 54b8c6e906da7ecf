use glam::Vec2;

/// Pointer position in element-local CSS pixels, with the element's size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PointerSample {
    #[inline]
    pub fn from_client(
        client_x: f32,
        client_y: f32,
        rect_left: f32,
        rect_top: f32,
        rect_width: f32,
        rect_height: f32,
    ) -> Self {
        Self {
            x: client_x - rect_left,
            y: client_y - rect_top,
            width: rect_width,
            height: rect_height,
        }
    }

    #[inline]
    pub fn local(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
