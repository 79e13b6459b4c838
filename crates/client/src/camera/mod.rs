// Camera system - viewport offset over a fixed-size world
//
// The camera is the top-left corner of the visible world rectangle. It is
// recomputed from scratch on every draw:
//   offset = focus - viewport / 2, clamped per axis to [0, max(0, world - viewport)]
// Without a focus (local player not known yet) it sits at the world origin.
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    /// Center the viewport on `focus`, keeping it inside the world.
    pub fn follow(focus: Option<Vec2>, viewport: Vec2, world: Vec2) -> Self {
        let offset = match focus {
            Some(focus) => {
                let desired = focus - viewport / 2.0;
                let high = (world - viewport).max(Vec2::ZERO);
                Vec2::new(
                    clamp_axis(desired.x, high.x),
                    clamp_axis(desired.y, high.y),
                )
            }
            None => Vec2::ZERO,
        };
        Self { offset, viewport }
    }

    #[inline]
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.offset
    }

    #[inline]
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos + self.offset
    }

    /// True when a screen position lies inside the viewport grown by `margin`
    /// on every side.
    #[inline]
    pub fn is_visible(&self, screen_pos: Vec2, margin: f32) -> bool {
        screen_pos.x >= -margin
            && screen_pos.y >= -margin
            && screen_pos.x <= self.viewport.x + margin
            && screen_pos.y <= self.viewport.y + margin
    }
}

/// `high` is already non-negative, so the range is never inverted.
#[inline]
fn clamp_axis(value: f32, high: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, high)
}
