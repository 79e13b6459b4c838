// Avatar frame lookup and on-screen placement
use glam::{Affine2, Vec2};
use protocol::{AvatarDescriptor, Facing};

/// Which frame sequence a facing draws from, and whether it is flipped.
/// West has no art of its own: it is the east sequence mirrored.
#[inline]
pub const fn frame_source(facing: Facing) -> (Facing, bool) {
    match facing {
        Facing::West => (Facing::East, true),
        other => (other, false),
    }
}

/// URI of the frame to draw, or `None` if the avatar lacks that direction
/// or frame.
pub fn select_frame(avatar: &AvatarDescriptor, facing: Facing, frame: usize) -> Option<&str> {
    let (source, _) = frame_source(facing);
    avatar
        .frames_for(source)?
        .get(frame)
        .map(String::as_str)
}

/// Where and how a sprite lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePlacement {
    pub center: Vec2,
    pub size: Vec2,
    pub mirrored: bool,
}

impl SpritePlacement {
    /// Width is fixed to `avatar_size`, height keeps the image aspect ratio.
    /// Returns `None` for images without dimensions (not decoded yet).
    pub fn new(center: Vec2, avatar_size: f32, image_size: Vec2, mirrored: bool) -> Option<Self> {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            return None;
        }
        let aspect = image_size.x / image_size.y;
        Some(Self {
            center,
            size: Vec2::new(avatar_size, avatar_size / aspect),
            mirrored,
        })
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    /// Maps sprite-local draw space (origin at the image's top-left corner,
    /// extent `size`) to screen space. Mirroring flips about the vertical
    /// line through `center`.
    pub fn transform(&self) -> Affine2 {
        if self.mirrored {
            Affine2::from_translation(self.center)
                * Affine2::from_scale(Vec2::new(-1.0, 1.0))
                * Affine2::from_translation(-self.size / 2.0)
        } else {
            Affine2::from_translation(self.top_left())
        }
    }
}

/// Baseline point for a name label: centered, above the avatar.
#[inline]
pub fn label_anchor(center: Vec2, avatar_size: f32, gap: f32) -> Vec2 {
    center - Vec2::new(0.0, avatar_size / 2.0 + gap)
}
