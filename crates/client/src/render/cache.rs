// Lazily loaded sprite images, keyed by avatar name then frame URI.
// Entries are never evicted.
use std::collections::HashMap;

#[derive(Debug)]
pub enum SpriteSlot<I> {
    Loading(I),
    Ready(I),
    Failed,
}

#[derive(Debug)]
pub struct SpriteCache<I> {
    avatars: HashMap<String, HashMap<String, SpriteSlot<I>>>,
}

impl<I> SpriteCache<I> {
    pub fn new() -> Self {
        Self {
            avatars: HashMap::new(),
        }
    }

    /// Return the decoded image if it is ready. On first sight of a frame,
    /// `load` starts fetching it; `None` from `load` marks the frame failed.
    pub fn get_or_load(&mut self, avatar: &str, uri: &str, load: impl FnOnce() -> Option<I>) -> Option<&I> {
        let frames = self.avatars.entry(avatar.to_string()).or_default();
        let slot = frames.entry(uri.to_string()).or_insert_with(|| match load() {
            Some(image) => SpriteSlot::Loading(image),
            None => SpriteSlot::Failed,
        });
        match &*slot {
            SpriteSlot::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Promote a loading frame. Returns false if it was not loading.
    pub fn mark_ready(&mut self, avatar: &str, uri: &str) -> bool {
        let Some(slot) = self.slot_mut(avatar, uri) else {
            return false;
        };
        match std::mem::replace(slot, SpriteSlot::Failed) {
            SpriteSlot::Loading(image) | SpriteSlot::Ready(image) => {
                *slot = SpriteSlot::Ready(image);
                true
            }
            SpriteSlot::Failed => false,
        }
    }

    /// A failed frame stays failed; it is not requested again.
    pub fn mark_failed(&mut self, avatar: &str, uri: &str) {
        if let Some(slot) = self.slot_mut(avatar, uri) {
            *slot = SpriteSlot::Failed;
        }
    }

    #[cfg(test)]
    fn is_ready(&self, avatar: &str, uri: &str) -> bool {
        matches!(
            self.avatars.get(avatar).and_then(|frames| frames.get(uri)),
            Some(SpriteSlot::Ready(_))
        )
    }

    fn slot_mut(&mut self, avatar: &str, uri: &str) -> Option<&mut SpriteSlot<I>> {
        self.avatars.get_mut(avatar)?.get_mut(uri)
    }
}

impl<I> Default for SpriteCache<I> {
    fn default() -> Self {
        Self::new()
    }
}
