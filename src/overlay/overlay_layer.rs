use crate::overlay::{OverlayElement, OverlayKind};

pub type OverlayId = u64;

/// Display surface capability: holds the elements drawn over the video.
pub trait OverlaySurface {
    /// Adds an element on top of everything already displayed.
    fn append(&mut self, element: OverlayElement) -> OverlayId;

    /// Removes an element. Returns false when the id is not displayed.
    fn remove(&mut self, id: OverlayId) -> bool;

    /// Currently displayed elements, bottom to top.
    fn elements(&self) -> Vec<OverlayElement>;
}

/// In-memory surface.
#[derive(Debug, Default, Clone)]
pub struct OverlayLayer {
    next_id: OverlayId,
    children: Vec<(OverlayId, OverlayElement)>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn count(&self, kind: OverlayKind) -> usize {
        self.children.iter().filter(|(_, e)| e.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayElement> {
        self.children.iter().map(|(_, e)| e)
    }
}

impl OverlaySurface for OverlayLayer {
    fn append(&mut self, element: OverlayElement) -> OverlayId {
        let id = self.next_id;
        self.next_id += 1;
        self.children.push((id, element));
        id
    }

    fn remove(&mut self, id: OverlayId) -> bool {
        match self.children.iter().position(|(child, _)| *child == id) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    fn elements(&self) -> Vec<OverlayElement> {
        self.children.iter().map(|(_, e)| e.clone()).collect()
    }
}
