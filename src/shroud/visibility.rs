use crate::tiles::{Map, PPos};
use std::sync::mpsc::Receiver;

/// Identity of a visibility source; a different id means a different source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// Something that knows which cells are explored and currently visible
pub trait VisibilitySource {
    fn source_id(&self) -> SourceId;

    fn is_explored(&self, puv: PPos) -> bool;

    fn is_visible(&self, puv: PPos) -> bool;

    /// Start receiving batches of changed cells. Dropping the receiver
    /// ends the subscription.
    fn subscribe(&mut self) -> Receiver<Vec<PPos>>;
}

/// How a layer decides whether a cell is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    /// Nothing is hidden (editor worlds)
    Everywhere,
    /// Everything inside the playable area is visible
    InsideMap,
    /// Ask the bound source whether the cell was ever explored
    Explored,
    /// Ask the bound source whether the cell is visible right now
    Visible,
}

impl VisibilityRule {
    pub fn is_visible(self, map: &Map, source: Option<&dyn VisibilitySource>, puv: PPos) -> bool {
        match (self, source) {
            (VisibilityRule::Everywhere, _) => true,
            (VisibilityRule::Explored, Some(source)) => source.is_explored(puv),
            (VisibilityRule::Visible, Some(source)) => source.is_visible(puv),
            // Source rules without a source degrade to the map bounds
            (VisibilityRule::InsideMap, _)
            | (VisibilityRule::Explored, None)
            | (VisibilityRule::Visible, None) => map.contains(puv),
        }
    }
}
