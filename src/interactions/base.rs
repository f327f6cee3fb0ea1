use crate::{
    core::viewport::Viewport,
    input::events::{EventHandled, InputEvent},
    rendering::context::RenderContext,
    Result,
};

/// Identity of an interaction registered on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionId(pub(crate) u64);

/// A user-input behaviour attached to a map (panning, zooming, drawing).
///
/// The map offers each input to its interactions, most recently added
/// first, until one reports [`EventHandled::Handled`].
pub trait InteractionTrait: Send + Sync {
    fn name(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn handle_input(&mut self, input: &InputEvent, viewport: &mut Viewport) -> EventHandled;

    /// Queue any transient graphics (e.g. an in-progress sketch)
    fn render(&mut self, _context: &mut RenderContext, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Called when the interaction is detached from its map
    fn on_remove(&mut self) {}

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
