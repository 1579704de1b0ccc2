use ratatui::Frame;
use ratatui::layout::Rect;

/// A widget embedded in a screen.
///
/// Components hold their own props and state as struct fields and draw into
/// whatever `Rect` the owning screen's layout gives them.
///
/// `render` takes `&mut self` so a component can update presentation state
/// during the draw (the text area re-clamps its scroll offset to the cursor,
/// for example).
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to key input forwarded by its screen.
///
/// The screen decides which events reach the component. The component returns
/// a higher-level event when the input meant something to it, `None` when it
/// was ignored.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
