use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

/// Input events produced by the runtime's event loop.
///
/// `UiEvent` is delivered to your application through the
/// [`input_events`](crate::subscriptions::input_events) subscription.  You
/// provide a mapping function that converts each `UiEvent` into your
/// application's `Message` type.
///
/// Each variant wraps the corresponding [`crossterm::event::Event`] payload,
/// so you can pattern-match on key codes, modifiers, mouse buttons, and so on
/// using the full crossterm API.
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::{subscriptions::input_events, UiEvent, Subscription};
///
/// fn subscriptions() -> Vec<Subscription<Msg>> {
///     vec![input_events(|ev| match ev {
///         UiEvent::Key(k) => Msg::Key(k),
///         _ => Msg::Noop,
///     })]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl UiEvent {
    /// The cell position of a mouse event, if this is one.
    pub fn pointer_position(&self) -> Option<Position> {
        match self {
            UiEvent::Mouse(m) => Some(Position::new(m.column, m.row)),
            _ => None,
        }
    }

    /// True if this is a primary-button press.  Widgets with floating panels
    /// use this for outside-press dismissal.
    pub fn is_pointer_down(&self) -> bool {
        matches!(
            self,
            UiEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                ..
            })
        )
    }

    /// True if this is a primary-button press outside `area`.
    pub fn is_pointer_down_outside(&self, area: Rect) -> bool {
        match self.pointer_position() {
            Some(pos) if self.is_pointer_down() => !area.contains(pos),
            _ => false,
        }
    }

    /// True for events that invalidate cached overlay geometry: a resize, or
    /// scroll-wheel motion anywhere on screen.
    pub fn is_viewport_change(&self) -> bool {
        matches!(
            self,
            UiEvent::Resize(..)
                | UiEvent::Mouse(MouseEvent {
                    kind: MouseEventKind::ScrollUp | MouseEventKind::ScrollDown,
                    ..
                })
        )
    }
}

impl From<crossterm::event::Event> for UiEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(k) => UiEvent::Key(k),
            crossterm::event::Event::Mouse(m) => UiEvent::Mouse(m),
            crossterm::event::Event::Resize(w, h) => UiEvent::Resize(w, h),
            crossterm::event::Event::FocusGained => UiEvent::FocusGained,
            crossterm::event::Event::FocusLost => UiEvent::FocusLost,
            crossterm::event::Event::Paste(s) => UiEvent::Paste(s),
        }
    }
}
