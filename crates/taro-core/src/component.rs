use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// An embeddable widget: a [`Model`](crate::Model) that draws into a
/// caller-chosen area.
///
/// The parent decides *where* a component renders by passing a sub-region of
/// the frame to [`view`](Component::view); everything else mirrors the model
/// cycle. Every widget in `taro-widgets` implements this trait.
///
/// # Embedding a component
///
/// Give the child a variant in the parent's message enum and lift its
/// commands with [`Command::map`]:
///
/// ```rust,ignore
/// use taro_core::{Model, Component, Command};
/// use ratatui::Frame;
/// use ratatui::layout::{Layout, Direction, Constraint, Rect};
///
/// // -- child component ---------------------------------------------------
///
/// struct RatingPicker { stars: u8 }
///
/// #[derive(Debug)]
/// enum RatingMsg { Up, Down }
///
/// impl Component for RatingPicker {
///     type Message = RatingMsg;
///
///     fn update(&mut self, msg: RatingMsg) -> Command<RatingMsg> {
///         match msg {
///             RatingMsg::Up   => self.stars = (self.stars + 1).min(5),
///             RatingMsg::Down => self.stars = self.stars.saturating_sub(1),
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame, area: Rect) {
///         // ... render into `area` ...
///     }
/// }
///
/// // -- parent model ------------------------------------------------------
///
/// struct ReviewForm { rating: RatingPicker }
///
/// #[derive(Debug)]
/// enum AppMsg { Rating(RatingMsg) }
///
/// impl Model for ReviewForm {
///     type Message = AppMsg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<AppMsg>) {
///         (ReviewForm { rating: RatingPicker { stars: 0 } }, Command::none())
///     }
///
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::Rating(m) => self.rating.update(m).map(AppMsg::Rating),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         let chunks = Layout::default()
///             .direction(Direction::Vertical)
///             .constraints([Constraint::Length(3), Constraint::Min(0)])
///             .split(frame.area());
///         self.rating.view(frame, chunks[0]);
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's own message type, wrapped by the parent in one of its
    /// variants for routing.
    type Message: Send + 'static;

    /// Fold one message into the component's state.
    ///
    /// The returned command uses the component's message type; the parent
    /// lifts it with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw into `area`.
    ///
    /// Rendering should stay inside the given rectangle, with one exception:
    /// floating overlays. An open combobox panel deliberately draws over
    /// whatever sits below its trigger.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// The event sources this component needs given its current state.
    ///
    /// Parents collect these, lift them with [`Subscription::map`], and
    /// include them in their own
    /// [`Model::subscriptions`](crate::Model::subscriptions) return value.
    /// A component that declares a listener only while some state holds gets
    /// it deregistered automatically when the state ends.
    ///
    /// Defaults to no subscriptions.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has keyboard focus.
    ///
    /// A routing hint: parents can query it to decide which child receives
    /// key events. Defaults to `false`.
    fn focused(&self) -> bool {
        false
    }
}
