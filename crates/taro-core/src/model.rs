use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The application root of a taro program.
///
/// A `Model` owns all state. The runtime builds it once with
/// [`init`](Model::init), then loops: draw the state with
/// [`view`](Model::view), wait for a message from the declared
/// [`Subscription`]s, fold it in with [`update`](Model::update), execute
/// whatever [`Command`] that returned, and reconcile subscriptions against
/// the new state. The loop ends when an update returns [`Command::quit`].
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::{Model, Command, Component};
/// use taro_widgets::{Choice, Combobox};
/// use ratatui::Frame;
///
/// struct SignupForm {
///     country: Combobox,
/// }
///
/// #[derive(Debug)]
/// enum Msg {
///     Country(taro_widgets::combobox::Message),
/// }
///
/// impl Model for SignupForm {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_flags: ()) -> (Self, Command<Msg>) {
///         let country = Combobox::new(vec![
///             Choice::new("br", "Brasil"),
///             Choice::new("pt", "Portugal"),
///         ]);
///         (SignupForm { country }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Country(m) => self.country.update(m).map(Msg::Country),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.country.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// The message type every state change is expressed as.
    ///
    /// Subscriptions, [`Command::message`], and completed async work from
    /// [`Command::perform`] all deliver values of this type to `update`.
    type Message: Send + 'static;

    /// Startup data for [`init`](Model::init).
    ///
    /// `()` when the program needs nothing; otherwise a struct carrying
    /// whatever configuration the host passes to
    /// [`Program`](crate::runtime::Program).
    type Flags: Send + 'static;

    /// Build the initial state.
    ///
    /// Runs once. The returned [`Command`] covers startup side effects, such
    /// as loading previously saved form values; return [`Command::none`]
    /// when there are none.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Fold one message into the state.
    ///
    /// The only place state changes. Match on the message, mutate `self`,
    /// and describe any follow-up side effects in the returned [`Command`].
    /// The runtime redraws and reconciles subscriptions after every call.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw the current state.
    ///
    /// Called after every update and once at startup. Should read `&self`
    /// and render; anything that needs to change state belongs in `update`.
    fn view(&self, frame: &mut Frame);

    /// The event sources that should be live given the current state.
    ///
    /// Called after every update. The runtime starts newly declared
    /// subscriptions and aborts ones that disappeared, so conditioning an
    /// entry on state is all it takes to scope a listener: a combobox
    /// declares its global pointer listener only while its panel is open,
    /// and closing the panel deregisters it in the same turn.
    ///
    /// Defaults to no subscriptions.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
