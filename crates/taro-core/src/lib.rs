//! Runtime for the **taro** form toolkit.
//!
//! A taro program is an [Elm Architecture] loop: state lives in a [`Model`],
//! every outside event becomes a message, [`Model::update`] is the only place
//! state changes, and side effects leave through [`Command`]s and
//! [`Subscription`]s instead of happening inline.
//!
//! What each piece does:
//!
//! * [`Model`] is the application root: `init` builds the starting state,
//!   `update` folds messages into it, `view` draws it to a [`ratatui::Frame`].
//! * [`Component`] is the same shape for embeddable widgets, rendering into a
//!   caller-chosen area instead of the whole frame.
//! * [`Command`] carries requested side effects out of an update turn.
//! * [`Subscription`] declares the event sources that should be live given
//!   the current state. After every update the runtime diffs the declared set
//!   against the running one, which is how widgets get listeners scoped to a
//!   state: an open combobox panel declares its outside-click listener, a
//!   closed one does not, and the reconcile pass handles the rest.
//! * [`Program`] wires a model to the real terminal;
//!   [`TestProgram`](testing::TestProgram) drives the same cycle headlessly
//!   in unit tests.
//!
//! A minimal model:
//!
//! ```ignore
//! use taro_core::{Model, Command};
//! use ratatui::Frame;
//! use ratatui::widgets::Paragraph;
//!
//! struct Survey { answered: u32 }
//!
//! enum Msg { Answered }
//!
//! impl Model for Survey {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_flags: ()) -> (Self, Command<Msg>) {
//!         (Survey { answered: 0 }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Answered => self.answered += 1,
//!         }
//!         Command::none()
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         let line = format!("{} respostas", self.answered);
//!         frame.render_widget(Paragraph::new(line), frame.area());
//!     }
//! }
//! ```
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, MouseMode, TerminalCommand};
pub use component::Component;
pub use event::UiEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{input_events, input_events_scoped, After, Every};

/// Run a taro application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
