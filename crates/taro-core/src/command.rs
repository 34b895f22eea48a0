use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// A side effect requested by an update.
///
/// [`Model::update`](crate::Model::update) and [`Model::init`](crate::Model::init)
/// return a `Command` describing what the runtime should do once the state
/// mutation is done: feed a follow-up message back into the loop, await an
/// async task, adjust the terminal, or quit. The command itself is inert
/// data; nothing happens until the runtime executes it.
///
/// Widget code mostly touches three constructors:
///
/// ```rust,ignore
/// Command::none()                          // nothing to report
/// Command::message(Msg::Changed(value))    // notify the host this turn
/// Command::batch([notify_host, announce])  // several notifications at once
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) effect: Effect<Msg>,
}

/// What a [`Command`] asks the runtime to do.
pub(crate) enum Effect<Msg: Send + 'static> {
    /// Nothing.
    Idle,
    /// Feed a message back into the update loop.
    Emit(Msg),
    /// Stop the program.
    Quit,
    /// Await a future, then feed its output message back.
    Task(BoxFuture<'static, Msg>),
    /// Several effects, handled in submission order within one turn.
    Many(Vec<Command<Msg>>),
    /// A terminal state change.
    Screen(TerminalCommand),
}

/// Terminal state changes a model can request at runtime.
///
/// Startup configuration (alternate screen, bracketed paste, window title)
/// lives in [`ProgramOptions`](crate::runtime::ProgramOptions); these cover
/// the few toggles a form host flips mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Switch to the alternate screen buffer.
    EnterAltScreen,
    /// Return to the primary screen buffer.
    ExitAltScreen,
    /// Start mouse event capture.
    CaptureMouse(MouseMode),
    /// Stop mouse event capture.
    ReleaseMouse,
    /// Make the terminal cursor visible.
    ShowCursor,
    /// Hide the terminal cursor.
    HideCursor,
}

/// How much mouse traffic to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    /// Presses, releases, wheel, and drag.
    CellMotion,
    /// Everything above plus plain hover motion, which option lists need
    /// for pointer-driven highlighting.
    AllMotion,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// The command that does nothing.
    pub fn none() -> Self {
        Self { effect: Effect::Idle }
    }

    /// Deliver `msg` back to `update` in the same turn.
    pub fn message(msg: Msg) -> Self {
        Self {
            effect: Effect::Emit(msg),
        }
    }

    /// Stop the program after this turn.
    pub fn quit() -> Self {
        Self { effect: Effect::Quit }
    }

    /// Run `future` on the runtime and deliver `map(output)` when it
    /// resolves. Suits one-shot async work such as loading saved form
    /// values at startup.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            effect: Effect::Task(Box::pin(async move { map(future.await) })),
        }
    }

    /// Bundle several commands into one.
    ///
    /// An empty bundle collapses to [`Command::none`] and a single-element
    /// bundle collapses to that element, so callers can build the list
    /// unconditionally and still hand the runtime the simplest shape.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap(),
            _ => Self {
                effect: Effect::Many(cmds),
            },
        }
    }

    /// Request a terminal state change.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Self {
            effect: Effect::Screen(cmd),
        }
    }

    /// Switch to the alternate screen buffer.
    pub fn enter_alt_screen() -> Self {
        Command::terminal(TerminalCommand::EnterAltScreen)
    }

    /// Return to the primary screen buffer.
    pub fn exit_alt_screen() -> Self {
        Command::terminal(TerminalCommand::ExitAltScreen)
    }

    /// Start mouse capture in the given mode.
    pub fn capture_mouse(mode: MouseMode) -> Self {
        Command::terminal(TerminalCommand::CaptureMouse(mode))
    }

    /// Stop mouse capture.
    pub fn release_mouse() -> Self {
        Command::terminal(TerminalCommand::ReleaseMouse)
    }

    /// Make the terminal cursor visible.
    pub fn show_cursor() -> Self {
        Command::terminal(TerminalCommand::ShowCursor)
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor() -> Self {
        Command::terminal(TerminalCommand::HideCursor)
    }

    /// Lift this command into a parent message type.
    ///
    /// Parents embedding a [`Component`](crate::Component) call this on every
    /// command the child returns, wrapping child messages in the parent's
    /// own variant.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        let effect = match self.effect {
            Effect::Idle => Effect::Idle,
            Effect::Emit(msg) => Effect::Emit(f(msg)),
            Effect::Quit => Effect::Quit,
            Effect::Task(fut) => Effect::Task(Box::pin(async move { f(fut.await) })),
            Effect::Many(cmds) => Effect::Many(
                cmds.into_iter()
                    .map(|cmd| cmd.map_shared(f.clone()))
                    .collect(),
            ),
            Effect::Screen(cmd) => Effect::Screen(cmd),
        };
        Command { effect }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.effect, Effect::Idle)
    }

    /// The message, if this command is a plain [`Command::message`].
    pub fn into_message(self) -> Option<Msg> {
        match self.effect {
            Effect::Emit(msg) => Some(msg),
            _ => None,
        }
    }

    /// The inner commands, if this command is a multi-element batch.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.effect {
            Effect::Many(cmds) => Some(cmds),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum FieldMsg {
        Changed(String),
        Cleared,
    }

    #[derive(Debug, PartialEq)]
    enum FormMsg {
        Name(FieldMsg),
    }

    #[test]
    fn none_does_nothing() {
        let cmd: Command<FieldMsg> = Command::none();
        assert!(cmd.is_none());
        assert!(cmd.into_message().is_none());
    }

    #[test]
    fn message_round_trips() {
        let cmd = Command::message(FieldMsg::Cleared);
        assert_eq!(cmd.into_message(), Some(FieldMsg::Cleared));
    }

    #[test]
    fn empty_batch_collapses_to_none() {
        let cmd: Command<FieldMsg> = Command::batch([]);
        assert!(cmd.is_none());
    }

    #[test]
    fn batch_of_one_collapses_to_the_element() {
        let cmd = Command::batch([Command::message(FieldMsg::Cleared)]);
        // A widget asserting on its notification sees the message directly,
        // not a one-element wrapper.
        assert_eq!(cmd.into_message(), Some(FieldMsg::Cleared));
    }

    #[test]
    fn batch_keeps_submission_order() {
        let cmd = Command::batch([
            Command::message(FieldMsg::Changed("a".into())),
            Command::message(FieldMsg::Cleared),
        ]);
        let msgs: Vec<_> = cmd
            .into_batch()
            .unwrap()
            .into_iter()
            .map(|c| c.into_message().unwrap())
            .collect();
        assert_eq!(msgs, [FieldMsg::Changed("a".into()), FieldMsg::Cleared]);
    }

    #[test]
    fn map_wraps_child_messages() {
        let child = Command::message(FieldMsg::Changed("ana".into()));
        let parent: Command<FormMsg> = child.map(FormMsg::Name);
        assert_eq!(
            parent.into_message(),
            Some(FormMsg::Name(FieldMsg::Changed("ana".into())))
        );
    }

    #[test]
    fn map_reaches_into_batches() {
        let child = Command::batch([
            Command::message(FieldMsg::Cleared),
            Command::message(FieldMsg::Changed("x".into())),
        ]);
        let parent: Command<FormMsg> = child.map(FormMsg::Name);
        let inner = parent.into_batch().unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(
            inner.into_iter().next().unwrap().into_message(),
            Some(FormMsg::Name(FieldMsg::Cleared))
        );
    }

    #[test]
    fn map_preserves_quit_and_terminal_requests() {
        let quit: Command<FormMsg> = Command::<FieldMsg>::quit().map(FormMsg::Name);
        assert!(matches!(quit.effect, Effect::Quit));

        let screen: Command<FormMsg> = Command::<FieldMsg>::hide_cursor().map(FormMsg::Name);
        assert!(matches!(
            screen.effect,
            Effect::Screen(TerminalCommand::HideCursor)
        ));
    }

    #[test]
    fn mouse_capture_carries_its_mode() {
        let cmd: Command<FieldMsg> = Command::capture_mouse(MouseMode::AllMotion);
        assert!(matches!(
            cmd.effect,
            Effect::Screen(TerminalCommand::CaptureMouse(MouseMode::AllMotion))
        ));
    }
}
