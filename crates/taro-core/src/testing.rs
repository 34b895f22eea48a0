use crate::command::{Command, Effect};
use crate::model::Model;
use crate::subscription::SubscriptionId;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

/// A headless harness that drives a [`Model`] without a terminal.
///
/// `TestProgram` runs the same init/update cycle as the real runtime inside a
/// plain `#[test]` function: no TTY, and no tokio runtime unless the model
/// itself spawns one. Messages emitted via [`Command::message`] queue up and
/// are applied with [`flush`](TestProgram::flush); async and terminal effects
/// are ignored, since there is nothing to run or draw them against.
///
/// ```rust,ignore
/// let mut form = TestProgram::<SignupForm>::new(());
/// form.send(Msg::Country(combobox::Message::TriggerKey(enter())));
/// assert!(form.model().country.is_open());
/// assert!(form.render_text(60, 12).contains("Buscar..."));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    queued: Vec<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Initialize the model with `flags`, queueing any messages its init
    /// command emits.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut harness = Self {
            model,
            queued: Vec::new(),
        };
        harness.absorb(init_cmd);
        harness
    }

    /// Run one update turn with `msg`, queueing emitted follow-ups.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.absorb(cmd);
    }

    /// Apply queued follow-up messages until the queue stays empty.
    ///
    /// Covers chains where one update emits a message whose handling emits
    /// another, the way the real runtime would drain them within a turn.
    pub fn flush(&mut self) {
        while !self.queued.is_empty() {
            for msg in std::mem::take(&mut self.queued) {
                let cmd = self.model.update(msg);
                self.absorb(cmd);
            }
        }
    }

    /// The model, for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model, for arranging state before a scenario.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The identities of the subscriptions the model declares right now.
    ///
    /// This is exactly what the runtime would hand its reconcile pass after
    /// the last update, so tests can assert that a state-scoped listener (an
    /// open overlay's pointer subscription, a pending focus timer) appears
    /// and disappears together with the owning state.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    /// Draw the model into a ratatui [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| self.model.view(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Draw the model and return the buffer contents as text, one line per
    /// row. Convenient for `contains` assertions on visible strings.
    pub fn render_text(&self, width: u16, height: u16) -> String {
        let buffer = self.render(width, height);
        let mut text = String::new();
        for y in 0..height {
            if y > 0 {
                text.push('\n');
            }
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
        }
        text
    }

    /// Queue the synchronously-deliverable messages of `cmd`.
    fn absorb(&mut self, cmd: Command<M::Message>) {
        match cmd.effect {
            Effect::Emit(msg) => self.queued.push(msg),
            Effect::Many(cmds) => {
                for cmd in cmds {
                    self.absorb(cmd);
                }
            }
            // Nothing to do headlessly for the rest.
            Effect::Idle | Effect::Quit | Effect::Task(_) | Effect::Screen(_) => {}
        }
    }
}
