use crate::command::{Command, Effect, MouseMode, TerminalCommand};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Where the UI is drawn.
///
/// Forms often print the submitted values to stdout for the next process in a
/// pipe. Render to [`Stderr`](OutputTarget::Stderr) in that setup so the UI
/// stays on the terminal while the data flows through the pipe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Draw to stdout (default).
    #[default]
    Stdout,
    /// Draw to stderr, leaving stdout free for program output.
    Stderr,
}

enum Sink {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Sink {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Sink::Stdout(stdout()),
            OutputTarget::Stderr => Sink::Stderr(stderr()),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(w) => w.write(buf),
            Sink::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(w) => w.flush(),
            Sink::Stderr(w) => w.flush(),
        }
    }
}

/// Errors from terminal setup, rendering, or teardown.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Startup configuration for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     title: Some("Cadastro".into()),
///     output: OutputTarget::Stderr,
///     ..ProgramOptions::default()
/// };
/// ```
pub struct ProgramOptions {
    /// Target frames per second (default 60, clamped to 120).
    pub fps: u32,
    /// Use the alternate screen buffer (default true).
    pub alt_screen: bool,
    /// Mouse capture mode, or `None` for keyboard-only programs. Defaults
    /// to [`MouseMode::AllMotion`] so widgets see clicks and hover without
    /// extra setup.
    pub mouse_mode: Option<MouseMode>,
    /// Enable bracketed paste so pasted text arrives as one event rather
    /// than a burst of key presses (default true).
    pub bracketed_paste: bool,
    /// Terminal window title.
    pub title: Option<String>,
    /// Restore the terminal from a panic hook (default true).
    pub catch_panics: bool,
    /// Exit cleanly on Ctrl-C (default true).
    pub handle_signals: bool,
    /// Where the UI is drawn.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_mode: Some(MouseMode::AllMotion),
            bracketed_paste: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::default(),
        }
    }
}

/// Drives a [`Model`] against a real terminal.
///
/// `Program` owns the message channel, the subscription set, and the ratatui
/// terminal. It loops over incoming messages, runs `update`, executes the
/// returned [`Command`], reconciles subscriptions, and redraws on the next
/// frame tick, until the model quits or Ctrl-C arrives.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let final_state = Program::<SignupForm>::new(())?.run().await?;
///     println!("{}", final_state.submitted_values());
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Sink>>,
    tx: mpsc::UnboundedSender<M::Message>,
    rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quitting: bool,
}

impl<M: Model> Program<M> {
    /// Set up the terminal and initialize the model with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Set up the terminal and initialize the model with the given options.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = claim_terminal(&options)?;
        let subscriptions = SubscriptionManager::new(tx.clone());

        let mut program = Self {
            model,
            terminal,
            tx,
            rx,
            subscriptions,
            options,
            dirty: true,
            quitting: false,
        };

        program.run_effect(init_cmd);
        let declared = program.model.subscriptions();
        program.subscriptions.reconcile(declared);
        Ok(program)
    }

    /// A sender for injecting messages from outside the event loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.tx.clone()
    }

    /// Run until the model quits. Returns the final model state.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        self.event_loop().await?;
        self.subscriptions.shutdown();
        release_terminal(&self.options)?;
        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.draw()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle_signals = self.options.handle_signals;

        while !self.quitting {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    return Ok(());
                }

                Some(msg) = self.rx.recv() => {
                    self.step(msg);
                    // Drain whatever else is already queued so a burst of
                    // input coalesces into one redraw, bounded to keep the
                    // frame tick responsive.
                    let mut drained = 0;
                    while drained < 100 && !self.quitting {
                        match self.rx.try_recv() {
                            Ok(msg) => {
                                self.step(msg);
                                drained += 1;
                            }
                            Err(_) => break,
                        }
                    }
                }

                _ = frames.tick() => {
                    if self.dirty {
                        self.draw()?;
                        self.dirty = false;
                    }
                }
            }
        }
        Ok(())
    }

    /// One update turn: run `update`, execute its command, reconcile
    /// subscriptions against the new state.
    fn step(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.run_effect(cmd);
        let declared = self.model.subscriptions();
        self.subscriptions.reconcile(declared);
        self.dirty = true;
    }

    fn run_effect(&mut self, cmd: Command<M::Message>) {
        match cmd.effect {
            Effect::Idle => {}
            Effect::Emit(msg) => {
                let _ = self.tx.send(msg);
            }
            Effect::Quit => {
                self.quitting = true;
            }
            Effect::Task(fut) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            Effect::Many(cmds) => {
                for cmd in cmds {
                    self.run_effect(cmd);
                }
            }
            Effect::Screen(request) => {
                self.screen_request(request);
            }
        }
    }

    fn screen_request(&mut self, request: TerminalCommand) {
        let mut writer = Sink::new(self.options.output);
        let _ = match request {
            TerminalCommand::EnterAltScreen => execute!(writer, EnterAlternateScreen),
            TerminalCommand::ExitAltScreen => execute!(writer, LeaveAlternateScreen),
            // crossterm exposes a single capture switch; the mode distinction
            // matters to widgets deciding what to subscribe to, not here.
            TerminalCommand::CaptureMouse(_) => execute!(writer, EnableMouseCapture),
            TerminalCommand::ReleaseMouse => execute!(writer, DisableMouseCapture),
            TerminalCommand::ShowCursor => execute!(writer, cursor::Show),
            TerminalCommand::HideCursor => execute!(writer, cursor::Hide),
        };
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| self.model.view(frame))?;
        Ok(())
    }
}

fn claim_terminal(
    options: &ProgramOptions,
) -> Result<Terminal<CrosstermBackend<Sink>>, ProgramError> {
    if options.catch_panics {
        // Install once; stacking a hook per Program would chain them.
        use std::sync::Once;
        static HOOK: Once = Once::new();
        let alt_screen = options.alt_screen;
        let target = options.output;
        HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore(alt_screen, target);
                previous(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Sink::new(options.output);
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.bracketed_paste {
        execute!(writer, EnableBracketedPaste)?;
    }
    if options.mouse_mode.is_some() {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

fn release_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore(options.alt_screen, options.output)?;
    Ok(())
}

fn restore(alt_screen: bool, target: OutputTarget) -> Result<(), io::Error> {
    // Best effort: run every step even when one fails, so a broken teardown
    // still leaves the terminal as usable as possible.
    let raw = disable_raw_mode();
    let mut writer = Sink::new(target);
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}
