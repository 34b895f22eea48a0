//! Single-line text entry for forms.
//!
//! Backs standalone fields (with optional masking, length limits, and
//! validation) and the search row inside the
//! [`Combobox`](crate::combobox::Combobox) panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use std::collections::VecDeque;
use taro_core::command::Command;
use taro_core::component::Component;
use unicode_width::UnicodeWidthStr;

/// How typed characters are shown.
#[derive(Debug, Clone, Default)]
pub enum EchoMode {
    /// As typed.
    #[default]
    Normal,
    /// Every character as the given mask (password fields).
    Password(char),
    /// Not at all.
    Hidden,
}

/// Style set for the input line.
#[derive(Debug, Clone)]
pub struct TextInputStyle {
    pub prompt: Style,
    pub text: Style,
    pub placeholder: Style,
    pub cursor: Style,
}

impl Default for TextInputStyle {
    fn default() -> Self {
        Self {
            prompt: Style::default().fg(Color::Cyan),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Text input messages.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press to handle (only honored while focused).
    KeyPress(KeyEvent),
    /// Bracketed-paste text to insert at the cursor.
    Paste(String),
    /// Notification: the value changed to the carried string.
    Changed(String),
    /// Notification: Enter was pressed on the carried value.
    Submit(String),
}

/// A value-changing edit derived from a key press.
enum Edit {
    Type(char),
    EraseBack,
    EraseForward,
    EraseWordBack,
    KillToStart,
    KillToEnd,
}

/// A cursor move derived from a key press.
enum Motion {
    Left,
    Right,
    WordLeft,
    WordRight,
    Start,
    End,
}

const HISTORY_CAP: usize = 100;

/// Undo/redo snapshots of (text, cursor).
#[derive(Default)]
struct History {
    undo: VecDeque<(Vec<char>, usize)>,
    redo: VecDeque<(Vec<char>, usize)>,
}

impl History {
    /// Record the pre-edit state. Any new edit invalidates the redo branch.
    fn checkpoint(&mut self, snapshot: (Vec<char>, usize)) {
        self.undo.push_back(snapshot);
        if self.undo.len() > HISTORY_CAP {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    fn undo(&mut self, current: (Vec<char>, usize)) -> Option<(Vec<char>, usize)> {
        let snapshot = self.undo.pop_back()?;
        self.redo.push_back(current);
        Some(snapshot)
    }

    fn redo(&mut self, current: (Vec<char>, usize)) -> Option<(Vec<char>, usize)> {
        let snapshot = self.redo.pop_back()?;
        self.undo.push_back(current);
        Some(snapshot)
    }
}

/// Single-line text input.
///
/// ```ignore
/// let mut email = TextInput::new("seu@email.com")
///     .with_char_limit(80)
///     .with_validate(|v| {
///         if v.contains('@') { Ok(()) } else { Err("email inválido".into()) }
///     });
/// email.focus();
/// ```
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
    scroll: usize,
    focus: bool,
    placeholder: String,
    prompt: String,
    limit: Option<usize>,
    echo: EchoMode,
    style: TextInputStyle,
    #[allow(clippy::type_complexity)]
    validate: Option<Box<dyn Fn(&str) -> Result<(), String> + Send>>,
    error: Option<String>,
    history: History,
    block: Option<Block<'static>>,
}

impl TextInput {
    /// An empty input showing `placeholder` until it has content.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            scroll: 0,
            focus: false,
            placeholder: placeholder.into(),
            prompt: String::new(),
            limit: None,
            echo: EchoMode::default(),
            style: TextInputStyle::default(),
            validate: None,
            error: None,
            history: History::default(),
            block: None,
        }
    }

    /// Show `prompt` before the text (e.g. `"> "`).
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Mask or hide the typed text.
    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.echo = mode;
        self
    }

    /// Cap the value at `limit` characters. Typing and pasting past the cap
    /// is dropped silently.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Replace the default styles.
    pub fn with_style(mut self, style: TextInputStyle) -> Self {
        self.style = style;
        self
    }

    /// Draw inside `block` (border, title). Borderless by default.
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// Validate after every change; `Err(message)` becomes [`TextInput::err`].
    pub fn with_validate(
        mut self,
        f: impl Fn(&str) -> Result<(), String> + Send + 'static,
    ) -> Self {
        self.validate = Some(Box::new(f));
        self
    }

    /// Take keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Give up keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the value, cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.chars = value.chars().collect();
        self.cursor = self.chars.len();
    }

    /// Empty the value and rewind the cursor.
    pub fn reset(&mut self) {
        self.chars.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Cursor position as a character index.
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// The current validation error, if any.
    pub fn err(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Value length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Run an edit with history and change notification.
    fn edit(&mut self, op: Edit) -> Command<Message> {
        let before = (self.chars.clone(), self.cursor);
        if !self.apply(op) {
            return Command::none();
        }
        self.history.checkpoint(before);
        self.revalidate();
        Command::message(Message::Changed(self.value()))
    }

    /// Mutate the value; reports whether anything changed.
    fn apply(&mut self, op: Edit) -> bool {
        match op {
            Edit::Type(c) => {
                if self.limit.is_some_and(|cap| self.chars.len() >= cap) {
                    return false;
                }
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
                true
            }
            Edit::EraseBack => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                true
            }
            Edit::EraseForward => {
                if self.cursor >= self.chars.len() {
                    return false;
                }
                self.chars.remove(self.cursor);
                true
            }
            Edit::EraseWordBack => {
                if self.cursor == 0 {
                    return false;
                }
                while self.cursor > 0 && self.chars[self.cursor - 1] == ' ' {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
                while self.cursor > 0 && self.chars[self.cursor - 1] != ' ' {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
                true
            }
            Edit::KillToStart => {
                if self.cursor == 0 {
                    return false;
                }
                self.chars.drain(..self.cursor);
                self.cursor = 0;
                true
            }
            Edit::KillToEnd => {
                if self.cursor >= self.chars.len() {
                    return false;
                }
                self.chars.truncate(self.cursor);
                true
            }
        }
    }

    fn step(&mut self, motion: Motion) {
        let len = self.chars.len();
        match motion {
            Motion::Left => self.cursor = self.cursor.saturating_sub(1),
            Motion::Right => self.cursor = (self.cursor + 1).min(len),
            Motion::Start => self.cursor = 0,
            Motion::End => self.cursor = len,
            Motion::WordLeft => {
                while self.cursor > 0 && !self.chars[self.cursor - 1].is_alphanumeric() {
                    self.cursor -= 1;
                }
                while self.cursor > 0 && self.chars[self.cursor - 1].is_alphanumeric() {
                    self.cursor -= 1;
                }
            }
            Motion::WordRight => {
                while self.cursor < len && self.chars[self.cursor].is_alphanumeric() {
                    self.cursor += 1;
                }
                while self.cursor < len && !self.chars[self.cursor].is_alphanumeric() {
                    self.cursor += 1;
                }
            }
        }
    }

    fn paste(&mut self, text: &str) -> Command<Message> {
        let room = self
            .limit
            .map(|cap| cap.saturating_sub(self.chars.len()))
            .unwrap_or(usize::MAX);
        let incoming: Vec<char> = text.chars().take(room).collect();
        if incoming.is_empty() {
            return Command::none();
        }
        let before = (self.chars.clone(), self.cursor);
        for (i, c) in incoming.iter().enumerate() {
            self.chars.insert(self.cursor + i, *c);
        }
        self.cursor += incoming.len();
        self.history.checkpoint(before);
        self.revalidate();
        Command::message(Message::Changed(self.value()))
    }

    fn restore(&mut self, snapshot: Option<(Vec<char>, usize)>) {
        if let Some((chars, cursor)) = snapshot {
            self.chars = chars;
            self.cursor = cursor;
            self.revalidate();
        }
    }

    fn revalidate(&mut self) {
        if let Some(ref validate) = self.validate {
            self.error = validate(&self.value()).err();
        }
    }

    fn masked(&self) -> Vec<char> {
        match &self.echo {
            EchoMode::Normal => self.chars.clone(),
            EchoMode::Password(mask) => vec![*mask; self.chars.len()],
            EchoMode::Hidden => Vec::new(),
        }
    }

    /// Lay out prompt, visible text window, and cursor for `width` cells.
    fn compose_line(&self, width: usize) -> Line<'_> {
        let mut spans = Vec::new();
        if !self.prompt.is_empty() {
            spans.push(Span::styled(self.prompt.as_str(), self.style.prompt));
        }

        let shown = self.masked();
        if shown.is_empty() {
            if self.focus {
                spans.push(Span::styled(" ", self.style.cursor));
            } else {
                spans.push(Span::styled(self.placeholder.as_str(), self.style.placeholder));
            }
            return Line::from(spans);
        }

        // Slide the window so the cursor never leaves it.
        let room = width.saturating_sub(self.prompt.width()).max(1);
        let start = if self.cursor < self.scroll {
            self.cursor
        } else if self.cursor >= self.scroll + room {
            self.cursor + 1 - room
        } else {
            self.scroll
        }
        .min(shown.len());
        let end = (start + room).min(shown.len());
        let window = &shown[start..end];

        if !self.focus {
            spans.push(Span::styled(
                window.iter().collect::<String>(),
                self.style.text,
            ));
            return Line::from(spans);
        }

        let caret = self.cursor.saturating_sub(start).min(window.len());
        if caret > 0 {
            spans.push(Span::styled(
                window[..caret].iter().collect::<String>(),
                self.style.text,
            ));
        }
        match window.get(caret) {
            Some(c) => {
                spans.push(Span::styled(c.to_string(), self.style.cursor));
                if caret + 1 < window.len() {
                    spans.push(Span::styled(
                        window[caret + 1..].iter().collect::<String>(),
                        self.style.text,
                    ));
                }
            }
            None => spans.push(Span::styled(" ", self.style.cursor)),
        }
        Line::from(spans)
    }
}

impl Component for TextInput {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if !self.focus {
                    return Command::none();
                }
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                let alt = key.modifiers.contains(KeyModifiers::ALT);
                match key.code {
                    KeyCode::Char(c) if !ctrl && !alt => self.edit(Edit::Type(c)),
                    KeyCode::Backspace if alt => self.edit(Edit::EraseWordBack),
                    KeyCode::Backspace => self.edit(Edit::EraseBack),
                    KeyCode::Delete => self.edit(Edit::EraseForward),
                    KeyCode::Char('w') if ctrl => self.edit(Edit::EraseWordBack),
                    KeyCode::Char('u') if ctrl => self.edit(Edit::KillToStart),
                    KeyCode::Char('k') if ctrl => self.edit(Edit::KillToEnd),
                    KeyCode::Char('a') if ctrl => {
                        self.step(Motion::Start);
                        Command::none()
                    }
                    KeyCode::Char('e') if ctrl => {
                        self.step(Motion::End);
                        Command::none()
                    }
                    KeyCode::Left if ctrl || alt => {
                        self.step(Motion::WordLeft);
                        Command::none()
                    }
                    KeyCode::Right if ctrl || alt => {
                        self.step(Motion::WordRight);
                        Command::none()
                    }
                    KeyCode::Left => {
                        self.step(Motion::Left);
                        Command::none()
                    }
                    KeyCode::Right => {
                        self.step(Motion::Right);
                        Command::none()
                    }
                    KeyCode::Home => {
                        self.step(Motion::Start);
                        Command::none()
                    }
                    KeyCode::End => {
                        self.step(Motion::End);
                        Command::none()
                    }
                    KeyCode::Char('z') if ctrl => {
                        let current = (self.chars.clone(), self.cursor);
                        let snapshot = self.history.undo(current);
                        self.restore(snapshot);
                        Command::none()
                    }
                    KeyCode::Char('y') if ctrl => {
                        let current = (self.chars.clone(), self.cursor);
                        let snapshot = self.history.redo(current);
                        self.restore(snapshot);
                        Command::none()
                    }
                    KeyCode::Enter => Command::message(Message::Submit(self.value())),
                    _ => Command::none(),
                }
            }
            Message::Paste(text) => {
                if !self.focus {
                    return Command::none();
                }
                self.paste(&text)
            }
            Message::Changed(_) | Message::Submit(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let inner = match &self.block {
            Some(block) => {
                frame.render_widget(block.clone(), area);
                block.inner(area)
            }
            None => area,
        };
        let line = self.compose_line(inner.width as usize);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn press_ctrl(c: char) -> Message {
        Message::KeyPress(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.update(press(KeyCode::Char(c)));
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn starts_empty() {
        let input = TextInput::new("Nome completo");
        assert!(input.is_empty());
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor_position(), 0);
    }

    #[test]
    fn typing_builds_the_value() {
        let mut input = TextInput::new("");
        input.focus();
        type_str(&mut input, "ana");
        assert_eq!(input.value(), "ana");
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn typing_emits_changed() {
        let mut input = TextInput::new("");
        input.focus();
        let cmd = input.update(press(KeyCode::Char('a')));
        match cmd.into_message() {
            Some(Message::Changed(v)) => assert_eq!(v, "a"),
            _ => panic!("expected Changed"),
        }
    }

    #[test]
    fn keys_are_ignored_without_focus() {
        let mut input = TextInput::new("");
        assert!(input.update(press(KeyCode::Char('x'))).is_none());
        assert_eq!(input.value(), "");
    }

    #[test]
    fn backspace_at_start_is_silent() {
        let mut input = TextInput::new("");
        input.focus();
        assert!(input.update(press(KeyCode::Backspace)).is_none());
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut input = TextInput::new("");
        input.focus();
        type_str(&mut input, "ab");
        input.update(press(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn insert_in_the_middle() {
        let mut input = TextInput::new("");
        input.focus();
        type_str(&mut input, "abc");
        input.update(press(KeyCode::Left));
        input.update(press(KeyCode::Left));
        input.update(press(KeyCode::Char('x')));
        assert_eq!(input.value(), "axbc");
    }

    #[test]
    fn word_erase_takes_trailing_spaces_and_the_word() {
        let mut input = TextInput::new("");
        input.focus();
        input.set_value("rua das flores  ");
        input.update(press_ctrl('w'));
        assert_eq!(input.value(), "rua das ");
    }

    #[test]
    fn kill_to_start_and_end() {
        let mut input = TextInput::new("");
        input.focus();
        input.set_value("endereço");
        input.update(press(KeyCode::Home));
        assert!(input.update(press_ctrl('u')).is_none());
        input.update(press(KeyCode::End));
        assert!(input.update(press_ctrl('k')).is_none());

        input.update(press(KeyCode::Home));
        for _ in 0..3 {
            input.update(press(KeyCode::Right));
        }
        input.update(press_ctrl('k'));
        assert_eq!(input.value(), "end");
    }

    #[test]
    fn char_limit_drops_overflow() {
        let mut input = TextInput::new("").with_char_limit(3);
        input.focus();
        type_str(&mut input, "abcd");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn paste_is_truncated_to_the_limit() {
        let mut input = TextInput::new("").with_char_limit(5);
        input.focus();
        input.update(Message::Paste("abcdefgh".into()));
        assert_eq!(input.value(), "abcde");
    }

    #[test]
    fn undo_steps_back_redo_steps_forward() {
        let mut input = TextInput::new("");
        input.focus();
        type_str(&mut input, "ab");
        input.update(press_ctrl('z'));
        assert_eq!(input.value(), "a");
        input.update(press_ctrl('y'));
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn new_edit_clears_the_redo_branch() {
        let mut input = TextInput::new("");
        input.focus();
        type_str(&mut input, "ab");
        input.update(press_ctrl('z'));
        type_str(&mut input, "x");
        input.update(press_ctrl('y'));
        assert_eq!(input.value(), "ax");
    }

    #[test]
    fn blocked_edits_leave_no_history_entry() {
        let mut input = TextInput::new("").with_char_limit(1);
        input.focus();
        type_str(&mut input, "ab");
        // The rejected 'b' must not become an undo step
        input.update(press_ctrl('z'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn enter_submits_the_value() {
        let mut input = TextInput::new("");
        input.focus();
        input.set_value("pronto");
        match input.update(press(KeyCode::Enter)).into_message() {
            Some(Message::Submit(v)) => assert_eq!(v, "pronto"),
            _ => panic!("expected Submit"),
        }
    }

    #[test]
    fn validation_follows_every_change() {
        let mut input = TextInput::new("").with_validate(|v| {
            if v.len() < 3 {
                Err("curto demais".into())
            } else {
                Ok(())
            }
        });
        input.focus();
        type_str(&mut input, "a");
        assert_eq!(input.err(), Some("curto demais"));
        input.update(Message::Paste("bcd".into()));
        assert_eq!(input.err(), None);
    }

    #[test]
    fn password_echo_masks_without_touching_the_value() {
        let mut input = TextInput::new("").with_echo_mode(EchoMode::Password('•'));
        input.set_value("abc");
        let line = input.compose_line(20);
        assert_eq!(line_text(&line), "•••");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn placeholder_shows_only_while_empty_and_unfocused() {
        let mut input = TextInput::new("Selecione um arquivo");
        assert_eq!(line_text(&input.compose_line(30)), "Selecione um arquivo");
        input.focus();
        assert_ne!(line_text(&input.compose_line(30)), "Selecione um arquivo");
    }

    #[test]
    fn long_value_windows_around_the_cursor() {
        let mut input = TextInput::new("");
        input.focus();
        input.set_value("abcdefghij");
        // Cursor at the end; a 5-cell window must show the tail
        let text = line_text(&input.compose_line(5));
        assert!(text.contains("ghij"), "got {text:?}");
        assert!(!text.contains("abc"));
    }
}
