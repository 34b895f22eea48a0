//! Push button component.

use taro_core::command::Command;
use taro_core::component::Component;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Messages for the button component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press event forwarded to the button.
    KeyPress(KeyEvent),
    /// A pointer click on the button.
    Click,
    /// Emitted when the button is activated.
    Pressed,
}

/// Visual style configuration for the [`Button`].
#[derive(Debug, Clone)]
pub struct ButtonStyle {
    pub normal: Style,
    pub focused: Style,
    pub disabled: Style,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// A focusable push button activated by Enter, Space, or click.
pub struct Button {
    label: String,
    focus: bool,
    disabled: bool,
    style: ButtonStyle,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focus: false,
            disabled: false,
            style: ButtonStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    fn press(&self) -> Command<Message> {
        if self.disabled {
            Command::none()
        } else {
            Command::message(Message::Pressed)
        }
    }
}

impl Component for Button {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.press(),
                _ => Command::none(),
            },
            Message::Click => self.press(),
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let style = if self.disabled {
            self.style.disabled
        } else if self.focus {
            self.style.focused
        } else {
            self.style.normal
        };
        let line = Line::from(vec![
            Span::styled("[ ", style),
            Span::styled(&self.label, style),
            Span::styled(" ]", style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
