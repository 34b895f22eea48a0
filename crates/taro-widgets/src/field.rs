//! Field wrapper: label, required marker, help and error lines around an
//! inner widget.
//!
//! `Field` owns no interactive state.  It draws the chrome and hands back
//! the inner area where the caller renders the actual control.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Style configuration for the [`Field`] wrapper.
#[derive(Debug, Clone)]
pub struct FieldStyle {
    pub label: Style,
    pub required: Style,
    pub help: Style,
    pub error: Style,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            label: Style::default().add_modifier(Modifier::BOLD),
            required: Style::default().fg(Color::Red),
            help: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
        }
    }
}

/// Label/help/error chrome around a form control.
pub struct Field {
    label: String,
    required: bool,
    help: Option<String>,
    error: Option<String>,
    style: FieldStyle,
}

impl Field {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            help: None,
            error: None,
            style: FieldStyle::default(),
        }
    }

    /// Append a required marker (`*`) to the label.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Help text shown below the control.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = style;
        self
    }

    /// Set or clear the error line.  An error replaces the help text.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Render label and footer, returning the inner area for the control.
    ///
    /// Layout: one label row, the control body, and one footer row for the
    /// error or help line when there is room for it.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        if area.height == 0 {
            return area;
        }

        let mut label_spans = vec![Span::styled(&self.label, self.style.label)];
        if self.required {
            label_spans.push(Span::styled(" *", self.style.required));
        }
        let label_area = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(label_spans)), label_area);

        let footer = match (&self.error, &self.help) {
            (Some(err), _) => Some(Span::styled(err.clone(), self.style.error)),
            (None, Some(help)) => Some(Span::styled(help.clone(), self.style.help)),
            (None, None) => None,
        };

        let footer_rows = u16::from(footer.is_some() && area.height > 2);
        if let Some(span) = footer {
            if footer_rows == 1 {
                let footer_area =
                    Rect::new(area.x, area.bottom() - 1, area.width, 1);
                frame.render_widget(Paragraph::new(Line::from(span)), footer_area);
            }
        }

        Rect::new(
            area.x,
            area.y + 1,
            area.width,
            area.height.saturating_sub(1 + footer_rows),
        )
    }
}
