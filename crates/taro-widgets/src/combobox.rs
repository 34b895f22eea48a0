//! Searchable single/multi-select combobox with a floating option panel.
//!
//! The trigger renders in the area the parent assigns; while open, the
//! option panel floats below it as a top-level overlay.  Keyboard and
//! pointer intents arrive as [`Message`]s; outcomes the host cares about are
//! re-emitted as [`Message::Changed`], [`Message::SearchChanged`], and
//! [`Message::OpenChanged`].
//!
//! While the panel is open, the widget declares global listener
//! subscriptions (pointer-down, Escape, viewport changes) plus the deferred
//! focus timer.  The runtime's reconcile pass registers them on open and
//! tears them down on close, so repeated open/close cycles cannot leak.
//!
//! # Example
//!
//! ```ignore
//! let combobox = Combobox::new([
//!     ("react", "React"),
//!     ("vue", "Vue"),
//! ])
//! .with_clearable(true)
//! .with_placeholder("Selecione um framework...");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use taro_core::command::Command;
use taro_core::component::Component;
use taro_core::subscription::{subscribe, Subscription, SubscriptionId};
use taro_core::subscriptions::{input_events_scoped, After};
use taro_core::UiEvent;

use crate::a11y::{AccessNode, Role};
use crate::choice::Choice;
use crate::filter;
use crate::highlight::{self, Direction};
use crate::input::{self, TextInput};
use crate::placement::{panel_area, render_overlay, Align};
use crate::selection::{Selection, Value};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

// Subscription identity markers, one per listener kind.
struct PointerListener;
struct EscapeListener;
struct ViewportListener;

/// Messages for the combobox component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Key event while the trigger has focus.
    TriggerKey(KeyEvent),
    /// Pointer press on the trigger area (host hit-tested).
    TriggerClick,
    /// Key event for the search field while the panel is open.
    SearchKey(KeyEvent),
    /// Pointer press on a row of the filtered list.
    OptionClick(usize),
    /// Pointer hover over a row of the filtered list.
    OptionHover(usize),
    /// Clear affordance activated.
    Clear,
    /// Deferred focus transfer to the search field after opening.
    FocusSearch,
    /// Window resized or scrolled; placement is re-derived on next render.
    ViewportChanged,
    /// Global pointer press observed while the panel is open.
    PointerDown(Position),
    /// Global Escape observed while the panel is open.
    EscapePressed,
    /// Emitted when the selection changes, carrying the external value.
    Changed(Value),
    /// Emitted when the search text changes.
    SearchChanged(String),
    /// Emitted when the panel opens or closes.
    OpenChanged(bool),
}

/// Visual style configuration for the [`Combobox`].
#[derive(Debug, Clone)]
pub struct ComboboxStyle {
    pub trigger: Style,
    pub placeholder: Style,
    pub arrow: Style,
    pub highlighted: Style,
    pub selected_mark: Style,
    pub disabled_option: Style,
    pub empty: Style,
    pub footer: Style,
}

impl Default for ComboboxStyle {
    fn default() -> Self {
        Self {
            trigger: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            arrow: Style::default().fg(Color::DarkGray),
            highlighted: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            selected_mark: Style::default().fg(Color::Green),
            disabled_option: Style::default().fg(Color::DarkGray),
            empty: Style::default().fg(Color::DarkGray),
            footer: Style::default().fg(Color::DarkGray),
        }
    }
}

enum InitialHighlight {
    First,
    Last,
}

/// A searchable dropdown for picking one or several options.
pub struct Combobox {
    options: Vec<Choice>,
    selection: Selection,
    search: TextInput,

    /// Indices into `options` matching the current search text.
    filtered: Vec<usize>,
    /// Index into `filtered`; `None` when no row is eligible.
    highlighted: Option<usize>,
    scroll: usize,

    open: bool,
    focus: bool,
    pending_focus: bool,

    multiple: bool,
    searchable: bool,
    clearable: bool,
    close_on_select: Option<bool>,
    disabled: bool,
    align: Align,

    placeholder: String,
    empty_message: String,
    count_label: String,
    max_visible: usize,
    min_panel_width: u16,

    anchor: Rect,
    bounds: Rect,

    instance: u64,
    style: ComboboxStyle,
}

impl Combobox {
    /// Create an uncontrolled single-select combobox.
    pub fn new(options: impl IntoIterator<Item = impl Into<Choice>>) -> Self {
        let options: Vec<Choice> = options.into_iter().map(Into::into).collect();
        let filtered = (0..options.len()).collect();
        Self {
            options,
            selection: Selection::uncontrolled(false),
            search: TextInput::new("Buscar..."),
            filtered,
            highlighted: None,
            scroll: 0,
            open: false,
            focus: false,
            pending_focus: false,
            multiple: false,
            searchable: true,
            clearable: false,
            close_on_select: None,
            disabled: false,
            align: Align::Start,
            placeholder: "Selecione...".to_string(),
            empty_message: "Nenhum resultado encontrado".to_string(),
            count_label: "selecionados".to_string(),
            max_visible: 8,
            min_panel_width: 24,
            anchor: Rect::default(),
            bounds: Rect::new(0, 0, u16::MAX, u16::MAX),
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            style: ComboboxStyle::default(),
        }
    }

    /// Switch to multi-select mode.  Resets the selection; call before any
    /// value builder.
    pub fn multi(mut self) -> Self {
        self.multiple = true;
        self.selection = Selection::uncontrolled(true);
        self
    }

    /// Seed an uncontrolled selection with a default value.
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.selection = Selection::uncontrolled(self.multiple).with_default(value);
        self
    }

    /// Run in controlled mode, mirroring a host-owned value.
    ///
    /// Mutations are only proposed through [`Message::Changed`]; push each
    /// new snapshot back with [`Combobox::set_value`].
    pub fn with_value(mut self, value: Value) -> Self {
        self.selection = Selection::controlled(self.multiple, value);
        self
    }

    /// Show a search field inside the panel (default: true).
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Show a clear affordance on the trigger when something is selected.
    pub fn with_clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    /// Whether selecting an option closes the panel.  Defaults to true in
    /// single mode and false in multi mode.
    pub fn with_close_on_select(mut self, close: bool) -> Self {
        self.close_on_select = Some(close);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Horizontal panel alignment relative to the trigger.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search = TextInput::new(placeholder.into());
        self
    }

    /// Message shown when the filter matches nothing.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Suffix for the multi-select count summary (e.g. "selecionados").
    pub fn with_count_label(mut self, label: impl Into<String>) -> Self {
        self.count_label = label.into();
        self
    }

    /// Maximum option rows visible before the list scrolls (default: 8).
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self
    }

    /// Minimum panel width in cells, independent of the trigger width.
    pub fn with_min_panel_width(mut self, width: u16) -> Self {
        self.min_panel_width = width;
        self
    }

    pub fn with_style(mut self, style: ComboboxStyle) -> Self {
        self.style = style;
        self
    }

    // --- host-facing state access ---

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current search text.
    pub fn search_text(&self) -> String {
        self.search.value()
    }

    /// Currently selected keys, in selection order.
    pub fn selected_values(&self) -> &[String] {
        self.selection.values()
    }

    /// Index of the highlighted row within the filtered list.
    ///
    /// `None` plays the role of the classic `-1` sentinel: no row is
    /// highlighted, either because the list is empty or every row is
    /// disabled.  Whenever this is `Some(i)`, row `i` is non-disabled.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// Indices into the full option list matching the current search.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// The filtered options themselves, in display order.
    pub fn filtered_options(&self) -> Vec<&Choice> {
        self.filtered.iter().map(|&i| &self.options[i]).collect()
    }

    /// Trigger summary: empty, single label, or count.
    pub fn display_text(&self) -> String {
        self.selection.display_text(&self.options, &self.count_label)
    }

    pub fn is_controlled(&self) -> bool {
        self.selection.is_controlled()
    }

    /// Push a new host-owned value snapshot (controlled mode only).
    pub fn set_value(&mut self, value: Value) {
        self.selection.sync(value);
    }

    /// Replace the option list.  Refilters and resets the highlight.
    pub fn set_options(&mut self, options: Vec<Choice>) {
        self.options = options;
        self.refilter();
    }

    /// Record where the trigger was laid out, for pointer hit-testing.
    ///
    /// Call from the parent's layout pass with the same rect later passed to
    /// [`view`](Component::view).
    pub fn set_anchor(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    /// Clamp overlay placement and hit-testing to this rect (normally the
    /// frame area).
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Give the trigger keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Explicitly open the panel, as if the trigger were activated.
    pub fn open(&mut self) -> Command<Message> {
        self.open_panel(InitialHighlight::First)
    }

    /// Explicitly close the panel.
    pub fn close(&mut self) -> Command<Message> {
        self.close_panel()
    }

    /// Drop focus and close the panel if open.
    pub fn blur(&mut self) -> Command<Message> {
        // close_panel re-focuses the trigger, so clear focus afterwards
        let cmd = self.close_panel();
        self.focus = false;
        cmd
    }

    /// Semantic tree for assistive queries: a combobox node for the
    /// trigger, and while open a listbox node plus one option node per
    /// filtered row.
    pub fn access_nodes(&self) -> Vec<AccessNode> {
        let display = self.display_text();
        let label = if display.is_empty() {
            self.placeholder.clone()
        } else {
            display
        };
        let mut nodes = vec![AccessNode::new(Role::Combobox, label)
            .expanded(self.open)
            .disabled(self.disabled)];
        if self.open {
            nodes.push(
                AccessNode::new(Role::Listbox, "").multi_selectable(self.multiple),
            );
            for &i in &self.filtered {
                let opt = &self.options[i];
                nodes.push(
                    AccessNode::new(Role::Option, opt.label.clone())
                        .selected(self.selection.is_selected(&opt.value))
                        .disabled(opt.disabled),
                );
            }
        }
        nodes
    }

    // --- internals ---

    fn close_on_select(&self) -> bool {
        self.close_on_select.unwrap_or(!self.multiple)
    }

    fn row_disabled(&self, row: usize) -> bool {
        self.filtered
            .get(row)
            .map(|&i| self.options[i].disabled)
            .unwrap_or(true)
    }

    /// Recompute the filtered list and reset the highlight to the first
    /// eligible row.  Filter and highlight always change together, within
    /// one update turn.
    fn refilter(&mut self) {
        self.filtered = filter::filtered_indices(&self.options, &self.search.value());
        self.highlighted =
            highlight::first_eligible(self.filtered.len(), |i| self.row_disabled(i));
        self.scroll = 0;
    }

    fn navigate(&mut self, direction: Direction) {
        let next = highlight::step(self.filtered.len(), self.highlighted, direction, |i| {
            self.row_disabled(i)
        });
        if next != self.highlighted {
            self.highlighted = next;
            if let Some(row) = self.highlighted {
                self.scroll = highlight::scroll_into_view(self.scroll, row, self.max_visible);
            }
        }
    }

    fn open_panel(&mut self, initial: InitialHighlight) -> Command<Message> {
        if self.open || self.disabled {
            return Command::none();
        }
        self.open = true;
        // Opening always starts from a blank search over the full list
        self.search.reset();
        self.refilter();
        self.highlighted = match initial {
            InitialHighlight::First => {
                highlight::first_eligible(self.filtered.len(), |i| self.row_disabled(i))
            }
            InitialHighlight::Last => {
                highlight::last_eligible(self.filtered.len(), |i| self.row_disabled(i))
            }
        };
        if let Some(row) = self.highlighted {
            self.scroll = highlight::scroll_into_view(self.scroll, row, self.max_visible);
        }
        self.pending_focus = self.searchable;
        Command::message(Message::OpenChanged(true))
    }

    fn close_panel(&mut self) -> Command<Message> {
        if !self.open {
            return Command::none();
        }
        self.open = false;
        self.search.reset();
        self.search.blur();
        self.highlighted = None;
        self.scroll = 0;
        self.pending_focus = false;
        // Keyboard focus returns to the trigger
        self.focus = true;
        Command::message(Message::OpenChanged(false))
    }

    fn select_row(&mut self, row: usize) -> Command<Message> {
        let Some(&opt_idx) = self.filtered.get(row) else {
            return Command::none();
        };
        let value = self.options[opt_idx].value.clone();
        let Some(external) = self.selection.select(&value, &self.options) else {
            return Command::none();
        };
        let mut cmds = vec![Command::message(Message::Changed(external))];
        if self.close_on_select() {
            cmds.push(self.close_panel());
        }
        Command::batch(cmds)
    }

    fn select_highlighted(&mut self) -> Command<Message> {
        match self.highlighted {
            Some(row) => self.select_row(row),
            None => Command::none(),
        }
    }

    fn handle_trigger_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.open {
            match key.code {
                KeyCode::Down => {
                    self.navigate(Direction::Forward);
                    Command::none()
                }
                KeyCode::Up => {
                    self.navigate(Direction::Backward);
                    Command::none()
                }
                KeyCode::Enter => self.select_highlighted(),
                KeyCode::Esc | KeyCode::Tab => self.close_panel(),
                _ => Command::none(),
            }
        } else {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                    self.open_panel(InitialHighlight::First)
                }
                KeyCode::Up => self.open_panel(InitialHighlight::Last),
                _ => Command::none(),
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Down => {
                self.navigate(Direction::Forward);
                Command::none()
            }
            KeyCode::Up => {
                self.navigate(Direction::Backward);
                Command::none()
            }
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Esc => self.close_panel(),
            KeyCode::Tab => {
                // Focus is about to leave: commit the highlight if there is
                // one, then close either way.
                if self.highlighted.is_some() {
                    let select = self.select_highlighted();
                    let close = self.close_panel();
                    Command::batch([select, close])
                } else {
                    self.close_panel()
                }
            }
            _ => {
                let before = self.search.value();
                // Make sure edits land even before the deferred focus fired
                self.search.focus();
                let _ = self.search.update(input::Message::KeyPress(key));
                let after = self.search.value();
                if after != before {
                    self.refilter();
                    Command::message(Message::SearchChanged(after))
                } else {
                    Command::none()
                }
            }
        }
    }

    fn panel_rect(&self) -> Option<Rect> {
        let rows = self.filtered.len().clamp(1, self.max_visible) as u16;
        let search_row = u16::from(self.searchable);
        let footer_row = u16::from(self.multiple && !self.selection.is_empty());
        let height = rows + search_row + footer_row + 2; // +2 border
        panel_area(
            self.anchor,
            self.bounds,
            self.align,
            self.min_panel_width,
            height,
        )
    }

    /// Row index (into the filtered list) under a pointer position, if any.
    fn row_at(&self, panel: Rect, pos: Position) -> Option<usize> {
        let inner_top = panel.y + 1 + u16::from(self.searchable);
        let inner_left = panel.x + 1;
        let inner_right = panel.right().saturating_sub(1);
        if pos.x < inner_left || pos.x >= inner_right {
            return None;
        }
        if pos.y < inner_top {
            return None;
        }
        let row = self.scroll + (pos.y - inner_top) as usize;
        let visible_end = (self.scroll + self.max_visible).min(self.filtered.len());
        (row < visible_end).then_some(row)
    }

    fn handle_pointer_down(&mut self, pos: Position) -> Command<Message> {
        if !self.open {
            return Command::none();
        }
        if self.anchor.contains(pos) {
            // Pressing the trigger while open toggles closed
            return self.close_panel();
        }
        if let Some(panel) = self.panel_rect() {
            if panel.contains(pos) {
                if let Some(row) = self.row_at(panel, pos) {
                    if !self.row_disabled(row) {
                        return self.select_row(row);
                    }
                }
                return Command::none();
            }
        }
        // Outside both the trigger and the panel subtree
        self.close_panel()
    }
}

impl Component for Combobox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        if self.disabled {
            return Command::none();
        }
        match msg {
            Message::TriggerKey(key) if self.focus => self.handle_trigger_key(key),
            Message::TriggerKey(_) => Command::none(),
            Message::TriggerClick => {
                if self.open {
                    self.close_panel()
                } else {
                    self.focus = true;
                    self.open_panel(InitialHighlight::First)
                }
            }
            Message::SearchKey(key) if self.open => self.handle_search_key(key),
            Message::SearchKey(_) => Command::none(),
            Message::OptionClick(row) if self.open => {
                if self.row_disabled(row) {
                    Command::none()
                } else {
                    self.select_row(row)
                }
            }
            Message::OptionClick(_) => Command::none(),
            Message::OptionHover(row) => {
                if self.open && !self.row_disabled(row) {
                    self.highlighted = Some(row);
                }
                Command::none()
            }
            Message::Clear => {
                let external = self.selection.clear();
                Command::message(Message::Changed(external))
            }
            Message::FocusSearch => {
                // Stale timers (panel already closed) are dropped by the
                // reconcile pass, but guard anyway
                if self.open && self.searchable && self.pending_focus {
                    self.pending_focus = false;
                    self.search.focus();
                }
                Command::none()
            }
            Message::ViewportChanged => {
                // Placement is derived from the anchor on every render, so
                // the re-render this message triggers is the recomputation
                Command::none()
            }
            Message::PointerDown(pos) => self.handle_pointer_down(pos),
            Message::EscapePressed => self.close_panel(),
            Message::Changed(_) | Message::SearchChanged(_) | Message::OpenChanged(_) => {
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        // Trigger line
        let display = self.display_text();
        let arrow = if self.open { " ▾" } else { " ▸" };
        let show_clear = self.clearable && !self.selection.is_empty() && !self.disabled;
        let suffix_width = arrow.width() + if show_clear { 2 } else { 0 };

        let text_style = if self.disabled {
            self.style.placeholder
        } else if display.is_empty() {
            self.style.placeholder
        } else {
            self.style.trigger
        };
        let mut text = if display.is_empty() {
            self.placeholder.clone()
        } else {
            display
        };
        let max_text = (area.width as usize).saturating_sub(suffix_width);
        while text.width() > max_text && !text.is_empty() {
            text.pop();
        }

        let mut spans = vec![Span::styled(text, text_style)];
        if show_clear {
            spans.push(Span::styled(" ✕", self.style.arrow));
        }
        spans.push(Span::styled(arrow, self.style.arrow));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        if !self.open {
            return;
        }

        // Floating panel, clamped to the frame
        let bounds = frame.area();
        let rows = self.filtered.len().clamp(1, self.max_visible) as u16;
        let search_row = u16::from(self.searchable);
        let footer_row = u16::from(self.multiple && !self.selection.is_empty());
        let height = rows + search_row + footer_row + 2;
        let Some(panel) = panel_area(area, bounds, self.align, self.min_panel_width, height)
        else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = render_overlay(frame, panel, Some(&block));
        if inner.height == 0 {
            return;
        }

        let mut y = inner.y;

        if self.searchable {
            let search_area = Rect::new(inner.x, y, inner.width, 1);
            self.search.view(frame, search_area);
            y += 1;
        }

        if self.filtered.is_empty() {
            let msg_area = Rect::new(inner.x, y, inner.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(&self.empty_message, self.style.empty)),
                msg_area,
            );
            return;
        }

        let visible_end = (self.scroll + self.max_visible).min(self.filtered.len());
        for (row, &opt_idx) in self
            .filtered
            .iter()
            .enumerate()
            .take(visible_end)
            .skip(self.scroll)
        {
            if y >= inner.bottom() {
                break;
            }
            let opt = &self.options[opt_idx];
            let is_highlighted = self.highlighted == Some(row);
            let is_selected = self.selection.is_selected(&opt.value);

            let cursor = if is_highlighted { "▸ " } else { "  " };
            let mark = if self.multiple {
                if is_selected {
                    "[x] "
                } else {
                    "[ ] "
                }
            } else if is_selected {
                "✓ "
            } else {
                "  "
            };

            let label_style = if opt.disabled {
                self.style.disabled_option
            } else if is_highlighted {
                self.style.highlighted
            } else {
                self.style.trigger
            };
            let line = Line::from(vec![
                Span::styled(cursor, self.style.highlighted),
                Span::styled(mark, self.style.selected_mark),
                Span::styled(&opt.label, label_style),
            ]);
            frame.render_widget(Paragraph::new(line), Rect::new(inner.x, y, inner.width, 1));
            y += 1;
        }

        if footer_row == 1 && y < inner.bottom() {
            let count = self.selection.values().len();
            let footer = format!("{count} {}", self.count_label);
            frame.render_widget(
                Paragraph::new(Span::styled(footer, self.style.footer)),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
    }

    /// Global listeners, present only while the panel is open.
    ///
    /// The runtime diff registers all of them when the panel opens and
    /// aborts all of them when it closes, in the same reconcile pass.  The
    /// deferred focus timer rides along and is therefore cancelled
    /// automatically when the panel closes before it fires.
    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.open {
            return vec![];
        }
        let mut subs = vec![
            input_events_scoped(
                SubscriptionId::new::<PointerListener>(self.instance),
                |ev| match &ev {
                    UiEvent::Mouse(_) if ev.is_pointer_down() => {
                        ev.pointer_position().map(Message::PointerDown)
                    }
                    _ => None,
                },
            ),
            input_events_scoped(
                SubscriptionId::new::<EscapeListener>(self.instance),
                |ev| match ev {
                    UiEvent::Key(key) if key.code == KeyCode::Esc => {
                        Some(Message::EscapePressed)
                    }
                    _ => None,
                },
            ),
            input_events_scoped(
                SubscriptionId::new::<ViewportListener>(self.instance),
                |ev| ev.is_viewport_change().then_some(Message::ViewportChanged),
            ),
        ];
        if self.pending_focus {
            subs.push(
                subscribe(
                    After::new(Duration::from_millis(10)).with_discriminant(self.instance),
                )
                .map(|_| Message::FocusSearch),
            );
        }
        subs
    }

    fn focused(&self) -> bool {
        self.focus || self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn greek() -> Combobox {
        let mut cb = Combobox::new([
            Choice::new("a", "Alpha"),
            Choice::new("b", "Beta").disabled(),
            Choice::new("c", "Gamma"),
        ]);
        cb.focus();
        cb
    }

    fn type_text(cb: &mut Combobox, text: &str) {
        for c in text.chars() {
            cb.update(Message::SearchKey(key(KeyCode::Char(c))));
        }
    }

    #[test]
    fn arrow_down_opens_with_first_eligible_highlighted() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_index(), Some(0)); // Alpha

        // Next ArrowDown skips disabled Beta, lands on Gamma
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert_eq!(cb.highlighted_index(), Some(2));
    }

    #[test]
    fn arrow_up_opens_with_last_eligible_highlighted() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Up)));
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_index(), Some(2)); // Gamma
    }

    #[test]
    fn enter_and_space_open_from_closed() {
        for code in [KeyCode::Enter, KeyCode::Char(' ')] {
            let mut cb = greek();
            cb.update(Message::TriggerKey(key(code)));
            assert!(cb.is_open());
        }
    }

    #[test]
    fn navigation_wraps_and_skips_disabled() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down))); // open, Alpha
        cb.update(Message::TriggerKey(key(KeyCode::Down))); // Gamma
        cb.update(Message::TriggerKey(key(KeyCode::Down))); // wraps to Alpha
        assert_eq!(cb.highlighted_index(), Some(0));
        cb.update(Message::TriggerKey(key(KeyCode::Up))); // back to Gamma
        assert_eq!(cb.highlighted_index(), Some(2));
    }

    #[test]
    fn enter_selects_highlighted_and_closes() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        let cmd = cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        assert_eq!(cb.selected_values(), ["a"]);
        assert!(!cb.is_open(), "single mode closes on select");

        let msgs = cmd.into_batch().expect("changed + open-changed");
        assert!(msgs.len() >= 2);
    }

    #[test]
    fn multi_mode_stays_open_and_toggles() {
        let mut cb = Combobox::new([("react", "React"), ("vue", "Vue")])
            .multi()
            .with_default_value(Value::Multi(vec!["react".into()]));
        cb.focus();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert!(cb.is_open());

        // Highlight starts on React; Enter toggles it off
        let cmd = cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        assert!(cb.is_open(), "multi mode keeps the panel open");
        assert!(cb.selected_values().is_empty());
        match cmd.into_message() {
            Some(Message::Changed(Value::Multi(v))) => assert!(v.is_empty()),
            other => panic!("expected Changed(Multi([])), got {other:?}"),
        }
    }

    #[test]
    fn search_filters_and_resets_highlight() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        type_text(&mut cb, "gam");
        assert_eq!(cb.search_text(), "gam");
        assert_eq!(cb.filtered_indices(), &[2]);
        assert_eq!(cb.highlighted_index(), Some(0));
        assert_eq!(cb.filtered_options()[0].label, "Gamma");
    }

    #[test]
    fn search_emits_search_changed() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        let cmd = cb.update(Message::SearchKey(key(KeyCode::Char('g'))));
        match cmd.into_message() {
            Some(Message::SearchChanged(text)) => assert_eq!(text, "g"),
            other => panic!("expected SearchChanged, got {other:?}"),
        }
    }

    #[test]
    fn filter_to_only_disabled_leaves_no_highlight() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        type_text(&mut cb, "bet");
        assert_eq!(cb.filtered_indices(), &[1]);
        assert_eq!(cb.highlighted_index(), None);
        // Enter with no highlight selects nothing
        cb.update(Message::SearchKey(key(KeyCode::Enter)));
        assert!(cb.selected_values().is_empty());
    }

    #[test]
    fn open_close_resets_search_and_highlight() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        type_text(&mut cb, "gam");
        cb.update(Message::SearchKey(key(KeyCode::Esc)));
        assert!(!cb.is_open());
        assert_eq!(cb.search_text(), "");
        assert_eq!(cb.highlighted_index(), None);

        // Reopening starts from the full, unfiltered list
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert_eq!(cb.filtered_indices(), &[0, 1, 2]);
    }

    #[test]
    fn all_disabled_navigation_is_inert() {
        let mut cb = Combobox::new([
            Choice::new("a", "Alpha").disabled(),
            Choice::new("b", "Beta").disabled(),
        ]);
        cb.focus();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_index(), None);
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Up)));
        assert_eq!(cb.highlighted_index(), None);
        cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        assert!(cb.selected_values().is_empty());
    }

    #[test]
    fn clear_notifies_even_when_empty() {
        let mut cb = greek().with_clearable(true);
        let first = cb.update(Message::Clear);
        let second = cb.update(Message::Clear);
        for cmd in [first, second] {
            match cmd.into_message() {
                Some(Message::Changed(Value::Single(None))) => {}
                other => panic!("expected Changed(Single(None)), got {other:?}"),
            }
        }
    }

    #[test]
    fn tab_in_search_commits_highlight_then_closes() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::SearchKey(key(KeyCode::Tab)));
        assert_eq!(cb.selected_values(), ["a"]);
        assert!(!cb.is_open());
    }

    #[test]
    fn tab_in_search_without_highlight_just_closes() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        type_text(&mut cb, "zzz");
        assert_eq!(cb.highlighted_index(), None);
        cb.update(Message::SearchKey(key(KeyCode::Tab)));
        assert!(!cb.is_open());
        assert!(cb.selected_values().is_empty());
    }

    #[test]
    fn option_hover_moves_highlight_but_skips_disabled() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::OptionHover(2));
        assert_eq!(cb.highlighted_index(), Some(2));
        cb.update(Message::OptionHover(1)); // Beta is disabled
        assert_eq!(cb.highlighted_index(), Some(2));
    }

    #[test]
    fn option_click_on_disabled_is_noop() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        let cmd = cb.update(Message::OptionClick(1));
        assert!(cmd.is_none());
        assert!(cb.selected_values().is_empty());
        assert!(cb.is_open());
    }

    #[test]
    fn outside_pointer_down_closes() {
        let mut cb = greek();
        cb.set_anchor(Rect::new(10, 2, 20, 1));
        cb.set_bounds(Rect::new(0, 0, 80, 24));
        cb.update(Message::TriggerClick);
        assert!(cb.is_open());

        cb.update(Message::PointerDown(Position::new(70, 20)));
        assert!(!cb.is_open());
    }

    #[test]
    fn pointer_down_inside_panel_selects_row() {
        let mut cb = greek().with_searchable(false);
        cb.set_anchor(Rect::new(10, 2, 20, 1));
        cb.set_bounds(Rect::new(0, 0, 80, 24));
        cb.update(Message::TriggerClick);
        let panel = cb.panel_rect().expect("panel placed");
        // First row sits just inside the border
        let pos = Position::new(panel.x + 2, panel.y + 1);
        cb.update(Message::PointerDown(pos));
        assert_eq!(cb.selected_values(), ["a"]);
        assert!(!cb.is_open());
    }

    #[test]
    fn pointer_down_on_trigger_while_open_toggles_closed() {
        let mut cb = greek();
        cb.set_anchor(Rect::new(10, 2, 20, 1));
        cb.update(Message::TriggerClick);
        assert!(cb.is_open());
        cb.update(Message::PointerDown(Position::new(12, 2)));
        assert!(!cb.is_open());
    }

    #[test]
    fn listeners_exist_only_while_open() {
        let mut cb = greek();
        assert!(cb.subscriptions().is_empty());

        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        // pointer + escape + viewport + deferred focus timer
        assert_eq!(cb.subscriptions().len(), 4);

        cb.update(Message::TriggerKey(key(KeyCode::Esc)));
        assert!(cb.subscriptions().is_empty());
    }

    #[test]
    fn focus_timer_dropped_after_it_fires() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert_eq!(cb.subscriptions().len(), 4);

        cb.update(Message::FocusSearch);
        // Timer subscription gone; the three listeners remain
        assert_eq!(cb.subscriptions().len(), 3);
        assert!(cb.search.focused());
    }

    #[test]
    fn stale_focus_message_after_close_is_ignored() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Esc)));
        cb.update(Message::FocusSearch);
        assert!(!cb.search.focused());
    }

    #[test]
    fn non_searchable_panel_schedules_no_focus_timer() {
        let mut cb = greek().with_searchable(false);
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert_eq!(cb.subscriptions().len(), 3);
    }

    #[test]
    fn controlled_mode_proposes_without_applying() {
        let mut cb = Combobox::new([("react", "React"), ("vue", "Vue")])
            .with_value(Value::Single(None));
        cb.focus();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        let cmd = cb.update(Message::TriggerKey(key(KeyCode::Enter)));

        // The change is proposed to the host...
        let msgs = cmd.into_batch().expect("changed + open-changed");
        assert!(msgs.len() >= 2);
        // ...but the visible selection is unchanged until the host syncs
        assert!(cb.selected_values().is_empty());

        cb.set_value(Value::Single(Some("react".into())));
        assert_eq!(cb.selected_values(), ["react"]);
        assert_eq!(cb.display_text(), "React");
    }

    #[test]
    fn display_text_count_summary() {
        let mut cb = Combobox::new([("a", "Alpha"), ("c", "Gamma")]).multi();
        cb.focus();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        assert_eq!(cb.display_text(), "Alpha");
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        assert_eq!(cb.display_text(), "2 selecionados");
    }

    #[test]
    fn disabled_combobox_is_inert() {
        let mut cb = greek().with_disabled(true);
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerClick);
        assert!(!cb.is_open());
    }

    #[test]
    fn explicit_open_close_and_blur() {
        let mut cb = greek();
        let opened = cb.open();
        assert!(cb.is_open());
        assert!(matches!(
            opened.into_message(),
            Some(Message::OpenChanged(true))
        ));

        let closed = cb.close();
        assert!(!cb.is_open());
        assert!(matches!(
            closed.into_message(),
            Some(Message::OpenChanged(false))
        ));
        assert!(cb.focused(), "closing returns focus to the trigger");

        cb.open();
        cb.blur();
        assert!(!cb.is_open());
        assert!(!cb.focused());
    }

    #[test]
    fn set_options_refilters_and_resets_highlight() {
        let mut cb = greek();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        assert_eq!(cb.highlighted_index(), Some(2));

        cb.set_options(vec![
            Choice::new("x", "Xi").disabled(),
            Choice::new("y", "Ypsilon"),
        ]);
        assert_eq!(cb.filtered_indices(), &[0, 1]);
        assert_eq!(cb.highlighted_index(), Some(1));
    }

    #[test]
    fn access_nodes_reflect_roles_and_state() {
        let mut cb = greek().multi();
        cb.focus();
        let nodes = cb.access_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].role, Role::Combobox);
        assert_eq!(nodes[0].expanded, Some(false));

        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        cb.update(Message::TriggerKey(key(KeyCode::Enter)));
        let nodes = cb.access_nodes();
        assert_eq!(nodes[0].expanded, Some(true));
        assert_eq!(nodes[1].role, Role::Listbox);
        assert_eq!(nodes[1].multi_selectable, Some(true));

        let alpha = &nodes[2];
        assert_eq!(alpha.role, Role::Option);
        assert_eq!(alpha.selected, Some(true));
        let beta = &nodes[3];
        assert!(beta.disabled);
        assert_eq!(beta.selected, Some(false));
    }

    #[test]
    fn view_renders_placeholder_and_panel() {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;

        let mut cb = greek();
        cb.set_anchor(Rect::new(0, 0, 30, 1));
        cb.update(Message::TriggerKey(key(KeyCode::Down)));

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| cb.view(frame, Rect::new(0, 0, 30, 1)))
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..16 {
            for x in 0..60 {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        assert!(out.contains("Selecione..."));
        assert!(out.contains("Alpha"));
        assert!(out.contains("Gamma"));
        assert!(out.contains("▸"));
    }

    #[test]
    fn harness_tracks_listener_lifecycle() {
        use taro_core::testing::TestProgram;
        use taro_core::Model;

        struct Host {
            country: Combobox,
        }

        #[derive(Debug)]
        enum Msg {
            Country(Message),
        }

        impl Model for Host {
            type Message = Msg;
            type Flags = ();

            fn init(_: ()) -> (Self, Command<Msg>) {
                let mut country = Combobox::new([("br", "Brasil"), ("pt", "Portugal")]);
                country.focus();
                (Host { country }, Command::none())
            }

            fn update(&mut self, msg: Msg) -> Command<Msg> {
                match msg {
                    Msg::Country(m) => self.country.update(m).map(Msg::Country),
                }
            }

            fn view(&self, frame: &mut ratatui::Frame) {
                let area = frame.area();
                self.country.view(frame, Rect::new(area.x, area.y, area.width, 1));
            }

            fn subscriptions(&self) -> Vec<taro_core::Subscription<Msg>> {
                self.country
                    .subscriptions()
                    .into_iter()
                    .map(|sub| sub.map(Msg::Country))
                    .collect()
            }
        }

        let mut prog = TestProgram::<Host>::new(());
        assert!(prog.subscription_ids().is_empty());

        prog.send(Msg::Country(Message::TriggerKey(key(KeyCode::Down))));
        prog.flush();
        assert_eq!(prog.subscription_ids().len(), 4);
        let out = prog.render_text(60, 12);
        assert!(out.contains("Brasil"));

        prog.send(Msg::Country(Message::TriggerKey(key(KeyCode::Esc))));
        prog.flush();
        assert!(prog.subscription_ids().is_empty());
        let out = prog.render_text(60, 12);
        assert!(out.contains("Selecione..."));
        assert!(!out.contains("Brasil"));
    }

    #[test]
    fn long_list_scrolls_highlight_into_view() {
        let options: Vec<Choice> = (0..20)
            .map(|i| Choice::new(format!("v{i}"), format!("Item {i}")))
            .collect();
        let mut cb = Combobox::new(options).with_max_visible(5);
        cb.focus();
        cb.update(Message::TriggerKey(key(KeyCode::Down)));
        for _ in 0..7 {
            cb.update(Message::TriggerKey(key(KeyCode::Down)));
        }
        assert_eq!(cb.highlighted_index(), Some(7));
        // Window of 5 rows slid down to keep row 7 visible
        assert_eq!(cb.scroll, 3);

        // Wrap back to the top resets the window
        for _ in 0..13 {
            cb.update(Message::TriggerKey(key(KeyCode::Down)));
        }
        assert_eq!(cb.highlighted_index(), Some(0));
        assert_eq!(cb.scroll, 0);
    }
}
