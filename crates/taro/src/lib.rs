//! **taro** -- an Elm-style TUI form toolkit for [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything you need to build a
//! taro application from a single dependency:
//!
//! ```toml
//! [dependencies]
//! taro = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`taro_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`taro_widgets`]
//!   (combobox, text input, button, field chrome).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use taro::{Model, Command};
//! use ratatui::Frame;
//! use ratatui::widgets::Paragraph;
//!
//! struct Hello;
//! enum Msg {}
//!
//! impl Model for Hello {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         (Hello, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {}
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         frame.render_widget(Paragraph::new("Olá, taro!"), frame.area());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     taro::run::<Hello>(()).await.unwrap();
//! }
//! ```

pub use taro_core::*;
pub mod widgets {
    pub use taro_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
