//! Built-in subscription sources.
//!
//! This module re-exports the standard subscriptions provided by taro-core:
//!
//! - **Input events** ([`input_events`], [`InputEvents`]) -- keyboard, mouse,
//!   resize, focus, and paste events from the terminal.
//! - **Timers** ([`Every`], [`After`]) -- repeating and one-shot timer
//!   subscriptions.

mod input;
mod timer;

pub use input::*;
pub use timer::*;
