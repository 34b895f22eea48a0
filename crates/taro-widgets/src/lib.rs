//! Form widgets for the **taro** TUI framework.
//!
//! Every widget in this crate implements [`taro_core::Component`], so it can
//! be embedded inside any [`taro_core::Model`] and composed freely within
//! [`ratatui`] layouts.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`button`] | Focusable push button |
//! | [`combobox`] | Searchable single/multi-select dropdown |
//! | [`field`] | Label/help/error chrome around a form control |
//! | [`input`] | Single-line text input field |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`a11y`] | Semantic role/state descriptors for assistive queries |
//! | [`choice`] | Option entries (key, label, disabled flag) |
//! | [`filter`] | Case-insensitive substring filtering over choices |
//! | [`highlight`] | Wraparound keyboard highlight with disabled skipping |
//! | [`placement`] | Floating panel placement below an anchor |
//! | [`selection`] | Single/multi selection state, controlled or owned |

pub mod a11y;
pub mod button;
pub mod choice;
pub mod combobox;
pub mod field;
pub mod filter;
pub mod highlight;
pub mod input;
pub mod placement;
pub mod selection;

pub use a11y::{AccessNode, Role};
pub use button::Button;
pub use choice::Choice;
pub use combobox::Combobox;
pub use field::Field;
pub use input::TextInput;
pub use placement::Align;
pub use selection::Value;
