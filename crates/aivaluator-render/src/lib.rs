//! aivaluator-render: HTML rendering for aivaluator.
//!
//! Turns a controller `ViewState` into a self-contained page: the input
//! form while answers are being entered, the graded results afterwards.

pub mod html;

pub use html::{render_view, write_view};
