mod action;
mod event;
mod message;
mod storage;
mod view;
mod widget;

pub use action::*;
pub use event::*;
pub use message::*;
pub use storage::*;
pub use view::*;
pub use widget::*;
