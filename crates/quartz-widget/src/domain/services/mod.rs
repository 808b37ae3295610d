mod actions;
mod controller;
mod events;
mod persistence;
mod scroll;
mod view_state;

pub use actions::*;
pub use controller::*;
pub use events::*;
pub use persistence::*;
pub use scroll::*;
pub use view_state::*;
