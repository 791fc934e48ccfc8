pub mod render;
pub mod session;

pub use render::{accent, display_number, render_display, render_history, render_screen};
pub use session::{Outcome, Session, run};
