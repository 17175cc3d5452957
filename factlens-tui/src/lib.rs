mod cards;
mod command;
mod feeders;
mod state;
mod styles;
mod tui;
mod view;

pub use feeders::spawn_ui_feeders;
pub use tui::{ClaimView, UiMsg};
