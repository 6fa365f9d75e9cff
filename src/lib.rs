use state::BuilderState;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::Dialogue};

pub mod builder;
pub mod classroom;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod form;
pub mod keyboard;
pub mod schema;
pub mod state;

pub type UserDialogue = Dialogue<BuilderState, InMemStorage<BuilderState>>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
