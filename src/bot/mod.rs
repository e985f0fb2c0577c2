//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: Bot commands and the command handler
//! - `message_handler`: Handles incoming text messages (translation requests)
//! - `callback_handler`: Handles inline keyboard callback queries (confirmations and quiz answers)
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod commands;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use commands::{command_handler, Command};
pub use message_handler::message_handler;

/// Dispatch tree: commands first, then free text, then button presses
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let message_branch = Update::filter_message()
        .branch(teloxide::filter_command::<Command, _>().endpoint(command_handler))
        .branch(dptree::endpoint(message_handler));

    dptree::entry()
        .branch(message_branch)
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
