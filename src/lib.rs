// Emulator capability surface
pub mod module;
pub mod error;

// Marshalling
pub mod decoder;
pub mod registers;
pub mod session;

// Debugger
mod debugger;
pub use debugger::{Debugger, DebuggerOptions, Phase};
mod output;
pub use output::Output;

pub mod env;
