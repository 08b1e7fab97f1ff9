//! Process arguments captured for the application.

mod cmd_line;

pub use cmd_line::CmdLine;
