// Presentation layer - Terminal screen and console commands
pub mod console;
pub mod terminal;
