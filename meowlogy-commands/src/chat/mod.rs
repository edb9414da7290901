pub mod ask;
pub mod repl;
mod render;
