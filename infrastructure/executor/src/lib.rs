pub mod process;
pub mod shell;
pub mod ssh;
