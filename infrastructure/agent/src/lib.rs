pub mod client;
pub mod remote_shell;
