pub mod error;
pub mod health;
pub mod history;
pub mod security;
pub mod shell;
pub mod tags;
