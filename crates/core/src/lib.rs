#![forbid(unsafe_code)]

pub mod flashcards;
pub mod flow;
pub mod model;
pub mod time;

pub use time::Clock;
