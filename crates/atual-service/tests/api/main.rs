#[path = "../common/mod.rs"]
mod common;

mod accounts;
mod analytics;
mod content;
mod publish;
mod tracking;
