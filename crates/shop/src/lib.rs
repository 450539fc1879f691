//! Shop driver: the demo walkthrough and the wiring that runs it.

pub mod app;
pub mod scenario;
