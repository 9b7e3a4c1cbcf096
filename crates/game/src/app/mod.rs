pub(crate) mod bootstrap;
mod dialogue;
mod intro;
pub(crate) mod loop_runner;
mod session;
mod stage;
