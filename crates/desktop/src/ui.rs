use jbk_core::Event;
use std::sync::mpsc::Receiver;

/// Messages delivered to the UI thread by background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A command finished
    Model(Event),
    /// Result of a health check
    Connectivity(bool),
}

pub type EventReceiver = Receiver<AppEvent>;
