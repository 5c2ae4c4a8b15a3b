//! Panels rendered by the main application

mod editor;
mod login;
mod sections;
mod top;
