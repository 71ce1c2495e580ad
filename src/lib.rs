//! Hangeul melody library - Korean syllables played as notes and streamed to a visualization host

pub mod audio;
pub mod cli;
pub mod error;
pub mod hangeul;
pub mod jamo;
pub mod link;
pub mod logging;
pub mod notes;
pub mod observer;
pub mod params;
pub mod protocol;
pub mod session;
