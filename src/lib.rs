//! Mediaprobe - media source inspection tool
//!
//! This library crate exposes configuration loading for the binary and for
//! integration testing. The inspection itself lives in `mp-av`.

pub mod config;
