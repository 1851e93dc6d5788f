//! IPC listener that accepts messages over a Unix socket.
//!
//! Hot-key helpers, scripts and the platform bridge connect to the socket
//! and send newline-delimited JSON messages.

pub mod listener;
