//! **spaceman**: an app-based virtual workspace manager.
//!
//! Running applications are partitioned into named workspaces bound to
//! displays.  Activating a workspace raises its apps and hides every
//! other app on the same display.  Focus navigation moves between windows
//! spatially or in workspace order.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::WindowProvider`]: abstracts window introspection and the
//!   raise/hide/focus primitives so the orchestration logic is not coupled
//!   to any specific desktop.
//! * [`traits::MessageSource`]: abstracts the transport that delivers
//!   commands and OS events (a Unix socket, a platform bridge, …) so the
//!   main loop is not coupled to any specific IPC mechanism.
//!
//! [`workspace_manager::WorkspaceManager`] owns all runtime state,
//! [`focus::FocusManager`] navigates focus, and
//! [`tracker::FocusedWindowTracker`] follows the user into other
//! workspaces.  [`dispatcher::Dispatcher`] routes messages to them on a
//! single thread.

pub mod actions;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod events;
pub mod focus;
pub mod geometry;
pub mod integrations;
pub mod ipc;
pub mod model;
pub mod rehide;
pub mod repository;
pub mod space_control;
pub mod tracker;
pub mod traits;
pub mod workspace_manager;

#[cfg(test)]
pub(crate) mod testing;
