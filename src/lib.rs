//! Core library for the `itsctl` CLI.
//!
//! The library turns raw operator options into validated request
//! descriptors, dispatches them against the Integration Test Server (or a
//! probed URL), and classifies what happened into a small set of outcome
//! kinds. The binary supplies the options from the command line and renders
//! outcomes with the presenters in [`ui`].
pub mod args;
pub mod assemble;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod outcome;
pub mod ui;
