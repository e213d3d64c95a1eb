//! giants-installer - GIANTS Software mod installer
//!
//! Recognises Farming Simulator mod archives by their `modDesc.xml`, reads
//! the mod's metadata, asks for confirmation, and regroups the archive under
//! a single mod folder for the host mod manager.

pub mod dialog;
pub mod host;
pub mod installer;
pub mod manifest;
pub mod settings;
pub mod source;
pub mod tree;
