//! MIDI functionality for the clock
//!
//! This module provides the MIDI transport the clock engine talks through:
//! - Core MIDI message types, their byte encoding and error handling
//! - Real MIDI device communication via midir
//! - Mock implementations for testing
//!
//! The main components are:
//! - [`MidiEngine`] trait for sending and polling MIDI messages
//! - [`MidirEngine`] for real MIDI device communication
//! - [`MockMidiEngine`] for testing
//!
mod engine;
pub mod midir_engine;
pub mod mock_engine;

// Re-export main types from engine
pub use engine::{MidiEngine, MidiError, MidiMessage, Result};

// Re-export concrete implementations
pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;

// Set default engine type
pub type DefaultMidiEngine = MidirEngine;
