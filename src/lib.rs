//! Simulation core of a side-scrolling arcade shooter.
//!
//! [`compute::Simulation`] advances the whole game one tick at a time and
//! returns [`events::GameEvent`] values instead of drawing or playing
//! anything. The terminal front end in `main.rs` is one consumer of those
//! events.

pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod interfaces;
pub mod persistence;
pub mod schedule;
pub mod spawner;
pub mod state;

pub use error::{Error, Result};
