//! Actor Model: Message-passing concurrency around the frame pipeline.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards to main loop
//! - **Render Actor**: Receives node trees, composes and flushes frames
//! - **Main Loop**: Owns application state and builds a tree per frame
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ──────────────────▶ │              │
//! └──────────────┘                     │  Main Loop   │
//!                                      │              │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀────────────────── │              │
//! └──────────────┘                     └──────────────┘
//! ```
//!
//! The render thread is the only owner of the previous-frame buffer, so
//! frames are serialized without locks.

mod engine;
mod input;
mod messages;
mod renderer;

pub use engine::{Engine, EngineConfig};
pub use input::InputActor;
pub use messages::{InputEvent, KeyCode, KeyModifiers, RenderCommand};
pub use renderer::{RenderStats, RendererActor};
