//! Queue-calling announcement library.
//!
//! Sequences short audio clips into spoken announcements like
//! "please A1001 proceed to window 3" and serializes them through a FIFO
//! play queue so clips never overlap. Audio output goes through the
//! [`Player`] capability: [`RodioPlayer`] drives the default output
//! device, [`SimulatedPlayer`] runs headless.
//!
//! ```no_run
//! use std::sync::Arc;
//! use call_announcer::{Announcer, AnnouncerConfig, RodioPlayer};
//!
//! let player = Arc::new(RodioPlayer::new()?);
//! let announcer = Announcer::new(AnnouncerConfig::default(), player);
//!
//! announcer.add_normal_call("A1001", 3, true)?;
//! announcer.add_manager_call(2, true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod player;
pub mod request;
pub mod resolver;
pub mod sequence;

pub use config::{AnnouncerConfig, ConfigOverrides};
pub use engine::Announcer;
pub use error::{AppResult, CallError, PlayerError};
pub use events::Event;
pub use player::{PlayOutcome, Player, RodioPlayer, SimulatedPlayer};
pub use request::CallRequest;
pub use resolver::ClipResolver;
