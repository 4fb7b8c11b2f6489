//! Nordic walking technique analysis from pose-estimation output.
//!
//! Frames of detected landmarks flow through metric extraction and the
//! technique rules into a [`session::Session`], which is summarized,
//! reported on and handed to a [`store::SessionRepository`]. Bulk video
//! scans take the lighter [`analysis::score`] path instead.

pub mod analysis;
pub mod config;
pub mod detection;
pub mod pose;
pub mod render;
pub mod session;
pub mod source;
pub mod store;
