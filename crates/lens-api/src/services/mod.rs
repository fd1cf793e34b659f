//! Business logic services.

pub mod camera_feed;
pub mod deadline;

pub use camera_feed::{CameraFeedAnalyzer, DEFAULT_COLLABORATOR_TIMEOUT};
pub use deadline::{bounded_call, with_deadline};
