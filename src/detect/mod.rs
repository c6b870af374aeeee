//! Object detection: model interfaces, lighting gate, placement heuristics,
//! announcement cooldown and the periodic detection loop.
//!
//! ```text
//! tick ─▶ average_luma ─▶ LightingThresholds::classify
//!            │ Dark: status only
//!            ▼ Low / Normal
//!        ObjectDetector::detect  (spawned task)
//!            ▼
//!        describe ─▶ estimate_distance + direction_of ─▶ DetectionReport
//!            ▼
//!        pick_announcement ─▶ AnnouncementCooldown
//! ```

pub mod cooldown;
pub mod cycle;
pub mod geometry;
pub mod lighting;
pub mod model;
pub mod remote;
pub mod result;

pub use cooldown::AnnouncementCooldown;
pub use cycle::{DetectionLoop, TickPlan};
pub use geometry::{direction_of, estimate_distance, Direction};
pub use lighting::{average_luma, Lighting, LightingThresholds};
pub use model::{ModelLoader, ObjectDetector};
pub use remote::{HttpDetector, HttpModelLoader};
pub use result::{BoundingBox, DetectError, Detection, DetectionReport};
