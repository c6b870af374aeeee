//! Detection loop state: tick schedule, in-flight tracking and announcement
//! rate limiting.
//!
//! [`DetectionLoop`] makes decisions only; the assistant performs the side
//! effects (display, speech, spawning inference).  A tick goes through two
//! halves:
//!
//! ```text
//! on_tick ──▶ TickPlan::Infer { generation } ──spawn detect()──▶ …
//!                                                                 │
//! finish(generation) ◀──────── AssistantEvent::DetectionFinished ─┘
//!   └─▶ describe → render → pick_announcement
//! ```
//!
//! Every `start`/`stop` bumps the generation, so results from an inference
//! launched before a stop or restart are recognised as stale and dropped.

use std::time::Duration;

use tokio::time::Instant;

use super::cooldown::AnnouncementCooldown;
use super::geometry::{direction_of, estimate_distance};
use super::lighting::{average_luma, Lighting, LightingThresholds};
use super::result::{Detection, DetectionReport};
use crate::camera::Frame;
use crate::config::DetectionConfig;

/// What the assistant should do for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickPlan {
    /// The loop is stopped.
    Inactive,
    /// No model or no frame yet.
    NotReady,
    /// The previous inference has not returned; this tick is skipped.
    Busy,
    /// Frame is too dark; do not call the model.
    TooDark { brightness: f32 },
    /// Run the model on the frame.
    Infer {
        generation: u64,
        lighting: Lighting,
        brightness: f32,
    },
}

/// Periodic detection state owned by the assistant.
#[derive(Debug)]
pub struct DetectionLoop {
    period: Duration,
    thresholds: LightingThresholds,
    max_distance_m: f32,
    next_tick: Option<Instant>,
    generation: u64,
    in_flight: bool,
    cooldown: AnnouncementCooldown,
}

impl DetectionLoop {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            period: config.interval(),
            thresholds: LightingThresholds {
                dark: config.dark_threshold,
                low: config.low_light_threshold,
            },
            max_distance_m: config.max_distance_m,
            next_tick: None,
            generation: 0,
            in_flight: false,
            cooldown: AnnouncementCooldown::new(config.cooldown()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    /// When the next tick is due, if running.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// (Re)start ticking.  The first tick is one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.generation += 1;
        self.in_flight = false;
        self.cooldown.clear();
        self.next_tick = Some(now + self.period);
    }

    /// Stop ticking and invalidate any in-flight inference.  Safe to call
    /// when never started.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            self.generation += 1;
        }
        self.in_flight = false;
    }

    /// Decide what to do for the tick due at or before `now`, and schedule
    /// the following one.
    pub fn on_tick(&mut self, now: Instant, frame: Option<&Frame>, model_ready: bool) -> TickPlan {
        let Some(due) = self.next_tick else {
            return TickPlan::Inactive;
        };
        let next = due + self.period;
        self.next_tick = Some(if next > now { next } else { now + self.period });

        let frame = match frame {
            Some(frame) if model_ready => frame,
            _ => return TickPlan::NotReady,
        };

        if self.in_flight {
            return TickPlan::Busy;
        }

        let brightness = average_luma(frame);
        match self.thresholds.classify(brightness) {
            Lighting::Dark => TickPlan::TooDark { brightness },
            lighting => {
                self.in_flight = true;
                TickPlan::Infer {
                    generation: self.generation,
                    lighting,
                    brightness,
                }
            }
        }
    }

    /// Accept the result of an inference launched for `generation`.
    ///
    /// Returns `false` for stale results, which must be discarded.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.is_active() {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Place each detection relative to the user.
    pub fn describe(&self, detections: &[Detection], frame_width: u32) -> Vec<DetectionReport> {
        let width = frame_width as f32;
        detections
            .iter()
            .map(|d| DetectionReport {
                class: d.class.clone(),
                score: d.score,
                bbox: d.bbox,
                distance_m: estimate_distance(d.bbox.width, width, self.max_distance_m),
                direction: direction_of(&d.bbox, width),
            })
            .collect()
    }

    /// Pick the sentence to speak for this tick, if any, and start its
    /// cooldown.
    ///
    /// A label is eligible when no speech is in progress and it is not
    /// cooling down.  Queuing an announcement makes speech in progress, so
    /// at most one is returned.
    pub fn pick_announcement(
        &mut self,
        reports: &[DetectionReport],
        speech_busy: bool,
        now: Instant,
    ) -> Option<String> {
        if speech_busy {
            return None;
        }
        let report = reports
            .iter()
            .find(|r| !self.cooldown.is_cooling(&r.class, now))?;
        self.cooldown.mark(&report.class, now);
        Some(report.sentence())
    }
}
