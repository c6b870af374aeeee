//! Step-by-step narration player.
//!
//! ```text
//! start ──▶ Speaking(0) ──step_spoken──▶ Waiting(1, due) ──on_due──▶ Speaking(1) …
//!                                                   … Waiting(len, due) ──on_due──▶ Complete
//! ```
//!
//! The player never speaks by itself: it tells the assistant which step to
//! speak and when the next one is due.  Each trip gets a fresh number so a
//! completion reported for a step of an earlier trip cannot advance the
//! current one.

use std::time::Duration;

use tokio::time::Instant;

use super::routes::NavigationScript;

/// Identifies one spoken step of one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTicket {
    pub trip: u64,
    pub index: usize,
}

/// What the assistant should do when the step delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Speak this step and report back with the ticket when it finishes.
    Speak {
        text: &'static str,
        ticket: StepTicket,
    },
    /// All steps are done.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerState {
    Idle,
    Speaking { index: usize },
    Waiting { next: usize, due: Instant },
}

/// Plays a [`NavigationScript`] one step per synthesis completion.
#[derive(Debug)]
pub struct NavigationPlayer {
    script: Option<NavigationScript>,
    state: PlayerState,
    trip: u64,
    delay: Duration,
}

impl NavigationPlayer {
    pub fn new(delay: Duration) -> Self {
        Self {
            script: None,
            state: PlayerState::Idle,
            trip: 0,
            delay,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != PlayerState::Idle
    }

    pub fn destination(&self) -> Option<&str> {
        self.script.as_ref().map(|s| s.destination())
    }

    /// When the next step (or the completion) is due, if waiting.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            PlayerState::Waiting { due, .. } => Some(due),
            _ => None,
        }
    }

    /// Begin a new trip, abandoning any current one.  Returns the first step.
    pub fn start(&mut self, script: NavigationScript) -> NavAction {
        self.trip += 1;
        self.script = Some(script);
        self.advance(0)
    }

    /// The step identified by `ticket` finished speaking at `now`.
    ///
    /// Returns `false` if the ticket is stale (earlier trip, stopped player or
    /// not the step currently being spoken).
    pub fn step_spoken(&mut self, ticket: StepTicket, now: Instant) -> bool {
        match self.state {
            PlayerState::Speaking { index } if ticket.trip == self.trip && ticket.index == index => {
                self.state = PlayerState::Waiting {
                    next: index + 1,
                    due: now + self.delay,
                };
                true
            }
            _ => false,
        }
    }

    /// Called when the deadline passes.  `None` if nothing is due yet.
    pub fn on_due(&mut self, now: Instant) -> Option<NavAction> {
        match self.state {
            PlayerState::Waiting { next, due } if now >= due => Some(self.advance(next)),
            _ => None,
        }
    }

    /// Abandon the current trip.  Safe to call when idle.
    pub fn stop(&mut self) {
        self.state = PlayerState::Idle;
        self.script = None;
    }

    fn advance(&mut self, next: usize) -> NavAction {
        let step = self.script.as_ref().and_then(|s| s.step(next));
        match step {
            Some(text) => {
                self.state = PlayerState::Speaking { index: next };
                NavAction::Speak {
                    text,
                    ticket: StepTicket {
                        trip: self.trip,
                        index: next,
                    },
                }
            }
            None => {
                self.stop();
                NavAction::Complete
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::routes::APOLOGY_STEP;

    const DELAY: Duration = Duration::from_secs(5);

    fn speak_text(action: &NavAction) -> (&'static str, StepTicket) {
        match action {
            NavAction::Speak { text, ticket } => (*text, *ticket),
            NavAction::Complete => panic!("expected a step, got completion"),
        }
    }

    /// Drive a full trip, returning every spoken step.
    fn play_through(player: &mut NavigationPlayer, script: NavigationScript) -> Vec<&'static str> {
        let mut now = Instant::now();
        let mut spoken = Vec::new();
        let mut action = player.start(script);
        loop {
            match action {
                NavAction::Speak { text, ticket } => {
                    spoken.push(text);
                    assert!(player.step_spoken(ticket, now));
                    assert_eq!(player.on_due(now), None, "step must wait for the delay");
                    now += DELAY;
                    action = player.on_due(now).expect("step due after delay");
                }
                NavAction::Complete => return spoken,
            }
        }
    }

    #[test]
    fn hospital_plays_four_steps_in_order() {
        let mut player = NavigationPlayer::new(DELAY);
        let spoken = play_through(&mut player, NavigationScript::for_name("hospital"));

        assert_eq!(
            spoken,
            vec![
                "Proceed straight for 200 meters.",
                "Turn left at the next intersection.",
                "The hospital is on your right.",
                "You have reached your destination.",
            ]
        );
        assert!(!player.is_active());
    }

    #[test]
    fn unknown_destination_plays_one_apology() {
        let mut player = NavigationPlayer::new(DELAY);
        let spoken = play_through(&mut player, NavigationScript::for_name("zoo"));
        assert_eq!(spoken, vec![APOLOGY_STEP]);
    }

    #[test]
    fn no_deadline_while_speaking() {
        let mut player = NavigationPlayer::new(DELAY);
        player.start(NavigationScript::for_name("home"));
        assert!(player.is_active());
        assert_eq!(player.deadline(), None);
        assert_eq!(player.on_due(Instant::now() + DELAY * 10), None);
    }

    #[test]
    fn deadline_is_delay_after_completion() {
        let mut player = NavigationPlayer::new(DELAY);
        let (_, ticket) = speak_text(&player.start(NavigationScript::for_name("home")));
        let now = Instant::now();
        player.step_spoken(ticket, now);
        assert_eq!(player.deadline(), Some(now + DELAY));
    }

    #[test]
    fn stop_clears_pending_step() {
        let mut player = NavigationPlayer::new(DELAY);
        let (_, ticket) = speak_text(&player.start(NavigationScript::for_name("garden")));
        let now = Instant::now();
        player.step_spoken(ticket, now);

        player.stop();

        assert!(!player.is_active());
        assert_eq!(player.deadline(), None);
        assert_eq!(player.on_due(now + DELAY), None);
    }

    #[test]
    fn completion_from_previous_trip_is_ignored() {
        let mut player = NavigationPlayer::new(DELAY);
        let (_, old) = speak_text(&player.start(NavigationScript::for_name("hospital")));
        let (text, _) = speak_text(&player.start(NavigationScript::for_name("home")));
        assert_eq!(text, "Turn right at the end of the road.");

        assert!(!player.step_spoken(old, Instant::now()));
        assert_eq!(player.deadline(), None);
        assert_eq!(player.destination(), Some("home"));
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut player = NavigationPlayer::new(DELAY);
        let (_, ticket) = speak_text(&player.start(NavigationScript::for_name("home")));
        let now = Instant::now();
        assert!(player.step_spoken(ticket, now));
        assert!(!player.step_spoken(ticket, now + Duration::from_secs(1)));
        assert_eq!(player.deadline(), Some(now + DELAY));
    }
}
