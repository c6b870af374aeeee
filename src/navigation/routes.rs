//! Fixed destination vocabulary and narration scripts.

use crate::stt::Transcript;

/// Spoken when a destination has no script.
pub const APOLOGY_STEP: &str = "I'm sorry, I don't have directions for that destination.";

/// Destinations the assistant knows directions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Hospital,
    MedicalStore,
    Home,
    Garden,
}

impl Destination {
    pub const ALL: [Destination; 4] = [
        Destination::Hospital,
        Destination::MedicalStore,
        Destination::Home,
        Destination::Garden,
    ];

    /// Find a destination mentioned in `transcript`.
    ///
    /// Keywords are checked in a fixed order; "store" alone is enough for the
    /// medical store.
    pub fn resolve(transcript: &Transcript) -> Option<Self> {
        if transcript.contains("hospital") {
            Some(Destination::Hospital)
        } else if transcript.contains("store") {
            Some(Destination::MedicalStore)
        } else if transcript.contains("home") {
            Some(Destination::Home)
        } else if transcript.contains("garden") {
            Some(Destination::Garden)
        } else {
            None
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Destination::Hospital => "hospital",
            Destination::MedicalStore => "medical store",
            Destination::Home => "home",
            Destination::Garden => "garden",
        }
    }

    pub fn steps(self) -> &'static [&'static str] {
        match self {
            Destination::Hospital => &[
                "Proceed straight for 200 meters.",
                "Turn left at the next intersection.",
                "The hospital is on your right.",
                "You have reached your destination.",
            ],
            Destination::MedicalStore => {
                &["Take 5 steps ahead.", "The medical store is on your left."]
            }
            Destination::Home => &[
                "Turn right at the end of the road.",
                "Take 10 steps ahead.",
                "Your home is in front of you.",
            ],
            Destination::Garden => &[
                "Walk 5 steps ahead to the zebra crossing.",
                "Cross the road.",
                "The garden is on your right.",
            ],
        }
    }
}

/// Ordered narration for one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationScript {
    destination: String,
    steps: Vec<&'static str>,
}

impl NavigationScript {
    /// Script for a destination name; unknown names get a single apology step.
    ///
    /// ```
    /// use vision_assist::navigation::NavigationScript;
    ///
    /// assert_eq!(NavigationScript::for_name("hospital").len(), 4);
    /// assert_eq!(NavigationScript::for_name("zoo").len(), 1);
    /// ```
    pub fn for_name(name: &str) -> Self {
        match Destination::from_name(name) {
            Some(destination) => Self::for_destination(destination),
            None => Self {
                destination: name.trim().to_string(),
                steps: vec![APOLOGY_STEP],
            },
        }
    }

    pub fn for_destination(destination: Destination) -> Self {
        Self {
            destination: destination.name().to_string(),
            steps: destination.steps().to_vec(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn step(&self, index: usize) -> Option<&'static str> {
        self.steps.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
