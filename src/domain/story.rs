//! Narrative copy shown by the two scenes.

/// Steps of the "With Simbian" walkthrough. StepIndex == STEP_COUNT means done.
pub const STEP_COUNT: i8 = 5;

#[derive(Clone, Copy, Debug)]
pub struct Beat {
    pub title: &'static str,
    pub description: &'static str,
}

pub const PROBLEMS: [Beat; 3] = [
    Beat {
        title: "Wasting valuable analyst time",
        description: "Wasting valuable analyst time on false positives",
    },
    Beat {
        title: "Processing one alert at a time",
        description: "Processing one alert at a time, missing the big picture",
    },
    Beat {
        title: "More time fixing SOAR automation",
        description: "More time fixing SOAR automation, less time on real threats",
    },
];

pub const STEPS: [Beat; STEP_COUNT as usize] = [
    Beat {
        title: "Triaged & Reported",
        description: "SOC Agent handled investigation and reporting",
    },
    Beat {
        title: "Automated Response",
        description: "Incident automatically contained",
    },
    Beat {
        title: "Comprehensive Analysis",
        description: "AI recognized patterns",
    },
    Beat {
        title: "Accurate Detection",
        description: "Zero false positives",
    },
    Beat {
        title: "24/7 Coverage",
        description: "No analyst fatigue",
    },
];

pub const SOLUTIONS: [Beat; 3] = [
    Beat {
        title: "Less noise",
        description: "90% of alerts resolved automatically, 24/7",
    },
    Beat {
        title: "Holistic insight",
        description: "Correlates alerts to your environment",
    },
    Beat {
        title: "Adapts automatically",
        description: "Investigate every alert, no SOAR needed",
    },
];

pub const WITHOUT_HEADLINE: &str = "Without Simbian";
pub const WITHOUT_TAGLINE: &str = "If this sounds all too familiar, you might want to...";
pub const SUPERVISOR_TITLE: &str = "Asking Supervisor";
pub const SUPERVISOR_CAPTION: &str = "The analyst is in training and needs some help...";

pub const WITH_HEADLINE: &str = "With Simbian";
pub const WITH_TAGLINE: &str = "Relax. Our AI Agents will take it from here.";

pub const NAV_ITEMS: [&str; 4] = ["Products", "Company", "Resources", "Blog"];
