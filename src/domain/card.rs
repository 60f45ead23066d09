//! The three alert cards of the "Without Simbian" scene.
//! Identity decides tick period, baseline, vocabulary and role, so all of
//! that is answered here by methods rather than stored per instance.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CardKind {
    IgnoredAlerts,
    WronglyClosed,
    ActiveThreats,
}

/// Accent used by the renderer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Blue,
    Red,
}

impl CardKind {
    pub const ALL: [CardKind; 3] = [
        CardKind::IgnoredAlerts,
        CardKind::WronglyClosed,
        CardKind::ActiveThreats,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CardKind::IgnoredAlerts => "Ignored Alerts",
            CardKind::WronglyClosed => "Wrongly Closed",
            CardKind::ActiveThreats => "Active Threats",
        }
    }

    /// Default tick period in ms (overridable from config).
    pub fn default_period_ms(self) -> u64 {
        match self {
            CardKind::ActiveThreats => 7000,
            CardKind::WronglyClosed => 5000,
            CardKind::IgnoredAlerts => 4000,
        }
    }

    /// Count shown when the card mounts. "Active Threats" shows the scene's
    /// live counter instead, which starts at this value.
    pub fn baseline(self) -> u32 {
        match self {
            CardKind::IgnoredAlerts => 200,
            CardKind::WronglyClosed => 35,
            CardKind::ActiveThreats => 5,
        }
    }

    /// Cards that broadcast a notification on every tick.
    pub fn propagates(self) -> bool {
        !self.is_threats()
    }

    /// The threats card is the only listener and the only one with an alert log.
    #[inline]
    pub fn is_threats(self) -> bool {
        self == CardKind::ActiveThreats
    }

    pub fn tone(self) -> Tone {
        if self.is_threats() { Tone::Red } else { Tone::Blue }
    }

    pub fn vocabulary(self) -> &'static [&'static str; 5] {
        match self {
            CardKind::IgnoredAlerts => &[
                "Phishing Email Detected",
                "Suspicious Login Attempt",
                "Potential Malware",
                "Unusual Network Activity",
                "Unrecognized Device",
            ],
            CardKind::WronglyClosed => &[
                "False Positive Confirmed",
                "Analyst Error",
                "Miscategorized Alert",
                "Investigation Incomplete",
                "Premature Closure",
            ],
            CardKind::ActiveThreats => &[
                "Data Exfiltration Attempt",
                "Ransomware Detected",
                "Privilege Escalation",
                "Zero-day Exploit",
                "APT Activity",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_follow_card_identity() {
        assert_eq!(CardKind::ActiveThreats.default_period_ms(), 7000);
        assert_eq!(CardKind::WronglyClosed.default_period_ms(), 5000);
        assert_eq!(CardKind::IgnoredAlerts.default_period_ms(), 4000);
    }

    #[test]
    fn only_threats_listens() {
        let listeners: Vec<CardKind> =
            CardKind::ALL.into_iter().filter(|k| k.is_threats()).collect();
        assert_eq!(listeners, vec![CardKind::ActiveThreats]);
        assert!(CardKind::IgnoredAlerts.propagates());
        assert!(CardKind::WronglyClosed.propagates());
        assert!(!CardKind::ActiveThreats.propagates());
    }

    #[test]
    fn baselines() {
        assert_eq!(CardKind::IgnoredAlerts.baseline(), 200);
        assert_eq!(CardKind::WronglyClosed.baseline(), 35);
        assert_eq!(CardKind::ActiveThreats.baseline(), 5);
    }
}
