use serde::Serialize;

/// A named team-strength level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrengthLevel {
    pub value: u8,
    pub label: &'static str,
    pub short: &'static str,
}

/// The ten self-reported strength levels, weakest first
pub const STRENGTH_LEVELS: [StrengthLevel; 10] = [
    StrengthLevel {
        value: 1,
        label: "Neu am Start",
        short: "Frisch gegründetes Team, sucht erste Gegner zum Reinschnuppern.",
    },
    StrengthLevel {
        value: 2,
        label: "Aufbauphase",
        short: "Wir sammeln Spielpraxis und finden uns als Team.",
    },
    StrengthLevel {
        value: 3,
        label: "In Entwicklung",
        short: "Schon etwas Erfahrung, aber noch unkonstant.",
    },
    StrengthLevel {
        value: 4,
        label: "Stabil im Aufbau",
        short: "Wir halten gut mit und werden konstanter.",
    },
    StrengthLevel {
        value: 5,
        label: "Solide eingespielt",
        short: "Konstante Leistungen, gute Teamchemie.",
    },
    StrengthLevel {
        value: 6,
        label: "Wettbewerbsfähig",
        short: "Spielen regelmäßig auf Augenhöhe mit guten Teams.",
    },
    StrengthLevel {
        value: 7,
        label: "Leistungsorientiert",
        short: "Ambitioniert, trainiert regelmäßig und strukturiert.",
    },
    StrengthLevel {
        value: 8,
        label: "Starkes Leistungs-Team",
        short: "Auf hohem Niveau unterwegs, sucht echte Herausforderungen.",
    },
    StrengthLevel {
        value: 9,
        label: "Top-Team im Kreis",
        short: "Kaum schwache Spiele, sucht Gegner auf Augenhöhe.",
    },
    StrengthLevel {
        value: 10,
        label: "Elite-Niveau",
        short: "Spielt regelmäßig gegen Auswahl- oder NLZ-Teams.",
    },
];

/// Level for a strength value, rounded and clamped to 1..=10
pub fn strength_level(value: f64) -> Option<&'static StrengthLevel> {
    if !value.is_finite() {
        return None;
    }
    let clamped = value.round().clamp(1.0, 10.0) as usize;
    STRENGTH_LEVELS.get(clamped - 1)
}
