//! Rule tables for the weather predictor.
//!
//! Base rules are evaluated top to bottom and the first match wins, so the
//! order of [`BASE_RULES`] is part of the behaviour. Adjustments are applied
//! afterwards, every one whose condition holds, in table order.

pub const CLEAR: &str = "Clear";
pub const CLOUDS: &str = "Clouds";
pub const RAIN: &str = "Rain";
pub const DRIZZLE: &str = "Drizzle";

/// Weight given to categories no rule assigned
pub const FLOOR_WEIGHT: f64 = 0.01;

/// Resolved inputs the rules are evaluated against
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conditions {
    pub temperature: f64,
    pub humidity: f64,
    pub hour: u8,
    pub month: u8,
}

pub struct Rule {
    pub name: &'static str,
    matches: fn(&Conditions) -> bool,
    pub weights: &'static [(&'static str, f64)],
}

impl Rule {
    pub fn matches(&self, conditions: &Conditions) -> bool {
        (self.matches)(conditions)
    }
}

pub struct Adjustment {
    pub name: &'static str,
    applies: fn(&Conditions) -> bool,
    pub factors: &'static [(&'static str, f64)],
}

impl Adjustment {
    pub fn applies(&self, conditions: &Conditions) -> bool {
        (self.applies)(conditions)
    }
}

// All comparisons are strict: 30.0 / 50.0 does not count as hot and dry.
pub const BASE_RULES: &[Rule] = &[
    Rule {
        name: "hot_and_dry",
        matches: |c| c.temperature > 30.0 && c.humidity < 50.0,
        weights: &[(CLEAR, 0.7), (CLOUDS, 0.2), (RAIN, 0.1)],
    },
    Rule {
        name: "warm_and_humid",
        matches: |c| c.temperature > 25.0 && c.humidity > 75.0,
        weights: &[(RAIN, 0.5), (CLOUDS, 0.3), (DRIZZLE, 0.2)],
    },
    Rule {
        name: "very_humid",
        matches: |c| c.humidity > 80.0,
        weights: &[(RAIN, 0.4), (CLOUDS, 0.4), (DRIZZLE, 0.2)],
    },
    // Same weights as the default; kept as its own row so it can be tuned separately.
    Rule {
        name: "cool",
        matches: |c| c.temperature < 20.0,
        weights: &[(CLOUDS, 0.5), (CLEAR, 0.3), (RAIN, 0.2)],
    },
    Rule {
        name: "default",
        matches: |_| true,
        weights: &[(CLOUDS, 0.5), (CLEAR, 0.3), (RAIN, 0.2)],
    },
];

pub const RAINY_SEASON: [u8; 5] = [5, 6, 7, 8, 9];

pub const ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        name: "night",
        applies: |c| c.hour >= 18 || c.hour <= 6,
        factors: &[(RAIN, 1.2), (CLEAR, 0.8)],
    },
    Adjustment {
        name: "rainy_season",
        applies: |c| RAINY_SEASON.contains(&c.month),
        factors: &[(RAIN, 1.3), (CLEAR, 0.7)],
    },
];

/// First base rule whose condition holds; the last rule always matches
pub fn select_rule(conditions: &Conditions) -> &'static Rule {
    BASE_RULES
        .iter()
        .find(|rule| rule.matches(conditions))
        .unwrap_or(&BASE_RULES[BASE_RULES.len() - 1])
}

pub fn active_adjustments(conditions: &Conditions) -> impl Iterator<Item = &'static Adjustment> + '_ {
    ADJUSTMENTS.iter().filter(move |adj| adj.applies(conditions))
}
