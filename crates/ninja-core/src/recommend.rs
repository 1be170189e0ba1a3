use crate::inspector::FactSheet;
use crate::presets::{
    BACKEND_API, FRONTEND_DEVELOPMENT, FULLSTACK_DEVELOPMENT, TEAM_COLLABORATION,
    TECHNICAL_ANALYSIS, TEST_AUTOMATION,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PresetSuggestion (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSuggestion {
    pub preset: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// What a rule sees: the fact sheet plus every suggestion emitted by earlier
/// rules in the same pass.
pub struct RuleContext<'a> {
    pub facts: &'a FactSheet,
    pub suggested: &'a [PresetSuggestion],
}

impl RuleContext<'_> {
    pub fn already_suggested(&self, preset: &str) -> bool {
        self.suggested.iter().any(|s| s.preset == preset)
    }
}

pub struct SuggestionRule {
    pub id: &'static str,
    pub preset: &'static str,
    pub confidence: f64,
    pub reason: &'static str,
    pub condition: fn(&RuleContext) -> bool,
}

pub const FRONTEND_SIGNALS: &[&str] = &["react", "vue", "angular"];
pub const BACKEND_SIGNALS: &[&str] = &["express", "fastify", "koa"];
pub const TESTING_SIGNALS: &[&str] = &["jest", "mocha", "cypress", "playwright"];
pub const PLANNING_SIGNALS: &[&str] = &["planning", "requirements"];

/// More than this many team indicators suggests a shared-conventions team.
pub const TEAM_INDICATOR_THRESHOLD: usize = 2;

/// Rules in evaluation order. Equal confidences keep this order after sorting.
pub fn default_rules() -> Vec<SuggestionRule> {
    vec![
        SuggestionRule {
            id: "frontend_framework",
            preset: FRONTEND_DEVELOPMENT,
            confidence: 0.90,
            reason: "Detected React/Vue/Angular framework",
            condition: |ctx| ctx.facts.has_any_framework(FRONTEND_SIGNALS),
        },
        SuggestionRule {
            id: "backend_framework",
            preset: BACKEND_API,
            confidence: 0.85,
            reason: "Detected API framework",
            condition: |ctx| ctx.facts.has_any_framework(BACKEND_SIGNALS),
        },
        SuggestionRule {
            id: "planning_activity",
            preset: TECHNICAL_ANALYSIS,
            confidence: 0.75,
            reason: "Recent planning activity detected",
            condition: |ctx| ctx.facts.has_recent_activity(PLANNING_SIGNALS),
        },
        // Derived from earlier output, not from the fact sheet.
        SuggestionRule {
            id: "fullstack",
            preset: FULLSTACK_DEVELOPMENT,
            confidence: 0.95,
            reason: "Detected both frontend and backend components",
            condition: |ctx| {
                ctx.already_suggested(FRONTEND_DEVELOPMENT) && ctx.already_suggested(BACKEND_API)
            },
        },
        SuggestionRule {
            id: "testing_framework",
            preset: TEST_AUTOMATION,
            confidence: 0.80,
            reason: "Detected testing frameworks",
            condition: |ctx| ctx.facts.has_any_framework(TESTING_SIGNALS),
        },
        SuggestionRule {
            id: "team_conventions",
            preset: TEAM_COLLABORATION,
            confidence: 0.70,
            reason: "Strong team collaboration indicators detected",
            condition: |ctx| ctx.facts.team_indicators.len() > TEAM_INDICATOR_THRESHOLD,
        },
    ]
}

// ---------------------------------------------------------------------------
// Recommender
// ---------------------------------------------------------------------------

pub struct Recommender {
    rules: Vec<SuggestionRule>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Recommender {
    pub fn new(rules: Vec<SuggestionRule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule (no early exit) and return the hits sorted by
    /// confidence, highest first. No hits is an empty list, not an error.
    pub fn suggest(&self, facts: &FactSheet) -> Vec<PresetSuggestion> {
        let mut suggestions: Vec<PresetSuggestion> = Vec::new();
        for rule in &self.rules {
            let ctx = RuleContext {
                facts,
                suggested: &suggestions,
            };
            if (rule.condition)(&ctx) {
                tracing::debug!(rule = rule.id, preset = rule.preset, "suggestion rule matched");
                suggestions.push(PresetSuggestion {
                    preset: rule.preset.to_string(),
                    confidence: rule.confidence,
                    reason: rule.reason.to_string(),
                });
            }
        }
        // Stable: ties stay in rule order.
        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        suggestions
    }
}

/// Run the default rule table.
pub fn suggest(facts: &FactSheet) -> Vec<PresetSuggestion> {
    Recommender::default().suggest(facts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
