// src/fake_job/rules.rs
//! Regex rule catalog for scam-posting signals, one weight per category

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    UpfrontPayment,
    PersonalInfoRequest,
    UnrealisticSalary,
    PyramidScheme,
    OffPlatformContact,
    FreeEmailDomain,
    UrgencyPressure,
    VagueOffer,
    MissingCompany,
    ShortDescription,
    ExcessiveCapitals,
    ExcessivePunctuation,
    SalaryRangeInverted,
    ImplausibleSalary,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&name)
    }
}

/// Rule as written in a TOML catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub category: RuleCategory,
    pub weight: f64,
    pub description: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: RuleCategory,
    pub weight: f64,
    pub description: String,
    patterns: Vec<Regex>,
}

impl PatternRule {
    pub fn compile(definition: RuleDefinition) -> Result<Self> {
        if definition.weight < 0.0 {
            anyhow::bail!(
                "Rule {} has a negative weight: {}",
                definition.category,
                definition.weight
            );
        }
        if definition.patterns.is_empty() {
            anyhow::bail!("Rule {} has no patterns", definition.category);
        }

        let patterns = definition
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| {
                        format!(
                            "Invalid pattern for rule {}: {}",
                            definition.category, pattern
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            category: definition.category,
            weight: definition.weight,
            description: definition.description,
            patterns,
        })
    }

    /// First match across this rule's patterns, in pattern order
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.find(text).map(|m| m.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn builtin() -> Result<Self> {
        Self::from_definitions(builtin_definitions())
    }

    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> Result<Self> {
        let rules = definitions
            .into_iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content).context("Failed to parse rule catalog")?;
        Self::from_definitions(file.rules)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule catalog: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid rule catalog: {}", path.display()))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn definition(
    category: RuleCategory,
    weight: f64,
    description: &str,
    patterns: &[&str],
) -> RuleDefinition {
    RuleDefinition {
        category,
        weight,
        description: description.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
}

fn builtin_definitions() -> Vec<RuleDefinition> {
    vec![
        definition(
            RuleCategory::UpfrontPayment,
            25.0,
            "Asks the applicant to pay before starting",
            &[
                r"\b(registration|application|training|processing|onboarding|starter[- ]kit)\s+fees?\b",
                r"\bpay\s+(a|an|the)?\s*(small\s+|one[- ]time\s+)?(fee|deposit)\b",
                r"\bupfront\s+(payment|fee|cost)s?\b",
                r"\b(buy|purchase)\s+(your\s+own\s+)?(starter\s+kit|equipment|software)\s+(before|to\s+start)\b",
            ],
        ),
        definition(
            RuleCategory::PersonalInfoRequest,
            25.0,
            "Requests sensitive personal or financial details",
            &[
                r"\bbank\s+(account|details|information|login)\b",
                r"\b(social\s+security(\s+number)?|ssn)\b",
                r"\bcredit\s+card\b",
                r"\bpassport\s+(copy|number|details|scan)\b",
                r"\bdriver'?s?\s+licen[cs]e\s+(copy|number|scan)\b",
            ],
        ),
        definition(
            RuleCategory::UnrealisticSalary,
            20.0,
            "Promises unrealistic or guaranteed earnings",
            &[
                r"\b(earn|make)\s+(up\s+to\s+)?\$\s?\d[\d,]*\s*\+?\s*(per|a|/|every)\s*(day|week)\b",
                r"\bunlimited\s+(earning|earnings|income)\b",
                r"\bget\s+rich\b",
                r"\bguaranteed\s+(income|salary|earnings|pay)\b",
                r"\b(six|6)[- ]figure\s+income\s+(from\s+home|in\s+weeks)\b",
            ],
        ),
        definition(
            RuleCategory::PyramidScheme,
            20.0,
            "Describes recruitment-driven or commission-only schemes",
            &[
                r"\bmulti[- ]level\s+marketing\b",
                r"\bmlm\b",
                r"\bpyramid\b",
                r"\brecruit\s+(your\s+)?(friends|family|others)\b",
                r"\bcommission[- ]only\b",
                r"\bbuild\s+your\s+(own\s+)?downline\b",
            ],
        ),
        definition(
            RuleCategory::OffPlatformContact,
            15.0,
            "Moves the conversation to chat apps",
            &[
                r"\b(whatsapp|telegram|wechat|signal\s+app)\b",
                r"\btext\s+(me|us)\s+(at|on)\b",
                r"\b(skype|chat)\s+interview\b",
            ],
        ),
        definition(
            RuleCategory::FreeEmailDomain,
            15.0,
            "Uses a free personal email domain for recruiting",
            &[r"[a-z0-9._%+-]+@(gmail|yahoo|hotmail|outlook|aol|ymail|protonmail)\.[a-z.]{2,6}"],
        ),
        definition(
            RuleCategory::UrgencyPressure,
            10.0,
            "Pressures applicants to act immediately",
            &[
                r"\burgent(ly)?\s+(hiring|needed|required)\b",
                r"\bimmediate(ly)?\s+(start|hire|hiring)\b",
                r"\blimited\s+(slots|spots|positions|openings)\b",
                r"\b(act|apply)\s+now\b",
                r"\bonly\s+\d+\s+(slots|spots|positions)\s+left\b",
            ],
        ),
        definition(
            RuleCategory::VagueOffer,
            10.0,
            "Too-good-to-be-true, vague offer",
            &[
                r"\bno\s+experience\s+(needed|required|necessary)\b",
                r"\beasy\s+money\b",
                r"\bbe\s+your\s+own\s+boss\b",
                r"\bwork\s+(only\s+)?\d+\s+hours?\s+(a|per)\s+week\b",
                r"\bno\s+interview\s+(needed|required)\b",
            ],
        ),
    ]
}
