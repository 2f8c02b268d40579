use std::fmt;

const RULE_WIDTH: usize = 60;

/// Terminal verdict for one stage.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub valid: bool,
    pub message: String,
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Syntax,
    Domain,
    MxRecords,
    Smtp,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Domain => "domain",
            Self::MxRecords => "mx_records",
            Self::Smtp => "smtp",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Syntax => "SYNTAX",
            Self::Domain => "DOMAIN",
            Self::MxRecords => "MX_RECORDS",
            Self::Smtp => "SMTP",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage verdicts in execution order. Serialises as a JSON object whose keys
/// keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checks {
    entries: Vec<(Stage, CheckResult)>,
}

impl Checks {
    pub fn get(&self, stage: Stage) -> Option<&CheckResult> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, result)| result)
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.get(stage).is_some()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.entries.iter().map(|(stage, _)| *stage).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, &CheckResult)> {
        self.entries.iter().map(|(stage, result)| (*stage, result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, stage: Stage, result: CheckResult) {
        debug_assert!(!self.contains(stage), "stage {stage} recorded twice");
        self.entries.push((stage, result));
    }
}

#[cfg(feature = "with-serde")]
impl serde::Serialize for Checks {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (stage, result) in &self.entries {
            map.serialize_entry(stage.as_str(), result)?;
        }
        map.end()
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub email: String,
    pub overall_valid: bool,
    pub checks: Checks,
}

impl ValidationReport {
    pub(crate) fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            overall_valid: true,
            checks: Checks::default(),
        }
    }

    /// Append a stage verdict and fold it into `overall_valid`. Returns the
    /// stage's own verdict so callers can short-circuit on it.
    pub(crate) fn record(&mut self, stage: Stage, result: CheckResult) -> bool {
        let valid = result.valid;
        self.overall_valid &= valid;
        self.checks.push(stage, result);
        valid
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(
            f,
            "Overall Valid: {}",
            if self.overall_valid { "✓ YES" } else { "✗ NO" }
        )?;
        write!(f, "{rule}")?;
        for (stage, result) in self.checks.iter() {
            let status = if result.valid { '✓' } else { '✗' };
            write!(f, "\n{status} {}: {}", stage.label(), result.message)?;
        }
        Ok(())
    }
}
