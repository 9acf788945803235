//! Runs fixtures through the [`Analyzer`] and compares the result.

use layered_svoc::{Analysis, Analyzer, Element, SentencePattern};
use std::fmt;

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{ClauseExpectation, SvocFixture};

/// One expectation the analysis did not meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub clause: String,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}.{}\n    expected: {}\n    actual:   {}",
            self.clause, self.field, self.expected, self.actual
        )
    }
}

#[derive(Debug)]
pub struct FixtureOutcome {
    pub analysis: Analysis,
    pub mismatches: Vec<Mismatch>,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// `Role:text`, or `Role:_` when elided.
pub fn render_element(element: &Element) -> String {
    if element.is_elided() {
        format!("{}:_", element.role)
    } else {
        format!("{}:{}", element.role, element.text)
    }
}

/// Analyze the fixture with `analyzer`, or with a fresh analyzer over the
/// same lexicon when the fixture carries its own config.
pub fn run_fixture(analyzer: &Analyzer, fixture: &SvocFixture) -> SpecResult<FixtureOutcome> {
    let analysis = match &fixture.config {
        Some(config) => Analyzer::new(analyzer.shared_lexicon(), config.clone())
            .analyze(&fixture.sentence, &fixture.labeler)?,
        None => analyzer.analyze(&fixture.sentence, &fixture.labeler)?,
    };
    let mismatches = check_fixture(fixture, &analysis);
    Ok(FixtureOutcome {
        analysis,
        mismatches,
    })
}

/// Run the fixture and fail with every mismatch listed.
pub fn assert_fixture(analyzer: &Analyzer, fixture: &SvocFixture) -> SpecResult<()> {
    let outcome = run_fixture(analyzer, fixture)?;
    if outcome.passed() {
        return Ok(());
    }
    Err(SpecError::Mismatch {
        fixture: fixture.name().to_string(),
        count: outcome.mismatches.len(),
        details: outcome
            .mismatches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

pub fn check_fixture(fixture: &SvocFixture, analysis: &Analysis) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    if let Some(valid) = fixture.valid {
        if analysis.report.valid != valid {
            let errors: Vec<_> = analysis.report.errors().map(|v| v.code.as_str()).collect();
            mismatches.push(Mismatch {
                clause: "*".to_string(),
                field: "valid",
                expected: valid.to_string(),
                actual: format!("{} {:?}", analysis.report.valid, errors),
            });
        }
    }
    for expectation in &fixture.expect {
        check_clause(expectation, analysis, &mut mismatches);
    }
    mismatches
}

fn check_clause(expectation: &ClauseExpectation, analysis: &Analysis, out: &mut Vec<Mismatch>) {
    let mut push = |field, expected: String, actual: String| {
        out.push(Mismatch {
            clause: expectation.clause.clone(),
            field,
            expected,
            actual,
        })
    };
    let Some(clause) = analysis.tree.get(&expectation.clause) else {
        push("id", expectation.clause.clone(), "<missing>".to_string());
        return;
    };

    if let Some(expected) = &expectation.elements {
        let actual: Vec<String> = clause.elements.iter().map(render_element).collect();
        if &actual != expected {
            push("elements", expected.join(" | "), actual.join(" | "));
        }
    }
    if let Some(number) = expectation.pattern {
        let actual = clause.pattern.map(|p| p.number());
        if actual != Some(number) {
            let describe = |n: Option<u8>| match n.and_then(SentencePattern::from_number) {
                Some(pattern) => format!("{} ({})", pattern.number(), pattern),
                None => format!("{:?}", n),
            };
            push("pattern", describe(Some(number)), describe(actual));
        }
    }
    if let Some(needle) = &expectation.label_contains {
        let label = clause.label.clone().unwrap_or_default();
        if !label.contains(needle.as_str()) {
            push("label", format!("contains {:?}", needle), format!("{:?}", label));
        }
    }
}
