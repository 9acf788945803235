//! The [`Analyzer`] runs every stage over one sentence.

use layered_svoc_lexicon::Lexicon;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::chain_enforcer::VerbChainEnforcer;
use crate::clause::ClauseTree;
use crate::config::EngineConfig;
use crate::display::TreeDisplay;
use crate::errors::IngestResult;
use crate::gap_detector::GapDetector;
use crate::invariants::{InvariantValidator, ViolationReport};
use crate::parenthetical::ParentheticalMarker;
use crate::pattern::PatternClassifier;
use crate::predicate_group::PredicateGrouper;
use crate::record::LabelerOutput;
use crate::repair::{RepairLog, RepairLoop};
use crate::role_normalizer::RoleNormalizer;
use crate::span_reconciler::SpanReconciler;
use crate::syntax_tests::{SyntaxTestEvidence, SyntaxTestRunner};
use crate::token::{Token, Tokenizer};
use crate::verb_chain::{prompt_summary, VerbChain, VerbChainResolver};

/// Fixes applied by each stage of one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub spans_fixed: usize,
    pub spans_unresolved: usize,
    pub roles_normalized: usize,
    pub chains_enforced: usize,
    pub insertions_marked: usize,
    pub pattern_fixes: usize,
    pub groups_stamped: usize,
    pub repair_actions: usize,
    pub labels_rewritten: usize,
}

/// Everything known before the labeler is asked.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub tokens: Vec<Token>,
    pub chains: Vec<VerbChain>,
    /// Chain description handed to the labeling prompt.
    pub prompt_summary: String,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub tree: ClauseTree,
    pub tokens: Vec<Token>,
    pub chains: Vec<VerbChain>,
    pub report: ViolationReport,
    pub repair_log: RepairLog,
    pub evidence: Vec<SyntaxTestEvidence>,
    pub stats: PipelineStats,
}

impl Analysis {
    /// The repaired tree in the labeler's record shape.
    pub fn to_output(&self) -> LabelerOutput {
        self.tree.to_output()
    }
}

/// Holds only read-only state, so one analyzer can serve many threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(lexicon: Arc<Lexicon>, config: EngineConfig) -> Self {
        Self { lexicon, config }
    }

    /// Built-in English tables with the default configuration.
    pub fn standard() -> Self {
        Self::new(Lexicon::shared(), EngineConfig::standard())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn shared_lexicon(&self) -> Arc<Lexicon> {
        Arc::clone(&self.lexicon)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn prepare(&self, sentence: &str) -> Prepared {
        let tokens = Tokenizer::new(&self.lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&self.lexicon)
            .with_max_parenthetical_tokens(self.config.max_parenthetical_tokens)
            .resolve(sentence, &tokens);
        debug!(tokens = tokens.len(), chains = chains.len(), "prepared sentence");
        let prompt_summary = prompt_summary(&chains);
        Prepared {
            tokens,
            chains,
            prompt_summary,
        }
    }

    pub fn analyze_json(&self, sentence: &str, json: &str) -> IngestResult<Analysis> {
        let output = LabelerOutput::from_json(json)?;
        self.analyze(sentence, &output)
    }

    pub fn analyze(&self, sentence: &str, output: &LabelerOutput) -> IngestResult<Analysis> {
        let mut tree = ClauseTree::from_records(&output.clauses)?;
        let Prepared { tokens, chains, .. } = self.prepare(sentence);
        let lexicon: &Lexicon = &self.lexicon;
        let mut stats = PipelineStats::default();

        let reconciler = SpanReconciler::new(sentence, &self.config.reconcile);
        for clause in tree.iter_mut() {
            let outcome = reconciler.reconcile(&mut clause.elements);
            stats.spans_fixed += outcome.fixed;
            stats.spans_unresolved += outcome.unresolved;
            stats.roles_normalized += RoleNormalizer::normalize(&mut clause.elements);
        }
        debug!(
            fixed = stats.spans_fixed,
            unresolved = stats.spans_unresolved,
            "span reconciliation"
        );
        debug!(changed = stats.roles_normalized, "role normalization");

        let marker = ParentheticalMarker::new(sentence, &chains);
        let classifier = PatternClassifier::new(sentence, lexicon, &chains);
        let grouper = PredicateGrouper::new(lexicon, &chains);
        stats.chains_enforced = VerbChainEnforcer::new(sentence, lexicon, &chains).enforce(&mut tree);
        stats.insertions_marked = marker.mark(&mut tree);
        stats.pattern_fixes = classifier.classify(&mut tree);
        stats.groups_stamped = grouper.stamp(&mut tree);

        let (mut report, repair_log) = RepairLoop::new(sentence, lexicon, &chains, &self.config).run(&mut tree);
        stats.repair_actions = repair_log.actions.len();
        if !repair_log.is_empty() {
            // repairs can split, merge or relabel elements, which moves
            // insertions, patterns and groups
            stats.insertions_marked += marker.mark(&mut tree);
            stats.pattern_fixes += classifier.classify(&mut tree);
            stats.groups_stamped += grouper.stamp(&mut tree);
            report = InvariantValidator::new(sentence, lexicon, &chains).validate(&tree);
        }

        stats.labels_rewritten =
            GapDetector::new(sentence, lexicon, &chains).fix_long_distance_extraction(&mut tree);
        let evidence = SyntaxTestRunner::new(sentence, lexicon, &chains).run(&tree);
        debug!(
            valid = report.valid,
            violations = report.violations.len(),
            evidence = evidence.len(),
            "analysis complete"
        );
        trace!(tree = %TreeDisplay::new(sentence, &tree), "analyzed tree");

        Ok(Analysis {
            tree,
            tokens,
            chains,
            report,
            repair_log,
            evidence,
            stats,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::standard()
    }
}
