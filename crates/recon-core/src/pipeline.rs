use std::fmt;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::classify::{Classifier, Rule};
use crate::config::AccountConfig;
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::{Provider, Statement, Transaction};
use crate::parsing::assemble::assemble;
use crate::parsing::dates::resolve_record_dates;
use crate::period::MonthRange;
use crate::providers::{adapter_for, StatementAdapter};
use crate::validate::validate;

/// The step of a pipeline run, reported when a statement fails.
///
/// Classification has no variant: the rule table always ends in a fallback,
/// so that step cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Header,
    Segmentation,
    Assembly,
    DateResolution,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Header => write!(f, "header"),
            Stage::Segmentation => write!(f, "segmentation"),
            Stage::Assembly => write!(f, "assembly"),
            Stage::DateResolution => write!(f, "date resolution"),
            Stage::Validation => write!(f, "validation"),
        }
    }
}

/// One statement pipeline, parameterized by a provider adapter.
///
/// Stateless between runs: the same pages always produce the same statement.
pub struct Pipeline {
    adapter: Box<dyn StatementAdapter>,
    /// Account rules, consulted before the adapter's built-in rules.
    rules: Vec<Rule>,
}

impl Pipeline {
    pub fn new(adapter: Box<dyn StatementAdapter>) -> Self {
        Pipeline {
            adapter,
            rules: Vec::new(),
        }
    }

    pub fn for_provider(provider: Provider) -> Self {
        Self::new(adapter_for(provider))
    }

    /// Pipeline for a configured account, with its extra rules.
    pub fn for_account(account: &AccountConfig) -> Self {
        Self::for_provider(account.provider).with_rules(account.rules.iter().map(Rule::from).collect())
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn provider(&self) -> Provider {
        self.adapter.provider()
    }

    /// Parse only the statement period.
    pub fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        self.adapter
            .month_range(pages)
            .map_err(|e| e.at(Stage::Header))
    }

    /// Run every stage over a statement's pages.
    pub fn run(&self, pages: &[PageContent]) -> Result<Statement, ReconError> {
        let provider = self.provider();
        let _span = info_span!("statement", %provider, pages = pages.len()).entered();

        let month_range = self.month_range(pages)?;
        let totals = self
            .adapter
            .control_totals(pages)
            .map_err(|e| e.at(Stage::Header))?;
        debug!(%month_range, ?totals, "header parsed");

        let lines = self
            .adapter
            .region_lines(pages)
            .map_err(|e| e.at(Stage::Segmentation))?;
        debug!(lines = lines.len(), "regions segmented");

        let records = assemble(&lines, |line| self.adapter.read_line(line))
            .map_err(|e| e.at(Stage::Assembly))?;
        debug!(records = records.len(), "records assembled");

        let dated = resolve_record_dates(records, &month_range)
            .map_err(|e| e.at(Stage::DateResolution))?;

        let classifier = Classifier::new(self.rule_table(), self.adapter.fallback(), &month_range);
        let mut transactions: Vec<Transaction> = dated
            .into_iter()
            .map(|record| {
                let (amount, kind) = classifier.classify(record.amount, &record.description);
                let description = self.adapter.tidy_description(&record.description);
                Transaction::new(record.date, &description, amount, kind)
            })
            .collect();
        transactions.sort_by_key(|t| t.date);
        debug!(transactions = transactions.len(), "transactions classified");

        let checks = validate(&totals, &transactions, &self.adapter.partition())
            .map_err(|e| e.at(Stage::Validation))?;

        info!(
            %month_range,
            transactions = transactions.len(),
            checks = checks.len(),
            "statement reconciled"
        );

        Ok(Statement {
            provider,
            month_range,
            transactions,
            checks,
        })
    }

    fn rule_table(&self) -> Vec<Rule> {
        self.rules
            .iter()
            .cloned()
            .chain(self.adapter.rules())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Outcome;
    use crate::model::TransactionType;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::DateResolution.to_string(), "date resolution");
        assert_eq!(Stage::Header.to_string(), "header");
    }

    #[test]
    fn test_error_wrapped_once() {
        let err = ReconError::Sequence { line: "x".into() }
            .at(Stage::Assembly)
            .at(Stage::Validation);
        assert_eq!(err.stage(), Some(Stage::Assembly));
        assert_eq!(err.to_string(), "assembly stage failed: continuation line with no open record: 'x'");
    }

    #[test]
    fn test_account_rules_come_first() {
        let pipeline = Pipeline::for_provider(Provider::Ing).with_rules(vec![Rule::contains(
            "Interest",
            Outcome::Always(TransactionType::Salary),
        )]);
        let table = pipeline.rule_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table[0].outcome, Outcome::Always(TransactionType::Salary));
    }

    #[test]
    fn test_empty_document_fails_at_header() {
        let err = Pipeline::for_provider(Provider::Boq).run(&[]).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Header));
    }
}
