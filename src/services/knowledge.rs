//! Knowledge base lookup
//!
//! Answers informational questions from a static keyword rule table. Rules
//! are checked in table order and the first one with a matching keyword wins.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn, debug};

use crate::utils::errors::Result;
use crate::utils::helpers::normalize_query;

pub const PRICING_ANSWER: &str = "AutoStream Pricing:\n\
    - Basic Plan: $29/month, 10 videos/month, 720p resolution\n\
    - Pro Plan: $79/month, Unlimited videos, 4K resolution, AI captions";
pub const REFUND_ANSWER: &str = "Refund Policy: No refunds after 7 days.";
pub const SUPPORT_ANSWER: &str = "Support Policy: 24/7 support is available only on the Pro plan.";
pub const FALLBACK_ANSWER: &str = "Sorry, I can help with pricing, plans, refunds, and support questions.";

/// A keyword rule and its canned answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRule {
    pub keywords: Vec<String>,
    pub answer: String,
}

impl KnowledgeRule {
    pub fn new(keywords: &[&str], answer: impl Into<String>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: answer.into(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|keyword| !keyword.is_empty() && query.contains(keyword.as_str()))
    }
}

/// On-disk layout of a rule table
#[derive(Debug, Clone, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    rules: Vec<KnowledgeRule>,
    fallback: Option<String>,
}

/// Static keyword-matched knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    rules: Vec<KnowledgeRule>,
    fallback: String,
}

impl KnowledgeBase {
    /// Create a knowledge base from an ordered rule list
    pub fn new(rules: Vec<KnowledgeRule>, fallback: impl Into<String>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| KnowledgeRule {
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
                answer: rule.answer,
            })
            .collect();

        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// The AutoStream product rules: pricing, refunds, support
    pub fn builtin() -> Self {
        Self::new(
            vec![
                KnowledgeRule::new(&["price", "plan"], PRICING_ANSWER),
                KnowledgeRule::new(&["refund"], REFUND_ANSWER),
                KnowledgeRule::new(&["support"], SUPPORT_ANSWER),
            ],
            FALLBACK_ANSWER,
        )
    }

    /// A knowledge base that matches nothing
    pub fn empty() -> Self {
        Self::new(Vec::new(), FALLBACK_ANSWER)
    }

    /// Load a rule table from a JSON file.
    ///
    /// A missing or unparseable file yields an empty rule set rather than an error.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::read_file(path).await {
            Ok(kb) => {
                info!(path = %path.display(), rules = kb.rules.len(), "Loaded knowledge base");
                kb
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Knowledge base unavailable, using empty rule set");
                Self::empty()
            }
        }
    }

    /// Builtin rules when no path is configured, otherwise the file at `path`
    pub async fn from_config(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                debug!("No knowledge base path configured, using builtin rules");
                Self::builtin()
            }
        }
    }

    async fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let file: KnowledgeFile = serde_json::from_str(&content)?;
        Ok(Self::new(
            file.rules,
            file.fallback.unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
        ))
    }

    /// Answer `query` from the first matching rule, or the fallback
    pub fn lookup(&self, query: &str) -> &str {
        let query = normalize_query(query);

        self.rules
            .iter()
            .find(|rule| rule.matches(&query))
            .map(|rule| rule.answer.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
