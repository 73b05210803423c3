//! Category and depth tags.
//!
//! Stored keywords carry these tags as plain strings so that permissive
//! imports can hold values outside the known sets. The enums here give the
//! known sets, their wire names and their display labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known keyword categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Core catalysts.
    #[default]
    CoreCatalysts,
    /// Technical mastery.
    TechnicalMastery,
    /// Creative fusion.
    CreativeFusion,
    /// System orchestration.
    SystemOrchestration,
    /// Cognitive evolution.
    CognitiveEvolution,
    /// Meta thinking.
    MetaThinking,
    /// Philosophical methodology.
    PhilosophicalMethodology,
    /// Breakthrough innovation.
    BreakthroughInnovation,
    /// Prompt foundations.
    PromptFoundations,
    /// Prompt structuring.
    PromptStructuring,
    /// Prompt optimization.
    PromptOptimization,
    /// Prompt operations.
    PromptOperations,
    /// Prompt augmentation.
    PromptAugmentation,
    /// Prompt governance.
    PromptGovernance,
}

impl Category {
    /// Returns all categories in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CoreCatalysts,
            Self::TechnicalMastery,
            Self::CreativeFusion,
            Self::SystemOrchestration,
            Self::CognitiveEvolution,
            Self::MetaThinking,
            Self::PhilosophicalMethodology,
            Self::BreakthroughInnovation,
            Self::PromptFoundations,
            Self::PromptStructuring,
            Self::PromptOptimization,
            Self::PromptOperations,
            Self::PromptAugmentation,
            Self::PromptGovernance,
        ]
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CoreCatalysts => "core-catalysts",
            Self::TechnicalMastery => "technical-mastery",
            Self::CreativeFusion => "creative-fusion",
            Self::SystemOrchestration => "system-orchestration",
            Self::CognitiveEvolution => "cognitive-evolution",
            Self::MetaThinking => "meta-thinking",
            Self::PhilosophicalMethodology => "philosophical-methodology",
            Self::BreakthroughInnovation => "breakthrough-innovation",
            Self::PromptFoundations => "prompt-foundations",
            Self::PromptStructuring => "prompt-structuring",
            Self::PromptOptimization => "prompt-optimization",
            Self::PromptOperations => "prompt-operations",
            Self::PromptAugmentation => "prompt-augmentation",
            Self::PromptGovernance => "prompt-governance",
        }
    }

    /// Returns the localized display label used in Markdown exports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CoreCatalysts => "🧠 核心催化器",
            Self::TechnicalMastery => "⚡ 技术精通",
            Self::CreativeFusion => "🎨 创意融合",
            Self::SystemOrchestration => "🏗️ 系统编排",
            Self::CognitiveEvolution => "🔄 认知演化",
            Self::MetaThinking => "🤔 元思维",
            Self::PhilosophicalMethodology => "🌀 哲学方法论",
            Self::BreakthroughInnovation => "💡 突破创新",
            Self::PromptFoundations => "🧱 提示基础",
            Self::PromptStructuring => "🧩 提示结构",
            Self::PromptOptimization => "📈 提示优化",
            Self::PromptOperations => "🕸️ 提示运营",
            Self::PromptAugmentation => "🧠 提示增强",
            Self::PromptGovernance => "🛡️ 提示治理",
        }
    }

    /// Parses a wire tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }

    /// Reverse-looks-up a display label, also accepting the wire tag itself.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.label() == label)
            .or_else(|| Self::parse(label))
    }

    /// Returns the display label for a stored tag, or the tag itself if unknown.
    #[must_use]
    pub fn label_for(tag: &str) -> &str {
        Self::parse(tag).map_or(tag, |c| c.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth tiers, from introductory to speculative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Foundational.
    #[default]
    Foundational,
    /// Advanced.
    Advanced,
    /// Expert.
    Expert,
    /// Visionary.
    Visionary,
}

impl Depth {
    /// Returns all depth tiers in order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Foundational,
            Self::Advanced,
            Self::Expert,
            Self::Visionary,
        ]
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Foundational => "foundational",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
            Self::Visionary => "visionary",
        }
    }

    /// Returns the localized display label used in Markdown exports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Foundational => "🏗️ 基础构建",
            Self::Advanced => "🚀 高级进阶",
            Self::Expert => "🎯 专家级",
            Self::Visionary => "🌌 远见级",
        }
    }

    /// Parses a wire tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "foundational" => Some(Self::Foundational),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            "visionary" => Some(Self::Visionary),
            _ => None,
        }
    }

    /// Reverse-looks-up a display label, also accepting the wire tag itself.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|d| d.label() == label)
            .or_else(|| Self::parse(label))
    }

    /// Returns the display label for a stored tag, or the tag itself if unknown.
    #[must_use]
    pub fn label_for(tag: &str) -> &str {
        Self::parse(tag).map_or(tag, |d| d.label())
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
