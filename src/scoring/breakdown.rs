//! Score breakdown types

use serde::Serialize;
use std::fmt;

/// Base score every page starts from
pub const BASE_SCORE: i32 = 100;

/// Scoring category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structure,
    Performance,
    Content,
    Technical,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Structure,
        Category::Performance,
        Category::Content,
        Category::Technical,
    ];

    /// Point budget of the category; the four budgets sum to 100
    pub fn max_points(&self) -> i32 {
        match self {
            Self::Structure => 45,
            Self::Performance => 35,
            Self::Content => 10,
            Self::Technical => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Performance => "performance",
            Self::Content => "content",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one rule check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    /// The condition was checked and nothing is wrong
    Ok,
    /// A penalty was applied
    Issue,
    /// The data needed for the check was not collected
    Unavailable,
}

/// One named contribution to a category score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub category: Category,
    pub name: String,
    /// Zero for ok factors, negative otherwise
    pub points: i32,
    pub status: FactorStatus,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Factor {
    pub fn is_penalty(&self) -> bool {
        self.points < 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub max_points: i32,
    /// Starts at `max_points` and only decreases; may go below zero
    pub earned: i32,
    pub factors: Vec<Factor>,
}

impl CategoryScore {
    pub fn new(category: Category) -> Self {
        Self {
            max_points: category.max_points(),
            earned: category.max_points(),
            factors: Vec::new(),
        }
    }

    /// Earned points as a percentage of the budget
    pub fn percentage(&self) -> f64 {
        self.earned as f64 / self.max_points as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub structure: CategoryScore,
    pub performance: CategoryScore,
    pub content: CategoryScore,
    pub technical: CategoryScore,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Structure => &self.structure,
            Category::Performance => &self.performance,
            Category::Content => &self.content,
            Category::Technical => &self.technical,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryScore {
        match category {
            Category::Structure => &mut self.structure,
            Category::Performance => &mut self.performance,
            Category::Content => &mut self.content,
            Category::Technical => &mut self.technical,
        }
    }
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self {
            structure: CategoryScore::new(Category::Structure),
            performance: CategoryScore::new(Category::Performance),
            content: CategoryScore::new(Category::Content),
            technical: CategoryScore::new(Category::Technical),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_score: i32,
    pub categories: CategoryScores,
    /// Every checked factor except the unavailable ones, in rule order
    pub all_factors: Vec<Factor>,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            base_score: BASE_SCORE,
            categories: CategoryScores::default(),
            all_factors: Vec::new(),
        }
    }
}

impl ScoreBreakdown {
    /// Sum of earned points over all categories, clamped to `0..=100`
    pub fn total(&self) -> u32 {
        let sum: i32 = Category::ALL
            .iter()
            .map(|category| self.categories.get(*category).earned)
            .sum();
        sum.clamp(0, BASE_SCORE) as u32
    }
}

/// Final score of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    /// Factors with negative points, in rule order
    pub penalties: Vec<Factor>,
}

impl ScoreResult {
    /// The `n` most severe penalties
    ///
    /// Ties keep rule order.
    pub fn top_issues(&self, n: usize) -> Vec<&Factor> {
        let mut issues: Vec<&Factor> = self.penalties.iter().collect();
        issues.sort_by_key(|factor| factor.points);
        issues.truncate(n);
        issues
    }
}
