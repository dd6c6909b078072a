/// How a category is expected to move money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
    Neutral,
}

/// Decides whether a category is income-like or expense-like. The lint
/// engine only sees this trait, so callers choose the policy.
pub trait CategoryClassifier {
    fn classify(&self, category: &str) -> CategoryKind;
}

/// Classifies by category path prefixes matched on segment boundaries:
/// `Income` covers `Income` and `Income:Consulting` but not `Incomes`.
#[derive(Debug, Clone, Default)]
pub struct PrefixClassifier {
    pub income: Vec<String>,
    /// When empty, every category that is not income-like is expense-like.
    pub expense: Vec<String>,
}

fn matches_prefix(category: &str, prefix: &str) -> bool {
    category == prefix
        || category
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':'))
}

impl PrefixClassifier {
    pub fn new(income: Vec<String>, expense: Vec<String>) -> Self {
        Self { income, expense }
    }
}

impl CategoryClassifier for PrefixClassifier {
    fn classify(&self, category: &str) -> CategoryKind {
        if self.income.iter().any(|p| matches_prefix(category, p)) {
            return CategoryKind::Income;
        }
        if self.expense.is_empty() || self.expense.iter().any(|p| matches_prefix(category, p)) {
            return CategoryKind::Expense;
        }
        CategoryKind::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_classifier() -> PrefixClassifier {
        PrefixClassifier::new(vec!["Income".into(), "Tax:Refunds".into()], vec![])
    }

    #[test]
    fn test_income_prefixes() {
        let c = default_classifier();
        assert_eq!(c.classify("Income"), CategoryKind::Income);
        assert_eq!(c.classify("Income:Affiliates:Amazon"), CategoryKind::Income);
        assert_eq!(c.classify("Tax:Refunds"), CategoryKind::Income);
        assert_eq!(c.classify("Incomes"), CategoryKind::Expense);
        assert_eq!(c.classify("Tax:Payments"), CategoryKind::Expense);
    }

    #[test]
    fn test_everything_else_is_expense_by_default() {
        let c = default_classifier();
        assert_eq!(c.classify("Business Expense"), CategoryKind::Expense);
        assert_eq!(c.classify("A"), CategoryKind::Expense);
    }

    #[test]
    fn test_explicit_expense_list_leaves_rest_neutral() {
        let c = PrefixClassifier::new(vec!["Income".into()], vec!["Business Expenses".into()]);
        assert_eq!(c.classify("Business Expenses:Dining Out"), CategoryKind::Expense);
        assert_eq!(c.classify("Transfers:Savings"), CategoryKind::Neutral);
    }
}
