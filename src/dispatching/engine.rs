//! Rule engine for multi-criteria dispatching.
//!
//! Applies rules in sequence: a later rule is consulted only when every
//! earlier rule scores two tasks equally.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, RuleScore};
use crate::models::SchedulingTask;

/// A composable rule engine for task prioritization.
///
/// # Example
/// ```
/// use crew_schedule::dispatching::{rules, RuleEngine};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::HighestPriority)
///     .with_tie_breaker(rules::ShortestDuration);
/// assert_eq!(engine.rule_names(), vec!["HIGHEST_PRIORITY", "SHORTEST_DURATION"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a tie-breaking rule, consulted after the rules added before it.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts tasks by priority (highest priority first).
    ///
    /// Returns indices into the original task slice. The sort is stable,
    /// so fully tied tasks keep their input order.
    pub fn sort_indices<T: Borrow<SchedulingTask>>(&self, tasks: &[T]) -> Vec<usize> {
        if tasks.is_empty() {
            return Vec::new();
        }

        // Score once per task and rule instead of once per comparison.
        let scores: Vec<Vec<RuleScore>> = tasks
            .iter()
            .map(|t| self.evaluate(t.borrow()))
            .collect();

        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&scores[a], &scores[b]));
        indices
    }

    /// Evaluates a single task and returns scores from each rule.
    pub fn evaluate(&self, task: &SchedulingTask) -> Vec<RuleScore> {
        self.rules.iter().map(|r| r.evaluate(task)).collect()
    }

    fn compare(&self, scores_a: &[RuleScore], scores_b: &[RuleScore]) -> Ordering {
        for (sa, sb) in scores_a.iter().zip(scores_b) {
            if (sa - sb).abs() > self.epsilon {
                return sa.partial_cmp(sb).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::TaskPriority;

    fn make_task(id: &str, minutes: i64, priority: TaskPriority) -> SchedulingTask {
        SchedulingTask::new(id, "L1", minutes).with_priority(priority)
    }

    #[test]
    fn test_shortest_duration_ordering() {
        let tasks = vec![
            make_task("long", 300, TaskPriority::Medium),
            make_task("short", 60, TaskPriority::Medium),
            make_task("medium", 180, TaskPriority::Medium),
        ];
        let engine = RuleEngine::new().with_rule(rules::ShortestDuration);

        let indices = engine.sort_indices(&tasks);
        assert_eq!(tasks[indices[0]].id, "short");
        assert_eq!(tasks[indices[1]].id, "medium");
        assert_eq!(tasks[indices[2]].id, "long");
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let tasks = vec![
            make_task("A", 60, TaskPriority::High),
            make_task("B", 30, TaskPriority::High),
        ];
        let engine = RuleEngine::new()
            .with_rule(rules::HighestPriority)
            .with_tie_breaker(rules::ShortestDuration);

        let indices = engine.sort_indices(&tasks);
        // Priority ties → duration breaks it → B (shorter) first
        assert_eq!(tasks[indices[0]].id, "B");
    }

    #[test]
    fn test_input_order_kept_on_full_tie() {
        let tasks = vec![
            make_task("B", 60, TaskPriority::Low),
            make_task("A", 60, TaskPriority::Low),
        ];
        let engine = RuleEngine::new().with_rule(rules::ShortestDuration);
        assert_eq!(engine.sort_indices(&tasks), vec![0, 1]);
    }

    #[test]
    fn test_empty_tasks() {
        let engine = RuleEngine::new().with_rule(rules::ShortestDuration);
        assert!(engine.sort_indices::<SchedulingTask>(&[]).is_empty());
    }

    #[test]
    fn test_evaluate_scores() {
        let task = make_task("T1", 45, TaskPriority::Urgent);
        let engine = RuleEngine::new()
            .with_rule(rules::ShortestDuration)
            .with_rule(rules::HighestPriority);

        let scores = engine.evaluate(&task);
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 45.0).abs() < 1e-10);
        assert!((scores[1] + 4.0).abs() < 1e-10);
    }
}
