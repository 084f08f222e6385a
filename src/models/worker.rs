//! Worker model.
//!
//! Workers are the cleaning staff tasks get assigned to. Each has an
//! active flag, a set of skills with proficiency levels, and an optional
//! overall experience level.

use serde::{Deserialize, Serialize};

/// A cleaning crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inactive workers are never assigned.
    pub active: bool,
    /// Skills with proficiency levels.
    pub skills: Vec<Skill>,
    /// Overall experience (0.0 to 1.0). `None` = unknown.
    pub experience: Option<f64>,
}

/// A skill with proficiency level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name (e.g., "cabin", "exterior", "lavatory").
    pub name: String,
    /// Proficiency level (0.0 to 1.0, where 1.0 = expert).
    pub level: f64,
}

impl Worker {
    /// Creates an active worker with no skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            active: true,
            skills: Vec::new(),
            experience: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, name: impl Into<String>, level: f64) -> Self {
        self.skills.push(Skill::new(name, level));
        self
    }

    /// Sets the overall experience level.
    pub fn with_experience(mut self, experience: f64) -> Self {
        self.experience = Some(experience.clamp(0.0, 1.0));
        self
    }

    /// Whether this worker has a given skill.
    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }

    /// Returns the proficiency level for a skill (0.0 if not found).
    pub fn skill_level(&self, name: &str) -> f64 {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.level)
            .unwrap_or(0.0)
    }

    /// Whether the worker holds every skill in `required`.
    pub fn has_all_skills(&self, required: &[String]) -> bool {
        required.iter().all(|s| self.has_skill(s))
    }

    /// Normalized experience for a task needing `required` skills.
    ///
    /// Uses the explicit experience level when set, otherwise the mean
    /// proficiency over the required skills. `None` when neither is known.
    pub fn experience_score(&self, required: &[String]) -> Option<f64> {
        if let Some(exp) = self.experience {
            return Some(exp);
        }
        if required.is_empty() {
            return None;
        }
        let sum: f64 = required.iter().map(|s| self.skill_level(s)).sum();
        Some((sum / required.len() as f64).clamp(0.0, 1.0))
    }
}

impl Skill {
    /// Creates a new skill.
    pub fn new(name: impl Into<String>, level: f64) -> Self {
        Self {
            name: name.into(),
            level: level.clamp(0.0, 1.0),
        }
    }
}

/// Source of the worker pool handed to the scheduling engine.
///
/// Lets callers back the pool with a roster service or a plain vector.
pub trait WorkerPool: Send + Sync {
    /// Current roster, in pool order.
    fn workers(&self) -> Vec<Worker>;
}

impl WorkerPool for Vec<Worker> {
    fn workers(&self) -> Vec<Worker> {
        self.clone()
    }
}
