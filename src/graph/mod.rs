//! Skill graph model: the unlock cascade and collection operations.
//!
//! All operations are pure over the skill collection — they return a new
//! collection instead of mutating in place, so callers can detect change and
//! persist it as an explicit side effect.

use crate::domain::{Skill, SkillStatus};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphValidationError {
    #[error("duplicate skill id: {id}")]
    DuplicateId { id: String },

    #[error("skill {id} depends on itself")]
    SelfDependency { id: String },

    #[error("dependency cycle involving skill {id}")]
    Cycle { id: String },
}

/// Result of a `complete_skill` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub skills: Vec<Skill>,
    /// False when the target id was missing or not in `Learning` status.
    pub changed: bool,
    /// Ids promoted from `Locked` to `Learning` by this mastery event.
    pub unlocked: Vec<String>,
}

/// Master the skill with `skill_id` and run the unlock cascade.
///
/// No-op (unchanged collection) when the id does not exist or the skill is
/// not currently `Learning` — invalid targets fail silently. On success the
/// target becomes `Mastered`, then a single pass over the post-update
/// collection promotes every `Locked` skill with a non-empty dependency list
/// whose dependencies are all `Mastered`. The cascade is one-pass: a skill
/// whose unlock depends on a *later* mastery event is only evaluated on
/// that later call.
pub fn complete_skill(skills: &[Skill], skill_id: &str) -> CascadeOutcome {
    let Some(target) = skills.iter().position(|s| s.id == skill_id) else {
        return CascadeOutcome {
            skills: skills.to_vec(),
            changed: false,
            unlocked: Vec::new(),
        };
    };
    if skills[target].status != SkillStatus::Learning {
        return CascadeOutcome {
            skills: skills.to_vec(),
            changed: false,
            unlocked: Vec::new(),
        };
    }

    let mut next = skills.to_vec();
    next[target].status = SkillStatus::Mastered;

    let mastered: HashSet<String> = next
        .iter()
        .filter(|s| s.status == SkillStatus::Mastered)
        .map(|s| s.id.clone())
        .collect();

    let mut unlocked = Vec::new();
    for skill in &mut next {
        if skill.status == SkillStatus::Locked
            && !skill.dependencies.is_empty()
            && skill
                .dependencies
                .iter()
                .all(|dep| mastered.contains(dep.as_str()))
        {
            skill.status = SkillStatus::Learning;
            unlocked.push(skill.id.clone());
        }
    }

    CascadeOutcome {
        skills: next,
        changed: true,
        unlocked,
    }
}

/// Append one skill, skipping it if the id already exists.
pub fn add_skill(skills: &[Skill], skill: Skill) -> Vec<Skill> {
    add_skills(skills, vec![skill])
}

/// Append a batch of skills, de-duplicated by id. Existing skills are
/// untouched; within the batch the first occurrence of an id wins.
pub fn add_skills(skills: &[Skill], batch: Vec<Skill>) -> Vec<Skill> {
    let mut seen: HashSet<String> = skills.iter().map(|s| s.id.clone()).collect();
    let mut next = skills.to_vec();
    for skill in batch {
        if seen.insert(skill.id.clone()) {
            next.push(skill);
        }
    }
    next
}

/// Wholesale replacement of the collection, discarding all prior skill
/// state. Used when charting an entirely new career path.
pub fn replace_all_skills(replacement: Vec<Skill>) -> Vec<Skill> {
    replacement
}

/// Reject collections the layout and cascade cannot safely consume:
/// duplicate ids, self-dependencies, and dependency cycles. Dependency ids
/// that resolve to no skill are legal — they contribute no unlock support.
pub fn validate_skills(skills: &[Skill]) -> Result<(), GraphValidationError> {
    let mut by_id: HashMap<&str, &Skill> = HashMap::with_capacity(skills.len());
    for skill in skills {
        if by_id.insert(skill.id.as_str(), skill).is_some() {
            return Err(GraphValidationError::DuplicateId {
                id: skill.id.clone(),
            });
        }
        if skill.dependencies.iter().any(|dep| *dep == skill.id) {
            return Err(GraphValidationError::SelfDependency {
                id: skill.id.clone(),
            });
        }
    }

    // Three-color DFS over resolving dependencies.
    let mut done: HashSet<&str> = HashSet::new();
    let mut in_progress: HashSet<&str> = HashSet::new();
    for skill in skills {
        visit(skill, &by_id, &mut done, &mut in_progress)?;
    }
    Ok(())
}

fn visit<'a>(
    skill: &'a Skill,
    by_id: &HashMap<&str, &'a Skill>,
    done: &mut HashSet<&'a str>,
    in_progress: &mut HashSet<&'a str>,
) -> Result<(), GraphValidationError> {
    if done.contains(skill.id.as_str()) {
        return Ok(());
    }
    if !in_progress.insert(skill.id.as_str()) {
        return Err(GraphValidationError::Cycle {
            id: skill.id.clone(),
        });
    }
    for dep in &skill.dependencies {
        if let Some(parent) = by_id.get(dep.as_str()) {
            visit(parent, by_id, done, in_progress)?;
        }
    }
    in_progress.remove(skill.id.as_str());
    done.insert(skill.id.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str, status: SkillStatus, deps: &[&str]) -> Skill {
        Skill {
            id: id.into(),
            name: id.to_uppercase(),
            description: format!("the {id} skill"),
            status,
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    #[test]
    fn completing_missing_skill_is_noop() {
        let skills = vec![skill("a", SkillStatus::Learning, &[])];
        let outcome = complete_skill(&skills, "nope");
        assert!(!outcome.changed);
        assert_eq!(outcome.skills, skills);
    }

    #[test]
    fn completing_mastered_skill_is_noop() {
        let skills = vec![skill("a", SkillStatus::Mastered, &[])];
        let outcome = complete_skill(&skills, "a");
        assert!(!outcome.changed);
        assert_eq!(outcome.skills, skills);
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn completing_locked_skill_is_noop() {
        let skills = vec![skill("a", SkillStatus::Locked, &["b"])];
        assert!(!complete_skill(&skills, "a").changed);
    }

    #[test]
    fn mastery_unlocks_direct_dependents_only() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
            skill("c", SkillStatus::Locked, &["a"]),
            skill("d", SkillStatus::Locked, &["b", "c"]),
        ];
        let outcome = complete_skill(&skills, "a");
        assert!(outcome.changed);
        assert_eq!(outcome.unlocked, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(outcome.skills[0].status, SkillStatus::Mastered);
        assert_eq!(outcome.skills[1].status, SkillStatus::Learning);
        assert_eq!(outcome.skills[2].status, SkillStatus::Learning);
        assert_eq!(outcome.skills[3].status, SkillStatus::Locked);
    }

    #[test]
    fn diamond_unlocks_only_when_both_parents_mastered() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
            skill("c", SkillStatus::Locked, &["a"]),
            skill("d", SkillStatus::Locked, &["b", "c"]),
        ];
        let after_a = complete_skill(&skills, "a").skills;
        let after_b = complete_skill(&after_a, "b").skills;
        assert_eq!(after_b[3].status, SkillStatus::Locked);

        let after_c = complete_skill(&after_b, "c");
        assert_eq!(after_c.unlocked, vec!["d".to_string()]);
        assert_eq!(after_c.skills[3].status, SkillStatus::Learning);
    }

    #[test]
    fn unresolved_dependency_gives_no_unlock_support() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a", "ghost"]),
        ];
        let outcome = complete_skill(&skills, "a");
        assert_eq!(outcome.skills[1].status, SkillStatus::Locked);
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn input_collection_is_untouched() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
        ];
        let _ = complete_skill(&skills, "a");
        assert_eq!(skills[0].status, SkillStatus::Learning);
        assert_eq!(skills[1].status, SkillStatus::Locked);
    }

    #[test]
    fn add_skills_dedupes_by_id() {
        let existing = vec![skill("a", SkillStatus::Learning, &[])];
        let batch = vec![
            skill("a", SkillStatus::Locked, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
            skill("b", SkillStatus::Locked, &[]),
        ];
        let merged = add_skills(&existing, batch);
        assert_eq!(merged.len(), 2);
        // The pre-existing record wins over the batch duplicate.
        assert_eq!(merged[0].status, SkillStatus::Learning);
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn add_skill_appends_new_id() {
        let existing = vec![skill("a", SkillStatus::Learning, &[])];
        let merged = add_skill(&existing, skill("b", SkillStatus::Locked, &["a"]));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn replace_all_discards_prior_state() {
        let replacement = vec![skill("x", SkillStatus::Learning, &[])];
        assert_eq!(replace_all_skills(replacement.clone()), replacement);
    }

    #[test]
    fn validate_accepts_dag_with_unresolved_deps() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a", "ghost"]),
        ];
        assert_eq!(validate_skills(&skills), Ok(()));
    }

    #[test]
    fn validate_rejects_self_dependency() {
        let skills = vec![skill("a", SkillStatus::Locked, &["a"])];
        assert_eq!(
            validate_skills(&skills),
            Err(GraphValidationError::SelfDependency { id: "a".into() })
        );
    }

    #[test]
    fn validate_rejects_cycle() {
        let skills = vec![
            skill("a", SkillStatus::Locked, &["b"]),
            skill("b", SkillStatus::Locked, &["a"]),
        ];
        assert!(matches!(
            validate_skills(&skills),
            Err(GraphValidationError::Cycle { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let skills = vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("a", SkillStatus::Locked, &[]),
        ];
        assert_eq!(
            validate_skills(&skills),
            Err(GraphValidationError::DuplicateId { id: "a".into() })
        );
    }
}
