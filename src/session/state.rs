use crate::domain::{Project, Skill, UserData};
use crate::graph;

/// A signed-in user's working state. Owns the current document; transitions
/// produce a new context instead of mutating in place, so the caller decides
/// when (and whether) to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub data: UserData,
}

/// Result of a pure transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub next: SessionContext,
    /// Whether anything differs from the previous context. Callers skip the
    /// persistence write when this is false.
    pub changed: bool,
    /// Ids of skills the unlock cascade promoted to learning, in input
    /// order. Empty for non-cascade transitions.
    pub unlocked: Vec<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, data: UserData) -> Self {
        Self {
            user_id: user_id.into(),
            data,
        }
    }

    /// Master a learning skill and run the unlock cascade. Completing a
    /// skill that is missing or not currently learning is a no-op.
    pub fn complete_skill(&self, skill_id: &str) -> Transition {
        let outcome = graph::complete_skill(&self.data.skills, skill_id);
        self.with_skills(outcome.skills, outcome.changed, outcome.unlocked)
    }

    /// Add one skill, ignoring it if the id already exists.
    pub fn add_skill(&self, skill: Skill) -> Transition {
        let next = graph::add_skill(&self.data.skills, skill);
        let changed = next.len() != self.data.skills.len();
        self.with_skills(next, changed, Vec::new())
    }

    /// Add a batch of skills, de-duplicating against existing ids.
    pub fn add_skills(&self, batch: Vec<Skill>) -> Transition {
        let next = graph::add_skills(&self.data.skills, batch);
        let changed = next.len() != self.data.skills.len();
        self.with_skills(next, changed, Vec::new())
    }

    /// Swap in an entirely new skill tree, e.g. after a career-path reset.
    pub fn replace_all_skills(&self, replacement: Vec<Skill>) -> Transition {
        let changed = replacement != self.data.skills;
        let next = graph::replace_all_skills(replacement);
        self.with_skills(next, changed, Vec::new())
    }

    pub fn add_project(&self, project: Project) -> Transition {
        let mut next = self.clone();
        next.data.projects.push(project);
        Transition {
            next,
            changed: true,
            unlocked: Vec::new(),
        }
    }

    pub fn set_avatar_url(&self, avatar_url: impl Into<String>) -> Transition {
        let avatar_url = avatar_url.into();
        let changed = avatar_url != self.data.avatar_url;
        let mut next = self.clone();
        next.data.avatar_url = avatar_url;
        Transition {
            next,
            changed,
            unlocked: Vec::new(),
        }
    }

    fn with_skills(&self, skills: Vec<Skill>, changed: bool, unlocked: Vec<String>) -> Transition {
        let mut next = self.clone();
        next.data.skills = skills;
        Transition {
            next,
            changed,
            unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CognitiveProfile, ProjectBlueprint, SkillStatus};

    fn profile() -> CognitiveProfile {
        CognitiveProfile {
            name: "Quester".into(),
            focus: "Builder".into(),
            personality: "p".into(),
            strengths: vec![],
            weaknesses: vec![],
            dream: "d".into(),
            learning_style: "Visual".into(),
            avatar_description: "a".into(),
        }
    }

    fn skill(id: &str, status: SkillStatus, deps: &[&str]) -> Skill {
        Skill {
            id: id.into(),
            name: id.to_ascii_uppercase(),
            description: String::new(),
            status,
            dependencies: deps.iter().map(|d| (*d).into()).collect(),
        }
    }

    fn context(skills: Vec<Skill>) -> SessionContext {
        SessionContext::new(
            "user-1",
            UserData {
                profile: profile(),
                avatar_url: "data:image/png;base64,".into(),
                skills,
                projects: vec![],
            },
        )
    }

    #[test]
    fn complete_skill_reports_unlocks_and_change() {
        let ctx = context(vec![
            skill("a", SkillStatus::Learning, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
        ]);
        let t = ctx.complete_skill("a");
        assert!(t.changed);
        assert_eq!(t.unlocked, vec!["b".to_string()]);
        assert_eq!(t.next.data.skills[0].status, SkillStatus::Mastered);
        assert_eq!(t.next.data.skills[1].status, SkillStatus::Learning);
        // The original context is untouched.
        assert_eq!(ctx.data.skills[0].status, SkillStatus::Learning);
    }

    #[test]
    fn completing_unknown_skill_changes_nothing() {
        let ctx = context(vec![skill("a", SkillStatus::Learning, &[])]);
        let t = ctx.complete_skill("nope");
        assert!(!t.changed);
        assert!(t.unlocked.is_empty());
        assert_eq!(t.next, ctx);
    }

    #[test]
    fn duplicate_skill_add_is_a_no_op() {
        let ctx = context(vec![skill("a", SkillStatus::Learning, &[])]);
        let t = ctx.add_skill(skill("a", SkillStatus::Locked, &[]));
        assert!(!t.changed);
        assert_eq!(t.next.data.skills.len(), 1);
        // First occurrence wins.
        assert_eq!(t.next.data.skills[0].status, SkillStatus::Learning);
    }

    #[test]
    fn add_skills_appends_only_new_ids() {
        let ctx = context(vec![skill("a", SkillStatus::Learning, &[])]);
        let t = ctx.add_skills(vec![
            skill("a", SkillStatus::Locked, &[]),
            skill("b", SkillStatus::Locked, &["a"]),
        ]);
        assert!(t.changed);
        let ids: Vec<&str> = t.next.data.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn replace_all_skills_with_identical_tree_is_unchanged() {
        let tree = vec![skill("a", SkillStatus::Learning, &[])];
        let ctx = context(tree.clone());
        let t = ctx.replace_all_skills(tree);
        assert!(!t.changed);
    }

    #[test]
    fn avatar_update_detects_no_op() {
        let ctx = context(vec![]);
        let same = ctx.set_avatar_url(ctx.data.avatar_url.clone());
        assert!(!same.changed);
        let different = ctx.set_avatar_url("data:image/png;base64,QUJD");
        assert!(different.changed);
    }

    #[test]
    fn add_project_always_changes() {
        let ctx = context(vec![]);
        let t = ctx.add_project(Project::new(
            "an app",
            "a bold angle",
            ProjectBlueprint::default(),
            vec![],
        ));
        assert!(t.changed);
        assert_eq!(t.next.data.projects.len(), 1);
    }
}
