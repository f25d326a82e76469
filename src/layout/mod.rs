//! Layout engine: maps a skill collection and canvas size to deterministic
//! node positions and edges for the quest-map constellation diagram.
//!
//! Pure function of its inputs — no state survives a call except the
//! per-invocation level memo.

use crate::domain::{Skill, SkillStatus};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Rendered width of one skill node, in layout units.
pub const NODE_WIDTH: f64 = 130.0;
/// Horizontal distance between neighbouring nodes in a row.
pub const X_SPACING: f64 = 220.0;
/// Vertical distance between dependency levels.
pub const Y_SPACING: f64 = 220.0;
/// Offset of the root row from the canvas top.
pub const TOP_MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    /// Depth in the dependency graph; 0 for roots.
    pub level: i64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    pub id: String,
    /// Dependency (source) -> dependent (target).
    pub source: String,
    pub target: String,
    /// True when progress is "flowing": source mastered, target learning.
    pub animated: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Compute the diagram layout.
///
/// Returns an empty layout when the collection is empty or either canvas
/// dimension is not a positive number — no centering is meaningful before
/// the canvas has been measured.
pub fn layout_skills(skills: &[Skill], canvas_width: f64, canvas_height: f64) -> SkillLayout {
    if skills.is_empty() || !(canvas_width > 0.0) || !(canvas_height > 0.0) {
        return SkillLayout::default();
    }

    let by_id: HashMap<&str, &Skill> = skills.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut memo: HashMap<&str, i64> = HashMap::with_capacity(skills.len());
    let mut in_progress: HashSet<&str> = HashSet::new();
    for skill in skills {
        level_of(skill, &by_id, &mut memo, &mut in_progress);
    }

    // Rows ordered by level, input order preserved within a row.
    let mut rows: BTreeMap<i64, Vec<&Skill>> = BTreeMap::new();
    for skill in skills {
        rows.entry(memo[skill.id.as_str()]).or_default().push(skill);
    }

    let mut nodes = Vec::with_capacity(skills.len());
    for (&level, row) in &rows {
        #[allow(clippy::cast_precision_loss)]
        let row_width = (row.len() - 1) as f64 * X_SPACING;
        let start_x = canvas_width / 2.0 - row_width / 2.0 - NODE_WIDTH / 2.0;
        for (i, skill) in row.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = start_x + i as f64 * X_SPACING;
            #[allow(clippy::cast_precision_loss)]
            let y = level as f64 * Y_SPACING + TOP_MARGIN;
            nodes.push(LayoutNode {
                id: skill.id.clone(),
                level,
                position: Position { x, y },
            });
        }
    }

    let mut edges = Vec::new();
    for skill in skills {
        for dep in &skill.dependencies {
            if let Some(source) = by_id.get(dep.as_str()) {
                edges.push(LayoutEdge {
                    id: format!("{dep}-{}", skill.id),
                    source: dep.clone(),
                    target: skill.id.clone(),
                    animated: source.status == SkillStatus::Mastered
                        && skill.status == SkillStatus::Learning,
                });
            }
        }
    }

    SkillLayout { nodes, edges }
}

/// Longest path from the roots, memoized. An unresolved dependency id
/// contributes level -1 (so a node whose dependencies all fail to resolve
/// sits at level 0 instead of being pushed down a row); a cycle re-entry is
/// guarded with the same fallback so the function is total on any input.
fn level_of<'a>(
    skill: &'a Skill,
    by_id: &HashMap<&str, &'a Skill>,
    memo: &mut HashMap<&'a str, i64>,
    in_progress: &mut HashSet<&'a str>,
) -> i64 {
    if let Some(&level) = memo.get(skill.id.as_str()) {
        return level;
    }
    if !in_progress.insert(skill.id.as_str()) {
        return 0;
    }

    let level = if skill.dependencies.is_empty() {
        0
    } else {
        let max_parent = skill
            .dependencies
            .iter()
            .map(|dep| {
                by_id
                    .get(dep.as_str())
                    .map_or(-1, |parent| level_of(parent, by_id, memo, in_progress))
            })
            .max()
            .unwrap_or(-1);
        max_parent + 1
    };

    in_progress.remove(skill.id.as_str());
    memo.insert(skill.id.as_str(), level);
    level
}
