//! Rebuilds the team hierarchy from the flat `GET /teams` list and hangs
//! employees off their teams.

use std::collections::{HashMap, HashSet, VecDeque};

use log::warn;
use serde::Serialize;

use crate::models::employee::Employee;
use crate::models::team::Team;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamNode {
    #[serde(flatten)]
    pub team: Team,
    pub children: Vec<TeamNode>,
    pub employees: Vec<Employee>,
}

impl TeamNode {
    fn leaf(team: &Team) -> Self {
        TeamNode {
            team: team.clone(),
            children: Vec::new(),
            employees: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.team.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Forest {
    pub roots: Vec<TeamNode>,
    /// Teams promoted to roots because their ancestor chain looped back.
    pub cycle_breaks: Vec<String>,
}

impl Forest {
    /// All nodes, depth first, parents before children.
    pub fn nodes(&self) -> Vec<&TeamNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&TeamNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&TeamNode> {
        self.nodes().into_iter().find(|node| node.id() == id)
    }

    /// Identifiers of `id` and everything below it.
    pub fn descendant_ids(&self, id: &str) -> HashSet<String> {
        let mut out = HashSet::new();
        let mut stack: Vec<&TeamNode> = self.find(id).into_iter().collect();
        while let Some(node) = stack.pop() {
            out.insert(node.team.id.clone());
            stack.extend(node.children.iter());
        }
        out
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Builds the team forest in O(n).
///
/// A team whose parent is missing from `teams` becomes a root. Duplicate
/// identifiers keep their first occurrence. When a parent chain loops, the
/// team at which the loop closes is promoted to a root.
pub fn build_team_forest(teams: &[Team]) -> Forest {
    let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(teams.len());
    let mut kept: Vec<&Team> = Vec::with_capacity(teams.len());
    for team in teams {
        if lookup.contains_key(team.id.as_str()) {
            warn!("dropping duplicate team id {}", team.id);
            continue;
        }
        lookup.insert(team.id.as_str(), kept.len());
        kept.push(team);
    }

    let mut parent_of: Vec<Option<usize>> = kept
        .iter()
        .map(|team| {
            team.parent_team_id
                .as_deref()
                .and_then(|parent| lookup.get(parent).copied())
        })
        .collect();

    let cycle_breaks = break_cycles(&kept, &mut parent_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); kept.len()];
    let mut roots = Vec::new();
    for (idx, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(idx),
            None => roots.push(idx),
        }
    }

    // Parents come before their children in `order`, so building it back to
    // front finds every child already assembled.
    let mut order = Vec::with_capacity(kept.len());
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    while let Some(idx) = queue.pop_front() {
        order.push(idx);
        queue.extend(children[idx].iter().copied());
    }

    let mut built: Vec<Option<TeamNode>> = vec![None; kept.len()];
    for &idx in order.iter().rev() {
        let mut node = TeamNode::leaf(kept[idx]);
        node.children = children[idx].iter().filter_map(|child| built[*child].take()).collect();
        built[idx] = Some(node);
    }

    Forest {
        roots: roots.iter().filter_map(|idx| built[*idx].take()).collect(),
        cycle_breaks,
    }
}

fn break_cycles(kept: &[&Team], parent_of: &mut [Option<usize>]) -> Vec<String> {
    let mut marks = vec![Mark::Unvisited; kept.len()];
    let mut breaks = Vec::new();
    let mut path = Vec::new();

    for start in 0..kept.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        let mut current = start;
        loop {
            match marks[current] {
                Mark::Done => break,
                Mark::OnPath => {
                    warn!(
                        "team {} closes a parent cycle, rendering it as a root",
                        kept[current].id
                    );
                    parent_of[current] = None;
                    breaks.push(kept[current].id.clone());
                    break;
                }
                Mark::Unvisited => {
                    marks[current] = Mark::OnPath;
                    path.push(current);
                    match parent_of[current] {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
            }
        }
        for idx in path.drain(..) {
            marks[idx] = Mark::Done;
        }
    }
    breaks
}

/// Assigns every node the employees whose `team_id` names it. Employees
/// without a matching node are left out.
pub fn attach_employees(forest: &mut Forest, employees: &[Employee]) {
    let mut by_team: HashMap<&str, Vec<Employee>> = HashMap::new();
    for employee in employees {
        if let Some(team_id) = employee.team_id.as_deref() {
            by_team.entry(team_id).or_default().push(employee.clone());
        }
    }

    let mut stack: Vec<&mut TeamNode> = forest.roots.iter_mut().collect();
    while let Some(node) = stack.pop() {
        node.employees = by_team.remove(node.team.id.as_str()).unwrap_or_default();
        stack.extend(node.children.iter_mut());
    }
}
