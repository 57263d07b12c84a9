use std::cmp::Ordering;

use uuid::Uuid;

use crate::database::models::Privilege;
use crate::resources::Resources;
use crate::views::{PrivilegeTree, TreeNode};

/// Group `privileges` into a single root titled "All", then area, controller
/// and action nodes ordered by their display titles. Privileges without an
/// area hang their controllers directly off the root.
pub fn build_privilege_tree(
    privileges: &[Privilege],
    selected_ids: Vec<Uuid>,
    resources: &Resources,
) -> PrivilegeTree {
    let mut root = TreeNode::new(resources.all_title());

    let mut areas: Vec<(Option<String>, Vec<&Privilege>)> = Vec::new();
    for privilege in privileges {
        let title = resources.area_title(privilege.area.as_deref());
        match areas.iter_mut().find(|(existing, _)| *existing == title) {
            Some((_, members)) => members.push(privilege),
            None => areas.push((title, vec![privilege])),
        }
    }

    // The no-area group sorts as if it were titled by its first controller
    areas.sort_by_cached_key(|(title, members)| {
        let key = match title {
            Some(title) => title.clone(),
            None => resources.controller_title(&members[0].controller),
        };
        TitleKey(key)
    });

    for (area_title, members) in areas {
        let controllers = controller_nodes(&members, resources);
        match area_title {
            Some(title) => {
                let mut area = TreeNode::new(title);
                area.nodes = controllers;
                root.nodes.push(area);
            }
            None => root.nodes.extend(controllers),
        }
    }

    PrivilegeTree {
        nodes: vec![root],
        selected_ids,
    }
}

fn controller_nodes(members: &[&Privilege], resources: &Resources) -> Vec<TreeNode> {
    group_by_title(members, |privilege| {
        resources.controller_title(&privilege.controller)
    })
    .into_iter()
    .map(|(title, privileges)| {
        let mut controller = TreeNode::new(title);
        controller.nodes = action_leaves(privileges, resources);
        controller
    })
    .collect()
}

/// One leaf per privilege; actions sharing a title stay separate leaves
fn action_leaves(mut privileges: Vec<&Privilege>, resources: &Resources) -> Vec<TreeNode> {
    privileges.sort_by_cached_key(|privilege| {
        (
            TitleKey(resources.action_title(&privilege.action)),
            privilege.controller.clone(),
            privilege.action.clone(),
        )
    });
    privileges
        .into_iter()
        .map(|privilege| TreeNode::leaf(privilege.id, resources.action_title(&privilege.action)))
        .collect()
}

/// Buckets in title order; members keep their input order
fn group_by_title<'a, F>(members: &[&'a Privilege], title: F) -> Vec<(String, Vec<&'a Privilege>)>
where
    F: Fn(&Privilege) -> String,
{
    let mut groups: Vec<(String, Vec<&'a Privilege>)> = Vec::new();
    for &privilege in members {
        let key = title(privilege);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, bucket)) => bucket.push(privilege),
            None => groups.push((key, vec![privilege])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| compare_titles(a, b));
    groups
}

/// Case-insensitive, then ordinal
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(PartialEq, Eq)]
struct TitleKey(String);

impl PartialOrd for TitleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TitleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_titles(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.name.as_str()).collect()
    }

    #[test]
    fn empty_store_builds_bare_root() {
        let tree = build_privilege_tree(&[], Vec::new(), &Resources::default());

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].name, "All");
        assert!(tree.nodes[0].nodes.is_empty());
        assert!(tree.leaf_ids().is_empty());
    }

    #[test]
    fn groups_by_area_controller_and_action() {
        let create = Privilege::new(Some("Admin"), "Users", "Create");
        let edit = Privilege::new(Some("Admin"), "Users", "Edit");
        let home = Privilege::new(None, "Home", "Index");
        let privileges = vec![edit.clone(), home.clone(), create.clone()];

        let tree = build_privilege_tree(&privileges, vec![create.id], &Resources::default());
        let root = &tree.nodes[0];

        assert_eq!(names(&root.nodes), vec!["Admin", "Home"]);
        let admin = &root.nodes[0];
        assert_eq!(names(&admin.nodes), vec!["Users"]);
        assert_eq!(names(&admin.nodes[0].nodes), vec!["Create", "Edit"]);
        assert_eq!(admin.nodes[0].nodes[0].id, Some(create.id));

        // Global controllers sit directly under the root
        let home_node = &root.nodes[1];
        assert_eq!(home_node.id, None);
        assert_eq!(home_node.nodes[0].id, Some(home.id));

        assert_eq!(tree.selected_ids, vec![create.id]);
    }

    #[test]
    fn global_controllers_interleave_with_areas() {
        let privileges = vec![
            Privilege::new(Some("Reports"), "Sales", "Index"),
            Privilege::new(None, "Dashboard", "Index"),
            Privilege::new(Some("Administration"), "Roles", "Index"),
        ];

        let tree = build_privilege_tree(&privileges, Vec::new(), &Resources::default());
        assert_eq!(
            names(&tree.nodes[0].nodes),
            vec!["Administration", "Dashboard", "Reports"]
        );
    }

    #[test]
    fn ordering_ignores_case() {
        let privileges = vec![
            Privilege::new(Some("zeta"), "Things", "Index"),
            Privilege::new(Some("Alpha"), "things", "index"),
            Privilege::new(Some("Alpha"), "Things", "Index"),
        ];

        let tree = build_privilege_tree(&privileges, Vec::new(), &Resources::default());
        let root = &tree.nodes[0];
        assert_eq!(names(&root.nodes), vec!["Alpha", "zeta"]);
        assert_eq!(names(&root.nodes[0].nodes), vec!["Things", "things"]);
    }

    #[test]
    fn titles_come_from_resources() {
        let resources = Resources::load(None).unwrap();
        let privileges = vec![Privilege::new(Some("Administration"), "Roles", "Index")];

        let tree = build_privilege_tree(&privileges, Vec::new(), &resources);
        let roles = &tree.nodes[0].nodes[0].nodes[0];
        assert_eq!(roles.nodes[0].name, "List");
    }

    #[test]
    fn actions_sharing_a_title_keep_their_own_leaves() {
        let resources = Resources::load(None).unwrap();
        assert_eq!(resources.action_title("Index"), "List");

        let index = Privilege::new(None, "Home", "Index");
        let list = Privilege::new(None, "Home", "List");
        let tree = build_privilege_tree(&[list.clone(), index.clone()], Vec::new(), &resources);

        let home = &tree.nodes[0].nodes[0];
        assert_eq!(names(&home.nodes), vec!["List", "List"]);
        // Equal titles fall back to the action key
        assert_eq!(home.nodes[0].id, Some(index.id));
        assert_eq!(home.nodes[1].id, Some(list.id));
    }

    #[test]
    fn controllers_sharing_a_title_keep_every_leaf() {
        let resources =
            Resources::from_yaml("controllers:\n  Users: People\n  Members: People\n").unwrap();
        let privileges = vec![
            Privilege::new(Some("Administration"), "Users", "Edit"),
            Privilege::new(Some("Administration"), "Members", "Edit"),
        ];

        let tree = build_privilege_tree(&privileges, Vec::new(), &resources);
        let people = &tree.nodes[0].nodes[0].nodes;
        assert_eq!(names(people), vec!["People"]);
        assert_eq!(people[0].nodes.len(), 2);

        let leaves: HashSet<Uuid> = tree.leaf_ids().into_iter().collect();
        let expected: HashSet<Uuid> = privileges.iter().map(|p| p.id).collect();
        assert_eq!(leaves, expected);
    }

    #[test]
    fn every_privilege_appears_once() {
        let privileges: Vec<Privilege> = ["Create", "Delete", "Details", "Edit", "Index"]
            .iter()
            .flat_map(|action| {
                vec![
                    Privilege::new(Some("Administration"), "Roles", action),
                    Privilege::new(Some("Administration"), "Accounts", action),
                    Privilege::new(None, "Home", action),
                ]
            })
            .collect();

        let tree = build_privilege_tree(&privileges, Vec::new(), &Resources::default());
        let leaves = tree.leaf_ids();
        let unique: HashSet<Uuid> = leaves.iter().copied().collect();
        let expected: HashSet<Uuid> = privileges.iter().map(|p| p.id).collect();

        assert_eq!(leaves.len(), privileges.len());
        assert_eq!(unique, expected);
    }
}
