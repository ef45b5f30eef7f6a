//! View traversal helpers.
//!
//! Views form a forest. All traversals use an explicit stack so deeply
//! nested view trees cannot exhaust the call stack.

use bulk_core::ids::JobName;
use bulk_core::job::{Job, View};
use std::collections::{HashMap, HashSet};

/// Every view in the forest, parents before children (depth-first preorder).
pub fn all_views(roots: &[View]) -> Vec<&View> {
    let mut out = Vec::new();
    let mut stack: Vec<&View> = roots.iter().rev().collect();
    while let Some(view) = stack.pop() {
        out.push(view);
        stack.extend(view.views.iter().rev());
    }
    out
}

/// First view named `name` in preorder, at any depth.
pub fn find_view<'a>(roots: &'a [View], name: &str) -> Option<&'a View> {
    all_views(roots)
        .into_iter()
        .find(|view| view.name.as_str() == name)
}

/// Job names in a view and all of its nested views, first occurrence wins.
pub fn view_members(view: &View) -> Vec<JobName> {
    let mut seen = HashSet::new();
    all_views(std::slice::from_ref(view))
        .into_iter()
        .flat_map(|v| v.jobs.iter())
        .filter(|name| seen.insert(*name))
        .cloned()
        .collect()
}

/// The jobs of `view`, in view membership order. Unknown names are skipped.
pub fn jobs_in_view(jobs: &[Job], view: &View) -> Vec<Job> {
    let by_name: HashMap<&JobName, &Job> = jobs.iter().map(|job| (&job.name, job)).collect();
    view_members(view)
        .iter()
        .filter_map(|name| by_name.get(name).map(|job| (*job).clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<View> {
        vec![
            View::new("all").with_jobs(["api", "web"]),
            View::new("teams")
                .with_jobs(["infra"])
                .with_view(
                    View::new("backend")
                        .with_jobs(["api", "db"])
                        .with_view(View::new("storage").with_jobs(["blob"])),
                )
                .with_view(View::new("frontend").with_jobs(["web"])),
        ]
    }

    fn names(views: Vec<&View>) -> Vec<&str> {
        views.into_iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_all_views_preorder() {
        let views = forest();
        assert_eq!(
            names(all_views(&views)),
            vec!["all", "teams", "backend", "storage", "frontend"]
        );
    }

    #[test]
    fn test_find_nested_view() {
        let views = forest();
        assert!(find_view(&views, "storage").is_some());
        assert!(find_view(&views, "missing").is_none());
    }

    #[test]
    fn test_members_flatten_and_dedupe() {
        let views = forest();
        let teams = find_view(&views, "teams").unwrap();
        let members: Vec<_> = view_members(teams)
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(members, vec!["infra", "api", "db", "blob", "web"]);
    }

    #[test]
    fn test_jobs_in_view_skips_unknown() {
        let jobs = vec![Job::new("web"), Job::new("api")];
        let view = View::new("v").with_jobs(["api", "ghost", "web"]);
        let selected: Vec<_> = jobs_in_view(&jobs, &view)
            .into_iter()
            .map(|j| j.name.to_string())
            .collect();
        assert_eq!(selected, vec!["api", "web"]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut view = View::new("leaf").with_jobs(["deep"]);
        for depth in 0..2_000 {
            view = View::new(format!("level-{depth}")).with_view(view);
        }
        let members = view_members(&view);
        assert_eq!(members.len(), 1);
        assert_eq!(all_views(std::slice::from_ref(&view)).len(), 2_001);
    }
}
