use gpig_graph::{CommitInfo, GraphCommitList, GraphLog, NodeQueue};

#[cfg(test)]
mod test_lane {
    use std::collections::HashSet;

    use git2::{Oid, Time};
    use gpig_graph::{EdgeKind, GraphLane};
    use pretty_assertions::assert_eq;
    use rand::prelude::*;

    use super::*;

    fn oid(n: u32) -> Oid {
        Oid::from_str(&format!("{n:04}")).unwrap()
    }

    fn commit(n: u32, parents: &[u32]) -> CommitInfo {
        CommitInfo::new(
            oid(n),
            format!("commit {n}"),
            "pig@example.com".to_string(),
            Time::new(10_000 - n as i64, 0),
            parents.iter().map(|p| oid(*p)).collect(),
        )
    }

    fn layout(commits: Vec<CommitInfo>) -> GraphLog {
        let mut list = GraphCommitList::new();
        list.source(NodeQueue::new(commits));
        list.fill_to(usize::MAX).unwrap();
        list.finish()
    }

    fn positions(lanes: &[GraphLane]) -> Vec<usize> {
        lanes.iter().map(|lane| lane.position()).collect()
    }

    fn lane_of(log: &GraphLog, n: u32) -> usize {
        log.find(&oid(n)).unwrap().lane().unwrap().position()
    }

    /// No two lanes share a column on a row, no lane plays two roles, children come first.
    fn assert_well_formed(log: &GraphLog) {
        for (row, node) in log.nodes().iter().enumerate() {
            let lanes: Vec<GraphLane> = node.row_lanes().collect();
            let ids: HashSet<GraphLane> = lanes.iter().copied().collect();
            assert_eq!(ids.len(), lanes.len(), "lane with two roles on row {row}");

            let columns: HashSet<usize> = lanes.iter().map(|l| l.position()).collect();
            assert_eq!(columns.len(), lanes.len(), "column collision on row {row}");
            assert!(columns.iter().all(|c| *c < log.max_line()));

            for child in node.children() {
                assert!(log.row_of(child).unwrap() < row, "child after parent on row {row}");
            }
        }
    }

    #[test]
    fn straight_line() {
        let commits = (1..=10)
            .map(|n| if n == 10 { commit(n, &[]) } else { commit(n, &[n + 1]) })
            .collect();
        let log = layout(commits);

        assert_eq!(log.len(), 10);
        assert_eq!(log.max_line(), 1);
        for node in log.nodes() {
            assert_eq!(node.lane().map(|l| l.position()), Some(0));
            assert!(node.passing_lanes().is_empty());
            assert!(node.forking_off_lanes().is_empty());
            assert!(node.merging_lanes().is_empty());
        }
        let lanes: HashSet<GraphLane> = log.nodes().iter().filter_map(|n| n.lane()).collect();
        assert_eq!(lanes.len(), 1);
        assert_well_formed(&log);
    }

    #[test]
    fn fork_then_merge() {
        //  1      merge of 2 and 3
        //  | \
        //  2  |
        //  |  3
        //  4  |
        //  |  5
        //  | /
        //  6      root
        let log = layout(vec![
            commit(1, &[2, 3]),
            commit(2, &[4]),
            commit(3, &[5]),
            commit(4, &[6]),
            commit(5, &[6]),
            commit(6, &[]),
        ]);

        let merge = log.find(&oid(1)).unwrap();
        assert_eq!(lane_of(&log, 1), 0);
        assert_eq!(positions(merge.merging_lanes()), vec![1]);
        assert!(merge.passing_lanes().is_empty());

        for n in [2, 4] {
            assert_eq!(lane_of(&log, n), 0);
            assert_eq!(positions(log.find(&oid(n)).unwrap().passing_lanes()), vec![1]);
        }
        for n in [3, 5] {
            assert_eq!(lane_of(&log, n), 1);
            assert_eq!(positions(log.find(&oid(n)).unwrap().passing_lanes()), vec![0]);
        }

        let root = log.find(&oid(6)).unwrap();
        assert_eq!(lane_of(&log, 6), 0);
        assert_eq!(positions(root.forking_off_lanes()), vec![1]);
        assert_eq!(root.forking_off_lanes(), merge.merging_lanes());
        assert_eq!(root.children(), &[oid(4), oid(5)]);

        assert_eq!(log.max_line(), 2);
        assert_well_formed(&log);
    }

    #[test]
    fn three_way_fork() {
        let log = layout(vec![
            commit(1, &[4]),
            commit(2, &[4]),
            commit(3, &[4]),
            commit(4, &[]),
        ]);

        assert_eq!(lane_of(&log, 1), 0);
        assert_eq!(lane_of(&log, 2), 1);
        assert_eq!(lane_of(&log, 3), 2);
        assert_eq!(positions(log.find(&oid(3)).unwrap().passing_lanes()), vec![0, 1]);

        let root = log.find(&oid(4)).unwrap();
        assert_eq!(lane_of(&log, 4), 0);
        assert_eq!(positions(root.forking_off_lanes()), vec![1, 2]);
        assert_eq!(root.child_count(), 3);
        assert_eq!(log.max_line(), 3);
        assert_well_formed(&log);
    }

    #[test]
    fn octopus_merge() {
        let log = layout(vec![
            commit(1, &[2, 3, 4]),
            commit(2, &[5]),
            commit(3, &[5]),
            commit(4, &[5]),
            commit(5, &[]),
        ]);

        let merge = log.find(&oid(1)).unwrap();
        assert_eq!(positions(merge.merging_lanes()), vec![1, 2]);
        assert_eq!(positions(merge.parent_lanes()), vec![0, 1, 2]);
        assert_eq!(lane_of(&log, 3), 1);
        assert_eq!(lane_of(&log, 4), 2);

        let root = log.find(&oid(5)).unwrap();
        assert_eq!(positions(root.forking_off_lanes()), vec![1, 2]);
        assert_eq!(log.max_line(), 3);
        assert_well_formed(&log);
    }

    #[test]
    fn merge_joins_lane_already_heading_to_parent() {
        // 1 is a feature tip on top of 4, 2 merges 3 and 4
        let log = layout(vec![
            commit(1, &[4]),
            commit(2, &[3, 4]),
            commit(3, &[4]),
            commit(4, &[]),
        ]);

        let merge = log.find(&oid(2)).unwrap();
        assert_eq!(lane_of(&log, 2), 1);
        assert_eq!(positions(merge.merging_lanes()), vec![0]);
        assert!(merge.passing_lanes().is_empty());

        let root = log.find(&oid(4)).unwrap();
        assert_eq!(lane_of(&log, 4), 0);
        assert_eq!(positions(root.forking_off_lanes()), vec![1]);
        assert_eq!(log.max_line(), 2);
        assert_well_formed(&log);
    }

    #[test]
    fn first_parent_claim_wins_over_merge_claim() {
        // 1 merges 3 in, 2 builds on 3 as well
        let log = layout(vec![
            commit(1, &[4, 3]),
            commit(2, &[3]),
            commit(3, &[4]),
            commit(4, &[]),
        ]);

        // lane 1 (merge claim from 1) is older than lane 2 (first parent of 2) but loses
        let base = log.find(&oid(3)).unwrap();
        assert_eq!(lane_of(&log, 3), 2);
        assert_eq!(positions(base.forking_off_lanes()), vec![1]);
        assert_eq!(positions(base.passing_lanes()), vec![0]);

        let root = log.find(&oid(4)).unwrap();
        assert_eq!(lane_of(&log, 4), 0);
        assert_eq!(positions(root.forking_off_lanes()), vec![2]);
        assert_eq!(log.max_line(), 3);
        assert_well_formed(&log);
    }

    #[test]
    fn fill_to_resumes() {
        let commits: Vec<CommitInfo> = (1..=10)
            .map(|n| if n == 10 { commit(n, &[]) } else { commit(n, &[n + 1]) })
            .collect();
        let mut list = GraphCommitList::new();
        list.source(NodeQueue::new(commits));

        list.fill_to(3).unwrap();
        assert_eq!(list.len(), 3);
        let first: Vec<Oid> = list.nodes().iter().map(|n| n.oid()).collect();
        assert_eq!(first, vec![oid(1), oid(2), oid(3)]);
        let times: Vec<i64> = list.nodes().iter().map(|n| n.commit().timestamp.seconds()).collect();
        assert!(times.windows(2).all(|w| w[0] > w[1]));

        list.fill_to(10).unwrap();
        assert_eq!(list.len(), 10);
        let all: Vec<Oid> = list.nodes().iter().map(|n| n.oid()).collect();
        assert_eq!(all, (1..=10).map(oid).collect::<Vec<_>>());

        list.fill_to(10).unwrap();
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn uncommitted_changes_sit_on_head() {
        let mut list = GraphCommitList::new();
        list.add_uncommited_changes_graph_commit(oid(1)).unwrap();
        list.source(NodeQueue::new(vec![
            commit(2, &[3]),
            commit(1, &[3]),
            commit(3, &[]),
        ]));
        list.fill_to(3).unwrap();
        assert_eq!(list.commit_count(), 3);
        assert_eq!(list.len(), 4);

        let log = list.finish();
        let top = log.node(0).unwrap();
        assert!(top.is_uncommitted());
        assert_eq!(top.parents(), &[oid(1)]);
        assert_eq!(top.lane().map(|l| l.position()), Some(0));

        let head = log.find(&oid(1)).unwrap();
        assert_eq!(head.children(), &[Oid::zero()]);
        assert_eq!(head.lane(), top.lane());
        assert!(log.row_of(&Oid::zero()).unwrap() < log.row_of(&oid(1)).unwrap());
        assert_eq!(log.child_node(head, 0).oid(), Oid::zero());
        assert_well_formed(&log);
    }

    #[test]
    fn edges_follow_lanes() {
        let log = layout(vec![
            commit(1, &[2, 3]),
            commit(2, &[4]),
            commit(3, &[5]),
            commit(4, &[6]),
            commit(5, &[6]),
            commit(6, &[]),
        ]);
        let edges = log.edges();
        assert_eq!(edges.len(), 6);

        let from_merge: Vec<_> = edges.iter().filter(|e| e.child_row == 0).collect();
        assert_eq!(from_merge[0].kind, EdgeKind::Straight);
        assert_eq!(from_merge[1].kind, EdgeKind::Merge);
        assert_eq!(from_merge[1].column, 1);
        assert_eq!(from_merge[1].parent_row, log.row_of(&oid(3)));

        let into_root = edges
            .iter()
            .find(|e| e.child_row == log.row_of(&oid(5)).unwrap())
            .unwrap();
        assert_eq!(into_root.kind, EdgeKind::Fork);
        assert_eq!(into_root.child_column, 1);
        assert_eq!(into_root.parent_column, Some(0));
    }

    #[test]
    fn edges_to_rows_below_the_cut() {
        let mut list = GraphCommitList::new();
        list.source(NodeQueue::new(vec![commit(1, &[2]), commit(2, &[3])]));
        list.fill_to(1).unwrap();
        let edges = list.finish().edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].parent_row, None);
        assert_eq!(edges[0].kind, EdgeKind::Straight);
    }

    #[test]
    fn generated_histories_are_well_formed() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let count: u32 = 60;
            let commits: Vec<CommitInfo> = (1..=count)
                .map(|n| {
                    let older = count - n;
                    let parent_count = if older == 0 { 0 } else { rng.gen_range(0..4u32).min(older) };
                    let mut parents = Vec::new();
                    for _ in 0..parent_count {
                        let parent = n + 1 + rng.gen_range(0..older.min(8));
                        if !parents.contains(&parent) {
                            parents.push(parent);
                        }
                    }
                    commit(n, &parents)
                })
                .collect();

            let log = layout(commits);
            assert_eq!(log.len(), count as usize, "seed {seed}");
            assert_well_formed(&log);
        }
    }
}
