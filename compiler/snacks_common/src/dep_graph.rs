use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

#[derive(Clone, Debug)]
pub struct Dependency<T> {
    /// The number of unresolved entries this entry depends on.
    pub num_deps: usize,
    /// The entries this entry depends on.
    pub dependencies: BTreeSet<T>,
    /// The entries that depend on this entry.
    pub dependents: BTreeSet<T>,
}

impl<T: Ord> Dependency<T> {
    fn new() -> Self {
        Self {
            num_deps: 0,
            dependencies: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }
}

/// A dependency graph which yields its entries in resolution order.
#[derive(Clone, Debug)]
pub struct DependencyGraph<T> {
    pub graph: BTreeMap<T, Dependency<T>>,
}

impl<T> Default for DependencyGraph<T> {
    fn default() -> DependencyGraph<T> {
        DependencyGraph {
            graph: BTreeMap::new(),
        }
    }
}

impl<T: Clone + Ord> DependencyGraph<T> {
    pub fn new() -> DependencyGraph<T> {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn add_entry(&mut self, entry: impl Into<T>) {
        if let Entry::Vacant(e) = self.graph.entry(entry.into()) {
            e.insert(Dependency::new());
        }
    }

    /// Records that `entry` depends on `dependency`. Self dependencies are ignored.
    pub fn add_dependency(&mut self, entry: impl Into<T>, dependency: impl Into<T>) {
        let entry = entry.into();
        let dependency = dependency.into();
        self.add_entry(entry.clone());
        if entry == dependency {
            return;
        }
        self.add_entry(dependency.clone());

        let added = match self.graph.get_mut(&dependency) {
            Some(dep) => dep.dependents.insert(entry.clone()),
            None => false,
        };
        if added {
            if let Some(dep) = self.graph.get_mut(&entry) {
                dep.num_deps += 1;
                dep.dependencies.insert(dependency);
            }
        }
    }

    /// Removes and returns the entries that have no unresolved dependencies.
    pub fn pop_next(&mut self) -> BTreeSet<T> {
        let set = self
            .graph
            .iter()
            .filter(|(_, d)| d.num_deps == 0)
            .map(|(e, _)| e.clone())
            .collect::<BTreeSet<_>>();
        for e in &set {
            self.remove(e);
        }
        set
    }

    /// Consumes the graph, returning groups of entries such that no group
    /// depends on a later one. Entries that depend on each other (directly or
    /// through a cycle) share a group; every other group is a singleton.
    pub fn into_groups(mut self) -> Vec<Vec<T>> {
        let mut groups = vec![];
        while !self.graph.is_empty() {
            let next = self.pop_next();
            if !next.is_empty() {
                groups.extend(next.into_iter().map(|e| vec![e]));
                continue;
            }

            // every remaining entry waits on another; resolve a cycle whose
            // dependencies all lie within itself
            let Some(cycle) = self.next_cycle() else {
                break;
            };
            for e in &cycle {
                self.remove(e);
            }
            groups.push(cycle.into_iter().collect());
        }
        groups
    }

    fn next_cycle(&self) -> Option<BTreeSet<T>> {
        self.graph.keys().map(|e| self.cycle_of(e)).find(|cycle| {
            cycle.iter().all(|m| {
                self.graph[m]
                    .dependencies
                    .iter()
                    .filter(|d| self.graph.contains_key(*d))
                    .all(|d| cycle.contains(d))
            })
        })
    }

    /// Returns the entries reachable from `entry` that can also reach it.
    fn cycle_of(&self, entry: &T) -> BTreeSet<T> {
        let forward = self.reach(entry, |d| &d.dependencies);
        let backward = self.reach(entry, |d| &d.dependents);
        forward.intersection(&backward).cloned().collect()
    }

    fn reach(&self, entry: &T, edges: impl Fn(&Dependency<T>) -> &BTreeSet<T>) -> BTreeSet<T> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![entry.clone()];
        while let Some(e) = stack.pop() {
            if !seen.insert(e.clone()) {
                continue;
            }
            if let Some(dep) = self.graph.get(&e) {
                stack.extend(
                    edges(dep)
                        .iter()
                        .filter(|e| self.graph.contains_key(*e))
                        .cloned(),
                );
            }
        }
        seen
    }

    fn remove(&mut self, entry: &T) {
        if let Some(p) = self.graph.remove(entry) {
            for s in &p.dependents {
                if let Some(y) = self.graph.get_mut(s) {
                    y.num_deps = y.num_deps.saturating_sub(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_follow_dependencies() {
        let mut g = DependencyGraph::<usize>::new();
        g.add_dependency(0usize, 2usize);
        g.add_dependency(1usize, 0usize);
        g.add_entry(3usize);
        assert_eq!(g.into_groups(), vec![vec![2], vec![3], vec![0], vec![1]]);
    }

    #[test]
    fn cycles_share_a_group() {
        let mut g = DependencyGraph::<usize>::new();
        g.add_dependency(0usize, 1usize);
        g.add_dependency(1usize, 0usize);
        g.add_dependency(2usize, 1usize);
        g.add_dependency(0usize, 0usize);
        assert_eq!(g.into_groups(), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn cycle_waits_for_its_dependencies() {
        let mut g = DependencyGraph::<usize>::new();
        g.add_dependency(1usize, 2usize);
        g.add_dependency(2usize, 1usize);
        g.add_dependency(2usize, 3usize);
        g.add_dependency(3usize, 4usize);
        g.add_dependency(4usize, 3usize);
        assert_eq!(g.into_groups(), vec![vec![3, 4], vec![1, 2]]);
    }
}
