use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use crate::error::{IngestError, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolves table dependencies for filtering
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Given a set of requested tables, resolve all required parents.
    /// Returns tables in load order (parents before children)
    pub fn resolve_includes(&self, requested: &[&str]) -> Result<Vec<&'static TableSchema>> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = requested.iter().copied().collect();

        while let Some(table_name) = queue.pop_front() {
            if included.contains(table_name) {
                continue;
            }

            if get_table(table_name).is_none() {
                return Err(IngestError::UnknownTable(table_name.to_string()));
            }

            included.insert(table_name);

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        Ok(self.in_load_order(&included))
    }

    /// Given a set of tables to exclude, return remaining tables in load order.
    /// Children of an excluded table are excluded too.
    pub fn resolve_excludes(&self, excluded: &[&str]) -> Result<Vec<&'static TableSchema>> {
        for name in excluded {
            if get_table(name).is_none() {
                return Err(IngestError::UnknownTable(name.to_string()));
            }
        }

        let mut removed: HashSet<&str> = excluded.iter().copied().collect();
        let mut included: HashSet<&str> = HashSet::new();

        // ALL_TABLES is parent-first, so a single pass sees every parent before its children
        for table in ALL_TABLES {
            let parent_removed = self.deps[table.name]
                .iter()
                .any(|dep| removed.contains(dep));

            if removed.contains(table.name) || parent_removed {
                removed.insert(table.name);
            } else {
                included.insert(table.name);
            }
        }

        Ok(self.in_load_order(&included))
    }

    /// Return all tables in load order
    pub fn all_tables_ordered(&self) -> Vec<&'static TableSchema> {
        ALL_TABLES.to_vec()
    }

    fn in_load_order(&self, included: &HashSet<&str>) -> Vec<&'static TableSchema> {
        ALL_TABLES
            .iter()
            .copied()
            .filter(|t| included.contains(t.name))
            .collect()
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
