use crate::schema::{DependencyResolver, TableSchema};
use anyhow::{bail, Result};

/// Resolves which tables to load based on include/exclude filters
pub fn resolve_tables(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static TableSchema>> {
    let resolver = DependencyResolver::new();

    let tables = match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let refs: Vec<&str> = include_list.iter().map(|s| s.as_str()).collect();
            resolver.resolve_includes(&refs)?
        }
        (None, Some(exclude_list)) => {
            let refs: Vec<&str> = exclude_list.iter().map(|s| s.as_str()).collect();
            resolver.resolve_excludes(&refs)?
        }
        (None, None) => resolver.all_tables_ordered(),
    };

    tracing::info!(
        tables = ?tables.iter().map(|t| t.name).collect::<Vec<_>>(),
        "Resolved tables to load"
    );
    Ok(tables)
}
