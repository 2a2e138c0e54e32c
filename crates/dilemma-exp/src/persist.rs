//! Table and partition-list persistence
//!
//! Experiment tables render to CSV and land in files named from the
//! cumulative row count, the run's descriptive tag and the active payoff
//! values. Partition lists can be saved as JSON and loaded back to skip
//! re-enumeration on repeated runs over the same universe and k.

use std::fs;
use std::path::{Path, PathBuf};

use dilemma_common::{PersistError, Result};

use crate::experiment::ExperimentTable;
use crate::partition::Partition;

/// Quote a CSV field when it needs it (member strings contain commas)
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a table to CSV
///
/// Columns: System ID, the six system aggregates, then per team the member
/// string and its three metric columns.
pub fn table_to_csv(table: &ExperimentTable) -> String {
    let teams = table.team_count();
    let norm = table.cooperation_norm();

    let mut header = vec![
        "System ID".to_string(),
        "SYS MIN Score".to_string(),
        "SYS AVG Score".to_string(),
        "MIN of Team Avgs".to_string(),
        "AVG of Team Mins".to_string(),
        "SYS CC Dist AVG".to_string(),
        "SYS CC Dist MIN".to_string(),
    ];
    for i in 1..=teams {
        header.push(format!("Team{i}"));
        header.push(format!("Team{i} Avg Score"));
        header.push(format!("Team{i} Min Score"));
        header.push(format!("Team{i} Avg CC Dist"));
    }

    let mut out = header.join(",");
    out.push('\n');

    for row in table.rows() {
        let mut fields = vec![
            csv_field(&row.system_id),
            row.sys_min_score.to_string(),
            row.sys_avg_score.to_string(),
            row.min_of_team_avgs.to_string(),
            row.avg_of_team_mins.to_string(),
            row.cc_dist_avg.to_string(),
            row.cc_dist_min.to_string(),
        ];
        for team in &row.teams {
            fields.push(csv_field(&team.names()));
            fields.push(team.avg_norm_score.to_string());
            fields.push(team.min_norm_score.to_string());
            fields.push(team.cc(norm).to_string());
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Write a table under `dir`, returning the full path
///
/// The filename is `{stem}_RPST_{r}_{p}_{s}_{t}.csv`; the directory is
/// created on demand. Previously written files are never touched.
pub fn write_table(table: &ExperimentTable, dir: &Path, stem: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| PersistError::Write {
        path: dir.display().to_string(),
        source: e,
    })?;

    let (r, p, s, t) = table.payoff().rpst();
    let file = dir.join(format!("{stem}_RPST_{r}_{p}_{s}_{t}.csv"));
    fs::write(&file, table_to_csv(table)).map_err(|e| PersistError::Write {
        path: file.display().to_string(),
        source: e,
    })?;
    Ok(file)
}

/// Save a partition list as JSON
pub fn write_partitions(path: &Path, partitions: &[Partition]) -> Result<()> {
    let json = serde_json::to_string(partitions)?;
    fs::write(path, json).map_err(|e| {
        PersistError::Write {
            path: path.display().to_string(),
            source: e,
        }
        .into()
    })
}

/// Load a previously saved partition list
pub fn load_partitions(path: &Path) -> Result<Vec<Partition>> {
    let json = fs::read_to_string(path).map_err(|e| PersistError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&json)?)
}
