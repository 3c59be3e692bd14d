use anyhow::{Context, Result};
use polars::prelude::ParquetWriter;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::assembly::Assembly;
use crate::model::TeamMatchStats;
use crate::player_stats::{PlayerMatchStats, SNAPSHOT_MINUTES, Snapshot};

pub const TEAMS_FILE: &str = "teams.json";
pub const PLAYERS_FILE: &str = "players.json";
pub const MATCHES_FILE: &str = "matches.json";
pub const TEAM_MATCH_STATS_FILE: &str = "team_match_stats.json";
pub const PLAYER_MATCH_STATS_FILE: &str = "player_match_stats.json";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";
pub const TEAM_PARQUET_FILE: &str = "team_match_stats.parquet";
pub const PLAYER_PARQUET_FILE: &str = "player_match_stats.parquet";

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes every collection of a run as its own JSON file under `out_dir` and
/// returns the written paths.
pub fn write_assembly_json(out_dir: &Path, assembly: &Assembly) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(6);
    write_named(out_dir, TEAMS_FILE, &assembly.teams, &mut written)?;
    write_named(out_dir, PLAYERS_FILE, &assembly.players, &mut written)?;
    write_named(out_dir, MATCHES_FILE, &assembly.matches, &mut written)?;
    write_named(out_dir, TEAM_MATCH_STATS_FILE, &assembly.team_match_stats, &mut written)?;
    write_named(out_dir, PLAYER_MATCH_STATS_FILE, &assembly.player_match_stats, &mut written)?;
    write_named(out_dir, DIAGNOSTICS_FILE, &assembly.diagnostics, &mut written)?;

    Ok(written)
}

fn write_named<T: Serialize + ?Sized>(
    out_dir: &Path,
    name: &str,
    value: &T,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = out_dir.join(name);
    write_json(&path, value)?;
    written.push(path);
    Ok(())
}

/// Writes both fact tables as Parquet files under `out_dir`.
pub fn write_fact_parquet(out_dir: &Path, assembly: &Assembly) -> Result<Vec<PathBuf>> {
    let team_path = out_dir.join(TEAM_PARQUET_FILE);
    let mut team_df = team_dataframe(&assembly.team_match_stats)?;
    write_parquet(&team_path, &mut team_df)?;

    let player_path = out_dir.join(PLAYER_PARQUET_FILE);
    let mut player_df = player_dataframe(&assembly.player_match_stats)?;
    write_parquet(&player_path, &mut player_df)?;

    Ok(vec![team_path, player_path])
}

fn write_parquet(path: &Path, df: &mut DataFrame) -> Result<()> {
    ensure_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

fn column<T, V>(rows: &[T], get: impl Fn(&T) -> V) -> Vec<V> {
    rows.iter().map(get).collect()
}

pub fn team_dataframe(rows: &[TeamMatchStats]) -> Result<DataFrame, PolarsError> {
    DataFrame::new(vec![
        Series::new("team_id", column(rows, |r| r.team_id.clone())),
        Series::new("match_id", column(rows, |r| r.match_id.clone())),
        Series::new("side", column(rows, |r| r.side.as_str().to_string())),
        Series::new("win", column(rows, |r| r.win)),
        Series::new("kills", column(rows, |r| r.kills)),
        Series::new("deaths", column(rows, |r| r.deaths)),
        Series::new("kpm", column(rows, |r| r.kpm)),
        Series::new("ckpm", column(rows, |r| r.ckpm)),
        Series::new("dragons", column(rows, |r| r.dragons)),
        Series::new("infernals", column(rows, |r| r.infernals)),
        Series::new("mountains", column(rows, |r| r.mountains)),
        Series::new("clouds", column(rows, |r| r.clouds)),
        Series::new("oceans", column(rows, |r| r.oceans)),
        Series::new("chemtechs", column(rows, |r| r.chemtechs)),
        Series::new("hextechs", column(rows, |r| r.hextechs)),
        Series::new("unknown_dragons", column(rows, |r| r.unknown_dragons)),
        Series::new("elders", column(rows, |r| r.elders)),
        Series::new("heralds", column(rows, |r| r.heralds)),
        Series::new("barons", column(rows, |r| r.barons)),
        Series::new("towers", column(rows, |r| r.towers)),
        Series::new("plates", column(rows, |r| r.plates)),
        Series::new("inhibitors", column(rows, |r| r.inhibitors)),
        Series::new("void_grubs", column(rows, |r| r.void_grubs)),
        Series::new("first_blood", column(rows, |r| r.first_blood)),
        Series::new("first_dragon", column(rows, |r| r.first_dragon)),
        Series::new("first_herald", column(rows, |r| r.first_herald)),
        Series::new("first_baron", column(rows, |r| r.first_baron)),
        Series::new("first_tower", column(rows, |r| r.first_tower)),
        Series::new("first_mid_tower", column(rows, |r| r.first_mid_tower)),
        Series::new("first_three_towers", column(rows, |r| r.first_three_towers)),
        Series::new("picks", column(rows, |r| r.picks.clone())),
        Series::new("bans", column(rows, |r| r.bans.clone())),
    ])
}

pub fn player_dataframe(rows: &[PlayerMatchStats]) -> Result<DataFrame, PolarsError> {
    let mut columns = vec![
        Series::new("participant_id", column(rows, |r| r.participant_id.clone())),
        Series::new("player_id", column(rows, |r| r.player_id.clone())),
        Series::new("team_id", column(rows, |r| r.team_id.clone())),
        Series::new("match_id", column(rows, |r| r.match_id.clone())),
        Series::new("side", column(rows, |r| r.side.as_str().to_string())),
        Series::new("role", column(rows, |r| r.role.as_str().to_string())),
        Series::new("champion", column(rows, |r| r.champion.clone())),
        Series::new("win", column(rows, |r| r.win)),
        Series::new("kills", column(rows, |r| r.kills)),
        Series::new("deaths", column(rows, |r| r.deaths)),
        Series::new("assists", column(rows, |r| r.assists)),
        Series::new("kda", column(rows, |r| r.kda)),
        Series::new("kill_participation", column(rows, |r| r.kill_participation)),
        Series::new("damage_to_champions", column(rows, |r| r.damage_to_champions)),
        Series::new("dpm", column(rows, |r| r.dpm)),
        Series::new("damage_share", column(rows, |r| r.damage_share)),
        Series::new("damage_taken_per_minute", column(rows, |r| r.damage_taken_per_minute)),
        Series::new("wards_placed", column(rows, |r| r.wards_placed)),
        Series::new("wpm", column(rows, |r| r.wpm)),
        Series::new("wards_killed", column(rows, |r| r.wards_killed)),
        Series::new("wcpm", column(rows, |r| r.wcpm)),
        Series::new("control_wards_bought", column(rows, |r| r.control_wards_bought)),
        Series::new("vision_score", column(rows, |r| r.vision_score)),
        Series::new("vspm", column(rows, |r| r.vspm)),
        Series::new("total_gold", column(rows, |r| r.total_gold)),
        Series::new("earned_gold", column(rows, |r| r.earned_gold)),
        Series::new("earned_gpm", column(rows, |r| r.earned_gpm)),
        Series::new("gold_spent", column(rows, |r| r.gold_spent)),
        Series::new("minion_kills", column(rows, |r| r.minion_kills)),
        Series::new("monster_kills", column(rows, |r| r.monster_kills)),
        Series::new("total_cs", column(rows, |r| r.total_cs)),
        Series::new("cspm", column(rows, |r| r.cspm)),
    ];

    for minute in SNAPSHOT_MINUTES {
        columns.extend(snapshot_columns(rows, minute));
    }

    DataFrame::new(columns)
}

/// Snapshot values flattened to `{stat}_at_{minute}` columns.
fn snapshot_columns(rows: &[PlayerMatchStats], minute: u32) -> Vec<Series> {
    let stats: [(&str, fn(&Snapshot) -> Option<f64>); 15] = [
        ("gold", |s| s.gold),
        ("xp", |s| s.xp),
        ("cs", |s| s.cs),
        ("kills", |s| s.kills),
        ("assists", |s| s.assists),
        ("deaths", |s| s.deaths),
        ("opp_gold", |s| s.opp_gold),
        ("opp_xp", |s| s.opp_xp),
        ("opp_cs", |s| s.opp_cs),
        ("opp_kills", |s| s.opp_kills),
        ("opp_assists", |s| s.opp_assists),
        ("opp_deaths", |s| s.opp_deaths),
        ("gold_diff", |s| s.gold_diff),
        ("xp_diff", |s| s.xp_diff),
        ("cs_diff", |s| s.cs_diff),
    ];

    stats
        .iter()
        .map(|(stat, get)| {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.snapshot(minute).and_then(|snapshot| get(snapshot)))
                .collect();
            Series::new(&format!("{}_at_{}", stat, minute), values)
        })
        .collect()
}
