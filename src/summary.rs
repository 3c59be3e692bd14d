use anyhow::Result;
use polars::prelude::*;
use std::path::Path;

pub struct SummaryArgs<'a> {
    pub player_parquet: &'a Path,
    pub max_rows: Option<usize>,
    pub by_role: bool,
    pub top_champions: Option<usize>,
}

fn descending() -> SortOptions {
    SortOptions {
        descending: true,
        nulls_last: true,
        ..Default::default()
    }
}

fn scan(path: &Path, max_rows: Option<usize>) -> Result<LazyFrame> {
    let mut lf = LazyFrame::scan_parquet(
        path.to_string_lossy().as_ref(),
        ScanArgsParquet::default(),
    )?;
    if let Some(limit) = max_rows {
        lf = lf.limit(limit.try_into().unwrap_or(u32::MAX));
    }
    Ok(lf)
}

/// Row, match and player counts of a player fact table.
pub fn counts(lf: &LazyFrame) -> Result<DataFrame> {
    let df = lf
        .clone()
        .select([
            len().alias("rows"),
            col("match_id").n_unique().alias("matches"),
            col("player_id").n_unique().alias("players"),
        ])
        .collect()?;
    Ok(df)
}

/// Win rate per side, counted once per player row.
pub fn side_win_rates(lf: &LazyFrame) -> Result<DataFrame> {
    let df = lf
        .clone()
        .group_by([col("side")])
        .agg([col("win").cast(DataType::Float64).mean().alias("win_rate")])
        .sort("side", SortOptions::default())
        .collect()?;
    Ok(df)
}

pub fn role_distribution(lf: &LazyFrame) -> Result<DataFrame> {
    let df = lf
        .clone()
        .group_by([col("role")])
        .agg([len().alias("games")])
        .sort("games", descending())
        .collect()?;
    Ok(df)
}

pub fn role_averages(lf: &LazyFrame) -> Result<DataFrame> {
    let df = lf
        .clone()
        .group_by([col("role")])
        .agg([
            col("kills").cast(DataType::Float64).mean().alias("avg_kills"),
            col("kda").mean().alias("avg_kda"),
            col("earned_gpm").mean().alias("avg_gpm"),
            col("dpm").mean().alias("avg_dpm"),
            col("vspm").mean().alias("avg_vspm"),
            col("cspm").mean().alias("avg_cspm"),
            col("win").cast(DataType::Float64).mean().alias("win_rate"),
        ])
        .sort("role", SortOptions::default())
        .collect()?;
    Ok(df)
}

pub fn top_champions(lf: &LazyFrame, k: usize) -> Result<DataFrame> {
    let df = lf
        .clone()
        .group_by([col("champion")])
        .agg([
            len().alias("games"),
            col("win").cast(DataType::Float64).mean().alias("win_rate"),
        ])
        .sort("games", descending())
        .limit(k.try_into().unwrap_or(u32::MAX))
        .collect()?;
    Ok(df)
}

/// Prints a summary of a written player fact table.
pub fn summarize_players(args: SummaryArgs) -> Result<()> {
    println!("== Player match stats summary ==");

    let lf = scan(args.player_parquet, args.max_rows)?;

    let basic = counts(&lf)?;
    let rows = basic.column("rows").ok().and_then(|c| c.get(0).ok());
    let matches = basic.column("matches").ok().and_then(|c| c.get(0).ok());
    let players = basic.column("players").ok().and_then(|c| c.get(0).ok());
    println!(
        "Rows / matches / players: rows={:?} matches={:?} players={:?}",
        rows, matches, players
    );

    println!("Side winrate:\n{}", side_win_rates(&lf)?);
    println!("Role distribution:\n{}", role_distribution(&lf)?);

    if args.by_role {
        println!("Per-role stats:\n{}", role_averages(&lf)?);
    }

    if let Some(k) = args.top_champions {
        println!("Top champions:\n{}", top_champions(&lf, k)?);
    }

    Ok(())
}
