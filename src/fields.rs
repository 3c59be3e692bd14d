//! Canonical field names and the column spellings each one goes by across
//! export revisions. Alias order matters: the first present alias wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

const fn field(name: &'static str, aliases: &'static [&'static str]) -> Field {
    Field { name, aliases }
}

// Identity and metadata.
pub const GAME_ID: Field = field("game_id", &["gameid", "game_id", "matchid", "match_id"]);
pub const TEAM_ID: Field = field("team_id", &["teamid", "team_id"]);
pub const TEAM_NAME: Field = field("team_name", &["teamname", "team_name", "team"]);
pub const PLAYER_ID: Field = field("player_id", &["playerid", "player_id"]);
pub const PLAYER_NAME: Field = field("player_name", &["playername", "player_name", "player"]);
pub const PARTICIPANT_ID: Field = field(
    "participant_id",
    &["participant_uid", "participantuid", "player_match_id"],
);
pub const SIDE: Field = field("side", &["side", "teamposition", "team_position"]);
pub const POSITION: Field = field("position", &["position", "role", "pos"]);
pub const CHAMPION: Field = field("champion", &["champion", "champion_name", "championname"]);
pub const DATE: Field = field("date", &["date", "game_date", "datetime"]);
pub const LEAGUE: Field = field("league", &["league", "tournament", "competition"]);
pub const YEAR: Field = field("year", &["year", "season"]);
pub const SPLIT: Field = field("split", &["split", "stage"]);
pub const PATCH: Field = field("patch", &["patch", "game_version", "gameversion"]);
pub const PLAYOFFS: Field = field("playoffs", &["playoffs", "playoff", "is_playoff"]);
pub const REGION: Field = field("region", &["region", "team_region"]);
pub const LOGO: Field = field("logo", &["logo", "team_logo", "logo_url"]);
pub const RESULT: Field = field("result", &["result", "win", "team_win"]);
pub const GAME_LENGTH: Field = field(
    "game_length",
    &["gamelength", "game_length", "game_duration", "duration"],
);
pub const SERIES_FORMAT: Field = field("series_format", &["bestof", "best_of", "series_format"]);
pub const DRAFT_PAYLOAD: Field = field("draft", &["picks_bans", "picksbans", "draft"]);

// Team combat.
pub const TEAM_KILLS: Field = field("team_kills", &["teamkills", "team_kills"]);
pub const TEAM_DEATHS: Field = field("team_deaths", &["teamdeaths", "team_deaths"]);
pub const TEAM_KPM: Field = field("kpm", &["team kpm", "team_kpm", "teamkpm", "kpm"]);
pub const CKPM: Field = field("ckpm", &["ckpm", "combined_kpm"]);

// First objectives, resolved per side.
pub const FIRST_BLOOD: Field = field(
    "first_blood",
    &["firstblood", "first_blood", "firstbloodteam", "fb"],
);
pub const FIRST_DRAGON: Field = field("first_dragon", &["firstdragon", "first_dragon", "fd"]);
pub const FIRST_HERALD: Field = field(
    "first_herald",
    &["firstherald", "first_herald", "firstriftherald"],
);
pub const FIRST_BARON: Field = field("first_baron", &["firstbaron", "first_baron", "fbaron"]);
pub const FIRST_TOWER: Field = field("first_tower", &["firsttower", "first_tower", "ft"]);
pub const FIRST_MID_TOWER: Field = field(
    "first_mid_tower",
    &["firstmidtower", "first_mid_tower", "firstmidouter"],
);
pub const FIRST_THREE_TOWERS: Field = field(
    "first_three_towers",
    &["firsttothreetowers", "first_to_three_towers", "first3towers"],
);

// Objective counts.
pub const HERALDS: Field = field("heralds", &["heralds", "rift_heralds", "herald_kills"]);
pub const BARONS: Field = field("barons", &["barons", "baron_kills", "nashors"]);
pub const TOWERS: Field = field("towers", &["towers", "tower_kills", "turrets"]);
pub const PLATES: Field = field("plates", &["turretplates", "turret_plates", "plates"]);
pub const INHIBITORS: Field = field(
    "inhibitors",
    &["inhibitors", "inhibitor_kills", "inhibs"],
);
pub const VOID_GRUBS: Field = field("void_grubs", &["void_grubs", "voidgrubs", "grubs"]);

// Dragons.
pub const DRAGONS: Field = field(
    "dragons",
    &["dragons", "total_dragons", "dragon_kills", "drakes"],
);
pub const INFERNALS: Field = field(
    "infernals",
    &["infernals", "infernal", "infernal_drakes", "infernaldrakes", "fire_drakes"],
);
pub const MOUNTAINS: Field = field(
    "mountains",
    &["mountains", "mountain", "mountain_drakes", "mountaindrakes", "earth_drakes"],
);
pub const CLOUDS: Field = field(
    "clouds",
    &["clouds", "cloud", "cloud_drakes", "clouddrakes", "air_drakes"],
);
pub const OCEANS: Field = field(
    "oceans",
    &["oceans", "ocean", "ocean_drakes", "oceandrakes", "water_drakes"],
);
pub const CHEMTECHS: Field = field(
    "chemtechs",
    &["chemtechs", "chemtech", "chemtech_drakes", "chemtechdrakes"],
);
pub const HEXTECHS: Field = field(
    "hextechs",
    &["hextechs", "hextech", "hextech_drakes", "hextechdrakes"],
);
pub const UNKNOWN_DRAGONS: Field = field(
    "unknown_dragons",
    &[
        "dragons (type unknown)",
        "dragons_type_unknown",
        "unknown_dragons",
        "unknowndrakes",
    ],
);
pub const ELDERS: Field = field(
    "elders",
    &["elders", "elder", "elder_dragons", "elder_drakes"],
);

// Player combat, damage, vision, gold, cs.
pub const KILLS: Field = field("kills", &["kills", "player_kills"]);
pub const DEATHS: Field = field("deaths", &["deaths", "player_deaths"]);
pub const ASSISTS: Field = field("assists", &["assists", "player_assists"]);
pub const DAMAGE: Field = field(
    "damage_to_champions",
    &["damagetochampions", "damage_to_champions", "totaldamagedealttochampions"],
);
pub const DPM: Field = field("dpm", &["dpm", "damage_per_minute"]);
pub const DAMAGE_SHARE: Field = field("damage_share", &["damageshare", "damage_share"]);
pub const DAMAGE_TAKEN_PM: Field = field(
    "damage_taken_per_minute",
    &["damagetakenperminute", "damage_taken_per_minute"],
);
pub const WARDS_PLACED: Field = field("wards_placed", &["wardsplaced", "wards_placed"]);
pub const WPM: Field = field("wpm", &["wpm", "wards_per_minute"]);
pub const WARDS_KILLED: Field = field("wards_killed", &["wardskilled", "wards_killed"]);
pub const WCPM: Field = field("wcpm", &["wcpm", "wards_cleared_per_minute"]);
pub const CONTROL_WARDS: Field = field(
    "control_wards_bought",
    &["controlwardsbought", "control_wards_bought", "visionwardsboughtingame"],
);
pub const VISION_SCORE: Field = field("vision_score", &["visionscore", "vision_score"]);
pub const VSPM: Field = field("vspm", &["vspm", "vision_score_per_minute"]);
pub const TOTAL_GOLD: Field = field("total_gold", &["totalgold", "total_gold"]);
pub const EARNED_GOLD: Field = field("earned_gold", &["earnedgold", "earned_gold", "goldearned"]);
pub const EARNED_GPM: Field = field("earned_gpm", &["earned gpm", "earned_gpm", "gpm"]);
pub const GOLD_SPENT: Field = field("gold_spent", &["goldspent", "gold_spent"]);
pub const MINION_KILLS: Field = field(
    "minion_kills",
    &["minionkills", "minion_kills", "totalminionskilled"],
);
pub const MONSTER_KILLS: Field = field(
    "monster_kills",
    &["monsterkills", "monster_kills", "neutralminionskilled"],
);
pub const CSPM: Field = field("cspm", &["cspm", "cs_per_minute"]);
