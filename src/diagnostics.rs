use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    RowGrouper,
    GameRecord,
    Objectives,
    Dragons,
    Draft,
    Players,
    Series,
    Assembly,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::RowGrouper => "row_grouper",
            Component::GameRecord => "game_record",
            Component::Objectives => "objectives",
            Component::Dragons => "dragons",
            Component::Draft => "draft",
            Component::Players => "players",
            Component::Series => "series",
            Component::Assembly => "assembly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Something was dropped from the output.
    Omission,
    /// Data looked inconsistent but was kept.
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub component: Component,
    pub severity: Severity,
    pub game_id: Option<String>,
    pub field: String,
    pub decision: String,
}

/// Diagnostics collected during a single pipeline run.
///
/// Every entry is also emitted as a `tracing` event so a host subscriber sees
/// it as it happens.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn omission(
        &mut self,
        component: Component,
        game_id: Option<&str>,
        field: &str,
        decision: impl Into<String>,
    ) {
        self.record(Severity::Omission, component, game_id, field, decision.into());
    }

    pub fn advisory(
        &mut self,
        component: Component,
        game_id: Option<&str>,
        field: &str,
        decision: impl Into<String>,
    ) {
        self.record(Severity::Advisory, component, game_id, field, decision.into());
    }

    fn record(
        &mut self,
        severity: Severity,
        component: Component,
        game_id: Option<&str>,
        field: &str,
        decision: String,
    ) {
        match severity {
            Severity::Omission => warn!(
                component = %component,
                game_id = game_id.unwrap_or("-"),
                field,
                decision = decision.as_str(),
                "row data omitted"
            ),
            Severity::Advisory => debug!(
                component = %component,
                game_id = game_id.unwrap_or("-"),
                field,
                decision = decision.as_str(),
                "row data inconsistent"
            ),
        }

        self.entries.push(Diagnostic {
            component,
            severity,
            game_id: game_id.map(|id| id.to_string()),
            field: field.to_string(),
            decision,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
