//! Display shaping shared by the dashboard and the viewer HUD.

use crate::fetcher::StateCache;
use crate::model::{Budget, Quest, Severity, SystemStatus};
use crate::projection::Tint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connecting,
    Live,
    Fallback,
}

impl Connectivity {
    pub fn from_cache(cache: &StateCache) -> Self {
        if !cache.is_resolved() {
            Connectivity::Connecting
        } else if cache.is_live() {
            Connectivity::Live
        } else {
            Connectivity::Fallback
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Connecting => "CONNECTING",
            Connectivity::Live => "LIVE",
            Connectivity::Fallback => "FALLBACK",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetGauge {
    /// `spent / max` clamped to `[0, 1]`.
    pub fraction: f32,
    pub over_budget: bool,
    pub label: String,
}

pub fn budget_gauge(budget: &Budget) -> BudgetGauge {
    let fraction = if budget.max > 0.0 {
        (budget.spent / budget.max).clamp(0.0, 1.0)
    } else if budget.spent > 0.0 {
        1.0
    } else {
        0.0
    };
    BudgetGauge {
        fraction: fraction as f32,
        over_budget: budget.spent > budget.max,
        label: format!("{:.2} / {:.2} {}", budget.spent, budget.max, budget.unit),
    }
}

/// hp/mana as a bar fraction; out-of-range values are clamped, never rejected.
pub fn vital_fraction(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, 100.0) / 100.0) as f32
}

pub fn success_rate_label(rate: f64) -> String {
    let percent = if rate <= 1.0 { rate * 100.0 } else { rate };
    format!("{:.0}%", percent.clamp(0.0, 100.0))
}

pub fn status_tint(status: &SystemStatus) -> Tint {
    match status {
        SystemStatus::Operational => Tint::rgb(0.25, 0.8, 0.4),
        SystemStatus::Halted => Tint::rgb(0.9, 0.15, 0.15),
        SystemStatus::Degraded | SystemStatus::Unknown(_) => Tint::rgb(0.95, 0.7, 0.2),
    }
}

pub fn severity_tint(severity: &Severity) -> Tint {
    match severity {
        Severity::Low => Tint::rgb(0.5, 0.7, 0.9),
        Severity::Medium => Tint::rgb(0.95, 0.8, 0.3),
        Severity::High => Tint::rgb(0.95, 0.5, 0.2),
        Severity::Critical => Tint::rgb(0.9, 0.15, 0.15),
        Severity::Unknown(_) => Tint::rgb(0.6, 0.6, 0.6),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskColumn {
    Backlog,
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskColumn {
    pub const ALL: [TaskColumn; 5] = [
        TaskColumn::Backlog,
        TaskColumn::Todo,
        TaskColumn::InProgress,
        TaskColumn::Review,
        TaskColumn::Done,
    ];

    pub fn for_status(status: &str) -> Self {
        let normalized = status.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "todo" | "open" | "pending" => TaskColumn::Todo,
            "in_progress" | "active" | "working" | "doing" => TaskColumn::InProgress,
            "review" | "in_review" | "qa" => TaskColumn::Review,
            "done" | "complete" | "completed" | "closed" => TaskColumn::Done,
            _ => TaskColumn::Backlog,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TaskColumn::Backlog => "Backlog",
            TaskColumn::Todo => "To Do",
            TaskColumn::InProgress => "In Progress",
            TaskColumn::Review => "Review",
            TaskColumn::Done => "Done",
        }
    }
}

/// Quests grouped by column; server order is kept inside each column.
pub fn task_board(quests: &[Quest]) -> Vec<(TaskColumn, Vec<&Quest>)> {
    TaskColumn::ALL
        .iter()
        .map(|&column| {
            let cards = quests
                .iter()
                .filter(|quest| TaskColumn::for_status(&quest.status) == column)
                .collect();
            (column, cards)
        })
        .collect()
}
