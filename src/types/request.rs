use super::{DayOfWeek, GroupId, SemesterType, DAY_ORDER};
use serde::{Deserialize, Serialize};

/// Soft-preference switches on a generation request.
///
/// `consecutive_labs` gates contiguous placement of subjects that require
/// it; `minimize_gaps` and `balanced_distribution` are accepted and
/// recorded but reserved, and never affect feasibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub minimize_gaps: bool,
    pub consecutive_labs: bool,
    pub balanced_distribution: bool,
    pub respect_teacher_preferences: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            minimize_gaps: true,
            consecutive_labs: true,
            balanced_distribution: true,
            respect_teacher_preferences: true,
        }
    }
}

fn default_days() -> Vec<DayOfWeek> {
    DAY_ORDER[..5].to_vec()
}

fn default_periods_per_day() -> u8 {
    6
}

/// Everything needed to request one timetable generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// "YYYY-YY", e.g. "2025-26".
    pub academic_year: String,
    pub semester_type: SemesterType,
    /// Groups to schedule; at least one.
    pub groups: Vec<GroupId>,
    /// Working days; defaults to Monday through Friday.
    #[serde(default = "default_days")]
    pub days: Vec<DayOfWeek>,
    /// Periods per working day (4-8); defaults to 6.
    #[serde(default = "default_periods_per_day")]
    pub periods_per_day: u8,
    /// 1-based period reserved for lunch, if any.
    #[serde(default)]
    pub lunch_break_period: Option<u8>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl GenerationRequest {
    pub fn new(
        academic_year: impl Into<String>,
        semester_type: SemesterType,
        groups: Vec<GroupId>,
    ) -> Self {
        Self {
            academic_year: academic_year.into(),
            semester_type,
            groups,
            days: default_days(),
            periods_per_day: default_periods_per_day(),
            lunch_break_period: None,
            preferences: Preferences::default(),
        }
    }
}

/// Engine knobs, independent of any single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backtracking step budget; the engine aborts with `Exhausted` past it.
    pub max_iterations: u64,
    /// Day walk order; requested days are visited in this order.
    pub day_order: Vec<DayOfWeek>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            day_order: DAY_ORDER.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"academic_year": "2025-26", "semester_type": "odd", "groups": [1]}"#,
        )
        .unwrap();
        assert_eq!(request.days.len(), 5);
        assert_eq!(request.days[0], DayOfWeek::Monday);
        assert_eq!(request.periods_per_day, 6);
        assert_eq!(request.lunch_break_period, None);
        assert!(request.preferences.consecutive_labs);
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_iterations, 100_000);
        assert_eq!(config.day_order, DAY_ORDER.to_vec());
    }
}
