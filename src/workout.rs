use crate::render::display_string;
use crate::types::WorkoutSummary;
use serde_json::{Map, Value, json};

/// In-progress workout as seen by the UI. Lives for the page session only and
/// is shared through a context signal created at the app root.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutState {
    pub active: bool,
    pub current_exercise: Option<String>,
    pub current_set: u32,
    pub last_weight: Option<f64>,
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self {
            active: false,
            current_exercise: None,
            current_set: 1,
            last_weight: None,
        }
    }
}

impl WorkoutState {
    pub fn start(&mut self, exercise: impl Into<String>) {
        self.active = true;
        self.current_exercise = Some(exercise.into());
        self.current_set = 1;
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn next_set(&mut self) {
        if self.active {
            self.current_set += 1;
        }
    }

    pub fn set_exercise(&mut self, exercise: impl Into<String>) {
        self.current_exercise = Some(exercise.into());
        self.current_set = 1;
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.last_weight = Some(weight);
    }

    /// Applies a tracked set reported by the backend: a `track` action with a
    /// positive rep count and a positive weight moves on to the next set. The
    /// weight comes from the data, or from the previous set when the data has
    /// none.
    pub fn record_tracked(&mut self, action: &str, data: Option<&Value>) -> bool {
        if !self.active || action != "track" {
            return false;
        }
        let Some(fields) = data.and_then(Value::as_object) else {
            return false;
        };
        let weight = fields.get("weight").and_then(Value::as_f64);
        let reps = fields.get("reps").and_then(Value::as_f64);
        match (weight.or(self.last_weight), reps) {
            (Some(weight), Some(reps)) if weight > 0.0 && reps > 0.0 => {
                self.set_weight(weight);
                self.next_set();
                true
            }
            _ => false,
        }
    }

    /// Context object sent along with chat requests while a workout runs.
    pub fn context(&self) -> Option<Map<String, Value>> {
        if !self.active {
            return None;
        }
        let mut context = Map::new();
        context.insert("workout_active".into(), json!(true));
        context.insert("current_exercise".into(), json!(self.current_exercise));
        context.insert("current_set".into(), json!(self.current_set));
        context.insert("last_weight".into(), json!(self.last_weight));
        Some(context)
    }
}

pub fn weight_label(weight: f64) -> String {
    format!("{} kg", display_string(&json!(weight)))
}

/// One-line German summary of a finished workout.
pub fn summary_line(summary: &WorkoutSummary) -> String {
    let exercises = match summary.exercises_completed {
        1 => "1 Übung".to_string(),
        n => format!("{n} Übungen"),
    };
    match summary.duration {
        Some(minutes) => format!("Workout beendet: {exercises} in {minutes} Min."),
        None => format!("Workout beendet: {exercises}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_set_one_and_counts_up() {
        let mut state = WorkoutState::default();
        state.start("Kniebeugen");
        state.next_set();
        state.next_set();
        assert!(state.active);
        assert_eq!(state.current_set, 3);
        assert_eq!(state.current_exercise.as_deref(), Some("Kniebeugen"));
    }

    #[test]
    fn next_set_is_ignored_while_inactive() {
        let mut state = WorkoutState::default();
        state.next_set();
        assert_eq!(state.current_set, 1);
    }

    #[test]
    fn end_resets_everything() {
        let mut state = WorkoutState::default();
        state.start("Bankdrücken");
        state.set_weight(80.0);
        state.next_set();
        state.end();
        assert_eq!(state, WorkoutState::default());
    }

    #[test]
    fn changing_exercise_restarts_set_count() {
        let mut state = WorkoutState::default();
        state.start("Bankdrücken");
        state.next_set();
        state.set_exercise("Rudern");
        assert_eq!(state.current_set, 1);
        assert_eq!(state.current_exercise.as_deref(), Some("Rudern"));
    }

    #[test]
    fn tracked_set_reuses_last_weight() {
        let mut state = WorkoutState::default();
        state.start("Bankdrücken");
        assert!(state.record_tracked("track", Some(&json!({"weight": 80, "reps": 10}))));
        assert!(state.record_tracked("track", Some(&json!({"reps": 8}))));
        assert_eq!(state.current_set, 3);
        assert_eq!(state.last_weight, Some(80.0));
        assert!(!state.record_tracked("chat", Some(&json!({"weight": 1, "reps": 1}))));
    }

    #[test]
    fn context_only_while_active() {
        let mut state = WorkoutState::default();
        assert!(state.context().is_none());
        state.start("Dips");
        let context = state.context().unwrap();
        assert_eq!(context["workout_active"], json!(true));
        assert_eq!(context["current_set"], json!(1));
        assert_eq!(context["last_weight"], Value::Null);
    }

    #[test]
    fn weights_drop_trailing_zero() {
        assert_eq!(weight_label(80.0), "80 kg");
        assert_eq!(weight_label(82.5), "82.5 kg");
    }

    #[test]
    fn summary_mentions_duration_when_known() {
        let mut summary = WorkoutSummary {
            duration: Some(45),
            exercises_completed: 3,
            completed_exercises: Vec::new(),
        };
        assert_eq!(summary_line(&summary), "Workout beendet: 3 Übungen in 45 Min.");
        summary.duration = None;
        summary.exercises_completed = 1;
        assert_eq!(summary_line(&summary), "Workout beendet: 1 Übung");
    }
}
