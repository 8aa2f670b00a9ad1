use crate::api::{
    ApiClient,
    chat::{end_workout, start_workout},
};
use crate::workout::{WorkoutState, summary_line, weight_label};
use dioxus::prelude::*;
use tracing::{info, warn};

/// Start/stop strip above the chat. The backend keeps the authoritative
/// session; the local state only feeds the chat context.
#[component]
pub fn WorkoutPanel() -> Element {
    let api = use_context::<ApiClient>();
    let mut workout = use_context::<Signal<WorkoutState>>();
    let mut exercise = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut summary = use_signal(|| Option::<String>::None);

    let start_api = api.clone();
    let on_start = move |_: MouseEvent| {
        let name = exercise().trim().to_string();
        if name.is_empty() || busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        summary.set(None);
        let api = start_api.clone();
        spawn(async move {
            match start_workout(&api, None).await {
                Ok(started) => {
                    info!(status = %started.status, exercise = %name, "workout started");
                    workout.write().start(name);
                    exercise.set(String::new());
                }
                Err(err) => {
                    warn!(error = %err, "failed to start workout");
                    error.set(Some(err.user_message()));
                }
            }
            busy.set(false);
        });
    };

    let on_end = move |_: MouseEvent| {
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        let api = api.clone();
        spawn(async move {
            match end_workout(&api).await {
                Ok(ended) => {
                    info!(
                        exercises = ended.summary.exercises_completed,
                        "workout ended"
                    );
                    summary.set(Some(summary_line(&ended.summary)));
                    workout.write().end();
                }
                Err(err) => {
                    warn!(error = %err, "failed to end workout");
                    error.set(Some(err.user_message()));
                }
            }
            busy.set(false);
        });
    };

    let state = workout();

    rsx! {
        div { class: "workout-panel",
            if state.active {
                div { class: "workout-status",
                    span { class: "workout-exercise",
                        "🏋 {state.current_exercise.clone().unwrap_or_default()}"
                    }
                    span { class: "workout-set", "Satz {state.current_set}" }
                    if let Some(weight) = state.last_weight {
                        span { class: "workout-weight muted", "{weight_label(weight)}" }
                    }
                }
                div { class: "workout-actions",
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        onclick: move |_| workout.write().next_set(),
                        "Nächster Satz"
                    }
                    button {
                        class: "btn btn-destructive",
                        r#type: "button",
                        disabled: busy(),
                        onclick: on_end,
                        "Workout beenden"
                    }
                }
            } else {
                div { class: "workout-start",
                    input {
                        r#type: "text",
                        placeholder: "Übung, z.B. Bankdrücken",
                        value: "{exercise}",
                        oninput: move |ev| exercise.set(ev.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: busy() || exercise().trim().is_empty(),
                        onclick: on_start,
                        "Workout starten"
                    }
                }
                if let Some(text) = summary() {
                    p { class: "workout-summary muted", "{text}" }
                }
            }
            if let Some(message) = error() {
                p { class: "inline-error", "{message}" }
            }
        }
    }
}
