use crate::api::{ApiClient, chat::send_chat};
use crate::chat::ChatLog;
use crate::types::ChatRequest;
use crate::views::{ChatMessageView, VoiceButton};
use crate::workout::WorkoutState;
use dioxus::prelude::*;
use tracing::debug;

const SCROLL_TO_BOTTOM: &str = r#"
const list = document.getElementById("chat-list");
if (list) { list.scrollTo({ top: list.scrollHeight, behavior: "smooth" }); }
"#;

#[component]
pub fn ChatView() -> Element {
    let api = use_context::<ApiClient>();
    let mut workout = use_context::<Signal<WorkoutState>>();
    let mut log = use_signal(ChatLog::new);
    let mut draft = use_signal(String::new);

    use_effect(move || {
        let _turns = log.read().turns().len();
        document::eval(SCROLL_TO_BOTTOM);
    });

    let send_message = use_callback(move |text: String| {
        let Some(message) = log.write().begin_send(&text) else {
            return;
        };
        draft.set(String::new());

        let request = ChatRequest {
            message,
            context: workout.peek().context(),
        };
        let api = api.clone();
        spawn(async move {
            let outcome = send_chat(&api, &request).await;
            let recorded = match &outcome {
                Ok(response) => workout
                    .write()
                    .record_tracked(&response.action, response.data.as_ref()),
                Err(_) => false,
            };
            if recorded {
                debug!(set = workout.peek().current_set, "workout set recorded");
            }
            log.write().complete(outcome);
        });
    });

    let snapshot = log.read();
    let sending = snapshot.is_sending();

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for turn in snapshot.turns().iter() {
                        ChatMessageView { key: "{turn.key()}", turn: turn.clone() }
                    }
                    if sending {
                        div { class: "thinking muted",
                            span { class: "spinner" }
                            span { "Denke nach..." }
                        }
                    }
                }
            }

            form {
                class: "composer",
                onsubmit: move |ev| {
                    ev.prevent_default();
                    send_message.call(draft());
                },
                div { class: "composer-inner",
                    VoiceButton {
                        disabled: sending,
                        on_transcript: move |transcript: String| send_message.call(transcript),
                    }
                    input {
                        r#type: "text",
                        placeholder: "Schreib etwas oder nutze Voice...",
                        value: "{draft}",
                        disabled: sending,
                        oninput: move |ev| draft.set(ev.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        aria_label: "Senden",
                        disabled: sending || draft().trim().is_empty(),
                        "➤"
                    }
                }
            }
        }
    }
}
