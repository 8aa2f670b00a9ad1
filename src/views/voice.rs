use crate::config::AppConfig;
use crate::voice::bridge::{decode_event, probe_script, start_script, stop_script};
use crate::voice::{RecognitionEvent, VoiceSession};
use dioxus::prelude::*;
use serde_json::Value;
use tracing::warn;

async fn recognizer_available() -> bool {
    let mut probe = document::eval(probe_script());
    probe.recv::<bool>().await.unwrap_or(false)
}

/// Pumps recognizer events into the session until the platform session ends.
async fn run_session(mut voice: Signal<VoiceSession>, session: u64, lang: &str) {
    let mut recognition = document::eval(&start_script(lang));
    loop {
        match recognition.recv::<Value>().await {
            Ok(raw) => {
                let Some(event) = decode_event(raw) else {
                    continue;
                };
                let terminal = event.is_terminal();
                voice.write().handle(session, event);
                if terminal {
                    break;
                }
            }
            Err(err) => {
                warn!(session, error = %err, "speech bridge closed");
                let error = err.to_string();
                voice
                    .write()
                    .handle(session, RecognitionEvent::Error { error });
                break;
            }
        }
    }
}

#[component]
pub fn VoiceButton(on_transcript: EventHandler<String>, disabled: bool) -> Element {
    let mut voice = use_signal(VoiceSession::default);
    let lang = use_context::<AppConfig>().speech_lang;

    let on_click = move |_: MouseEvent| {
        if voice.peek().is_listening() {
            if voice.write().stop() {
                document::eval(&stop_script());
            }
            let forwarded = voice.write().take_forwardable();
            if let Some(transcript) = forwarded {
                on_transcript.call(transcript);
            }
            return;
        }

        let lang = lang.clone();
        spawn(async move {
            let supported = recognizer_available().await;
            let Some(session) = voice.write().start(supported) else {
                return;
            };
            run_session(voice, session, &lang).await;
            let forwarded = voice.write().take_forwardable();
            if let Some(transcript) = forwarded {
                on_transcript.call(transcript);
            }
        });
    };

    let state = voice.read();
    let listening = state.is_listening();
    let (button_class, button_label) = if listening {
        ("btn voice-btn listening", "Aufnahme stoppen")
    } else {
        ("btn voice-btn", "Spracheingabe starten")
    };

    rsx! {
        div { class: "voice-control",
            button {
                class: button_class,
                r#type: "button",
                aria_label: button_label,
                disabled: disabled && !listening,
                onclick: on_click,
                if listening { "⏹" } else { "🎤" }
            }
            if listening {
                div { class: "voice-status muted",
                    span { class: "spinner" }
                    span { "Listening..." }
                }
            } else if !state.transcript().is_empty() {
                p { class: "voice-transcript muted", "\"{state.transcript()}\"" }
            }
            if let Some(error) = state.error() {
                p { class: "voice-error", "{error}" }
            }
        }
    }
}
