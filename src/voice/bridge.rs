//! Scripts run in the webview to drive `SpeechRecognition`, and decoding of
//! the messages they post back.

use super::RecognitionEvent;
use serde_json::Value;

/// Global the start script parks the recognizer in so the stop script can
/// reach it.
const RECOGNIZER_GLOBAL: &str = "__lifetrackerRecognizer";

/// Posts `true` when the platform exposes a speech recognizer.
pub fn probe_script() -> &'static str {
    "dioxus.send(!!(window.SpeechRecognition || window.webkitSpeechRecognition));"
}

/// Single-utterance recognition with interim results in `lang`.
pub fn start_script(lang: &str) -> String {
    let lang = serde_json::to_string(lang).unwrap_or_else(|_| "\"de-DE\"".to_string());
    format!(
        r#"
const Recognizer = window.SpeechRecognition || window.webkitSpeechRecognition;
if (!Recognizer) {{
    dioxus.send({{ type: "unsupported" }});
    return;
}}
let finish;
const finished = new Promise((resolve) => {{ finish = resolve; }});
const recognition = new Recognizer();
recognition.continuous = false;
recognition.interimResults = true;
recognition.lang = {lang};
recognition.onstart = () => dioxus.send({{ type: "started" }});
recognition.onresult = (event) => {{
    const result = event.results[event.resultIndex];
    dioxus.send({{ type: "result", index: event.resultIndex, transcript: result[0].transcript }});
}};
recognition.onerror = (event) => dioxus.send({{ type: "error", error: String(event.error) }});
recognition.onend = () => {{
    if (window.{RECOGNIZER_GLOBAL} === recognition) {{
        window.{RECOGNIZER_GLOBAL} = null;
    }}
    dioxus.send({{ type: "end" }});
    finish();
}};
window.{RECOGNIZER_GLOBAL} = recognition;
recognition.start();
await finished;
"#
    )
}

pub fn stop_script() -> String {
    format!("if (window.{RECOGNIZER_GLOBAL}) {{ window.{RECOGNIZER_GLOBAL}.stop(); }}")
}

/// Messages that don't decode are dropped.
pub fn decode_event(raw: Value) -> Option<RecognitionEvent> {
    serde_json::from_value(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_script_configures_single_utterance_with_interim_results() {
        let script = start_script("de-DE");
        assert!(script.contains("recognition.continuous = false;"));
        assert!(script.contains("recognition.interimResults = true;"));
        assert!(script.contains(r#"recognition.lang = "de-DE";"#));
        assert!(script.contains("webkitSpeechRecognition"));
    }

    #[test]
    fn lang_is_quoted_safely() {
        let script = start_script(r#"en"; alert(1); ""#);
        assert!(script.contains(r#"recognition.lang = "en\"; alert(1); \"";"#));
    }

    #[test]
    fn stop_script_targets_parked_recognizer() {
        assert!(stop_script().contains("__lifetrackerRecognizer.stop()"));
        assert!(start_script("de-DE").contains("window.__lifetrackerRecognizer = recognition;"));
    }

    #[test]
    fn decodes_posted_events() {
        assert_eq!(
            decode_event(json!({"type": "result", "index": 1, "transcript": "zehn"})),
            Some(RecognitionEvent::Result {
                index: 1,
                transcript: "zehn".into()
            })
        );
        assert_eq!(
            decode_event(json!({"type": "error", "error": "no-speech"})),
            Some(RecognitionEvent::Error {
                error: "no-speech".into()
            })
        );
        assert_eq!(decode_event(json!({"type": "end"})), Some(RecognitionEvent::End));
        assert_eq!(decode_event(json!({"type": "bogus"})), None);
        assert_eq!(decode_event(json!("stop")), None);
    }
}
