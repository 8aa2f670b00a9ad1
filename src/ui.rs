use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::theme::THEME_CSS;
use crate::views::{ChatView, TrackersView, WorkoutPanel};
use crate::workout::WorkoutState;
use dioxus::prelude::*;
use tracing::{error, warn};

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Chat,
    Trackers,
}

#[component]
pub fn App() -> Element {
    let config = use_context_provider(load_config);
    use_context_provider(|| ApiClient::from_config(&config));
    let workout = use_signal(WorkoutState::default);
    use_context_provider(|| workout);
    let active_tab = use_signal(|| AppTab::Chat);

    rsx! {
        ThemeStyles {}
        AppHeader { active_tab }
        AppErrorBoundary {
            TabPanels { active_tab }
        }
    }
}

fn load_config() -> AppConfig {
    AppConfig::load().unwrap_or_else(|err| {
        warn!(error = %err, "invalid configuration, using defaults");
        AppConfig::default()
    })
}

#[component]
fn ThemeStyles() -> Element {
    let tokens = THEME_CSS.as_str();
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        style { dangerous_inner_html: "{tokens}" }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "header",
            div { class: "header-content",
                span { class: "wordmark", "AI Life Tracker" }
                TabNavigation { active_tab }
            }
        }
    }
}

#[component]
fn TabPanels(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Chat,
                children: rsx!(
                    WorkoutPanel {}
                    ChatView {}
                ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Trackers,
                children: rsx!( TrackersView {} ),
            }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            TabButton { active_tab, tab: AppTab::Trackers, label: "Tracker" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}

/// Copy of the fallback card shown when a screen fails to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackCopy {
    pub title: &'static str,
    pub message: String,
    pub retry: &'static str,
}

impl FallbackCopy {
    pub const TITLE: &'static str = "Etwas ist schiefgelaufen";
    pub const GENERIC_MESSAGE: &'static str = "Ein unerwarteter Fehler ist aufgetreten.";
    pub const RETRY: &'static str = "Erneut versuchen";

    pub fn for_error(message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(Self::GENERIC_MESSAGE);
        Self {
            title: Self::TITLE,
            message: message.to_string(),
            retry: Self::RETRY,
        }
    }
}

#[component]
fn AppErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: move |errors: ErrorContext| {
                let first = errors.errors().first().map(|err| err.to_string());
                error!(error = first.as_deref().unwrap_or_default(), "screen failed to render");
                let copy = FallbackCopy::for_error(first.as_deref());
                rsx! {
                    div { class: "fallback",
                        div { class: "card fallback-card",
                            h2 { class: "fallback-title", "⚠ {copy.title}" }
                            p { class: "muted", "{copy.message}" }
                            button {
                                class: "btn btn-outline",
                                r#type: "button",
                                onclick: move |_| errors.clear_errors(),
                                "↻ {copy.retry}"
                            }
                        }
                    }
                }
            },
            {children}
        }
    }
}
