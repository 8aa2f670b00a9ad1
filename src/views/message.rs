use crate::chat::ChatTurn;
use crate::render::{self, Alignment, Bubble, Confirmation, ListWidget, StatCard, Widget};
use crate::types::Role;
use dioxus::prelude::*;

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn bubble_class(bubble: &Bubble) -> String {
    let align = match bubble.alignment() {
        Alignment::Trailing => "align-end",
        Alignment::Leading => "align-start",
    };
    let tone = if bubble.is_accent() { "accent" } else { "muted" };
    format!("bubble {} {align} {tone}", role_class(bubble.role))
}

/// One chat turn: avatar, optional text bubble, optional widget, timestamp.
#[component]
pub fn ChatMessageView(turn: ChatTurn) -> Element {
    let plan = render::resolve(&turn.message);
    let role = role_class(turn.message.role);
    let avatar = match turn.message.role {
        Role::User => "🙂",
        Role::Assistant => "🤖",
    };
    let time = turn.time_label();

    rsx! {
        div { class: "message-row {role}",
            div { class: "avatar {role}", "{avatar}" }
            div { class: "message-stack",
                if let Some(bubble) = &plan.bubble {
                    div { class: bubble_class(bubble),
                        p { "{bubble.text}" }
                    }
                }
                {match plan.widget.clone() {
                    Some(Widget::Confirmation(confirmation)) => rsx! { ConfirmationCard { confirmation } },
                    Some(Widget::StatCard(card)) => rsx! { StatCardView { card } },
                    Some(Widget::List(list)) => rsx! { ListCard { list } },
                    None => rsx! {},
                }}
                if !time.is_empty() {
                    div { class: "message-meta",
                        span { class: "message-timestamp", "{time}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ConfirmationCard(confirmation: Confirmation) -> Element {
    rsx! {
        div { class: "card widget confirmation",
            div { class: "confirmation-icon", "✓" }
            div { class: "confirmation-body",
                p { class: "confirmation-message", "{confirmation.message}" }
                if !confirmation.tags.is_empty() {
                    div { class: "tag-row",
                        for tag in confirmation.tags.iter() {
                            span { key: "{tag.key}", class: "tag", "{tag.label()}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCardView(card: StatCard) -> Element {
    rsx! {
        div { class: "card widget stat-card",
            div { class: "stat-title", "{card.title}" }
            div { class: "stat-value", "{card.value}" }
            if let Some(subtitle) = &card.subtitle {
                div { class: "stat-subtitle muted", "{subtitle}" }
            }
        }
    }
}

#[component]
fn ListCard(list: ListWidget) -> Element {
    rsx! {
        div { class: "card widget list-card",
            if let Some(title) = &list.title {
                h3 { class: "list-title", "{title}" }
            }
            ul { class: "list-items",
                for (index, item) in list.items.iter().enumerate() {
                    li { key: "{item.key(index)}", class: "list-item",
                        div { class: "list-item-text",
                            span { class: "list-item-title", "{item.title}" }
                            if let Some(subtitle) = &item.subtitle {
                                span { class: "list-item-subtitle muted", "{subtitle}" }
                            }
                        }
                        if let Some(value) = &item.value {
                            span { class: "list-item-value", "{value}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_bubbles_are_trailing_accent() {
        let bubble = Bubble {
            role: Role::User,
            text: "hi".into(),
        };
        assert_eq!(bubble_class(&bubble), "bubble user align-end accent");
    }

    #[test]
    fn assistant_bubbles_are_leading_muted() {
        let bubble = Bubble {
            role: Role::Assistant,
            text: "hallo".into(),
        };
        assert_eq!(bubble_class(&bubble), "bubble assistant align-start muted");
    }
}
