use crate::api::{
    ApiClient,
    chat::chat_history,
    trackers::{
        create_entry, create_tracker, delete_tracker, get_tracker, get_tracker_entries,
        get_trackers, update_tracker,
    },
};
use crate::config::AppConfig;
use crate::render::tags_for;
use crate::theme::category_badge_style;
use crate::trackers::{
    DELETE_FAILED, ICONS, LOAD_FAILED, Modal, SAVE_FAILED, TrackerBoard, TrackerDraft,
    entry_draft, failure_message, format_timestamp,
};
use crate::types::{Category, Entry, Tracker};
use dioxus::prelude::*;
use tracing::{info, warn};

const RECENT_LIMIT: u32 = 10;
const ENTRY_FORMAT_HINT: &str = "Bitte Werte im Format key=value eingeben";

#[component]
pub fn TrackersView() -> Element {
    let api = use_context::<ApiClient>();
    let config = use_context::<AppConfig>();
    let mut board = use_signal(TrackerBoard::default);

    let load_api = api.clone();
    use_future(move || {
        let api = load_api.clone();
        async move {
            board.write().begin_load();
            match get_trackers(&api).await {
                Ok(trackers) => {
                    info!(count = trackers.len(), "trackers loaded");
                    board.write().loaded(trackers);
                }
                Err(err) => {
                    warn!(error = %err, "failed to load trackers");
                    board.write().load_failed(failure_message(LOAD_FAILED, &err));
                }
            }
        }
    });

    let submit_api = api.clone();
    let on_submit = move |draft: TrackerDraft| {
        if !draft.is_valid() || board.peek().submitting {
            return;
        }
        let editing = board.peek().editing().cloned();
        board.write().submitting = true;
        let api = submit_api.clone();
        spawn(async move {
            let saved = match (editing, draft) {
                (Some(tracker), draft) => match draft.into_update() {
                    Some(update) => update_tracker(&api, &tracker.id, &update)
                        .await
                        .map(|tracker| (tracker, true)),
                    None => {
                        board.write().submitting = false;
                        return;
                    }
                },
                (None, draft) => match draft.into_create() {
                    Some(create) => create_tracker(&api, &create)
                        .await
                        .map(|tracker| (tracker, false)),
                    None => {
                        board.write().submitting = false;
                        return;
                    }
                },
            };
            match saved {
                Ok((tracker, true)) => board.write().updated(tracker),
                Ok((tracker, false)) => {
                    info!(tracker_id = %tracker.id, "tracker created");
                    board.write().created(tracker);
                }
                Err(err) => {
                    warn!(error = %err, "failed to save tracker");
                    board.write().save_failed(failure_message(SAVE_FAILED, &err));
                }
            }
        });
    };

    let on_confirm_delete = move |tracker: Tracker| {
        let api = api.clone();
        spawn(async move {
            match delete_tracker(&api, &tracker.id).await {
                Ok(_) => {
                    info!(tracker_id = %tracker.id, "tracker deleted");
                    board.write().deleted(&tracker.id);
                }
                Err(err) => {
                    warn!(tracker_id = %tracker.id, error = %err, "failed to delete tracker");
                    board.write().delete_failed(failure_message(DELETE_FAILED, &err));
                }
            }
        });
    };

    let state = board();
    let selected = state.selected_tracker().cloned();

    rsx! {
        div { class: "trackers-screen",
            div { class: "screen-header",
                h2 { "Meine Tracker" }
                button {
                    class: "btn btn-primary btn-sm",
                    r#type: "button",
                    onclick: move |_| board.write().open_create(),
                    "+ Neu"
                }
            }

            if let Some(message) = &state.error {
                div { class: "error-banner",
                    "{message}"
                    button {
                        class: "link-button",
                        r#type: "button",
                        onclick: move |_| board.write().dismiss_error(),
                        "Schließen"
                    }
                }
            }

            if state.loading {
                div { class: "loading", span { class: "spinner" } }
            } else if state.trackers.is_empty() {
                div { class: "empty-state",
                    p { class: "muted", "Du hast noch keine Tracker erstellt." }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| board.write().open_create(),
                        "+ Ersten Tracker erstellen"
                    }
                }
            } else {
                div { class: "tracker-grid",
                    for tracker in state.trackers.iter() {
                        TrackerCard {
                            key: "{tracker.id}",
                            tracker: tracker.clone(),
                            selected: state.selected.as_deref() == Some(tracker.id.as_str()),
                            on_select: move |id: String| {
                                let next = (board.peek().selected.as_deref() != Some(id.as_str())).then_some(id);
                                board.write().select(next);
                            },
                            on_edit: move |tracker: Tracker| board.write().open_edit(tracker),
                            on_delete: move |tracker: Tracker| board.write().ask_delete(tracker),
                        }
                    }
                }
            }

            if let Some(tracker) = selected {
                TrackerDetail {
                    key: "{tracker.id}",
                    tracker_id: tracker.id.clone(),
                    name: tracker.name.clone(),
                    limit: config.entry_limit,
                }
            } else if !state.loading {
                RecentEntries { trackers: state.trackers.clone() }
            }
        }

        {match state.modal.clone() {
            Modal::None => rsx! {},
            Modal::Create => rsx! {
                TrackerForm {
                    tracker: None,
                    submitting: state.submitting,
                    on_submit,
                    on_cancel: move |_| board.write().close_modal(),
                }
            },
            Modal::Edit(tracker) => rsx! {
                TrackerForm {
                    key: "{tracker.id}",
                    tracker: Some(tracker),
                    submitting: state.submitting,
                    on_submit,
                    on_cancel: move |_| board.write().close_modal(),
                }
            },
            Modal::ConfirmDelete(tracker) => rsx! {
                DeleteDialog {
                    tracker,
                    on_confirm: on_confirm_delete,
                    on_cancel: move |_| board.write().close_modal(),
                }
            },
        }}
    }
}

#[component]
fn TrackerCard(
    tracker: Tracker,
    selected: bool,
    on_select: EventHandler<String>,
    on_edit: EventHandler<Tracker>,
    on_delete: EventHandler<Tracker>,
) -> Element {
    let badge = category_badge_style(&tracker.category);
    let class = if selected {
        "card tracker-card selected"
    } else {
        "card tracker-card"
    };
    let id = tracker.id.clone();
    let edit_target = tracker.clone();
    let delete_target = tracker.clone();

    rsx! {
        div { class: class, onclick: move |_| on_select.call(id.clone()),
            div { class: "tracker-card-header",
                div { class: "tracker-card-title",
                    if let Some(icon) = tracker.icon.as_deref().filter(|icon| !icon.is_empty()) {
                        span { class: "tracker-icon", "{icon}" }
                    }
                    h3 { "{tracker.name}" }
                }
                div { class: "tracker-card-actions",
                    button {
                        class: "btn btn-ghost btn-icon",
                        r#type: "button",
                        title: "Bearbeiten",
                        onclick: move |ev: MouseEvent| {
                            ev.stop_propagation();
                            on_edit.call(edit_target.clone());
                        },
                        "✎"
                    }
                    button {
                        class: "btn btn-ghost btn-icon destructive",
                        r#type: "button",
                        title: "Löschen",
                        onclick: move |ev: MouseEvent| {
                            ev.stop_propagation();
                            on_delete.call(delete_target.clone());
                        },
                        "🗑"
                    }
                }
            }
            span { class: "badge", style: "{badge}", "{tracker.category.label()}" }
            if let Some(color) = tracker.color.as_deref().filter(|color| !color.is_empty()) {
                div { class: "color-bar", style: "background-color: {color};" }
            }
        }
    }
}

fn choice_class(active: bool, extra: &str) -> String {
    let mut class = String::from("icon-choice");
    if active {
        class.push_str(" active");
    }
    if !extra.is_empty() {
        class.push(' ');
        class.push_str(extra);
    }
    class
}

#[component]
fn TrackerForm(
    #[props(!optional)] tracker: Option<Tracker>,
    submitting: bool,
    on_submit: EventHandler<TrackerDraft>,
    on_cancel: EventHandler<()>,
) -> Element {
    let is_edit = tracker.is_some();
    let initial = tracker.clone();
    let mut draft = use_signal(move || TrackerDraft::from_tracker(initial.as_ref()));

    let current = draft();
    let title = if is_edit {
        "Tracker bearbeiten"
    } else {
        "Neuer Tracker"
    };
    let submit_label = match (submitting, is_edit) {
        (true, _) => "Speichern...",
        (false, true) => "Speichern",
        (false, false) => "Erstellen",
    };
    let category_value = current.category.as_str().to_string();
    let custom_category = match &current.category {
        Category::Other(raw) => Some(raw.clone()),
        _ => None,
    };
    let custom_icon = current
        .has_custom_icon()
        .then(|| current.icon.clone());

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal card",
                div { class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "btn btn-ghost btn-icon",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "✕"
                    }
                }
                form {
                    class: "stack",
                    onsubmit: move |ev| {
                        ev.prevent_default();
                        on_submit.call(draft());
                    },
                    label { r#for: "tracker-name", "Name" }
                    input {
                        id: "tracker-name",
                        r#type: "text",
                        required: true,
                        placeholder: "z.B. Bankdrücken, Wasser, Meditation...",
                        value: "{current.name}",
                        oninput: move |ev| draft.write().name = ev.value(),
                    }

                    label { r#for: "tracker-category", "Kategorie" }
                    select {
                        id: "tracker-category",
                        value: "{category_value}",
                        onchange: move |ev| draft.write().category = Category::parse(&ev.value()),
                        for category in Category::KNOWN.iter() {
                            option { value: "{category.as_str()}", "{category.label()}" }
                        }
                        if let Some(raw) = custom_category {
                            option { value: "{raw}", "{raw}" }
                        }
                    }

                    fieldset {
                        legend { "Icon" }
                        div { class: "icon-picker",
                            for icon in ICONS {
                                button {
                                    key: "{icon}",
                                    r#type: "button",
                                    class: choice_class(current.icon == icon, ""),
                                    onclick: move |_| draft.write().icon = icon.to_string(),
                                    "{icon}"
                                }
                            }
                            if let Some(icon) = custom_icon {
                                button {
                                    r#type: "button",
                                    class: "icon-choice active",
                                    "{icon}"
                                }
                            }
                            button {
                                r#type: "button",
                                class: choice_class(current.icon.is_empty(), "muted"),
                                onclick: move |_| draft.write().icon = String::new(),
                                "Kein Icon"
                            }
                        }
                    }

                    label { r#for: "tracker-color", "Farbe" }
                    div { class: "hstack",
                        input {
                            id: "tracker-color",
                            r#type: "color",
                            value: "{current.color}",
                            oninput: move |ev| draft.write().color = ev.value(),
                        }
                        input {
                            r#type: "text",
                            placeholder: "#3b82f6",
                            value: "{current.color}",
                            oninput: move |ev| draft.write().color = ev.value(),
                        }
                    }

                    div { class: "modal-actions",
                        button {
                            class: "btn btn-outline",
                            r#type: "button",
                            onclick: move |_| on_cancel.call(()),
                            "Abbrechen"
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "submit",
                            disabled: !current.is_valid() || submitting,
                            "{submit_label}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DeleteDialog(
    tracker: Tracker,
    on_confirm: EventHandler<Tracker>,
    on_cancel: EventHandler<()>,
) -> Element {
    let target = tracker.clone();
    rsx! {
        div { class: "modal-overlay",
            div { class: "modal modal-sm card",
                h3 { "Tracker löschen?" }
                p { class: "muted",
                    "Bist du sicher, dass du \"{tracker.name}\" löschen möchtest? Alle Einträge werden ebenfalls gelöscht."
                }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Abbrechen"
                    }
                    button {
                        class: "btn btn-destructive",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(target.clone()),
                        "Löschen"
                    }
                }
            }
        }
    }
}

/// Entries of one tracker plus a quick entry form. Remounted per tracker.
#[component]
fn TrackerDetail(tracker_id: String, name: String, limit: u32) -> Element {
    let api = use_context::<ApiClient>();
    let mut entries = use_signal(Vec::<Entry>::new);
    let mut schema_fields = use_signal(Vec::<String>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);
    let mut fields = use_signal(String::new);
    let mut notes = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let load_api = api.clone();
    let load_id = tracker_id.clone();
    use_future(move || {
        let api = load_api.clone();
        let id = load_id.clone();
        async move {
            let (tracker, recent) = futures::join!(
                get_tracker(&api, &id),
                get_tracker_entries(&api, &id, limit)
            );
            match tracker {
                Ok(tracker) => schema_fields.set(tracker.schema.keys().cloned().collect()),
                Err(err) => warn!(tracker_id = %id, error = %err, "failed to load tracker"),
            }
            match recent {
                Ok(list) => entries.set(list),
                Err(err) => {
                    warn!(tracker_id = %id, error = %err, "failed to load entries");
                    error.set(Some(err.user_message()));
                }
            }
            loading.set(false);
        }
    });

    let on_add = move |ev: FormEvent| {
        ev.prevent_default();
        if saving() {
            return;
        }
        let Some(entry) = entry_draft(&fields(), &notes()) else {
            error.set(Some(ENTRY_FORMAT_HINT.to_string()));
            return;
        };
        saving.set(true);
        error.set(None);
        let api = api.clone();
        let id = tracker_id.clone();
        spawn(async move {
            match create_entry(&api, &id, &entry).await {
                Ok(created) => {
                    info!(tracker_id = %id, entry_id = %created.id, "entry created");
                    entries.write().insert(0, created);
                    fields.set(String::new());
                    notes.set(String::new());
                }
                Err(err) => {
                    warn!(tracker_id = %id, error = %err, "failed to create entry");
                    error.set(Some(failure_message(SAVE_FAILED, &err)));
                }
            }
            saving.set(false);
        });
    };

    let hint = schema_fields.read().iter().map(|field| format!("{field}=")).collect::<Vec<_>>();
    let placeholder = if hint.is_empty() {
        "z.B. reps=10, weight=80".to_string()
    } else {
        hint.join(", ")
    };

    rsx! {
        section { class: "card tracker-detail",
            h3 { "{name}" }
            form { class: "quick-entry", onsubmit: on_add,
                input {
                    r#type: "text",
                    placeholder: "{placeholder}",
                    value: "{fields}",
                    oninput: move |ev| fields.set(ev.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Notiz (optional)",
                    value: "{notes}",
                    oninput: move |ev| notes.set(ev.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: saving() || fields().trim().is_empty(),
                    "Eintragen"
                }
            }
            if let Some(message) = error() {
                p { class: "inline-error", "{message}" }
            }
            if loading() {
                div { class: "loading", span { class: "spinner" } }
            } else if entries.read().is_empty() {
                p { class: "muted", "Noch keine Einträge." }
            } else {
                EntryList { entries: entries() }
            }
        }
    }
}

#[component]
fn RecentEntries(trackers: Vec<Tracker>) -> Element {
    let api = use_context::<ApiClient>();
    let mut recent = use_signal(Vec::<Entry>::new);

    use_future(move || {
        let api = api.clone();
        async move {
            match chat_history(&api, None, RECENT_LIMIT).await {
                Ok(list) => recent.set(list),
                Err(err) => warn!(error = %err, "failed to load recent entries"),
            }
        }
    });

    if recent.read().is_empty() {
        return rsx! {};
    }

    let rows = recent()
        .into_iter()
        .map(|entry| {
            let tracker = trackers
                .iter()
                .find(|tracker| tracker.id == entry.tracker_id)
                .map(|tracker| tracker.name.clone())
                .unwrap_or_default();
            (tracker, entry)
        })
        .collect::<Vec<_>>();

    rsx! {
        section { class: "card recent-entries",
            h3 { "Zuletzt getrackt" }
            ul { class: "entry-list",
                for (tracker, entry) in rows {
                    li { key: "{entry.id}", class: "entry-row",
                        span { class: "entry-tracker", "{tracker}" }
                        EntryTags { entry: entry.clone() }
                        span { class: "entry-time muted", "{format_timestamp(&entry.timestamp)}" }
                    }
                }
            }
        }
    }
}

#[component]
fn EntryList(entries: Vec<Entry>) -> Element {
    rsx! {
        ul { class: "entry-list",
            for entry in entries {
                li { key: "{entry.id}", class: "entry-row",
                    span { class: "entry-time muted", "{format_timestamp(&entry.timestamp)}" }
                    EntryTags { entry: entry.clone() }
                    if let Some(notes) = entry.notes.as_deref().filter(|notes| !notes.is_empty()) {
                        span { class: "entry-notes", "{notes}" }
                    }
                }
            }
        }
    }
}

#[component]
fn EntryTags(entry: Entry) -> Element {
    rsx! {
        div { class: "tag-row",
            for tag in tags_for(&entry.data) {
                span { key: "{tag.key}", class: "tag", "{tag.label()}" }
            }
        }
    }
}
