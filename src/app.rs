use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, FormData, MouseEvent};
use yew::prelude::*;

use crate::api::ApiClient;
use crate::chat_panel::ChatPanel;
use crate::cookies::BrowserJar;
use crate::files_panel::FilesPanel;
use crate::location::{self, Consent};
use crate::types::{outgoing_message, ActiveTab, Message};

/// Append-only transcript. A reducer (rather than `use_state`) so that
/// late-arriving responses append to the current list instead of a clone
/// captured when their request started.
#[derive(Default, PartialEq)]
struct Transcript {
    messages: Vec<Message>,
}

impl Reducible for Transcript {
    type Action = Message;

    fn reduce(self: Rc<Self>, msg: Message) -> Rc<Self> {
        let mut messages = self.messages.clone();
        messages.push(msg);
        Rc::new(Self { messages })
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let active_tab = use_state(|| ActiveTab::Chat);
    let transcript = use_reducer(Transcript::default);
    let consent = use_state(|| Consent::Unknown);
    let files = use_state(Vec::<String>::new);

    // On load: all three location cookies present means the location is
    // already known; anything less prompts for consent.
    {
        let consent = consent.clone();
        use_effect_with((), move |_| {
            match location::saved_location(&BrowserJar) {
                Some(saved) => {
                    log::info!(
                        "using saved location: {} ({}, {})",
                        saved.city,
                        saved.lat,
                        saved.lon
                    );
                    consent.set(Consent::Granted);
                }
                None => consent.set(Consent::Prompting),
            }
        });
    }

    // Keyboard shortcut for Cmd/Ctrl+K tab switching
    {
        let active_tab = active_tab.clone();
        use_effect_with((), move |_| {
            let window = window().expect("no global `window` exists");
            let document = window.document().expect("should have a document");

            let listener = EventListener::new(&document, "keydown", move |event| {
                if let Some(keyboard_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    if (keyboard_event.meta_key() || keyboard_event.ctrl_key())
                        && keyboard_event.key() == "k"
                    {
                        keyboard_event.prevent_default();
                        active_tab.set(match *active_tab {
                            ActiveTab::Chat => ActiveTab::Docs,
                            ActiveTab::Docs => ActiveTab::Chat,
                        });
                    }
                }
            });

            move || drop(listener)
        });
    }

    let reload_files = {
        let files = files.clone();
        Callback::from(move |_: ()| {
            let files = files.clone();
            spawn_local(async move {
                match ApiClient::new().list_files().await {
                    Ok(list) => files.set(list),
                    Err(err) => log::error!("failed to load file list: {}", err),
                }
            });
        })
    };

    // The file list is (re)fetched every time the documents tab is shown.
    {
        let reload_files = reload_files.clone();
        use_effect_with(*active_tab, move |tab| {
            if *tab == ActiveTab::Docs {
                reload_files.emit(());
            }
        });
    }

    let on_send = {
        let transcript = transcript.clone();
        Callback::from(move |text: String| {
            if outgoing_message(&text).is_none() {
                return;
            }
            // Optimistic append before the server answers.
            transcript.dispatch(Message::user(text.clone()));

            let transcript = transcript.clone();
            spawn_local(async move {
                match ApiClient::new().send_chat(&text).await {
                    Ok(response) => transcript.dispatch(Message::assistant(response)),
                    Err(err) => {
                        log::error!("chat request failed: {}", err);
                        transcript.dispatch(Message::error(
                            "<p>Server error. Please try again later.</p>",
                        ));
                    }
                }
            });
        })
    };

    // Shared by "Yes, Enable" and "Change My Location": on any failure the
    // consent state is left as-is, so the card stays and the flow can be
    // retried by clicking again.
    let request_location = {
        let transcript = transcript.clone();
        let consent = consent.clone();
        Callback::from(move |_: ()| {
            let transcript = transcript.clone();
            let consent = consent.clone();
            spawn_local(async move {
                match location::acquire_location(&ApiClient::new(), &BrowserJar).await {
                    Ok(saved) => {
                        transcript.dispatch(Message::assistant(format!(
                            "<p>✅ Location access granted! You're currently near \
                             <b>{}</b>. You can now ask for the weather here or anywhere.</p>",
                            saved.city
                        )));
                        consent.set(Consent::Granted);
                    }
                    Err(err) => {
                        log::error!("location flow failed: {}", err);
                        transcript.dispatch(Message::error(format!("<p>{}</p>", err)));
                    }
                }
            });
        })
    };

    let on_skip = {
        let transcript = transcript.clone();
        let consent = consent.clone();
        Callback::from(move |_: ()| {
            transcript.dispatch(Message::assistant(
                "<p>No problem! You can enable location anytime using the \
                 \"Change My Location\" button below.</p>",
            ));
            consent.set(Consent::Deferred);
        })
    };

    let on_upload = {
        let transcript = transcript.clone();
        let reload_files = reload_files.clone();
        Callback::from(move |form: FormData| {
            let transcript = transcript.clone();
            let reload_files = reload_files.clone();
            spawn_local(async move {
                match ApiClient::new().upload(&form).await {
                    Ok(message) => {
                        transcript.dispatch(Message::assistant(format!("<p>{}</p>", message)));
                        reload_files.emit(());
                    }
                    Err(err) => {
                        log::error!("upload failed: {}", err);
                        transcript.dispatch(Message::error("<p>Upload failed.</p>"));
                    }
                }
            });
        })
    };

    let on_delete = {
        let transcript = transcript.clone();
        let reload_files = reload_files.clone();
        Callback::from(move |filename: String| {
            let confirmed = window()
                .and_then(|w| w.confirm_with_message(&format!("Delete {}?", filename)).ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let transcript = transcript.clone();
            let reload_files = reload_files.clone();
            spawn_local(async move {
                match ApiClient::new().delete_file(&filename).await {
                    Ok(message) => {
                        transcript.dispatch(Message::assistant(format!("<p>{}</p>", message)));
                        reload_files.emit(());
                    }
                    Err(err) => {
                        log::error!("delete failed: {}", err);
                        transcript.dispatch(Message::error("<p>Error deleting file.</p>"));
                    }
                }
            });
        })
    };

    let tab_button = |tab: ActiveTab, label: &'static str| {
        let active_tab = active_tab.clone();
        let is_active = *active_tab == tab;
        let onclick = Callback::from(move |_: MouseEvent| active_tab.set(tab));
        html! {
            <button
                {onclick}
                class={classes!(
                    "px-4",
                    "py-2",
                    "text-sm",
                    "font-medium",
                    "border-b-2",
                    if is_active { "border-blue-500 text-blue-600" } else { "border-transparent text-gray-500" }
                )}
            >
                { label }
            </button>
        }
    };

    html! {
        <div class="flex flex-col h-screen">
            <div class="flex border-b border-gray-300">
                { tab_button(ActiveTab::Chat, "Chat") }
                { tab_button(ActiveTab::Docs, "Documents") }
            </div>

            <ChatPanel
                active_tab={*active_tab}
                messages={transcript.messages.clone()}
                consent={*consent}
                on_send={on_send}
                on_grant={request_location.clone()}
                on_skip={on_skip}
                on_change_location={request_location}
            />

            <FilesPanel
                active_tab={*active_tab}
                files={(*files).clone()}
                on_upload={on_upload}
                on_delete={on_delete}
            />
        </div>
    }
}
