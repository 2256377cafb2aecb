use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent};
use yew::prelude::*;

use crate::location::Consent;
use crate::types::{outgoing_message, ActiveTab, Message, Sender};

#[derive(Properties, PartialEq)]
pub struct ChatPanelProps {
    pub active_tab: ActiveTab,
    pub messages: Vec<Message>,
    pub consent: Consent,
    pub on_send: Callback<String>,
    pub on_grant: Callback<()>,
    pub on_skip: Callback<()>,
    pub on_change_location: Callback<()>,
}

#[function_component(ChatPanel)]
pub fn chat_panel(props: &ChatPanelProps) -> Html {
    if props.active_tab != ActiveTab::Chat {
        return html! {};
    }

    let input_value = use_state(String::new);
    let transcript_ref = use_node_ref();

    // Pin the transcript to its latest entry after every append and whenever
    // a card appears or disappears.
    {
        let transcript_ref = transcript_ref.clone();
        use_effect_with(
            (props.messages.clone(), props.consent),
            move |_| {
                if let Some(div) = transcript_ref.cast::<web_sys::Element>() {
                    div.set_scroll_top(div.scroll_height());
                }
            },
        );
    }

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                input_value.set(input.value());
            }
        })
    };

    let send = {
        let input_value = input_value.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |_: ()| {
            let value = (*input_value).clone();
            if outgoing_message(&value).is_some() {
                on_send.emit(value);
                input_value.set(String::new());
            }
        })
    };

    let on_keydown = {
        let send = send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                send.emit(());
            }
        })
    };

    let on_click_send = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };

    let on_grant = {
        let on_grant = props.on_grant.clone();
        Callback::from(move |_: MouseEvent| on_grant.emit(()))
    };
    let on_skip = {
        let on_skip = props.on_skip.clone();
        Callback::from(move |_: MouseEvent| on_skip.emit(()))
    };
    let on_change_location = {
        let on_change_location = props.on_change_location.clone();
        Callback::from(move |_: MouseEvent| on_change_location.emit(()))
    };

    html! {
        <div class="flex flex-col flex-1">
            <div ref={transcript_ref} class="flex-1 overflow-y-auto p-4 space-y-3">
                { props.messages.iter().map(bubble).collect::<Html>() }

                {
                    if props.consent.shows_card() {
                        html! {
                            <div class="p-3 mb-3 rounded-lg bg-gray-50 border border-gray-300">
                                <h3 class="text-sm font-semibold mb-2">{"🌍 Location Access"}</h3>
                                <p class="text-sm mb-2">
                                    {"I can provide live weather updates for your area. \
                                      Would you like to enable location access?"}
                                </p>
                                <div class="space-x-2">
                                    <button
                                        onclick={on_grant}
                                        class="px-3 py-1 bg-blue-500 text-white rounded text-sm hover:bg-blue-600"
                                    >
                                        {"Yes, Enable"}
                                    </button>
                                    <button
                                        onclick={on_skip}
                                        class="px-3 py-1 border border-gray-400 rounded text-sm hover:bg-gray-100"
                                    >
                                        {"Maybe Later"}
                                    </button>
                                </div>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }

                {
                    if props.consent.offers_change() {
                        html! {
                            <div class="p-3 mt-3 rounded-lg bg-white border border-gray-300">
                                <h3 class="text-sm font-semibold mb-2">{"📍 Location Settings"}</h3>
                                <p class="text-sm mb-2">{"Would you like to update your location?"}</p>
                                <button
                                    onclick={on_change_location}
                                    class="px-3 py-1 border border-blue-400 text-blue-600 rounded text-sm hover:bg-blue-50"
                                >
                                    {"Change My Location"}
                                </button>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>

            <div class="p-4 border-t border-gray-300 flex gap-2">
                <input
                    type="text"
                    value={(*input_value).clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    placeholder="Type a message..."
                    class="flex-1 px-3 py-2 border border-gray-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                />
                <button
                    onclick={on_click_send}
                    class="px-4 py-2 bg-blue-500 text-white rounded-lg text-sm font-medium hover:bg-blue-600 transition-colors"
                >
                    {"Send"}
                </button>
            </div>
        </div>
    }
}

fn bubble(msg: &Message) -> Html {
    let is_user = msg.sender == Sender::User;
    // Server (and user) HTML is rendered verbatim; the backend is the trust
    // boundary here.
    let content = Html::from_html_unchecked(AttrValue::from(msg.html.clone()));

    html! {
        <div
            class={classes!(
                "p-2",
                "rounded",
                "mb-2",
                if is_user { "bg-blue-500 text-white ml-8" } else { "bg-gray-100 mr-8" },
                msg.error.then_some("text-red-600")
            )}
        >
            { content }
        </div>
    }
}
