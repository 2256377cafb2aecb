use web_sys::{FormData, HtmlFormElement, MouseEvent};
use yew::prelude::*;

use crate::api::uploads_url;
use crate::types::ActiveTab;

#[derive(Properties, PartialEq)]
pub struct FilesPanelProps {
    pub active_tab: ActiveTab,
    pub files: Vec<String>,
    pub on_upload: Callback<FormData>,
    pub on_delete: Callback<String>,
}

#[function_component(FilesPanel)]
pub fn files_panel(props: &FilesPanelProps) -> Html {
    if props.active_tab != ActiveTab::Docs {
        return html! {};
    }

    let on_submit = {
        let on_upload = props.on_upload.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(form) = e.target_dyn_into::<HtmlFormElement>() else {
                return;
            };
            match FormData::new_with_form(&form) {
                Ok(data) => on_upload.emit(data),
                Err(err) => log::error!("failed to package upload form: {:?}", err),
            }
        })
    };

    html! {
        <div class="flex flex-col flex-1 p-4 overflow-y-auto">
            <h2 class="text-lg font-semibold pb-3 mb-4 border-b border-gray-200">{"Documents"}</h2>

            <form onsubmit={on_submit} class="mb-4 flex gap-2 items-center">
                <input
                    type="file"
                    name="file"
                    class="text-sm"
                />
                <button
                    type="submit"
                    class="px-3 py-1 bg-blue-500 text-white rounded text-sm hover:bg-blue-600"
                >
                    {"Upload"}
                </button>
            </form>

            {
                if props.files.is_empty() {
                    html! { <p class="text-sm text-gray-500">{"No files uploaded yet."}</p> }
                } else {
                    html! {
                        <ul class="space-y-2">
                            {
                                props.files.iter().map(|filename| {
                                    let on_delete = props.on_delete.clone();
                                    let name = filename.clone();
                                    let onclick = Callback::from(move |_: MouseEvent| {
                                        on_delete.emit(name.clone());
                                    });

                                    html! {
                                        <li key={filename.clone()} class="flex items-center gap-2 text-sm">
                                            <a
                                                href={uploads_url(filename)}
                                                target="_blank"
                                                class="text-blue-600 hover:underline"
                                            >
                                                { filename }
                                            </a>
                                            <button
                                                {onclick}
                                                class="px-2 py-0.5 bg-red-500 text-white rounded text-xs hover:bg-red-600"
                                            >
                                                {"Delete"}
                                            </button>
                                        </li>
                                    }
                                }).collect::<Html>()
                            }
                        </ul>
                    }
                }
            }
        </div>
    }
}
