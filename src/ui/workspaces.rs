/// Saved workspaces panel: search, open, delete, export and import

use patternfly_yew::prelude::*;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::page_data::Workspace;
use crate::search::search_workspaces;
use crate::ui::components::WorkspaceCard;

#[derive(Properties, PartialEq)]
pub struct WorkspacesPanelProps {
    pub workspaces: Vec<Workspace>,
    pub disabled: bool,
    pub on_open: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_open_tab: Callback<String>,
    pub on_delete_tab: Callback<(String, usize)>,
    pub on_export: Callback<()>,
    pub on_import: Callback<File>,
}

#[function_component(WorkspacesPanel)]
pub fn workspaces_panel(props: &WorkspacesPanelProps) -> Html {
    let search_query = use_state(String::new);

    let on_search_input = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search_query.set(input.value());
            }
        })
    };

    let on_file_change = {
        let on_import = props.on_import.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Some(file) = input.files().and_then(|files| files.get(0)) {
                    on_import.emit(file);
                }
                // Allow picking the same file again
                input.set_value("");
            }
        })
    };

    let filtered = search_workspaces(&props.workspaces, &search_query);

    html! {
        <div class="flex-column-gap">
            <div class="import-export-container">
                <Button
                    onclick={props.on_export.reform(|_| ())}
                    disabled={props.disabled}
                    variant={ButtonVariant::Secondary}
                >
                    {"📤 Export"}
                </Button>
                <label class="import-label">
                    {"📥 Import"}
                    <input
                        type="file"
                        accept=".json,application/json"
                        class="import-file-input"
                        disabled={props.disabled}
                        onchange={on_file_change}
                    />
                </label>
            </div>

            <input
                type="text"
                placeholder="Search workspaces and tabs..."
                value={(*search_query).clone()}
                oninput={on_search_input}
                class="search-input"
            />

            if props.workspaces.is_empty() {
                <div class="empty-state">
                    <p class="empty-state-title">{"No Workspaces Yet"}</p>
                    <p class="empty-state-message">{"Save your first workspace from the Current Tabs panel"}</p>
                </div>
            } else if filtered.is_empty() {
                <div class="empty-state">
                    <p>{"No workspaces match your search."}</p>
                </div>
            } else {
                <div class="workspaces-list">
                    {for filtered.into_iter().map(|workspace| html! {
                        <WorkspaceCard
                            key={workspace.id.clone()}
                            workspace={workspace.clone()}
                            on_open={props.on_open.clone()}
                            on_delete={props.on_delete.clone()}
                            on_open_tab={props.on_open_tab.clone()}
                            on_delete_tab={props.on_delete_tab.clone()}
                        />
                    })}
                </div>
            }
        </div>
    }
}
