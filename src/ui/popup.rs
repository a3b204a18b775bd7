/// Popup UI for Tab Recall

use std::collections::HashMap;

use futures::future::join_all;
use patternfly_yew::prelude::*;
use uuid::Uuid;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::backup::{is_json_filename, plan_import, BackupError, ExportBundle};
use crate::chrome::{
    current_window_tabs, download_file, js_error_message, load_workspaces, open_in_tab, open_in_window,
    request_tab_summary, save_workspaces,
};
use crate::operations::TabSelection;
use crate::page_data::{TabDescriptor, TabSummary};
use crate::search::name_suggestions;
use crate::storage::{SaveMode, SaveOutcome, StoreEdit, WorkspaceStore};
use crate::summarizer::unsummarized;
use crate::ui::components::TabRow;
use crate::ui::workspaces::WorkspacesPanel;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Clone, PartialEq)]
enum ActiveTab {
    CurrentTabs,
    Workspaces,
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let active_tab = use_state(|| ActiveTab::CurrentTabs);
    let tabs = use_state(Vec::<TabDescriptor>::new);
    let previews = use_state(HashMap::<i32, TabSummary>::new);
    let selection = use_state(TabSelection::default);
    let store = use_state(WorkspaceStore::new);
    let workspace_name = use_state(String::new);

    // Load tabs and saved workspaces on mount
    {
        let state = state.clone();
        let tabs = tabs.clone();
        let previews = previews.clone();
        let selection = selection.clone();
        let store = store.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_workspaces().await {
                    Ok(loaded) => store.set(loaded),
                    Err(e) => state.set(AppState::Error(format!("Error loading workspaces: {}", e))),
                }

                match current_window_tabs().await {
                    Ok(current) => {
                        selection.set(TabSelection::all(&current));
                        tabs.set(current.clone());
                        previews.set(preview_tabs(&current).await);
                    }
                    Err(e) => state.set(AppState::Error(format!("Error loading tabs: {}", e))),
                }
            });
            || ()
        });
    }

    let on_toggle_tab = {
        let selection = selection.clone();
        Callback::from(move |tab_id: i32| {
            let mut updated = (*selection).clone();
            updated.toggle(tab_id);
            selection.set(updated);
        })
    };

    let on_select_all = {
        let selection = selection.clone();
        let tabs = tabs.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut updated = (*selection).clone();
                updated.set_all(&tabs, input.checked());
                selection.set(updated);
            }
        })
    };

    let on_name_input = {
        let workspace_name = workspace_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                workspace_name.set(input.value());
            }
        })
    };

    // Save the checked tabs under a name
    let on_save = {
        let state = state.clone();
        let tabs = tabs.clone();
        let selection = selection.clone();
        let store = store.clone();
        let workspace_name = workspace_name.clone();

        Callback::from(move |(name, mode): (String, SaveMode)| {
            // One save at a time; each rewrites the whole workspace array
            if matches!(*state, AppState::Loading(_)) {
                return;
            }
            let chosen = selection.selected_tabs(&tabs);
            if chosen.is_empty() {
                state.set(AppState::Warning("Please select at least one tab to save".to_string()));
                return;
            }

            let state = state.clone();
            let store = store.clone();
            let workspace_name = workspace_name.clone();
            state.set(AppState::Loading("Saving workspace...".to_string()));

            spawn_local(async move {
                match save_workspace(name, mode, chosen).await {
                    Ok((saved, outcome)) => {
                        store.set(saved);
                        workspace_name.set(String::new());
                        state.set(match outcome {
                            SaveOutcome::CreatedInstead { .. } => AppState::Warning(outcome.message()),
                            _ => AppState::Success(outcome.message()),
                        });
                    }
                    Err(e) => state.set(AppState::Error(format!("Failed to save workspace: {}", e))),
                }
            });
        })
    };

    let on_create_new = {
        let on_save = on_save.clone();
        let workspace_name = workspace_name.clone();
        Callback::from(move |_| {
            let typed = workspace_name.trim();
            let name = if typed.is_empty() { default_workspace_name() } else { typed.to_string() };
            on_save.emit((name, SaveMode::New));
        })
    };

    let on_open_workspace = {
        let state = state.clone();
        let store = store.clone();
        Callback::from(move |workspace_id: String| {
            let Some(workspace) = store.get_workspace(&workspace_id) else {
                return;
            };
            let urls: Vec<String> = workspace.tabs.iter().map(|tab| tab.url.clone()).collect();
            let state = state.clone();
            state.set(AppState::Success(format!("Opening {}...", workspace.name)));
            spawn_local(async move {
                if let Err(e) = open_in_window(&urls).await {
                    state.set(AppState::Error(e.to_string()));
                }
            });
        })
    };

    let on_open_tab = {
        let state = state.clone();
        Callback::from(move |url: String| {
            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = open_in_tab(&url).await {
                    state.set(AppState::Error(e.to_string()));
                }
            });
        })
    };

    let on_delete_workspace = {
        let state = state.clone();
        let store = store.clone();
        Callback::from(move |workspace_id: String| {
            let Some(workspace) = store.get_workspace(&workspace_id) else {
                return;
            };
            let name = workspace.name.clone();
            if !confirm(&format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                name
            )) {
                return;
            }

            let edit = StoreEdit::RemoveWorkspace { workspace_id };
            persist(edit, store.clone(), state.clone(), format!("Workspace \"{}\" deleted", name));
        })
    };

    let on_delete_tab = {
        let state = state.clone();
        let store = store.clone();
        Callback::from(move |(workspace_id, index): (String, usize)| {
            let Some(tab) = store.get_workspace(&workspace_id).and_then(|w| w.tabs.get(index)) else {
                return;
            };
            if !confirm(&format!(
                "Are you sure you want to delete the tab \"{}\"? This action cannot be undone.",
                tab.title
            )) {
                return;
            }

            let edit = StoreEdit::RemoveTab {
                workspace_id,
                index,
                url: tab.url.clone(),
            };
            persist(edit, store.clone(), state.clone(), "Tab deleted successfully!".to_string());
        })
    };

    let on_export = {
        let state = state.clone();
        let store = store.clone();
        Callback::from(move |_| {
            let export_date = String::from(js_sys::Date::new_0().to_iso_string());
            let exported = ExportBundle::new(&store.workspaces, &export_date)
                .and_then(|bundle| Ok((bundle.to_json()?, bundle)));
            match exported {
                Ok((json, bundle)) => {
                    download_file(&json, &bundle.filename());
                    state.set(AppState::Success(format!(
                        "{} workspaces exported successfully!",
                        bundle.workspace_count
                    )));
                }
                Err(BackupError::NothingToExport) => {
                    state.set(AppState::Warning(BackupError::NothingToExport.to_string()));
                }
                Err(e) => {
                    log::error!("Export failed: {}", e);
                    state.set(AppState::Error("Failed to export workspaces".to_string()));
                }
            }
        })
    };

    let on_import = {
        let state = state.clone();
        let store = store.clone();
        Callback::from(move |file: File| {
            let state = state.clone();
            let store = store.clone();
            state.set(AppState::Loading("Processing import file...".to_string()));
            spawn_local(async move {
                match import_workspaces(file).await {
                    Ok(Some((imported, message))) => {
                        store.set(imported);
                        state.set(AppState::Success(message));
                    }
                    Ok(None) => state.set(AppState::Idle),
                    Err(e) => {
                        log::error!("Import failed: {}", e);
                        state.set(AppState::Error(format!("Import failed: {}", e)));
                    }
                }
            });
        })
    };

    let on_tab_click = {
        let active_tab = active_tab.clone();
        move |tab: ActiveTab| {
            let active_tab = active_tab.clone();
            Callback::from(move |_| {
                active_tab.set(tab.clone());
            })
        }
    };

    let is_busy = matches!(*state, AppState::Loading(_));
    let suggestions = name_suggestions(&store.workspaces, &workspace_name);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Recall"}</h1>

            // Tab navigation
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={if *active_tab == ActiveTab::CurrentTabs { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(ActiveTab::CurrentTabs)}>
                            <span class="pf-v5-c-tabs__item-text">{"Current Tabs"}</span>
                        </button>
                    </li>
                    <li class={if *active_tab == ActiveTab::Workspaces { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(ActiveTab::Workspaces)}>
                            <span class="pf-v5-c-tabs__item-text">{"Workspaces"}</span>
                        </button>
                    </li>
                </ul>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Success(msg) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}>
                    </Alert>
                },
                AppState::Warning(msg) => html! {
                    <Alert r#type={AlertType::Warning} title={msg.clone()} inline={true}>
                    </Alert>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            <div class="tab-pane-content">
                {match &*active_tab {
                    ActiveTab::CurrentTabs => html! {
                        <div class="flex-column-gap">
                            <div class="save-form">
                                <input
                                    type="text"
                                    placeholder="Workspace name"
                                    value={(*workspace_name).clone()}
                                    oninput={on_name_input}
                                    class="workspace-name-input"
                                />
                                if !suggestions.is_empty() {
                                    <div class="workspace-suggestions">
                                        {for suggestions.iter().map(|workspace| {
                                            let onclick = {
                                                let on_save = on_save.clone();
                                                let name = workspace.name.clone();
                                                Callback::from(move |_: MouseEvent| {
                                                    if !is_busy {
                                                        on_save.emit((name.clone(), SaveMode::AddToExisting));
                                                    }
                                                })
                                            };
                                            html! {
                                                <div
                                                    key={workspace.id.clone()}
                                                    class={classes!("autocomplete-item", is_busy.then_some("disabled"))}
                                                    title={format!("Add current tabs to \"{}\"", workspace.name)}
                                                    {onclick}
                                                >
                                                    {&workspace.name}
                                                </div>
                                            }
                                        })}
                                    </div>
                                }
                                <Button onclick={on_create_new} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                                    {"💾 Create New Workspace"}
                                </Button>
                            </div>

                            <label class="select-all-container">
                                <input
                                    type="checkbox"
                                    checked={selection.all_selected(&tabs)}
                                    onchange={on_select_all}
                                />
                                {"Select/Deselect All"}
                            </label>

                            <div class="tabs-list">
                                {for tabs.iter().map(|tab| html! {
                                    <TabRow
                                        key={tab.id}
                                        tab={tab.clone()}
                                        preview={previews.get(&tab.id).cloned()}
                                        checked={selection.is_selected(tab.id)}
                                        on_toggle={on_toggle_tab.clone()}
                                    />
                                })}
                            </div>
                        </div>
                    },
                    ActiveTab::Workspaces => html! {
                        <WorkspacesPanel
                            workspaces={store.workspaces.clone()}
                            disabled={is_busy}
                            on_open={on_open_workspace}
                            on_delete={on_delete_workspace}
                            on_open_tab={on_open_tab}
                            on_delete_tab={on_delete_tab}
                            on_export={on_export}
                            on_import={on_import}
                        />
                    },
                }}
            </div>

            <p class="footer-popup">
                {"Tab Recall v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn default_workspace_name() -> String {
    let today = js_sys::Date::new_0().to_locale_date_string("default", &JsValue::UNDEFINED);
    format!("Workspace {}", String::from(today))
}

/// Summaries for the tab list; tabs the worker cannot answer for keep their
/// own title.
async fn preview_tabs(tabs: &[TabDescriptor]) -> HashMap<i32, TabSummary> {
    let replies = join_all(tabs.iter().map(request_tab_summary)).await;
    tabs.iter()
        .zip(replies)
        .filter_map(|(tab, reply)| match reply {
            Ok(summary) => Some((tab.id, summary)),
            Err(e) => {
                log::warn!("No summary available for tab {}, using default tab info: {}", tab.id, e);
                None
            }
        })
        .collect()
}

async fn save_workspace(
    name: String,
    mode: SaveMode,
    tabs: Vec<TabDescriptor>,
) -> Result<(WorkspaceStore, SaveOutcome), String> {
    let replies = join_all(tabs.iter().map(request_tab_summary)).await;
    let summaries: Vec<TabSummary> = tabs
        .iter()
        .zip(replies)
        .map(|(tab, reply)| {
            reply.unwrap_or_else(|e| {
                log::warn!("No summary available for tab {}, using fallback info: {}", tab.id, e);
                unsummarized(tab)
            })
        })
        .collect();

    // Re-read storage so changes from other windows are not lost
    let mut store = load_workspaces().await.map_err(|e| e.to_string())?;
    let outcome = store.save_tabs(&name, summaries, mode, js_sys::Date::now(), Uuid::new_v4().to_string());
    save_workspaces(&store).await.map_err(|e| e.to_string())?;

    log::info!("{}", outcome.message());
    Ok((store, outcome))
}

/// `Ok(None)` when the user cancels at the preview
async fn import_workspaces(file: File) -> Result<Option<(WorkspaceStore, String)>, String> {
    if !is_json_filename(&file.name()) {
        return Err(BackupError::NotJsonFile.to_string());
    }

    let text = JsFuture::from(file.text())
        .await
        .map_err(|e| format!("Failed to read file: {}", js_error_message(&e)))?
        .as_string()
        .ok_or_else(|| "Failed to read file".to_string())?;

    let mut store = load_workspaces().await.map_err(|e| e.to_string())?;
    let plan = plan_import(&text, &store.workspaces, || Uuid::new_v4().to_string()).map_err(|e| e.to_string())?;

    if !confirm(&plan.preview.message()) {
        return Ok(None);
    }

    let message = plan.message();
    store.extend(plan.workspaces);
    save_workspaces(&store).await.map_err(|e| e.to_string())?;

    log::info!("{}", message);
    Ok(Some((store, message)))
}

/// Replay `edit` on the stored workspaces, then show the result
fn persist(edit: StoreEdit, store: UseStateHandle<WorkspaceStore>, state: UseStateHandle<AppState>, message: String) {
    spawn_local(async move {
        match apply_to_storage(&edit).await {
            Ok(updated) => {
                store.set(updated);
                state.set(AppState::Success(message));
            }
            Err(e) => state.set(AppState::Error(format!("Failed to save: {}", e))),
        }
    });
}

async fn apply_to_storage(edit: &StoreEdit) -> Result<WorkspaceStore, String> {
    // Re-read storage so changes from other windows are not lost
    let mut store = load_workspaces().await.map_err(|e| e.to_string())?;
    if store.apply(edit) {
        save_workspaces(&store).await.map_err(|e| e.to_string())?;
    } else {
        log::warn!("Nothing to remove for {:?}; it is no longer stored", edit);
    }
    Ok(store)
}
