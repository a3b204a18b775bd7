/// Reusable UI components

use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::domain::count_hostnames_with_unknown;
use crate::page_data::{TabDescriptor, TabSummary, Workspace};

/// Shown when a tab has no favicon of its own
pub const DEFAULT_FAVICON: &str = "icons/icon16.png";

#[derive(Properties, PartialEq)]
pub struct TabRowProps {
    pub tab: TabDescriptor,
    /// Summary from the background worker, once it arrives
    #[prop_or_default]
    pub preview: Option<TabSummary>,
    pub checked: bool,
    pub on_toggle: Callback<i32>,
}

#[function_component(TabRow)]
pub fn tab_row(props: &TabRowProps) -> Html {
    let tab = &props.tab;
    let title = props
        .preview
        .as_ref()
        .map_or_else(|| tab.title.clone(), |preview| preview.title.clone());
    let summary = props.preview.as_ref().map(|preview| preview.summary.clone());
    let favicon = tab.fav_icon_url.clone().unwrap_or_else(|| DEFAULT_FAVICON.to_string());

    let onclick = {
        let tab_id = tab.id;
        props.on_toggle.reform(move |_: MouseEvent| tab_id)
    };

    html! {
        <div class="tab-item" {onclick}>
            <input type="checkbox" class="tab-checkbox" checked={props.checked} />
            <img class="tab-favicon" src={favicon} alt="" />
            <div class="tab-details">
                <div class="tab-title">{title}</div>
                if let Some(summary) = summary {
                    <div class="tab-summary" title={summary.clone()}>{summary}</div>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkspaceCardProps {
    pub workspace: Workspace,
    pub on_open: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_open_tab: Callback<String>,
    pub on_delete_tab: Callback<(String, usize)>,
}

#[function_component(WorkspaceCard)]
pub fn workspace_card(props: &WorkspaceCardProps) -> Html {
    let expanded = use_state(|| false);
    let workspace = &props.workspace;

    let toggle_expanded = {
        let expanded = expanded.clone();
        Callback::from(move |_| {
            expanded.set(!*expanded);
        })
    };

    let domain_count = count_hostnames_with_unknown(workspace.tabs.iter().map(|tab| tab.url.as_str()));
    let created = js_sys::Date::new(&JsValue::from_f64(workspace.created));
    let created = String::from(created.to_locale_date_string("default", &JsValue::UNDEFINED));

    html! {
        <div class="workspace-card">
            <div class="workspace-header">
                <h3 class="workspace-title">{&workspace.name}</h3>
                <div class="workspace-actions">
                    <Button
                        onclick={props.on_open.reform({
                            let id = workspace.id.clone();
                            move |_| id.clone()
                        })}
                    >
                        {"Open"}
                    </Button>
                    <Button
                        onclick={props.on_delete.reform({
                            let id = workspace.id.clone();
                            move |_| id.clone()
                        })}
                        variant={ButtonVariant::Danger}
                    >
                        {"Delete"}
                    </Button>
                </div>
            </div>

            if !workspace.tabs.is_empty() {
                <Button onclick={toggle_expanded} variant={ButtonVariant::Secondary}>
                    {if *expanded { "Hide tabs" } else { "Show tabs" }}
                </Button>
            }

            if *expanded {
                <div class="workspace-tabs">
                    {for workspace.tabs.iter().enumerate().map(|(index, tab)| {
                        let open_tab = props.on_open_tab.reform({
                            let url = tab.url.clone();
                            move |_: MouseEvent| url.clone()
                        });
                        let delete_tab = {
                            let on_delete_tab = props.on_delete_tab.clone();
                            let id = workspace.id.clone();
                            Callback::from(move |e: MouseEvent| {
                                // Keep the row's open handler from firing
                                e.stop_propagation();
                                on_delete_tab.emit((id.clone(), index));
                            })
                        };
                        let favicon = tab.fav_icon_url.clone().unwrap_or_else(|| DEFAULT_FAVICON.to_string());

                        html! {
                            <div key={index} class="workspace-tab-item" onclick={open_tab}>
                                <img src={favicon} alt="" class="tab-favicon" />
                                <div class="tab-details">
                                    <div class="tab-title" title={tab.summary.clone()}>{&tab.title}</div>
                                </div>
                                <button class="delete-tab" onclick={delete_tab}>{"✕"}</button>
                            </div>
                        }
                    })}
                </div>
            }

            <div class="workspace-stats">
                <div class="workspace-stat-item">{format!("📄 {} tabs", workspace.tabs.len())}</div>
                <div class="workspace-stat-item">{format!("🌐 {} domains", domain_count)}</div>
            </div>
            <p class="workspace-meta">{format!("{} tabs • {}", workspace.tabs.len(), created)}</p>
        </div>
    }
}
