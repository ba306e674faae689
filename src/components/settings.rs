use yew::prelude::*;
use web_sys::HtmlInputElement;

use crate::models::{Settings, SettingsField};

#[derive(Properties, PartialEq)]
pub struct SettingsProps {
    pub settings: Settings,
    pub loading: bool,
    pub saving: bool,
    pub on_field: Callback<(SettingsField, String)>,
    pub on_save: Callback<()>,
}

/// One row of the settings form. Edits commit on change; integer fields
/// are coerced (and rejected) in the store, not here.
fn field_row(
    label: &str,
    value: String,
    field: SettingsField,
    is_secret: bool,
    on_field: &Callback<(SettingsField, String)>,
) -> Html {
    let on_change = {
        let cb = on_field.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit((field, input.value()));
        })
    };

    html! {
        <div>
            <label class="form-label">{ label }</label>
            <input
                class="form-input"
                type={if is_secret { "password" } else { "text" }}
                value={value}
                onchange={on_change}
            />
        </div>
    }
}

#[function_component(SettingsPane)]
pub fn settings_pane(props: &SettingsProps) -> Html {
    let css = r#"
        .settings-pane { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; justify-content: center; }
        .settings-card { width: 100%; max-width: 560px; background: white; border: 1px solid var(--border-color); border-radius: 8px; padding: 20px; display: flex; flex-direction: column; gap: 5px; align-self: flex-start; }
        .settings-card h3 { margin: 0 0 10px 0; font-size: 1.1rem; border-bottom: 1px solid var(--border-color); padding-bottom: 10px; }
        .form-label { display: block; font-size: 0.85rem; font-weight: 600; margin-bottom: 5px; color: var(--text-secondary); }
        .settings-section { font-size: 0.8rem; color: var(--text-secondary); text-transform: uppercase; letter-spacing: 0.05em; margin: 10px 0 5px 0; }
        .settings-actions { margin-top: 15px; display: flex; justify-content: flex-end; }
    "#;

    if props.loading {
        return html! {
            <>
                <style>{ css }</style>
                <div class="settings-pane">
                    <div class="settings-card">{ "加载配置中..." }</div>
                </div>
            </>
        };
    }

    let s = &props.settings;
    let on_field = &props.on_field;

    html! {
        <>
            <style>{ css }</style>
            <div class="settings-pane">
                <div class="settings-card">
                    <h3>{ "后端配置" }</h3>

                    <div class="settings-section">{ "模型" }</div>
                    { field_row("API Key", s.api_key.clone(), SettingsField::ApiKey, true, on_field) }
                    { field_row("API Base URL", s.api_base_url.clone(), SettingsField::ApiBaseUrl, false, on_field) }
                    { field_row("主模型", s.primary_model.clone(), SettingsField::PrimaryModel, false, on_field) }
                    { field_row("快速模型", s.fast_model.clone(), SettingsField::FastModel, false, on_field) }
                    { field_row("Embedding 模型", s.embedding_model.clone(), SettingsField::EmbeddingModel, false, on_field) }

                    <div class="settings-section">{ "存储" }</div>
                    { field_row("资料目录", s.data_dir.clone(), SettingsField::DataDir, false, on_field) }
                    { field_row("向量库路径", s.vector_db_path.clone(), SettingsField::VectorDbPath, false, on_field) }

                    <div class="settings-section">{ "检索参数" }</div>
                    { field_row("Top K", s.top_k.to_string(), SettingsField::TopK, false, on_field) }
                    { field_row("Chunk Size", s.chunk_size.to_string(), SettingsField::ChunkSize, false, on_field) }
                    { field_row("Chunk Overlap", s.chunk_overlap.to_string(), SettingsField::ChunkOverlap, false, on_field) }
                    { field_row("Max Tokens", s.max_tokens.to_string(), SettingsField::MaxTokens, false, on_field) }

                    <div class="settings-actions">
                        <button class="btn btn-primary" onclick={props.on_save.reform(|_| ())} disabled={props.saving}>
                            { if props.saving { "保存中..." } else { "保存全部配置" } }
                        </button>
                    </div>
                </div>
            </div>
        </>
    }
}
