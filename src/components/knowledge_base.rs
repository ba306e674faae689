use yew::prelude::*;
use web_sys::{Event, HtmlInputElement};

use crate::models::KbFile;

#[derive(Properties, PartialEq)]
pub struct KnowledgeBaseProps {
    pub files: Vec<KbFile>,
    pub loading: bool,
    pub uploading: bool,
    pub rebuilding: bool,
    /// Name of the file whose deletion is awaiting its second click.
    pub pending_delete: Option<String>,
    pub on_upload: Callback<Vec<web_sys::File>>,
    pub on_request_delete: Callback<String>,
    pub on_confirm_delete: Callback<String>,
    pub on_cancel_delete: Callback<()>,
    pub on_request_rebuild: Callback<()>,
}

#[function_component(KnowledgeBase)]
pub fn knowledge_base(props: &KnowledgeBaseProps) -> Html {
    let on_file_change = {
        let on_upload = props.on_upload.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut selected = Vec::new();
            if let Some(list) = input.files() {
                for i in 0..list.length() {
                    if let Some(file) = list.get(i) {
                        selected.push(file);
                    }
                }
            }
            // Clear the input so re-selecting the same files fires again
            input.set_value("");
            on_upload.emit(selected);
        })
    };

    let css = r#"
        .kb-pane { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 20px; }
        .kb-toolbar { display: flex; gap: 10px; align-items: center; }
        .kb-upload-label { display: inline-flex; gap: 6px; align-items: center; cursor: pointer; border: 1px solid var(--border-color); background: white; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; }
        .kb-upload-label:hover { background: #f0f0f0; }
        .file-list { display: flex; flex-direction: column; border: 1px solid var(--border-color); border-radius: 8px; overflow: hidden; }
        .file-row { display: flex; justify-content: space-between; align-items: center; padding: 10px 15px; border-bottom: 1px solid var(--border-color); background: white; }
        .file-row:last-child { border-bottom: none; }
        .file-name { font-size: 0.95rem; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
        .file-size { color: var(--text-secondary); font-size: 0.8rem; margin-left: 10px; flex-shrink: 0; }
        .file-actions { display: flex; gap: 6px; flex-shrink: 0; margin-left: 15px; }
        .kb-empty { color: var(--text-secondary); text-align: center; padding: 30px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="kb-pane">
                <div class="kb-toolbar">
                    <label class="kb-upload-label" for="kb-upload-input">
                        <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="12" y1="5" x2="12" y2="19"></line><line x1="5" y1="12" x2="19" y2="12"></line></svg>
                        <span>{ if props.uploading { "上传中..." } else { "上传资料" } }</span>
                    </label>
                    <input
                        id="kb-upload-input"
                        type="file"
                        multiple=true
                        accept=".pdf,.txt,.md"
                        onchange={on_file_change}
                        disabled={props.uploading}
                        style="display: none;"
                    />
                    <button
                        class="btn btn-primary"
                        onclick={props.on_request_rebuild.reform(|_| ())}
                        disabled={props.rebuilding}
                    >
                        { if props.rebuilding { "构建中..." } else { "构建知识库" } }
                    </button>
                </div>

                if props.loading {
                    <div class="kb-empty">{ "加载中..." }</div>
                } else if props.files.is_empty() {
                    <div class="kb-empty">
                        <p>{ "知识库中还没有文件。" }</p>
                        <p>{ "上传 PDF、TXT 或 MD 课程资料，然后点击「构建知识库」。" }</p>
                    </div>
                } else {
                    <div class="file-list">
                        { for props.files.iter().map(|file| {
                            let name = file.name.clone();
                            let is_pending = props.pending_delete.as_deref() == Some(name.as_str());

                            let actions = if is_pending {
                                let confirm_name = name.clone();
                                let on_confirm = props.on_confirm_delete.clone();
                                html! {
                                    <>
                                        <button
                                            class="btn btn-danger"
                                            onclick={Callback::from(move |_| on_confirm.emit(confirm_name.clone()))}
                                        >{ "确认删除" }</button>
                                        <button class="btn" onclick={props.on_cancel_delete.reform(|_| ())}>{ "取消" }</button>
                                    </>
                                }
                            } else {
                                let request_name = name.clone();
                                let on_request = props.on_request_delete.clone();
                                html! {
                                    <button
                                        class="btn btn-danger"
                                        onclick={Callback::from(move |_| on_request.emit(request_name.clone()))}
                                    >{ "删除" }</button>
                                }
                            };

                            html! {
                                <div class="file-row" key={name.clone()}>
                                    <span class="file-name">{ &file.name }</span>
                                    <span class="file-size">{ format_size(file.size) }</span>
                                    <div class="file-actions">{ actions }</div>
                                </div>
                            }
                        })}
                    </div>
                }
            </div>
        </>
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
