use yew::prelude::*;
use web_sys::HtmlInputElement;

use crate::utils::render_markdown;

#[derive(Properties, PartialEq)]
pub struct OutlineProps {
    pub topic: String,
    pub content: String,
    pub loading: bool,
    pub error: Option<String>,
    pub on_topic: Callback<String>,
    pub on_generate: Callback<()>,
}

#[function_component(Outline)]
pub fn outline(props: &OutlineProps) -> Html {
    let on_topic_input = {
        let cb = props.on_topic.clone();
        Callback::from(move |e: InputEvent| {
            let i: HtmlInputElement = e.target_unchecked_into();
            cb.emit(i.value());
        })
    };

    let on_submit = {
        let cb = props.on_generate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };

    let css = r#"
        .outline-pane { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 20px; }
        .outline-form { display: flex; gap: 10px; align-items: flex-end; background: var(--bg-sidebar); border: 1px solid var(--border-color); border-radius: 8px; padding: 15px; }
        .outline-form .field { display: flex; flex-direction: column; gap: 4px; flex-grow: 1; }
        .outline-form label { font-size: 0.8rem; color: var(--text-secondary); }
        .outline-result { border: 1px solid var(--border-color); border-radius: 8px; padding: 20px; background: white; }
        .outline-error { color: var(--danger-color); background: #fef2f2; border: 1px solid var(--danger-color); border-radius: 6px; padding: 10px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="outline-pane">
                <form class="outline-form" onsubmit={on_submit}>
                    <div class="field">
                        <label>{ "提纲主题（留空则覆盖整个知识库）" }</label>
                        <input
                            class="form-input"
                            type="text"
                            placeholder="例如：Transformer"
                            value={props.topic.clone()}
                            oninput={on_topic_input}
                            style="margin-bottom: 0;"
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled={props.loading}>
                        { if props.loading { "生成中..." } else { "生成提纲" } }
                    </button>
                </form>

                if let Some(err) = &props.error {
                    <div class="outline-error">{ err }</div>
                }

                if !props.content.is_empty() {
                    <div class="outline-result">
                        { render_markdown(&props.content) }
                    </div>
                } else if props.loading {
                    <div style="color: #888; font-style: italic;">{ "正在生成提纲..." }</div>
                }
            </div>
        </>
    }
}
