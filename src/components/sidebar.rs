use yew::prelude::*;
use crate::models::Mode;

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub open: bool,
    pub active_mode: Mode,
    pub on_select: Callback<Mode>,
    pub on_new_conversation: Callback<()>,
}

const MODES: [(Mode, &str); 5] = [
    (Mode::Chat, "问答"),
    (Mode::Quiz, "出题"),
    (Mode::Outline, "提纲"),
    (Mode::KnowledgeBase, "知识库"),
    (Mode::Settings, "设置"),
];

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let width = if props.open { "220px" } else { "0px" };

    // CSS for this specific component
    let css = r#"
        .sidebar { background: var(--bg-sidebar); border-right: 1px solid var(--border-color); display: flex; flex-direction: column; transition: width 0.3s cubic-bezier(0.25, 0.8, 0.25, 1); overflow: hidden; flex-shrink: 0; }
        .sidebar-content { width: 220px; height: 100%; display: flex; flex-direction: column; padding: 10px; }
        .mode-list { flex-grow: 1; overflow-y: auto; margin-top: 10px; }
        .mode-item { padding: 10px; border-radius: 6px; cursor: pointer; display: flex; align-items: center; gap: 8px; margin-bottom: 2px; font-size: 0.9rem; color: var(--text-primary); }
        .mode-item:hover { background: #eaeaeb; }
        .mode-item.active { background: #e0e0e0; font-weight: 500; }
        .new-conv-btn { width: 100%; padding: 10px; border: 1px solid var(--border-color); background: white; border-radius: 6px; cursor: pointer; text-align: left; display: flex; gap: 10px; transition: background 0.2s; }
        .new-conv-btn:hover { background: #f0f0f0; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="sidebar" style={format!("width: {};", width)}>
                <div class="sidebar-content">
                    <button class="new-conv-btn" onclick={props.on_new_conversation.reform(|_| ())}>
                        <span>{ "+" }</span>
                        <span>{ "新对话" }</span>
                    </button>
                    <div class="mode-list">
                        { for MODES.iter().map(|(mode, label)| {
                            let mode = *mode;
                            let is_active = mode == props.active_mode;
                            let active_class = if is_active { "active" } else { "" };
                            let on_sel = props.on_select.clone();

                            html! {
                                <div
                                    class={format!("mode-item {}", active_class)}
                                    onclick={Callback::from(move |_| {
                                        if !is_active { on_sel.emit(mode); }
                                    })}
                                >
                                    <span>{ *label }</span>
                                </div>
                            }
                        })}
                    </div>
                </div>
            </div>
        </>
    }
}
