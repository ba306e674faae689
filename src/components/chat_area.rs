use yew::prelude::*;
use web_sys::{HtmlElement, HtmlTextAreaElement};

use crate::models::{Message, Role};
use crate::utils::render_markdown;

#[derive(Properties, PartialEq)]
pub struct ChatAreaProps {
    pub messages: Vec<Message>,
    pub draft: String,
    pub is_streaming: bool,
    pub on_draft: Callback<String>,
    pub on_send: Callback<String>,
}

#[function_component(ChatArea)]
pub fn chat_area(props: &ChatAreaProps) -> Html {
    let scroll_ref = use_node_ref();

    // Track if the user is currently at the bottom of the chat
    let is_at_bottom = use_state(|| true);

    // Auto-scroll effect: follow the stream while the user stays at the bottom
    {
        let div_ref = scroll_ref.clone();
        let is_at_bottom_val = *is_at_bottom;
        let last_len = props.messages.last().map(|m| m.content.len()).unwrap_or(0);
        let len = props.messages.len();

        use_effect_with((len, last_len), move |_| {
            if is_at_bottom_val {
                if let Some(div) = div_ref.cast::<HtmlElement>() {
                    div.set_scroll_top(div.scroll_height());
                }
            }
        });
    }

    let on_scroll = {
        let is_at_bottom = is_at_bottom.clone();
        Callback::from(move |e: Event| {
            let div: HtmlElement = e.target_unchecked_into();
            let distance_from_bottom = div.scroll_height() - div.scroll_top() - div.client_height();
            let currently_at_bottom = distance_from_bottom < 35;

            if *is_at_bottom != currently_at_bottom {
                is_at_bottom.set(currently_at_bottom);
            }
        })
    };

    let on_submit = {
        let draft = props.draft.clone();
        let on_send = props.on_send.clone();
        let is_at_bottom = is_at_bottom.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !draft.trim().is_empty() {
                on_send.emit(draft.clone());
                is_at_bottom.set(true);
            }
        })
    };

    let on_keydown = {
        let draft = props.draft.clone();
        let on_send = props.on_send.clone();
        let is_at_bottom = is_at_bottom.clone();

        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                if !draft.trim().is_empty() {
                    on_send.emit(draft.clone());
                    is_at_bottom.set(true);
                }
            }
        })
    };

    let on_input = {
        let on_draft = props.on_draft.clone();
        Callback::from(move |e: InputEvent| {
            let i: HtmlTextAreaElement = e.target_unchecked_into();
            on_draft.emit(i.value());
        })
    };

    let css = r#"
        .messages-container {
            flex-grow: 1;
            overflow-y: auto;
            padding: 20px;
            display: flex;
            flex-direction: column;
            gap: 15px;
            background-color: #ffffff;
            scroll-behavior: smooth;
        }

        .message-row { display: flex; width: 100%; }
        .message-row.user { justify-content: flex-end; }
        .message-row.assistant { justify-content: flex-start; }

        .bubble-group { display: flex; gap: 10px; max-width: 85%; align-items: flex-end; }
        .message-row.user .bubble-group { flex-direction: row-reverse; }

        .avatar { width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; flex-shrink: 0; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .avatar.user { background: #555; color: white; }
        .avatar.assistant { background: var(--accent-color); color: white; }

        .msg-bubble {
            padding: 10px 15px;
            border-radius: 12px;
            font-size: 0.95rem;
            line-height: 1.5;
            box-shadow: 0 1px 2px rgba(0,0,0,0.05);
            min-width: 0;
            overflow-wrap: anywhere;
            word-break: break-word;
            max-width: 100%;
        }

        .message-row.user .msg-bubble { background-color: #e3f2fd; color: #1565c0; border-bottom-right-radius: 2px; }
        .message-row.assistant .msg-bubble { background-color: #f5f5f5; color: #333; border-bottom-left-radius: 2px; }

        .welcome-hint { text-align: center; color: var(--text-secondary); margin-top: 40px; }

        .input-wrapper { border-top: 1px solid var(--border-color); padding: 20px; display: flex; justify-content: center; background: white; position: relative; }
        .input-container { width: 100%; max-width: 900px; position: relative; display: flex; flex-direction: column; }
        .chat-input { width: 100%; padding: 12px; padding-right: 45px; border: 1px solid var(--border-color); border-radius: 8px; box-shadow: 0 2px 5px rgba(0,0,0,0.05); resize: none; font-family: inherit; outline: none; transition: border 0.2s; }
        .chat-input:focus { border-color: var(--accent-color); box-shadow: 0 0 0 2px rgba(16, 163, 127, 0.1); }
        .send-btn { position: absolute; right: 8px; bottom: 8px; background: var(--accent-color); color: white; border: none; border-radius: 4px; padding: 6px 10px; cursor: pointer; transition: opacity 0.2s; }
        .send-btn:disabled { background: #ccc; cursor: default; }
        .send-btn:hover:not(:disabled) { background: var(--accent-hover); }
    "#;

    let user_icon = html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"></path>
            <circle cx="12" cy="7" r="4"></circle>
        </svg>
    };
    let bot_icon = html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <rect x="3" y="11" width="18" height="10" rx="2"></rect>
            <circle cx="12" cy="5" r="2"></circle>
            <path d="M12 7v4"></path>
            <line x1="8" y1="16" x2="8" y2="16"></line>
            <line x1="16" y1="16" x2="16" y2="16"></line>
        </svg>
    };

    html! {
        <>
            <style>{ css }</style>

            <div class="messages-container" ref={scroll_ref} onscroll={on_scroll}>
                if props.messages.is_empty() {
                    <div class="welcome-hint">
                        <p>{ "欢迎使用！请先在「知识库」中上传课程资料并构建索引，然后开始提问。" }</p>
                    </div>
                }

                { for props.messages.iter().map(|msg| {
                    let (role_cls, icon) = match msg.role {
                        Role::User => ("user", user_icon.clone()),
                        Role::Assistant => ("assistant", bot_icon.clone()),
                    };

                    html! {
                        <div class={format!("message-row {}", role_cls)}>
                            <div class="bubble-group">
                                <div class={format!("avatar {}", role_cls)}>{ icon }</div>
                                <div class="msg-bubble">{ render_markdown(&msg.content) }</div>
                            </div>
                        </div>
                    }
                })}

                if props.is_streaming && props.messages.last().map(|m| m.content.is_empty()).unwrap_or(false) {
                    <div class="message-row assistant">
                        <div class="bubble-group">
                            <div class="msg-bubble" style="color: #888; font-style: italic;">
                                { "思考中..." }
                            </div>
                        </div>
                    </div>
                }
            </div>

            <div class="input-wrapper">
                <form class="input-container" onsubmit={on_submit}>
                    <textarea
                        class="chat-input"
                        rows="1"
                        placeholder="请输入您的问题..."
                        value={props.draft.clone()}
                        oninput={on_input}
                        onkeydown={on_keydown}
                        disabled={props.is_streaming}
                        style="height: 50px; overflow-y: hidden;"
                    />
                    <button type="submit" class="send-btn" disabled={props.is_streaming || props.draft.trim().is_empty()}>
                        { "发送" }
                    </button>
                </form>
            </div>
        </>
    }
}
