use yew::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::components::{
    chat_area::ChatArea, confirm::ConfirmModal, knowledge_base::KnowledgeBase, outline::Outline,
    quiz::Quiz, settings::SettingsPane, sidebar::Sidebar,
};
use crate::models::{ChatAnswer, ChatRequest, Mode, NoticeKind, OutlineRequest, QuizRequest};
use crate::services::api::{ApiError, ApiService};
use crate::services::stream::consume_text_stream;
use crate::services::upload::upload_batch;
use crate::state::{Action, AppState, PendingAction};

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #ffffff;
        --bg-sidebar: #f9f9f9;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #10a37f;
        --accent-hover: #1a7f64;
        --danger-color: #ef4444;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: var(--text-primary); }

    .app-container { display: flex; height: 100vh; overflow: hidden; }
    .main-content { flex-grow: 1; display: flex; flex-direction: column; position: relative; background: var(--bg-app); }
    .header { padding: 10px 20px; border-bottom: 1px solid var(--border-color); display: flex; justify-content: space-between; align-items: center; height: 60px; }
    .header h2 { font-size: 1rem; margin: 0; font-weight: 600; }

    .btn { cursor: pointer; border: 1px solid var(--border-color); background: white; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; transition: all 0.2s; color: var(--text-primary); }
    .btn:hover { background: #f0f0f0; }
    .btn:disabled { opacity: 0.5; cursor: default; }
    .btn-primary { background: var(--accent-color); color: white; border-color: transparent; }
    .btn-primary:hover:not(:disabled) { background: var(--accent-hover); }
    .btn-danger { color: var(--danger-color); border-color: var(--danger-color); }
    .btn-danger:hover { background: #fef2f2; }
    .btn-icon { border: none; background: transparent; font-size: 1.2rem; padding: 5px; color: var(--text-secondary); cursor: pointer; }
    .btn-icon:hover { background: rgba(0,0,0,0.05); color: var(--text-primary); }

    .form-input, .form-select { width: 100%; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; font-family: inherit; margin-bottom: 10px; }
    .form-input:focus { outline: 2px solid var(--accent-color); border-color: transparent; }

    .notice-stack { position: absolute; top: 70px; right: 20px; display: flex; flex-direction: column; gap: 8px; z-index: 50; max-width: 360px; }
    .notice { display: flex; justify-content: space-between; align-items: center; gap: 10px; padding: 10px 14px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); font-size: 0.9rem; }
    .notice.info { background: #ecfdf5; border: 1px solid var(--accent-color); color: #065f46; }
    .notice.error { background: #fef2f2; border: 1px solid var(--danger-color); color: #991b1b; }
    .notice button { border: none; background: none; cursor: pointer; font-size: 1.1rem; line-height: 1; color: inherit; }

    .markdown-body { line-height: 1.6; font-size: 1rem; }
    .markdown-body pre { background: #2d2d2d; color: #fff; padding: 15px; border-radius: 6px; overflow-x: auto; }
    .markdown-body code { background: #f4f4f4; padding: 2px 4px; border-radius: 4px; font-family: monospace; font-size: 0.9em; }
    .markdown-body pre code { background: transparent; color: inherit; }
    .markdown-body p { margin-top: 0; margin-bottom: 1em; }
"#;

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(AppState::default);
    let sidebar_open = use_state(|| true);

    // --- EFFECTS ---

    // Entering the knowledge base or settings always refetches backend
    // truth; the fetched state replaces the local cache wholesale.
    {
        let state = state.clone();
        use_effect_with(state.mode, move |mode| {
            match mode {
                Mode::KnowledgeBase => {
                    let state = state.clone();
                    spawn_local(async move {
                        match ApiService::list_files().await {
                            Ok(files) => state.dispatch(Action::FilesLoaded(files)),
                            Err(e) => state.dispatch(Action::FilesFailed(e.to_string())),
                        }
                    });
                }
                Mode::Settings => {
                    let state = state.clone();
                    spawn_local(async move {
                        match ApiService::get_settings().await {
                            Ok(settings) => state.dispatch(Action::SettingsLoaded(settings)),
                            Err(e) => state.dispatch(Action::SettingsLoadFailed(e.to_string())),
                        }
                    });
                }
                _ => {}
            }
        });
    }

    // --- CHAT ---

    let on_send = {
        let state = state.clone();
        Callback::from(move |text: String| {
            if state.streaming || text.trim().is_empty() {
                return;
            }

            // History snapshot is taken before the new turn is appended;
            // what it contains relative to `query` is the history policy.
            let request = ChatRequest {
                query: text.clone(),
                history: state.chat_history(&text),
            };
            state.dispatch(Action::PushUserMessage(text));
            state.dispatch(Action::BeginAssistantMessage);

            let state = state.clone();
            spawn_local(async move {
                match ApiService::chat(&request).await {
                    Ok(resp) => {
                        if ApiService::is_legacy_json(&resp) {
                            // legacy contract: the whole answer in one JSON object
                            match resp.json::<ChatAnswer>().await {
                                Ok(body) => {
                                    state.dispatch(Action::AppendStreamed(body.answer));
                                    state.dispatch(Action::EndStream);
                                }
                                Err(e) => state.dispatch(Action::ChatFailed(e.to_string())),
                            }
                        } else {
                            let stream = Box::pin(resp.bytes_stream());
                            let result = consume_text_stream(stream, |fragment| {
                                state.dispatch(Action::AppendStreamed(fragment));
                            })
                            .await;
                            match result {
                                Ok(()) => state.dispatch(Action::EndStream),
                                Err(e) => state.dispatch(Action::ChatFailed(
                                    ApiError::Interrupted(e.to_string()).to_string(),
                                )),
                            }
                        }
                    }
                    Err(e) => {
                        web_sys::console::error_1(&format!("chat request failed: {}", e).into());
                        state.dispatch(Action::ChatFailed(e.to_string()));
                    }
                }
            });
        })
    };

    let on_draft = {
        let state = state.clone();
        Callback::from(move |text: String| state.dispatch(Action::SetChatDraft(text)))
    };

    let on_new_conversation = {
        let state = state.clone();
        Callback::from(move |_| state.dispatch(Action::ResetConversation))
    };

    // --- QUIZ ---

    let on_quiz_generate = {
        let state = state.clone();
        Callback::from(move |_| {
            let form = state.quiz.form.clone();
            if state.quiz.loading || form.topic.trim().is_empty() {
                return;
            }
            state.dispatch(Action::QuizDispatched);

            let request = QuizRequest {
                topic: form.topic,
                difficulty: form.difficulty,
                kind: form.kind,
                num_questions: form.count,
            };
            let state = state.clone();
            spawn_local(async move {
                match ApiService::generate_quiz(&request).await {
                    Ok(questions) => state.dispatch(Action::QuizLoaded(questions)),
                    Err(e) => state.dispatch(Action::QuizFailed(e.to_string())),
                }
            });
        })
    };

    // --- OUTLINE ---

    let on_outline_generate = {
        let state = state.clone();
        Callback::from(move |_| {
            if state.outline.loading {
                return;
            }
            state.dispatch(Action::OutlineDispatched);

            // empty topic means "the whole corpus"
            let request = OutlineRequest { topic: state.outline.topic.clone() };
            let state = state.clone();
            spawn_local(async move {
                match ApiService::generate_outline(&request).await {
                    Ok(resp) => {
                        let stream = Box::pin(resp.bytes_stream());
                        let result = consume_text_stream(stream, |fragment| {
                            state.dispatch(Action::OutlineChunk(fragment));
                        })
                        .await;
                        match result {
                            Ok(()) => state.dispatch(Action::OutlineDone),
                            Err(e) => state.dispatch(Action::OutlineFailed(
                                ApiError::Interrupted(e.to_string()).to_string(),
                            )),
                        }
                    }
                    Err(e) => state.dispatch(Action::OutlineFailed(e.to_string())),
                }
            });
        })
    };

    // --- KNOWLEDGE BASE ---

    let on_upload = {
        let state = state.clone();
        Callback::from(move |files: Vec<web_sys::File>| {
            if files.is_empty() || state.kb.uploading {
                return;
            }
            state.dispatch(Action::UploadStarted);

            let state = state.clone();
            spawn_local(async move {
                let mut batch: Vec<(String, Option<Vec<u8>>)> = Vec::new();
                for file in files {
                    let name = file.name();
                    match JsFuture::from(file.array_buffer()).await {
                        Ok(buffer) => {
                            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                            batch.push((name, Some(bytes)));
                        }
                        // a file the browser cannot read still occupies
                        // a slot, so it is counted and the listing still
                        // refreshes after the batch
                        Err(_) => batch.push((name, None)),
                    }
                }

                let resync_state = state.clone();
                let report = upload_batch(
                    batch,
                    |name, bytes| async move {
                        match bytes {
                            Some(bytes) => ApiService::upload_file(&name, bytes).await,
                            None => Err(ApiError::Interrupted("无法读取文件".into())),
                        }
                    },
                    move || async move {
                        match ApiService::list_files().await {
                            Ok(files) => resync_state.dispatch(Action::FilesLoaded(files)),
                            Err(e) => resync_state.dispatch(Action::FilesFailed(e.to_string())),
                        }
                    },
                )
                .await;
                state.dispatch(Action::UploadFinished(report));
            });
        })
    };

    let on_request_delete = {
        let state = state.clone();
        Callback::from(move |name: String| {
            state.dispatch(Action::RequestConfirm(PendingAction::DeleteFile(name)));
        })
    };

    let on_confirm_delete = {
        let state = state.clone();
        Callback::from(move |name: String| {
            state.dispatch(Action::ClearConfirm);
            let state = state.clone();
            spawn_local(async move {
                match ApiService::delete_file(&name).await {
                    Ok(()) => {
                        state.dispatch(Action::DeleteFinished(Ok(name)));
                        match ApiService::list_files().await {
                            Ok(files) => state.dispatch(Action::FilesLoaded(files)),
                            Err(e) => state.dispatch(Action::FilesFailed(e.to_string())),
                        }
                    }
                    Err(e) => state.dispatch(Action::DeleteFinished(Err(e.to_string()))),
                }
            });
        })
    };

    let on_cancel_confirm = {
        let state = state.clone();
        Callback::from(move |_| state.dispatch(Action::ClearConfirm))
    };

    let on_request_rebuild = {
        let state = state.clone();
        Callback::from(move |_| {
            if !state.kb.rebuilding {
                state.dispatch(Action::RequestConfirm(PendingAction::RebuildIndex));
            }
        })
    };

    let on_confirm_rebuild = {
        let state = state.clone();
        Callback::from(move |_| {
            state.dispatch(Action::ClearConfirm);
            state.dispatch(Action::RebuildStarted);
            let state = state.clone();
            spawn_local(async move {
                let result = ApiService::build_kb().await.map_err(|e| e.to_string());
                state.dispatch(Action::RebuildFinished(result));
            });
        })
    };

    // --- SETTINGS ---

    let on_settings_field = {
        let state = state.clone();
        Callback::from(move |(field, raw): (crate::models::SettingsField, String)| {
            state.dispatch(Action::SettingsInput(field, raw));
        })
    };

    let on_settings_save = {
        let state = state.clone();
        Callback::from(move |_| {
            if state.settings.saving {
                return;
            }
            state.dispatch(Action::SettingsSaving);
            // full overwrite: every field goes out, changed or not
            let settings = state.settings.draft.clone();
            let state = state.clone();
            spawn_local(async move {
                let result = ApiService::save_settings(&settings)
                    .await
                    .map_err(|e| e.to_string());
                state.dispatch(Action::SettingsSaved(result));
            });
        })
    };

    let on_select_mode = {
        let state = state.clone();
        Callback::from(move |mode: Mode| state.dispatch(Action::SetMode(mode)))
    };

    let on_dismiss_notice = {
        let state = state.clone();
        Callback::from(move |id: String| state.dispatch(Action::DismissNotice(id)))
    };

    // --- RENDER ---

    let toggle_sidebar = sidebar_open.clone();
    let pending_delete = match &state.pending_confirm {
        Some(PendingAction::DeleteFile(name)) => Some(name.clone()),
        _ => None,
    };
    let rebuild_modal_open = matches!(state.pending_confirm, Some(PendingAction::RebuildIndex));

    let pane = match state.mode {
        Mode::Chat => html! {
            <ChatArea
                messages={state.messages.clone()}
                draft={state.chat_draft.clone()}
                is_streaming={state.streaming}
                on_draft={on_draft}
                on_send={on_send}
            />
        },
        Mode::Quiz => {
            let on_topic = {
                let state = state.clone();
                Callback::from(move |t: String| state.dispatch(Action::QuizTopic(t)))
            };
            let on_difficulty = {
                let state = state.clone();
                Callback::from(move |d| state.dispatch(Action::QuizDifficulty(d)))
            };
            let on_kind = {
                let state = state.clone();
                Callback::from(move |k| state.dispatch(Action::QuizKindSet(k)))
            };
            let on_count = {
                let state = state.clone();
                Callback::from(move |n| state.dispatch(Action::QuizCount(n)))
            };
            html! {
                <Quiz
                    form={state.quiz.form.clone()}
                    questions={state.quiz.questions.clone()}
                    loading={state.quiz.loading}
                    error={state.quiz.error.clone()}
                    on_topic={on_topic}
                    on_difficulty={on_difficulty}
                    on_kind={on_kind}
                    on_count={on_count}
                    on_generate={on_quiz_generate}
                />
            }
        }
        Mode::Outline => {
            let on_topic = {
                let state = state.clone();
                Callback::from(move |t: String| state.dispatch(Action::OutlineTopic(t)))
            };
            html! {
                <Outline
                    topic={state.outline.topic.clone()}
                    content={state.outline.content.clone()}
                    loading={state.outline.loading}
                    error={state.outline.error.clone()}
                    on_topic={on_topic}
                    on_generate={on_outline_generate}
                />
            }
        }
        Mode::KnowledgeBase => html! {
            <KnowledgeBase
                files={state.kb.files.clone()}
                loading={state.kb.loading}
                uploading={state.kb.uploading}
                rebuilding={state.kb.rebuilding}
                pending_delete={pending_delete}
                on_upload={on_upload}
                on_request_delete={on_request_delete}
                on_confirm_delete={on_confirm_delete}
                on_cancel_delete={on_cancel_confirm.clone()}
                on_request_rebuild={on_request_rebuild}
            />
        },
        Mode::Settings => html! {
            <SettingsPane
                settings={state.settings.draft.clone()}
                loading={state.settings.loading}
                saving={state.settings.saving}
                on_field={on_settings_field}
                on_save={on_settings_save}
            />
        },
    };

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class="app-container">
                <Sidebar
                    open={*sidebar_open}
                    active_mode={state.mode}
                    on_select={on_select_mode}
                    on_new_conversation={on_new_conversation}
                />

                <div class="main-content">
                    <div class="header">
                        <div style="display: flex; gap: 10px; align-items: center;">
                            <button class="btn-icon" onclick={Callback::from(move |_| toggle_sidebar.set(!*toggle_sidebar))} title="Toggle Menu">
                                <svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="3" y1="12" x2="21" y2="12"></line><line x1="3" y1="6" x2="21" y2="6"></line><line x1="3" y1="18" x2="21" y2="18"></line></svg>
                            </button>
                            <h2>{ "智能课程助教系统 (RAG)" }</h2>
                        </div>
                    </div>

                    <div class="notice-stack">
                        { for state.notices.iter().map(|notice| {
                            let id = notice.id.clone();
                            let on_dismiss = on_dismiss_notice.clone();
                            let kind_class = match notice.kind {
                                NoticeKind::Info => "info",
                                NoticeKind::Error => "error",
                            };
                            html! {
                                <div class={format!("notice {}", kind_class)} key={notice.id.clone()}>
                                    <span>{ &notice.text }</span>
                                    <button onclick={Callback::from(move |_| on_dismiss.emit(id.clone()))}>{ "×" }</button>
                                </div>
                            }
                        })}
                    </div>

                    if rebuild_modal_open {
                        <ConfirmModal
                            title={"构建知识库".to_string()}
                            body={"重新构建索引会扫描全部资料，可能需要几分钟。确定继续吗？".to_string()}
                            on_confirm={on_confirm_rebuild}
                            on_cancel={on_cancel_confirm}
                        />
                    }

                    { pane }
                </div>
            </div>
        </>
    }
}
