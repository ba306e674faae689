use std::rc::Rc;

use yew::Reducible;

use crate::models::{
    Difficulty, KbFile, Message, Mode, Notice, QuizKind, QuizQuestion, Settings, SettingsField,
};
use crate::services::upload::UploadReport;

/// Which `history` the chat request carries relative to the user message
/// being sent. `PriorTurns` snapshots the conversation before the new
/// turn is appended, which is what the backend's `{query, history}`
/// contract expects; `IncludeCurrent` repeats the query at the end of
/// the history as well.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HistoryPolicy {
    PriorTurns,
    IncludeCurrent,
}

/// What happens to a completion that arrives after the user has switched
/// away from the mode that issued it. `ApplyAlways` lets the late write
/// land (no cancellation exists anywhere); `DropStale` discards the
/// payload but still releases the loading flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompletionPolicy {
    ApplyAlways,
    DropStale,
}

/// A destructive operation waiting for its second, explicit affirmation.
/// While parked here it has caused zero side effects.
#[derive(Clone, PartialEq, Debug)]
pub enum PendingAction {
    RebuildIndex,
    DeleteFile(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct QuizForm {
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuizKind,
    pub count: u8,
}

impl Default for QuizForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::Simple,
            kind: QuizKind::Choice,
            count: 1,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct QuizState {
    pub form: QuizForm,
    pub questions: Vec<QuizQuestion>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct OutlineState {
    pub topic: String,
    pub content: String,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct KbState {
    pub files: Vec<KbFile>,
    pub loading: bool,
    pub uploading: bool,
    pub rebuilding: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SettingsState {
    pub draft: Settings,
    pub loaded: bool,
    pub loading: bool,
    pub saving: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            draft: Settings::default(),
            loaded: false,
            loading: false,
            saving: false,
        }
    }
}

/// Single source of truth for everything the screens render. All
/// mutation goes through [`Action`]; components and async completions
/// never touch fields directly.
#[derive(Clone, PartialEq, Debug)]
pub struct AppState {
    pub mode: Mode,
    pub messages: Vec<Message>,
    pub chat_draft: String,
    pub streaming: bool,
    /// Index of the in-flight placeholder message. Invariant: while set,
    /// it refers to the last element of `messages`, and exactly one
    /// placeholder exists.
    stream_target: Option<usize>,
    pub quiz: QuizState,
    pub outline: OutlineState,
    pub kb: KbState,
    pub settings: SettingsState,
    pub pending_confirm: Option<PendingAction>,
    pub notices: Vec<Notice>,
    pub history_policy: HistoryPolicy,
    pub completion_policy: CompletionPolicy,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Chat,
            messages: Vec::new(),
            chat_draft: String::new(),
            streaming: false,
            stream_target: None,
            quiz: QuizState::default(),
            outline: OutlineState::default(),
            kb: KbState::default(),
            settings: SettingsState::default(),
            pending_confirm: None,
            notices: Vec::new(),
            history_policy: HistoryPolicy::PriorTurns,
            completion_policy: CompletionPolicy::ApplyAlways,
        }
    }
}

pub enum Action {
    SetMode(Mode),

    // chat
    SetChatDraft(String),
    PushUserMessage(String),
    BeginAssistantMessage,
    AppendStreamed(String),
    EndStream,
    ChatFailed(String),
    ResetConversation,

    // quiz
    QuizTopic(String),
    QuizDifficulty(Difficulty),
    QuizKindSet(QuizKind),
    QuizCount(u8),
    QuizDispatched,
    QuizLoaded(Vec<QuizQuestion>),
    QuizFailed(String),

    // outline
    OutlineTopic(String),
    OutlineDispatched,
    OutlineChunk(String),
    OutlineDone,
    OutlineFailed(String),

    // knowledge base
    FilesLoaded(Vec<KbFile>),
    FilesFailed(String),
    UploadStarted,
    UploadFinished(UploadReport),
    RebuildStarted,
    RebuildFinished(Result<String, String>),
    DeleteFinished(Result<String, String>),

    // confirmation gate
    RequestConfirm(PendingAction),
    ClearConfirm,

    // settings
    SettingsLoaded(Settings),
    SettingsLoadFailed(String),
    SettingsInput(SettingsField, String),
    SettingsSaving,
    SettingsSaved(Result<String, String>),

    // notices
    PushNotice(Notice),
    DismissNotice(String),
}

impl AppState {
    /// History for the next chat request, taken from the conversation as
    /// it stands before the new user turn is appended.
    pub fn chat_history(&self, query: &str) -> Vec<Message> {
        let mut history = self.messages.clone();
        if let HistoryPolicy::IncludeCurrent = self.history_policy {
            history.push(Message::user(query));
        }
        history
    }

    fn stale(&self, owner: Mode) -> bool {
        self.completion_policy == CompletionPolicy::DropStale && self.mode != owner
    }

    fn close_stream(&mut self) {
        self.stream_target = None;
        self.streaming = false;
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            Action::SetMode(mode) => {
                next.mode = mode;
                // entering these modes always refetches backend truth;
                // the fetch itself runs as an effect in app.rs
                match mode {
                    Mode::KnowledgeBase => next.kb.loading = true,
                    Mode::Settings => next.settings.loading = true,
                    _ => {}
                }
            }

            Action::SetChatDraft(text) => next.chat_draft = text,
            Action::PushUserMessage(text) => {
                if !text.trim().is_empty() && !next.streaming {
                    next.messages.push(Message::user(text));
                    next.chat_draft.clear();
                }
            }
            Action::BeginAssistantMessage => {
                // at most one streamed message in flight
                if next.stream_target.is_none() {
                    next.messages.push(Message::assistant(""));
                    next.stream_target = Some(next.messages.len() - 1);
                    next.streaming = true;
                }
            }
            Action::AppendStreamed(fragment) => {
                if !next.stale(Mode::Chat) {
                    // the handle must refer to the current last element
                    if let Some(idx) = next.stream_target {
                        if idx + 1 == next.messages.len() {
                            next.messages[idx].content.push_str(&fragment);
                        }
                    }
                }
            }
            Action::EndStream => next.close_stream(),
            Action::ChatFailed(text) => {
                if !next.stale(Mode::Chat) {
                    if let Some(idx) = next.stream_target {
                        if idx + 1 == next.messages.len() {
                            let slot = &mut next.messages[idx].content;
                            if slot.is_empty() {
                                *slot = format!("出错啦: {}", text);
                            } else {
                                slot.push_str(&format!("\n\n⚠ 出错啦: {}", text));
                            }
                        }
                    }
                }
                next.close_stream();
            }
            Action::ResetConversation => {
                next.messages.clear();
                next.close_stream();
            }

            Action::QuizTopic(topic) => next.quiz.form.topic = topic,
            Action::QuizDifficulty(d) => next.quiz.form.difficulty = d,
            Action::QuizKindSet(k) => next.quiz.form.kind = k,
            Action::QuizCount(n) => next.quiz.form.count = n.clamp(1, 10),
            Action::QuizDispatched => {
                if !next.quiz.loading {
                    // the stale result must be gone before the request leaves
                    next.quiz.questions.clear();
                    next.quiz.error = None;
                    next.quiz.loading = true;
                }
            }
            Action::QuizLoaded(questions) => {
                if !next.stale(Mode::Quiz) {
                    next.quiz.questions = questions;
                }
                next.quiz.loading = false;
            }
            Action::QuizFailed(text) => {
                next.quiz.loading = false;
                if !next.stale(Mode::Quiz) {
                    next.quiz.error = Some(text);
                }
            }

            Action::OutlineTopic(topic) => next.outline.topic = topic,
            Action::OutlineDispatched => {
                if !next.outline.loading {
                    next.outline.content.clear();
                    next.outline.error = None;
                    next.outline.loading = true;
                }
            }
            Action::OutlineChunk(fragment) => {
                if next.outline.loading && !next.stale(Mode::Outline) {
                    next.outline.content.push_str(&fragment);
                }
            }
            Action::OutlineDone => next.outline.loading = false,
            Action::OutlineFailed(text) => {
                next.outline.loading = false;
                if !next.stale(Mode::Outline) {
                    if next.outline.content.is_empty() {
                        next.outline.error = Some(text);
                    } else {
                        // keep the partial content, mark the break in place
                        next.outline.content.push_str(&format!("\n\n⚠ {}", text));
                    }
                }
            }

            Action::FilesLoaded(files) => {
                // full replacement, never a merge
                next.kb.files = files;
                next.kb.loading = false;
            }
            Action::FilesFailed(text) => {
                next.kb.loading = false;
                next.notices.push(Notice::error(text));
            }
            Action::UploadStarted => next.kb.uploading = true,
            Action::UploadFinished(report) => {
                next.kb.uploading = false;
                let text = format!(
                    "上传完成：成功 {} 个，失败 {} 个",
                    report.success_count, report.fail_count
                );
                next.notices.push(if report.fail_count > 0 {
                    Notice::error(text)
                } else {
                    Notice::info(text)
                });
            }
            Action::RebuildStarted => next.kb.rebuilding = true,
            Action::RebuildFinished(result) => {
                next.kb.rebuilding = false;
                next.notices.push(match result {
                    Ok(msg) => Notice::info(msg),
                    Err(e) => Notice::error(e),
                });
            }
            Action::DeleteFinished(result) => {
                next.notices.push(match result {
                    Ok(name) => Notice::info(format!("已删除 {}", name)),
                    Err(e) => Notice::error(e),
                });
            }

            Action::RequestConfirm(pending) => next.pending_confirm = Some(pending),
            Action::ClearConfirm => next.pending_confirm = None,

            Action::SettingsLoaded(settings) => {
                next.settings.draft = settings;
                next.settings.loaded = true;
                next.settings.loading = false;
            }
            Action::SettingsLoadFailed(text) => {
                next.settings.loading = false;
                next.notices.push(Notice::error(text));
            }
            Action::SettingsInput(field, raw) => {
                if !next.settings.draft.apply_field(field, &raw) {
                    next.notices
                        .push(Notice::error(format!("「{}」不是有效的整数", raw)));
                }
            }
            Action::SettingsSaving => next.settings.saving = true,
            Action::SettingsSaved(result) => {
                next.settings.saving = false;
                next.notices.push(match result {
                    Ok(msg) => Notice::info(msg),
                    Err(e) => Notice::error(e),
                });
            }

            Action::PushNotice(notice) => next.notices.push(notice),
            Action::DismissNotice(id) => next.notices.retain(|n| n.id != id),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: AppState, action: Action) -> AppState {
        let rc = Rc::new(state).reduce(action);
        (*rc).clone()
    }

    fn reduce_all(state: AppState, actions: Vec<Action>) -> AppState {
        actions.into_iter().fold(state, reduce)
    }

    #[test]
    fn whitespace_only_input_is_ignored() {
        let s = reduce(AppState::default(), Action::PushUserMessage("   \n\t".into()));
        assert!(s.messages.is_empty());

        let s = reduce(s, Action::PushUserMessage("什么是注意力机制？".into()));
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].content, "什么是注意力机制？");
    }

    #[test]
    fn exactly_one_placeholder_between_begin_and_end() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::BeginAssistantMessage, // second begin is guarded
            ],
        );
        assert_eq!(s.messages.len(), 2);
        assert!(s.streaming);

        let empty_assistants = s
            .messages
            .iter()
            .filter(|m| m.role == crate::models::Role::Assistant && m.content.is_empty())
            .count();
        assert_eq!(empty_assistants, 1);

        let s = reduce(s, Action::EndStream);
        assert!(!s.streaming);
    }

    #[test]
    fn streamed_content_grows_monotonically_in_order() {
        let mut s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("什么是注意力机制？".into()),
                Action::BeginAssistantMessage,
            ],
        );
        s = reduce(s, Action::AppendStreamed("注意力".into()));
        assert_eq!(s.messages.last().unwrap().content, "注意力");
        s = reduce(s, Action::AppendStreamed("机制是一种...".into()));
        assert_eq!(s.messages.last().unwrap().content, "注意力机制是一种...");
    }

    #[test]
    fn append_after_reset_lands_nowhere() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::ResetConversation,
                Action::AppendStreamed("late".into()),
            ],
        );
        assert!(s.messages.is_empty());
        assert!(!s.streaming);
    }

    #[test]
    fn resubmission_is_blocked_while_streaming() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("one".into()),
                Action::BeginAssistantMessage,
                Action::PushUserMessage("two".into()),
            ],
        );
        assert_eq!(s.messages.len(), 2);
    }

    #[test]
    fn chat_failure_keeps_partial_content() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::AppendStreamed("部分内容".into()),
                Action::ChatFailed("connection reset".into()),
            ],
        );
        let last = &s.messages.last().unwrap().content;
        assert!(last.starts_with("部分内容"));
        assert!(last.contains("出错啦: connection reset"));
        assert!(!s.streaming);
    }

    #[test]
    fn chat_failure_without_partial_is_an_error_message() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::ChatFailed("后端服务不可用".into()),
            ],
        );
        assert_eq!(s.messages.last().unwrap().content, "出错啦: 后端服务不可用");
    }

    #[test]
    fn history_policy_prior_turns_excludes_current_query() {
        let mut s = AppState::default();
        s.messages = vec![Message::user("q1"), Message::assistant("a1")];

        let history = s.chat_history("q2");
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().content, "a1");
    }

    #[test]
    fn history_policy_include_current_appends_query() {
        let mut s = AppState::default();
        s.history_policy = HistoryPolicy::IncludeCurrent;
        s.messages = vec![Message::user("q1"), Message::assistant("a1")];

        let history = s.chat_history("q2");
        assert_eq!(history.len(), 3);
        assert_eq!(history.last().unwrap().content, "q2");
    }

    #[test]
    fn empty_history_for_first_turn() {
        let s = AppState::default();
        assert!(s.chat_history("什么是注意力机制？").is_empty());
    }

    #[test]
    fn mode_switch_preserves_other_modes_state() {
        let mut s = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hello".into()),
                Action::OutlineTopic("transformer".into()),
                Action::QuizTopic("attention".into()),
            ],
        );
        s = reduce(s, Action::SetMode(Mode::KnowledgeBase));
        s = reduce(s, Action::SetMode(Mode::Quiz));

        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.outline.topic, "transformer");
        assert_eq!(s.quiz.form.topic, "attention");
    }

    #[test]
    fn entering_kb_and_settings_marks_refresh() {
        let s = reduce(AppState::default(), Action::SetMode(Mode::KnowledgeBase));
        assert!(s.kb.loading);
        let s = reduce(s, Action::SetMode(Mode::Settings));
        assert!(s.settings.loading);
    }

    fn question(id: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            kind: QuizKind::Choice,
            question: "?".into(),
            options: Some(vec!["A".into(), "B".into()]),
            answer: "A".into(),
            explanation: "e".into(),
            source: "s".into(),
        }
    }

    #[test]
    fn quiz_slot_is_empty_at_dispatch_instant() {
        let mut s = reduce(AppState::default(), Action::QuizLoaded(vec![question("old")]));
        assert_eq!(s.quiz.questions.len(), 1);

        s = reduce(s, Action::QuizDispatched);
        assert!(s.quiz.questions.is_empty());
        assert!(s.quiz.loading);

        s = reduce(s, Action::QuizLoaded(vec![question("new")]));
        assert_eq!(s.quiz.questions[0].id, "new");
        assert!(!s.quiz.loading);
    }

    #[test]
    fn quiz_failure_leaves_slot_empty() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::QuizDispatched,
                Action::QuizFailed("缺少 questions 字段".into()),
            ],
        );
        assert!(s.quiz.questions.is_empty());
        assert_eq!(s.quiz.error.as_deref(), Some("缺少 questions 字段"));
        assert!(!s.quiz.loading);
    }

    #[test]
    fn quiz_count_clamped_to_valid_range() {
        let s = reduce(AppState::default(), Action::QuizCount(0));
        assert_eq!(s.quiz.form.count, 1);
        let s = reduce(s, Action::QuizCount(10));
        assert_eq!(s.quiz.form.count, 10);
        let s = reduce(s, Action::QuizCount(99));
        assert_eq!(s.quiz.form.count, 10);
    }

    #[test]
    fn outline_cleared_before_dispatch_and_streams_in_order() {
        let mut s = reduce_all(
            AppState::default(),
            vec![
                Action::OutlineDispatched,
                Action::OutlineChunk("# 第一章".into()),
                Action::OutlineDone,
            ],
        );
        assert_eq!(s.outline.content, "# 第一章");

        s = reduce(s, Action::OutlineDispatched);
        assert!(s.outline.content.is_empty());
        s = reduce_all(
            s,
            vec![
                Action::OutlineChunk("# 第".into()),
                Action::OutlineChunk("二章".into()),
                Action::OutlineDone,
            ],
        );
        assert_eq!(s.outline.content, "# 第二章");
    }

    #[test]
    fn outline_midstream_failure_keeps_partial_with_marker() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::OutlineDispatched,
                Action::OutlineChunk("# 提纲".into()),
                Action::OutlineFailed("响应中断".into()),
            ],
        );
        assert!(s.outline.content.starts_with("# 提纲"));
        assert!(s.outline.content.contains("⚠ 响应中断"));
        assert!(!s.outline.loading);
    }

    #[test]
    fn late_outline_chunk_after_done_is_dropped() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::OutlineDispatched,
                Action::OutlineChunk("a".into()),
                Action::OutlineDone,
                Action::OutlineChunk("late".into()),
            ],
        );
        assert_eq!(s.outline.content, "a");
    }

    #[test]
    fn file_listing_is_replaced_not_merged() {
        let old = vec![
            KbFile { name: "old1.pdf".into(), size: 10 },
            KbFile { name: "old2.pdf".into(), size: 20 },
        ];
        let new = vec![KbFile { name: "new.pdf".into(), size: 30 }];

        let s = reduce(AppState::default(), Action::FilesLoaded(old));
        let s = reduce(s, Action::FilesLoaded(new));
        assert_eq!(s.kb.files.len(), 1);
        assert_eq!(s.kb.files[0].name, "new.pdf");
    }

    #[test]
    fn upload_report_becomes_one_aggregate_notice() {
        let s = reduce(
            AppState::default(),
            Action::UploadFinished(UploadReport { success_count: 2, fail_count: 1 }),
        );
        assert_eq!(s.notices.len(), 1);
        assert!(s.notices[0].text.contains("成功 2"));
        assert!(s.notices[0].text.contains("失败 1"));
        assert_eq!(s.notices[0].kind, crate::models::NoticeKind::Error);
    }

    #[test]
    fn confirm_gate_cancel_has_zero_side_effects() {
        let base = reduce_all(
            AppState::default(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::FilesLoaded(vec![KbFile { name: "lecture1.pdf".into(), size: 1 }]),
            ],
        );

        let pending = reduce(
            base.clone(),
            Action::RequestConfirm(PendingAction::DeleteFile("lecture1.pdf".into())),
        );
        assert_eq!(
            pending.pending_confirm,
            Some(PendingAction::DeleteFile("lecture1.pdf".into()))
        );

        let cancelled = reduce(pending, Action::ClearConfirm);
        // back to exactly where we started
        assert_eq!(cancelled, base);
    }

    #[test]
    fn settings_input_coerces_and_flags_junk() {
        let s = reduce(
            AppState::default(),
            Action::SettingsInput(SettingsField::TopK, "5".into()),
        );
        assert_eq!(s.settings.draft.top_k, 5);
        assert!(s.notices.is_empty());

        let s = reduce(s, Action::SettingsInput(SettingsField::TopK, "abc".into()));
        assert_eq!(s.settings.draft.top_k, 5);
        assert_eq!(s.notices.len(), 1);
    }

    #[test]
    fn notices_can_be_dismissed_by_id() {
        let s = reduce(AppState::default(), Action::PushNotice(Notice::info("ok")));
        let id = s.notices[0].id.clone();
        let s = reduce(s, Action::DismissNotice(id));
        assert!(s.notices.is_empty());
    }

    #[test]
    fn drop_stale_discards_completions_for_inactive_modes() {
        let mut s = AppState::default();
        s.completion_policy = CompletionPolicy::DropStale;

        // quiz completes after the user moved to chat
        let s2 = reduce_all(
            s.clone(),
            vec![
                Action::SetMode(Mode::Quiz),
                Action::QuizDispatched,
                Action::SetMode(Mode::Chat),
                Action::QuizLoaded(vec![question("q")]),
            ],
        );
        assert!(s2.quiz.questions.is_empty());
        assert!(!s2.quiz.loading, "flag released even when payload dropped");

        // outline chunk arrives after leaving outline
        let s3 = reduce_all(
            s.clone(),
            vec![
                Action::SetMode(Mode::Outline),
                Action::OutlineDispatched,
                Action::SetMode(Mode::Settings),
                Action::OutlineChunk("late".into()),
            ],
        );
        assert!(s3.outline.content.is_empty());

        // chat fragment arrives after leaving chat
        s.mode = Mode::Chat;
        let s4 = reduce_all(
            s,
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::SetMode(Mode::Quiz),
                Action::AppendStreamed("late".into()),
            ],
        );
        assert_eq!(s4.messages.last().unwrap().content, "");
    }

    #[test]
    fn drop_stale_discards_failures_for_inactive_modes() {
        let mut s = AppState::default();
        s.completion_policy = CompletionPolicy::DropStale;

        // chat error lands after the user moved to quiz
        s.mode = Mode::Chat;
        let s2 = reduce_all(
            s.clone(),
            vec![
                Action::PushUserMessage("hi".into()),
                Action::BeginAssistantMessage,
                Action::SetMode(Mode::Quiz),
                Action::ChatFailed("boom".into()),
            ],
        );
        assert_eq!(s2.messages.last().unwrap().content, "");
        assert!(!s2.streaming, "stream closed even when the text is dropped");

        // quiz error after leaving quiz
        let s3 = reduce_all(
            s.clone(),
            vec![
                Action::SetMode(Mode::Quiz),
                Action::QuizDispatched,
                Action::SetMode(Mode::Chat),
                Action::QuizFailed("boom".into()),
            ],
        );
        assert!(s3.quiz.error.is_none());
        assert!(!s3.quiz.loading);

        // outline error after leaving outline, with partial content present
        let s4 = reduce_all(
            s,
            vec![
                Action::SetMode(Mode::Outline),
                Action::OutlineDispatched,
                Action::OutlineChunk("部分".into()),
                Action::SetMode(Mode::Settings),
                Action::OutlineFailed("boom".into()),
            ],
        );
        assert_eq!(s4.outline.content, "部分");
        assert!(s4.outline.error.is_none());
        assert!(!s4.outline.loading);
    }

    #[test]
    fn apply_always_lets_late_completions_land() {
        let s = reduce_all(
            AppState::default(),
            vec![
                Action::SetMode(Mode::Quiz),
                Action::QuizDispatched,
                Action::SetMode(Mode::Chat),
                Action::QuizLoaded(vec![question("q")]),
            ],
        );
        assert_eq!(s.quiz.questions.len(), 1);
    }
}
