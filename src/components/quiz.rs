use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use crate::models::{Difficulty, QuizKind, QuizQuestion};
use crate::state::QuizForm;

#[derive(Properties, PartialEq)]
pub struct QuizProps {
    pub form: QuizForm,
    pub questions: Vec<QuizQuestion>,
    pub loading: bool,
    pub error: Option<String>,
    pub on_topic: Callback<String>,
    pub on_difficulty: Callback<Difficulty>,
    pub on_kind: Callback<QuizKind>,
    pub on_count: Callback<u8>,
    pub on_generate: Callback<()>,
}

#[function_component(Quiz)]
pub fn quiz(props: &QuizProps) -> Html {
    let on_topic_input = {
        let cb = props.on_topic.clone();
        Callback::from(move |e: InputEvent| {
            let i: HtmlInputElement = e.target_unchecked_into();
            cb.emit(i.value());
        })
    };

    let on_difficulty_change = {
        let cb = props.on_difficulty.clone();
        Callback::from(move |e: Event| {
            let s: HtmlSelectElement = e.target_unchecked_into();
            cb.emit(if s.value() == "hard" { Difficulty::Hard } else { Difficulty::Simple });
        })
    };

    let on_kind_change = {
        let cb = props.on_kind.clone();
        Callback::from(move |e: Event| {
            let s: HtmlSelectElement = e.target_unchecked_into();
            cb.emit(if s.value() == "short-answer" { QuizKind::ShortAnswer } else { QuizKind::Choice });
        })
    };

    let on_count_change = {
        let cb = props.on_count.clone();
        Callback::from(move |e: Event| {
            let i: HtmlInputElement = e.target_unchecked_into();
            if let Ok(n) = i.value().parse::<u8>() {
                cb.emit(n);
            }
        })
    };

    let on_submit = {
        let cb = props.on_generate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };

    // empty topic never reaches the backend
    let blocked = props.loading || props.form.topic.trim().is_empty();

    let css = r#"
        .quiz-pane { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 20px; }
        .quiz-form { display: flex; gap: 10px; flex-wrap: wrap; align-items: flex-end; background: var(--bg-sidebar); border: 1px solid var(--border-color); border-radius: 8px; padding: 15px; }
        .quiz-form .field { display: flex; flex-direction: column; gap: 4px; }
        .quiz-form .field.grow { flex-grow: 1; min-width: 200px; }
        .quiz-form label { font-size: 0.8rem; color: var(--text-secondary); }
        .question-card { border: 1px solid var(--border-color); border-radius: 8px; padding: 15px; background: white; }
        .question-card h4 { margin: 0 0 10px 0; font-size: 1rem; }
        .question-card ul { margin: 0 0 10px 0; padding-left: 20px; }
        .question-card .answer { color: var(--accent-color); font-weight: 600; }
        .question-card .explanation { color: var(--text-secondary); font-size: 0.9rem; margin-top: 6px; }
        .question-card .source { color: var(--text-secondary); font-size: 0.8rem; margin-top: 6px; font-style: italic; }
        .quiz-error { color: var(--danger-color); background: #fef2f2; border: 1px solid var(--danger-color); border-radius: 6px; padding: 10px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="quiz-pane">
                <form class="quiz-form" onsubmit={on_submit}>
                    <div class="field grow">
                        <label>{ "出题主题" }</label>
                        <input
                            class="form-input"
                            type="text"
                            placeholder="例如：注意力机制"
                            value={props.form.topic.clone()}
                            oninput={on_topic_input}
                            style="margin-bottom: 0;"
                        />
                    </div>
                    <div class="field">
                        <label>{ "难度" }</label>
                        <select class="form-select" onchange={on_difficulty_change} style="margin-bottom: 0;">
                            <option value="simple" selected={props.form.difficulty == Difficulty::Simple}>{ "简单" }</option>
                            <option value="hard" selected={props.form.difficulty == Difficulty::Hard}>{ "困难" }</option>
                        </select>
                    </div>
                    <div class="field">
                        <label>{ "题型" }</label>
                        <select class="form-select" onchange={on_kind_change} style="margin-bottom: 0;">
                            <option value="choice" selected={props.form.kind == QuizKind::Choice}>{ "选择题" }</option>
                            <option value="short-answer" selected={props.form.kind == QuizKind::ShortAnswer}>{ "简答题" }</option>
                        </select>
                    </div>
                    <div class="field">
                        <label>{ "数量 (1-10)" }</label>
                        <input
                            class="form-input"
                            type="number"
                            min="1"
                            max="10"
                            value={props.form.count.to_string()}
                            onchange={on_count_change}
                            style="margin-bottom: 0; width: 80px;"
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled={blocked}>
                        { if props.loading { "生成中..." } else { "生成题目" } }
                    </button>
                </form>

                if let Some(err) = &props.error {
                    <div class="quiz-error">{ err }</div>
                }

                { for props.questions.iter().enumerate().map(|(i, q)| html! {
                    <div class="question-card" key={q.id.clone()}>
                        <h4>{ format!("{}. {}", i + 1, q.question) }</h4>
                        if let Some(options) = &q.options {
                            <ul>
                                { for options.iter().map(|o| html! { <li>{ o }</li> }) }
                            </ul>
                        }
                        <div class="answer">{ format!("答案：{}", q.answer) }</div>
                        <div class="explanation">{ format!("解析：{}", q.explanation) }</div>
                        <div class="source">{ format!("出处：{}", q.source) }</div>
                    </div>
                })}
            </div>
        </>
    }
}
