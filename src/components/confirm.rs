use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub title: String,
    pub body: String,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Modal half of the confirmation gate. Nothing happens until
/// `on_confirm` fires; closing or cancelling emits `on_cancel` only.
#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    let css = r#"
        .confirm-backdrop { position: absolute; top: 0; left: 0; width: 100%; height: 100%; background: rgba(255,255,255,0.6); backdrop-filter: blur(2px); z-index: 99; cursor: pointer; }
        .confirm-panel { position: absolute; top: 30%; left: 50%; transform: translateX(-50%); width: 360px; background: white; border: 1px solid var(--border-color); border-radius: 8px; box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1); padding: 20px; z-index: 100; display: flex; flex-direction: column; gap: 15px; }
        .confirm-panel h3 { margin: 0; font-size: 1.1rem; }
        .confirm-panel p { margin: 0; color: var(--text-secondary); font-size: 0.9rem; }
        .confirm-actions { display: flex; justify-content: flex-end; gap: 8px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="confirm-backdrop" onclick={props.on_cancel.reform(|_| ())}></div>

            <div class="confirm-panel">
                <h3>{ &props.title }</h3>
                <p>{ &props.body }</p>
                <div class="confirm-actions">
                    <button class="btn" onclick={props.on_cancel.reform(|_| ())}>{ "取消" }</button>
                    <button class="btn btn-primary" onclick={props.on_confirm.reform(|_| ())}>{ "确认" }</button>
                </div>
            </div>
        </>
    }
}
