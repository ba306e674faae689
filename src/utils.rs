use pulldown_cmark::{html, Event as MdEvent, Options, Parser};
use yew::{AttrValue, Html};

pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Renders assistant/outline text as markdown. Streamed content passes
/// through here on every fragment, so an unterminated construct mid-stream
/// just renders as plain text until its closing marker arrives.
pub fn render_markdown(text: &str) -> Html {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        MdEvent::SoftBreak => MdEvent::HardBreak,
        _ => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let styled_html = format!(r#"<div class="markdown-body">{}</div>"#, html_output);
    Html::from_html_unchecked(AttrValue::from(styled_html))
}
