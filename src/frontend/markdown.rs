use pulldown_cmark::{html, Event, Options, Parser};

/// Renders a model reply to HTML. Raw HTML in the reply is shown as text.
pub fn to_html(source: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_and_lists() {
        let out = to_html("**Impedimento:** deploy\n\n- item um\n- item dois");
        assert!(out.contains("<strong>Impedimento:</strong>"));
        assert!(out.contains("<li>item um</li>"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let out = to_html("<script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
