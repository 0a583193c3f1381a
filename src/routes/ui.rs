//! Server-rendered pages: the search form and the results list.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::models::{EnrichedResult, SearchQuery};

/// A one-off notice shown above the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: &'static str, // "info", "warning", "error"
    pub text: String,
}

impl Flash {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: "info", text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: "warning", text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: "error", text: text.into() }
    }
}

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<String> {
    render_index(None)
}

/// Unknown paths get the search page with a 404 status.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, render_index(None))
}

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 960px; color: #1d1d1f; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    .flash { padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
    .flash.info { background: #e8f1fb; }
    .flash.warning { background: #fff4d6; }
    .flash.error { background: #fde2e1; }
    .meta { color: #555; font-size: 0.9rem; }
    .badge { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 4px; background: #eef; margin-right: 0.5rem; }
    input[type=text] { width: 80%; padding: 0.5rem; }
    button { padding: 0.5rem 1rem; }
    .summary { white-space: pre-wrap; }
"#;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
    ))
}

fn search_form(value: &str) -> String {
    format!(
        r#"  <form class="card" method="post" action="/search">
    <input type="text" name="query" maxlength="200" value="{value}" placeholder="e.g. first-line treatment for type 2 diabetes" />
    <button type="submit">Search</button>
  </form>"#,
        value = escape_html(value),
    )
}

/// The search page, optionally with a notice.
pub fn render_index(flash: Option<&Flash>) -> Html<String> {
    let notice = flash
        .map(|f| {
            format!(
                r#"  <div class="flash {}">{}</div>"#,
                f.level,
                escape_html(&f.text)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"  <h1>MedLit Search</h1>
  <p>Search medical literature and get clinical summaries with a credibility rating for each source.</p>
{notice}
{form}"#,
        form = search_form(""),
    );
    page("MedLit Search", &body)
}

/// The results page for `query`.
pub fn render_results(query: &SearchQuery, results: &[EnrichedResult]) -> Html<String> {
    let items: String = results.iter().map(render_result).collect();
    let body = format!(
        r#"  <h1>MedLit Search</h1>
{form}
  <p class="meta">{count} result(s) for <strong>{query}</strong></p>
{items}"#,
        form = search_form(query.as_str()),
        count = results.len(),
        query = escape_html(query.as_str()),
    );
    page(&format!("{} - MedLit Search", query), &body)
}

fn render_result(result: &EnrichedResult) -> String {
    format!(
        r#"  <div class="card">
    <h3><a href="{url}" target="_blank" rel="noopener noreferrer">{title}</a></h3>
    <p class="meta"><span class="badge">{source_type}</span><span class="badge">{credibility}</span>Published: {date}</p>
    <h4>Clinical summary</h4>
    <p class="summary">{summary}</p>
    <details><summary>Excerpt</summary><p>{content}</p></details>
  </div>
"#,
        url = escape_html(safe_href(&result.url)),
        title = escape_html(&result.title),
        source_type = escape_html(&result.source_type),
        credibility = escape_html(&result.credibility_score),
        date = escape_html(&result.publication_date),
        summary = escape_html(&result.summary),
        content = escape_html(&result.content),
    )
}

/// Only web links are rendered as clickable targets.
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        url
    } else {
        "#"
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_index_shows_flash() {
        let Html(html) = render_index(Some(&Flash::warning("Too <long>")));
        assert!(html.contains(r#"class="flash warning""#));
        assert!(html.contains("Too &lt;long&gt;"));
    }

    #[test]
    fn test_results_escape_model_output() {
        let query = SearchQuery::parse("asthma").unwrap();
        let result = EnrichedResult {
            title: "Asthma <script>".to_string(),
            url: "https://www.bmj.com/x".to_string(),
            content: "excerpt".to_string(),
            summary: "Use ICS & LABA".to_string(),
            credibility_score: "High (90.0% confidence)".to_string(),
            source_type: "BMJ".to_string(),
            publication_date: "2024".to_string(),
            relevance_score: 1.0,
        };

        let Html(html) = render_results(&query, &[result]);
        assert!(html.contains("1 result(s)"));
        assert!(html.contains("Asthma &lt;script&gt;"));
        assert!(html.contains("Use ICS &amp; LABA"));
        assert!(html.contains("High (90.0% confidence)"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_non_web_links_are_not_clickable() {
        assert_eq!(safe_href("https://www.nejm.org/a"), "https://www.nejm.org/a");
        assert_eq!(safe_href("HTTP://example.org"), "HTTP://example.org");
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href(" JavaScript:alert(1)"), "#");
        assert_eq!(safe_href("data:text/html,hi"), "#");
        assert_eq!(safe_href(""), "#");
    }

    #[test]
    fn test_results_do_not_link_script_urls() {
        let query = SearchQuery::parse("asthma").unwrap();
        let result = EnrichedResult {
            title: "Odd link".to_string(),
            url: "javascript:alert(1)".to_string(),
            content: "excerpt".to_string(),
            summary: "s".to_string(),
            credibility_score: "Unknown".to_string(),
            source_type: "Medical Literature".to_string(),
            publication_date: "Unknown".to_string(),
            relevance_score: 0.0,
        };

        let Html(html) = render_results(&query, &[result]);
        assert!(html.contains(r##"<a href="#""##));
        assert!(!html.contains("javascript:"));
    }
}
