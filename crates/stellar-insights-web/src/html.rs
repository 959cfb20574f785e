//! Server-side HTML rendering of the dashboard page

use crate::view::{
    ChartSpec, DashboardView, ERROR_HEADING, MetricCard, PAGE_SUBTITLE, PAGE_TITLE, ReadyView,
    TABLE_COLUMNS, TABLE_TITLE,
};
use std::fmt::Write as _;
use stellar_insights_core::ViewState;

const PAGE_TEMPLATE: &str = include_str!("../templates/analytics.html");

/// Seconds between reloads while a fetch is outstanding
pub const BUSY_REFRESH_SECS: u32 = 2;

/// Render the complete page for `state` as of `revision`
pub fn render_page(state: &ViewState, revision: u64) -> String {
    let view = DashboardView::from_state(state);

    let refresh = if view.is_busy() {
        format!("<meta http-equiv=\"refresh\" content=\"{BUSY_REFRESH_SECS}\">")
    } else {
        String::new()
    };

    PAGE_TEMPLATE
        .replace("{{refresh}}", &refresh)
        .replace("{{state}}", state.name())
        .replace("{{revision}}", &revision.to_string())
        .replace("{{content}}", &render_content(&view))
}

/// Render the body fragment for `view`
pub fn render_content(view: &DashboardView) -> String {
    match view {
        DashboardView::Busy => {
            "      <div class=\"centered\" role=\"status\" aria-label=\"Loading\"><div class=\"spinner\"></div></div>"
                .to_string()
        }
        DashboardView::Failed {
            message,
            retry_label,
        } => format!(
            "      <div class=\"centered\" role=\"alert\">\n        <div class=\"error-icon\">&#9888;</div>\n        <h2>{}</h2>\n        <p class=\"error-message\">{}</p>\n        <form method=\"post\" action=\"/retry\"><button type=\"submit\">{}</button></form>\n      </div>",
            html_escape(ERROR_HEADING),
            html_escape(message),
            html_escape(retry_label)
        ),
        DashboardView::Ready(ready) => render_ready(ready),
    }
}

fn render_ready(view: &ReadyView) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "      <h1>{}</h1>\n      <p class=\"subtitle\">{}</p>",
        html_escape(PAGE_TITLE),
        html_escape(PAGE_SUBTITLE)
    );

    out.push_str("      <section class=\"cards\">\n");
    for card in &view.cards {
        out.push_str(&render_card(card));
    }
    out.push_str("      </section>\n");

    out.push_str("      <section class=\"charts\">\n");
    out.push_str(&render_chart("activity-chart", &view.activity_chart));
    out.push_str(&render_chart("success-chart", &view.success_chart));
    out.push_str("      </section>\n");

    out.push_str(&render_table(view));
    out
}

fn render_card(card: &MetricCard) -> String {
    format!(
        "        <div class=\"card\"><h3>{}</h3><p class=\"value\">{}</p><p class=\"growth\">{}</p></div>\n",
        html_escape(card.title),
        html_escape(&card.value),
        html_escape(&card.growth)
    )
}

fn render_chart(id: &str, chart: &ChartSpec) -> String {
    // Plain data; serialization does not fail
    let spec = serde_json::to_string(chart).unwrap_or_else(|_| "null".to_string());

    format!(
        "        <div class=\"panel\"><h2>{}</h2><div class=\"chart-box\"><canvas id=\"{id}\"></canvas></div>\n          <script type=\"application/json\" data-chart=\"{id}\">{}</script></div>\n",
        html_escape(chart.title),
        script_escape(&spec)
    )
}

fn render_table(view: &ReadyView) -> String {
    let mut rows = String::new();
    for row in &view.rows {
        let _ = writeln!(
            rows,
            "            <tr class=\"corridor-row\"><td>{}</td><td>{}</td><td>{}</td><td><div class=\"health\" title=\"{}\"><div style=\"width: {}\"></div></div></td><td><span class=\"badge\">{}</span></td></tr>",
            html_escape(&row.corridor),
            html_escape(&row.success_rate),
            html_escape(&row.volume),
            html_escape(&row.health),
            html_escape(&row.health_width),
            html_escape(row.status)
        );
    }

    let header: String = TABLE_COLUMNS
        .iter()
        .map(|column| format!("<th>{}</th>", html_escape(column)))
        .collect();

    format!(
        "      <section class=\"panel\">\n        <h2>{}</h2>\n        <table>\n          <thead><tr>{header}</tr></thead>\n          <tbody>\n{rows}          </tbody>\n        </table>\n      </section>\n",
        html_escape(TABLE_TITLE)
    )
}

/// Escape text for HTML element content and attribute values
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Keep JSON embedded in a `<script>` element from closing it early
fn script_escape(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::mock::sample_snapshot;
    use stellar_insights_core::LOAD_FAILURE_MESSAGE;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(html_escape("US-MX"), "US-MX");
    }

    #[test]
    fn test_busy_page_has_only_indicator() {
        let page = render_page(&ViewState::Loading, 0);

        assert!(page.contains("class=\"spinner\""));
        assert!(page.contains("http-equiv=\"refresh\" content=\"2\""));
        assert!(page.contains("data-state=\"loading\""));
        assert!(page.contains("data-revision=\"0\""));
        assert!(!page.contains("<table"));
        assert!(!page.contains("<canvas"));
        assert!(!page.contains(LOAD_FAILURE_MESSAGE));
    }

    #[test]
    fn test_error_page_has_message_and_retry_only() {
        let page = render_page(&ViewState::load_failed(), 5);

        assert!(page.contains("data-state=\"error\" data-revision=\"5\""));
        assert!(page.contains(LOAD_FAILURE_MESSAGE));
        assert!(page.contains("Error Loading Data"));
        assert!(page.contains("action=\"/retry\""));
        assert!(page.contains(">Retry</button>"));
        assert!(!page.contains("<table"));
        assert!(!page.contains("<canvas"));
        assert!(!page.contains("class=\"card\""));
        assert!(!page.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_ready_page_scenario() {
        let page = render_page(&ViewState::ready(sample_snapshot()), 0);

        assert!(page.contains("<p class=\"value\">$2.5M</p>"));
        assert!(page.contains("<td>US-MX</td><td>97%</td><td>$15K</td>"));
        assert!(page.contains("style=\"width: 90%\""));
        assert!(page.contains("<span class=\"badge\">Healthy</span>"));
        assert!(page.contains("Network Activity Over Time"));
        assert!(page.contains("Success Rate by Corridor"));
        assert!(page.contains("<th>Health Score</th>"));
        assert!(!page.contains("class=\"spinner\""));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_corridor_labels_are_escaped() {
        let mut snapshot = sample_snapshot();
        snapshot.corridor_performance[0].corridor = "</script><b>".to_string();
        let page = render_page(&ViewState::ready(snapshot), 0);

        assert!(page.contains("<td>&lt;/script&gt;&lt;b&gt;</td>"));
        assert!(page.contains("<\\/script><b>"));
        assert!(!page.contains("</script><b>"));
    }
}
