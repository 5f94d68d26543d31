//! HTML status page

use std::fmt::Write;

use crate::types::{StatusTag, StatusView};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <title>Service Status</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 2rem; background: #f5f5f5; }
        h1 { color: #333; }
        .status-box {
            background: white; padding: 1rem 2rem; border-radius: 8px; max-width: 400px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
        }
        .ok { color: green; font-weight: bold; }
        .warn { color: orange; font-weight: bold; }
        .fail { color: red; font-weight: bold; }
        .label { font-weight: bold; }
        .footer { margin-top: 2rem; font-size: 0.9rem; color: #777; }
    </style>
</head>
<body>
    <h1>Service Status</h1>
    <div class="status-box">
"#;

const PAGE_TAIL: &str = r#"    </div>
    <div class="footer">
        Refreshes every time you reload this page.
    </div>
</body>
</html>
"#;

/// CSS class for a status: OK green, WARNING orange, anything else red.
fn status_class(status: &str) -> &'static str {
    if status == StatusTag::Ok.as_str() {
        "ok"
    } else if status == StatusTag::Warning.as_str() {
        "warn"
    } else {
        "fail"
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the page for `snapshot`, or the "no data" page when `None`.
pub fn render_status_page(snapshot: Option<&StatusView>) -> String {
    let mut body = String::from(PAGE_HEAD);

    match snapshot {
        Some(s) => {
            let _ = writeln!(
                body,
                r#"        <p>Status: <span class="{}">{}</span></p>"#,
                status_class(&s.status),
                escape_html(&s.status)
            );
            if let Some(age) = s.heartbeat_age_minutes {
                let _ = writeln!(
                    body,
                    r#"        <p><span class="label">Heartbeat Age:</span> {age:.1} minutes ago</p>"#
                );
            }
            if let Some(clients) = s.clients {
                let _ = writeln!(
                    body,
                    r#"        <p><span class="label">Clients Connected:</span> {clients}</p>"#
                );
            }
            let _ = writeln!(
                body,
                r#"        <p><span class="label">Last Checked:</span> {}</p>"#,
                escape_html(&s.timestamp)
            );
        }
        None => {
            body.push_str(
                "        <p><span class=\"fail\">No status data available.</span></p>\n",
            );
        }
    }

    body.push_str(PAGE_TAIL);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusSnapshot;
    use chrono::NaiveDate;

    fn snapshot(status: StatusTag, age: Option<f64>, clients: Option<u32>) -> StatusView {
        let now = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap();
        StatusSnapshot::new(status, now, age, clients).into()
    }

    #[test]
    fn ok_page_shows_all_fields() {
        let html = render_status_page(Some(&snapshot(StatusTag::Ok, Some(5.04), Some(3))));
        assert!(html.contains(r#"<span class="ok">OK</span>"#));
        assert!(html.contains("5.0 minutes ago"));
        assert!(html.contains("Clients Connected:</span> 3"));
        assert!(html.contains("2025-08-16 15:05:00"));
    }

    #[test]
    fn recovery_outcomes_render_as_failures() {
        let html = render_status_page(Some(&snapshot(StatusTag::SkippedBackoff, None, None)));
        assert!(html.contains(r#"<span class="fail">SKIPPED_BACKOFF</span>"#));
        assert!(!html.contains("Heartbeat Age"));
        assert!(!html.contains("Clients Connected"));
    }

    #[test]
    fn unknown_status_renders_as_failure() {
        let view = StatusView {
            status: "<DEGRADED>".to_string(),
            timestamp: "2025-08-16 15:05:00".to_string(),
            heartbeat_age_minutes: None,
            clients: Some(7),
        };
        let html = render_status_page(Some(&view));
        assert!(html.contains(r#"<span class="fail">&lt;DEGRADED&gt;</span>"#));
        assert!(html.contains("Clients Connected:</span> 7"));
        assert!(!html.contains("No status data available."));
    }

    #[test]
    fn warning_is_orange() {
        let html = render_status_page(Some(&snapshot(StatusTag::Warning, Some(5.0), Some(1))));
        assert!(html.contains(r#"<span class="warn">WARNING</span>"#));
    }

    #[test]
    fn missing_snapshot_renders_no_data() {
        let html = render_status_page(None);
        assert!(html.contains("No status data available."));
        assert!(!html.contains("Status: "));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
