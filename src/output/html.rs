use crate::error::Result;
use crate::rules::policy::PolicyVerdict;
use crate::rules::{DomainStatus, ScanResult, REPORT_COLUMNS};

/// Render results as a self-contained HTML report, one table row per
/// result in scan order.
pub fn render(results: &[ScanResult], verdict: &PolicyVerdict, target_name: &str) -> Result<String> {
    let status_class = if verdict.pass { "pass" } else { "fail" };
    let status_text = if verdict.pass { "PASS" } else { "FAIL" };

    let header: String = REPORT_COLUMNS
        .iter()
        .map(|h| format!("<th>{h}</th>"))
        .collect();

    let rows: String = results
        .iter()
        .map(|r| {
            let cells: String = r
                .row()
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let text = html_escape(cell);
                    match i {
                        7 => format!(
                            "<td><span class=\"status {}\">{}</span></td>",
                            status_class_for(r.domain_status),
                            text
                        ),
                        9 => format!("<td class=\"ctx\"><code>{}</code></td>", text.replace('\n', "<br>")),
                        _ => format!("<td>{text}</td>"),
                    }
                })
                .collect();
            format!("<tr>{cells}</tr>\n")
        })
        .collect();

    let category_stats: String = verdict
        .by_category
        .iter()
        .map(|(cat, n)| {
            format!(
                r#"<div class="stat"><div class="count">{n}</div><div class="label">{}</div></div>"#,
                html_escape(cat)
            )
        })
        .collect();

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>PkgShield Scan Report — {target}</title>
<style>
  :root {{
    --bg: #0d1117; --fg: #c9d1d9; --border: #30363d; --card: #161b22;
    --muted: #8b949e; --accent: #58a6ff; --warn: #d29922;
    --pass: #3fb950; --fail: #f85149;
  }}
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
    background: var(--bg); color: var(--fg); line-height: 1.5; padding: 2rem; }}
  .container {{ max-width: 1400px; margin: 0 auto; }}
  header {{ display: flex; align-items: center; justify-content: space-between;
    padding: 1.5rem; background: var(--card); border: 1px solid var(--border);
    border-radius: 8px; margin-bottom: 1.5rem; }}
  header h1 {{ font-size: 1.4rem; }}
  header h1 span {{ color: var(--accent); font-weight: 400; }}
  .verdict {{ font-size: 1.2rem; font-weight: 700; padding: 0.4rem 1.2rem; border-radius: 6px; }}
  .verdict.pass {{ background: var(--pass); color: #000; }}
  .verdict.fail {{ background: var(--fail); color: #fff; }}
  .summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
    gap: 1rem; margin-bottom: 1.5rem; }}
  .stat {{ background: var(--card); border: 1px solid var(--border);
    border-radius: 8px; padding: 1rem; text-align: center; }}
  .stat .count {{ font-size: 2rem; font-weight: 700; }}
  .stat .label {{ font-size: 0.85rem; color: var(--muted); }}
  table {{ width: 100%; border-collapse: collapse; background: var(--card);
    border: 1px solid var(--border); }}
  th {{ text-align: left; padding: 0.6rem; border-bottom: 2px solid var(--border);
    font-size: 0.75rem; text-transform: uppercase; color: var(--muted); }}
  td {{ padding: 0.5rem 0.6rem; border-bottom: 1px solid var(--border);
    font-size: 0.85rem; vertical-align: top; word-break: break-all; }}
  td.ctx code {{ font-size: 0.8rem; white-space: nowrap; }}
  .status {{ display: inline-block; padding: 0.1rem 0.4rem; border-radius: 4px;
    font-size: 0.75rem; font-weight: 700; }}
  .status.unregistered {{ background: var(--fail); color: #fff; }}
  .status.public {{ background: var(--warn); color: #000; }}
  .status.resolved {{ background: var(--pass); color: #000; }}
  .status.unknown {{ background: var(--muted); color: #000; }}
  footer {{ margin-top: 1.5rem; text-align: center; font-size: 0.8rem; color: var(--muted); }}
  .empty {{ text-align: center; padding: 3rem; color: var(--pass); font-size: 1.2rem; }}
</style>
</head>
<body>
<div class="container">
  <header>
    <h1>PkgShield <span>v{version}</span></h1>
    <div class="verdict {status_class}">{status_text}</div>
  </header>

  <div class="summary">
    <div class="stat"><div class="count">{packages}</div><div class="label">Packages</div></div>
    <div class="stat"><div class="count">{total}</div><div class="label">Matches</div></div>
    {category_stats}
  </div>

  {content}

  <footer>
    Scanned <strong>{target}</strong> with PkgShield {version}
  </footer>
</div>
</body>
</html>"##,
        target = html_escape(target_name),
        version = env!("CARGO_PKG_VERSION"),
        status_class = status_class,
        status_text = status_text,
        packages = verdict.packages_scanned,
        total = results.len(),
        category_stats = category_stats,
        content = if results.is_empty() {
            "<div class=\"empty\">No matches found.</div>".to_string()
        } else {
            format!(
                "<table>\n<thead><tr>{header}</tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
            )
        },
    );

    Ok(html)
}

fn status_class_for(status: DomainStatus) -> &'static str {
    match status {
        DomainStatus::Unregistered => "unregistered",
        DomainStatus::PubliclyWritable => "public",
        DomainStatus::Resolved => "resolved",
        DomainStatus::Unknown | DomainStatus::NotApplicable => "unknown",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::{spawn_result, url_result};
    use crate::rules::policy::Policy;

    #[test]
    fn empty_report_says_so() {
        let verdict = Policy::default().evaluate(&[], 0);
        let html = render(&[], &verdict, "packages").unwrap();
        assert!(html.contains("No matches found."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn rows_escape_and_break_context() {
        let results = vec![spawn_result(), url_result()];
        let verdict = Policy::default().evaluate(&results, 1);
        let html = render(&results, &verdict, "packages").unwrap();
        assert!(html.contains("<th>Domain/IP</th><th>Domain Status</th>"));
        assert!(html.contains("local cmd = x<br>os.execute(cmd)<br>return"));
        assert!(html.contains("https://x.github.io/a?b=&lt;c&gt;"));
        assert!(html.contains(r#"<span class="status public">Publicly Writable</span>"#));
        assert!(!html.contains("<c>"));
    }
}
