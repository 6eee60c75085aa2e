use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::models::{AppState, BracketOption};
use crate::utils::escape_xml;

const OPTIONS_SLOT: &str = "<!--BRACKET_OPTIONS-->";

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sales Dashboard</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            background: #f5f7fa;
            color: #2d3748;
        }
        header {
            background: #0051a6;
            color: white;
            padding: 1rem 2rem;
        }
        main {
            padding: 1.5rem 2rem;
        }
        .controls {
            display: flex;
            gap: 1rem;
            align-items: flex-start;
            margin-bottom: 1.5rem;
        }
        select {
            min-width: 220px;
            min-height: 8rem;
        }
        button {
            background: #0051a6;
            color: white;
            border: none;
            padding: 10px 20px;
            border-radius: 6px;
            cursor: pointer;
        }
        button:disabled {
            background: #a0aec0;
        }
        .kpis {
            display: flex;
            gap: 1rem;
            margin-bottom: 1.5rem;
        }
        .kpi {
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.08);
            padding: 1rem 1.5rem;
            flex: 1;
        }
        .kpi .value {
            font-size: 1.75rem;
            font-weight: bold;
        }
        .charts {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 1rem;
        }
        .charts img {
            width: 100%;
            background: white;
            border-radius: 8px;
        }
        #status.error {
            color: #c53030;
        }
        #status.ok {
            color: #28a745;
        }
    </style>
</head>
<body>
    <header><h1>Sales Dashboard</h1></header>
    <main>
        <div class="controls">
            <label for="brackets">Age groups</label>
            <select id="brackets" multiple>
                <!--BRACKET_OPTIONS-->
            </select>
            <button id="report">Download Report</button>
            <span id="status"></span>
        </div>
        <div class="kpis">
            <div class="kpi"><div>Total new users</div><div class="value" id="new-users">-</div></div>
            <div class="kpi"><div>Total converted</div><div class="value" id="converted">-</div></div>
            <div class="kpi"><div>Conversion rate</div><div class="value" id="conversion-rate">-</div></div>
        </div>
        <div class="charts">
            <img id="pages-chart" alt="Total pages visited vs Age group">
            <img id="conversion-chart" alt="Average conversion rate vs Age group">
        </div>
    </main>
    <script>
        const select = document.getElementById('brackets');
        const statusLine = document.getElementById('status');
        const SUCCESS_MESSAGE = 'Report downloaded successfully!';

        function showStatus(text, kind) {
            statusLine.textContent = text;
            statusLine.className = kind;
        }

        function query() {
            const chosen = Array.from(select.selectedOptions).map(o => o.value);
            return 'brackets=' + encodeURIComponent(chosen.join(','));
        }

        async function refresh() {
            showStatus('', '');
            const q = query();
            const response = await fetch('/api/dashboard?' + q);
            const body = await response.json();
            if (!response.ok) {
                showStatus(body.message, 'error');
                return;
            }
            document.getElementById('new-users').textContent = body.formatted.new_users;
            document.getElementById('converted').textContent = body.formatted.converted;
            document.getElementById('conversion-rate').textContent = body.formatted.conversion_rate;
            document.getElementById('pages-chart').src = '/api/charts/pages_visited?' + q;
            document.getElementById('conversion-chart').src = '/api/charts/conversion_rate?' + q;
        }

        async function downloadReport() {
            const button = document.getElementById('report');
            button.disabled = true;
            showStatus('Generating report...', 'ok');
            try {
                const response = await fetch('/api/report?' + query());
                if (!response.ok) {
                    const body = await response.json();
                    showStatus(body.message, 'error');
                    return;
                }
                const disposition = response.headers.get('Content-Disposition') || '';
                const match = disposition.match(/filename="([^"]+)"/);
                const link = document.createElement('a');
                link.href = URL.createObjectURL(await response.blob());
                link.download = match ? match[1] : 'sales_report.pptx';
                link.click();
                URL.revokeObjectURL(link.href);
                showStatus(SUCCESS_MESSAGE, 'ok');
            } catch (e) {
                showStatus('Error downloading report: ' + e, 'error');
            } finally {
                button.disabled = false;
            }
        }

        select.addEventListener('change', refresh);
        document.getElementById('report').addEventListener('click', downloadReport);
        refresh();
    </script>
</body>
</html>
"#;

pub fn render_page(options: &[BracketOption]) -> String {
    let rendered: String = options
        .iter()
        .map(|option| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape_xml(&option.value),
                escape_xml(&option.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");
    PAGE.replace(OPTIONS_SLOT, &rendered)
}

pub async fn page_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.bracket_options))
}
