//! Hand-built HTML documents.
//!
//! The surface is small enough that pages are assembled with `format!`
//! around a shared shell. All dynamic text goes through [`escape`].

use larder_core::{DatasetKind, TableResult};

use crate::ingest::UploadOutcome;

pub fn escape(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
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

fn page(title: &str, body: &str) -> String {
  format!(
    "<!doctype html>\n\
     <html lang=\"en\">\n\
     <head>\n\
     <meta charset=\"utf-8\">\n\
     <title>{title} · Larder</title>\n\
     <style>\n\
     body {{ font-family: sans-serif; margin: 2rem; }}\n\
     nav a {{ margin-right: 1rem; }}\n\
     table {{ border-collapse: collapse; margin-top: 1rem; }}\n\
     th, td {{ border: 1px solid #999; padding: 0.25rem 0.5rem; }}\n\
     </style>\n\
     </head>\n\
     <body>\n\
     <nav>\
     <a href=\"/\">Dashboard</a>\
     <a href=\"/search\">Search</a>\
     <a href=\"/demographics\">Demographics</a>\
     <a href=\"/spending_trends\">Spending Trends</a>\
     <a href=\"/upload_data\">Upload</a>\
     <a href=\"/reload_data\">Reload</a>\
     </nav>\n\
     {body}\n\
     </body>\n\
     </html>\n",
    title = escape(title),
  )
}

// ─── Tables ──────────────────────────────────────────────────────────────────

pub fn table(result: &TableResult) -> String {
  let mut html = String::from("<table>\n<thead><tr>");
  for column in &result.columns {
    html.push_str("<th>");
    html.push_str(&escape(column));
    html.push_str("</th>");
  }
  html.push_str("</tr></thead>\n<tbody>\n");

  for row in &result.rows {
    html.push_str("<tr>");
    for cell in row {
      html.push_str("<td>");
      html.push_str(&escape(&cell.to_string()));
      html.push_str("</td>");
    }
    html.push_str("</tr>\n");
  }

  html.push_str("</tbody>\n</table>\n");
  html
}

pub fn table_page(title: &str, result: &TableResult) -> String {
  page(
    title,
    &format!("<h1>{}</h1>\n{}", escape(title), table(result)),
  )
}

// ─── Pages ───────────────────────────────────────────────────────────────────

pub fn dashboard_page() -> String {
  page(
    "Dashboard",
    "<h1>Household Purchase Dashboard</h1>\n\
     <progress id=\"load\" max=\"100\" value=\"0\"></progress>\n\
     <pre id=\"data\">loading…</pre>\n\
     <script>\n\
     const source = new EventSource('/dashboard_progress');\n\
     source.onmessage = (e) => {\n\
       document.getElementById('load').value = Number(e.data);\n\
       if (Number(e.data) >= 100) source.close();\n\
     };\n\
     fetch('/dashboard_data')\n\
       .then((r) => r.json())\n\
       .then((d) => {\n\
         document.getElementById('data').textContent =\n\
           JSON.stringify(d, null, 2);\n\
       })\n\
       .catch((err) => {\n\
         document.getElementById('data').textContent = String(err);\n\
       });\n\
     </script>",
  )
}

pub fn register_page() -> String {
  page(
    "Register",
    "<h1>Register</h1>\n\
     <form method=\"post\" action=\"/register\">\n\
     <label>Username <input name=\"username\" required></label><br>\n\
     <label>Password <input name=\"password\" type=\"password\" required></label><br>\n\
     <label>Email <input name=\"email\" type=\"email\" required></label><br>\n\
     <button type=\"submit\">Register</button>\n\
     </form>",
  )
}

pub fn search_page(result: Option<&TableResult>) -> String {
  let mut body = String::from(
    "<h1>Household Search</h1>\n\
     <form method=\"post\" action=\"/search\">\n\
     <input name=\"hshd\" id=\"hshd\" list=\"hshd-options\" \
      placeholder=\"Household number\">\n\
     <datalist id=\"hshd-options\"></datalist>\n\
     <button type=\"submit\">Search</button>\n\
     </form>\n\
     <script>\n\
     document.getElementById('hshd').addEventListener('input', (e) => {\n\
       fetch('/search-autocomplete?term=' + encodeURIComponent(e.target.value))\n\
         .then((r) => r.json())\n\
         .then((nums) => {\n\
           document.getElementById('hshd-options').innerHTML =\n\
             nums.map((n) => `<option value=\"${n}\">`).join('');\n\
         });\n\
     });\n\
     </script>\n",
  );

  if let Some(result) = result {
    body.push_str(&table(result));
  }

  page("Search", &body)
}

pub fn upload_page() -> String {
  let mut options = String::new();
  for kind in DatasetKind::ALL {
    options.push_str(&format!(
      "<option value=\"{kind}\">{kind}</option>"
    ));
  }

  page(
    "Upload",
    &format!(
      "<h1>Upload Data</h1>\n\
       <form method=\"post\" action=\"/upload_data\" \
        enctype=\"multipart/form-data\">\n\
       <label>CSV file <input type=\"file\" name=\"file\" accept=\".csv\"></label><br>\n\
       <label>Data type <select name=\"data_type\">{options}</select></label><br>\n\
       <button type=\"submit\">Upload</button>\n\
       </form>"
    ),
  )
}

// ─── Banners ─────────────────────────────────────────────────────────────────

pub fn upload_result(outcome: &UploadOutcome) -> String {
  let body = if outcome.success {
    let data_type = outcome
      .data_type
      .map(|kind| kind.to_string())
      .unwrap_or_default();
    format!(
      "<h1>Upload Completed Successfully</h1>\n\
       <p>The {} table was replaced.</p>",
      escape(&data_type)
    )
  } else {
    let error = outcome.error.as_deref().unwrap_or("unknown error");
    format!(
      "<h1>Upload Failed</h1>\n<p>Error: {}</p>",
      escape(error)
    )
  };
  page("Upload Result", &body)
}

pub fn reload_result(error: Option<&str>) -> String {
  let body = match error {
    None => "<h1>Data Reload Completed Successfully</h1>\n\
             <p>Check the dashboard to explore.</p>"
      .to_string(),
    Some(error) => format!(
      "<h1>Reload Failed</h1>\n<p>Error: {}</p>",
      escape(error)
    ),
  };
  page("Reload", &body)
}

#[cfg(test)]
mod tests {
  use super::*;
  use larder_core::CellValue;

  #[test]
  fn escape_covers_html_metacharacters() {
    assert_eq!(
      escape(r#"<a href="x">&'"#),
      "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
    );
  }

  #[test]
  fn table_escapes_cells_and_renders_nulls_empty() {
    let result = TableResult {
      columns: vec!["A".into(), "B".into()],
      rows:    vec![vec![
        CellValue::Text("<script>".into()),
        CellValue::Null,
      ]],
    };
    let html = table(&result);
    assert!(html.contains("<td>&lt;script&gt;</td>"));
    assert!(html.contains("<td></td>"));
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn upload_page_lists_all_dataset_kinds() {
    let html = upload_page();
    for kind in DatasetKind::ALL {
      assert!(html.contains(&format!("value=\"{kind}\"")));
    }
  }
}
