// GrepMark - ui/page.rs
//
// Self-contained HTML result page: the rendered lines, the generated
// highlight classes, and a small toolbar (zoom, wrap, trim mode with
// line removal). Lines arrive already escaped and marked up by the
// highlighter and are inserted verbatim.

use crate::core::highlight::escape_markup;
use crate::core::model::RenderedResult;
use crate::ui::theme::Theme;
use crate::util::constants::{
    HIGHLIGHT_BASE_CLASS, MAX_FONT_SIZE, MIN_FONT_SIZE, RESULT_PAGE_TITLE,
};
use std::io::{self, Write};

/// Presentation options for the result page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Initial font size in pixels (clamped to the zoom range).
    pub font_size: u32,
    /// Start with line wrapping enabled.
    pub wrap: bool,
    pub theme: Theme,
    /// Where the text came from (file path or "<stdin>"), shown in the footer.
    pub source: String,
}

/// Write the complete result page.
pub fn write_page<W: Write>(
    result: &RenderedResult,
    options: &PageOptions,
    mut writer: W,
) -> io::Result<()> {
    let (background, foreground) = options.theme.page_colours();
    let font_size = options.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    let container_class = if options.wrap {
        "container wrap"
    } else {
        "container"
    };

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "<meta charset=\"UTF-8\">")?;
    writeln!(writer, "<title>{RESULT_PAGE_TITLE}</title>")?;
    writeln!(writer, "<style>")?;
    write!(
        writer,
        "body {{ font-family: Arial, sans-serif; padding: 10px; margin: 0; \
         background-color: {background}; color: {foreground}; }}\n\
         button {{ margin: 2px; padding: 2px; font-size: 14px; }}\n\
         .sticky {{ position: sticky; top: 0; padding: 0; z-index: 10; \
         background-color: {background}; border-bottom: 1px solid {foreground}; }}\n\
         .container {{ width: 100%; font-family: monospace; font-size: {font_size}px; \
         white-space: pre; overflow-x: auto; overflow-y: hidden; box-sizing: border-box; \
         position: relative; z-index: 0; }}\n\
         .wrap {{ white-space: pre-wrap; word-wrap: break-word; word-break: break-all; \
         overflow-x: hidden; overflow-y: auto; }}\n\
         .log-line {{ padding: 1px 0; cursor: text; min-height: 1em; }}\n\
         .log-line.selected {{ background-color: {selected}; }}\n\
         .{HIGHLIGHT_BASE_CLASS} {{ font-family: inherit; font-size: inherit; \
         line-height: inherit; white-space: inherit; word-break: inherit; \
         overflow-wrap: inherit; }}\n\
         footer {{ margin-top: 8px; font-size: 12px; opacity: 0.7; }}\n",
        selected = options.theme.selection_colour(),
    )?;
    for rule in &result.style_rules {
        write!(writer, "{}", rule.to_css())?;
    }
    writeln!(writer, "</style>")?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    writeln!(writer, "<div class=\"sticky\">")?;
    writeln!(writer, "<button onclick=\"resizeText(1)\">Zoom In</button>")?;
    writeln!(writer, "<button onclick=\"resizeText(-1)\">Zoom Out</button>")?;
    writeln!(
        writer,
        "<label><input type=\"checkbox\" id=\"wrapToggle\"{} /> Enable wrap</label>",
        if options.wrap { " checked" } else { "" }
    )?;
    writeln!(
        writer,
        "<label><input type=\"checkbox\" id=\"trimToggle\" /> Trim mode</label>"
    )?;
    writeln!(
        writer,
        "<button onclick=\"deleteSelected()\" id=\"removeLines\" disabled>Remove lines</button>"
    )?;
    writeln!(writer, "</div>")?;

    write!(writer, "<div id=\"textContainer\" class=\"{container_class}\">")?;
    for line in &result.lines {
        write!(writer, "<div class=\"log-line\">{line}</div>")?;
    }
    writeln!(writer, "</div>")?;

    writeln!(
        writer,
        "<footer>{} lines from {} &middot; generated {}</footer>",
        result.lines.len(),
        escape_markup(&options.source),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    )?;

    write!(writer, "<script>\n{}", page_script())?;
    writeln!(writer, "</script>")?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    writer.flush()
}

/// Toolbar behaviour: zoom within the font size range, wrap toggle, and
/// trim mode (click / shift-click to select lines, then remove them).
fn page_script() -> String {
    format!(
        r#"const container = document.getElementById('textContainer');
function resizeText(step) {{
  const current = parseFloat(window.getComputedStyle(container).fontSize);
  const next = Math.min({max}, Math.max({min}, current + step));
  container.style.fontSize = next + 'px';
}}
document.getElementById('wrapToggle').addEventListener('change', (e) => {{
  container.classList.toggle('wrap', e.target.checked);
}});
let trimEnabled = false;
let lastClicked = null;
document.getElementById('trimToggle').addEventListener('change', (e) => {{
  trimEnabled = e.target.checked;
  document.getElementById('removeLines').disabled = !trimEnabled;
  container.style.userSelect = trimEnabled ? 'none' : 'auto';
  container.style.cursor = trimEnabled ? 'pointer' : 'auto';
  if (!trimEnabled) {{
    document.querySelectorAll('.log-line.selected').forEach((l) => l.classList.remove('selected'));
    lastClicked = null;
  }}
}});
container.addEventListener('click', (e) => {{
  if (!trimEnabled) return;
  const line = e.target.closest('.log-line');
  if (!line) return;
  const lines = Array.from(container.children);
  if (e.shiftKey && lastClicked !== null) {{
    const a = lines.indexOf(line);
    const b = lines.indexOf(lastClicked);
    for (let i = Math.min(a, b); i <= Math.max(a, b); i++) lines[i].classList.add('selected');
  }} else {{
    line.classList.toggle('selected');
  }}
  lastClicked = line;
}});
function deleteSelected() {{
  document.querySelectorAll('.log-line.selected').forEach((l) => l.remove());
  lastClicked = null;
}}
"#,
        min = MIN_FONT_SIZE,
        max = MAX_FONT_SIZE,
    )
}
