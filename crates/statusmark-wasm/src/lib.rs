use serde::{Deserialize, Serialize};
use statusmark_core::{ConvertOptions, StyledText, Url, convert};
use wasm_bindgen::prelude::*;

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsConvertOptions {
    trailing_url: Option<String>,
    remove_invisible_spans: Option<bool>,
    strip_links: Option<bool>,
    base_url: Option<String>,
    sanitize: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderResult {
    styled: StyledText,
    diagnostics: Vec<JsDiagnostic>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsDiagnostic {
    code: String,
    message: String,
    severity: String,
    range: JsRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsRange {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
}

#[wasm_bindgen]
pub fn render_styled_text(html: &str) -> Result<JsValue, JsValue> {
    render_styled_text_with_options(html, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn render_styled_text_with_options(html: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let js_options = options_from_js(options)?;
    let convert_options = ConvertOptions {
        trailing_url: parse_url(js_options.trailing_url.as_deref())?,
        remove_invisible_spans: js_options.remove_invisible_spans.unwrap_or(false),
        base_url: parse_url(js_options.base_url.as_deref())?,
        sanitize: js_options.sanitize.unwrap_or(false),
    };

    let converted = convert(html, &convert_options);
    let mut styled = converted.styled;
    if js_options.strip_links.unwrap_or(false) {
        styled = styled.removing_links();
    }

    let diagnostics = converted
        .diagnostics
        .into_iter()
        .map(|diag| JsDiagnostic {
            code: diag.code.to_string(),
            message: diag.message,
            severity: diag.severity.label().to_string(),
            range: JsRange {
                start_line: diag.range.start.line,
                start_col: diag.range.start.character,
                end_line: diag.range.end.line,
                end_col: diag.range.end.character,
            },
        })
        .collect();

    let result = RenderResult {
        styled,
        diagnostics,
    };
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<JsConvertOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(JsConvertOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn parse_url(value: Option<&str>) -> Result<Option<Url>, JsValue> {
    value
        .map(|raw| {
            Url::parse(raw).map_err(|err| JsValue::from_str(&format!("invalid url {}: {}", raw, err)))
        })
        .transpose()
}
