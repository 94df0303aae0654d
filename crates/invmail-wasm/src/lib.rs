//! WASM bindings for invmail.
//!
//! Exposes instruction parsing, normalization and HTML rendering to
//! browsers and Node.js. PDF output and mail delivery stay server-side.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use invmail_core::models::{InstructionRecord, InvoiceDisplayModel};
use invmail_core::{InstructionParser, InvoiceInput, InvoiceNormalizer, InvoiceRenderer};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    invmail_core::VERSION.to_string()
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Accept either a JS object or a JSON string.
fn input_value(input: JsValue) -> Result<Value, JsValue> {
    match input.as_string() {
        Some(text) => serde_json::from_str(&text).map_err(js_error),
        None => serde_wasm_bindgen::from_value(input).map_err(js_error),
    }
}

fn normalize_value(value: Value) -> Result<InvoiceDisplayModel, String> {
    InvoiceNormalizer::new()
        .normalize_value(value)
        .map_err(|e| e.to_string())
}

fn render_value(value: Value) -> Result<String, String> {
    let input = InvoiceInput::from_value(value).map_err(|e| e.to_string())?;
    invmail_core::render_invoice_html(&input).map_err(|e| e.to_string())
}

fn tax_rate(text: &str) -> Result<f64, String> {
    let rate = invmail_core::parse_tax_rate(text).map_err(|e| e.to_string())?;
    Ok(rate.to_f64().unwrap_or(0.0))
}

/// Parse instruction text into a record.
///
/// Amounts in the record are decimal strings.
#[wasm_bindgen]
pub fn parse_instructions(text: &str) -> Result<JsValue, JsValue> {
    to_js(&invmail_core::parse_instructions(text))
}

/// Normalize invoice input (object or JSON string) into the display model.
#[wasm_bindgen]
pub fn normalize_invoice(input: JsValue) -> Result<JsValue, JsValue> {
    let model = normalize_value(input_value(input)?).map_err(js_error)?;
    to_js(&model)
}

/// Render invoice input (object or JSON string) to a standalone HTML page.
#[wasm_bindgen]
pub fn render_invoice_html(input: JsValue) -> Result<String, JsValue> {
    render_value(input_value(input)?).map_err(js_error)
}

/// Interpret a tax rate such as `"15%"`, `"15"` or `"0.15"` as a fraction.
///
/// Throws when the number is too large to represent.
#[wasm_bindgen]
pub fn parse_tax_rate(text: &str) -> Result<f64, JsValue> {
    tax_rate(text).map_err(js_error)
}

/// Instruction parser class for browser use.
#[wasm_bindgen]
pub struct InstructionParserJs {
    parser: InstructionParser,
    renderer: InvoiceRenderer,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IgnoredLineJs {
    line_number: usize,
    text: String,
    reason: String,
}

#[derive(Serialize)]
struct ParseOutput {
    record: InstructionRecord,
    ignored: Vec<IgnoredLineJs>,
}

#[wasm_bindgen]
impl InstructionParserJs {
    /// Create a parser with the built-in invoice template.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<InstructionParserJs, JsValue> {
        Ok(Self {
            parser: InstructionParser::new(),
            renderer: InvoiceRenderer::new().map_err(js_error)?,
        })
    }

    /// Parse text and report the lines that were dropped.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parse_output(text))
    }

    /// Parse text and render the resulting invoice.
    #[wasm_bindgen]
    pub fn render(&self, text: &str) -> Result<String, JsValue> {
        let record = self.parser.parse(text).record;
        self.renderer
            .render_input(&InvoiceNormalizer::new(), &InvoiceInput::from(record))
            .map_err(js_error)
    }
}

impl InstructionParserJs {
    fn parse_output(&self, text: &str) -> ParseOutput {
        let result = self.parser.parse(text);
        if !result.ignored.is_empty() {
            log_ignored(result.ignored.len());
        }

        ParseOutput {
            record: result.record,
            ignored: result
                .ignored
                .into_iter()
                .map(|line| IgnoredLineJs {
                    line_number: line.line_number,
                    text: line.text,
                    reason: line.reason.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn log_ignored(count: usize) {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "invmail: ignored {} instruction line(s)",
        count
    )));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_ignored(_count: usize) {}
