//! HTML rendering of display models.

use tera::{Context, Tera};
use tracing::debug;

use crate::error::RenderError;
use crate::invoice::InvoiceNormalizer;
use crate::models::display::InvoiceDisplayModel;
use crate::models::input::InvoiceInput;

/// Template name; the `.html` suffix turns on Tera's auto-escaping.
const TEMPLATE_NAME: &str = "invoice.html";

/// Built-in invoice template.
pub const DEFAULT_TEMPLATE: &str = include_str!("invoice.html");

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Renders invoices to standalone HTML pages.
pub struct InvoiceRenderer {
    tera: Tera,
}

impl InvoiceRenderer {
    /// Create a renderer with the built-in template.
    pub fn new() -> Result<Self> {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    /// Create a renderer from custom template source. Variables use the
    /// camelCase names of [`InvoiceDisplayModel`].
    pub fn with_template(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    /// Render an already normalized invoice.
    pub fn render_html(&self, model: &InvoiceDisplayModel) -> Result<String> {
        let context = Context::from_serialize(model)?;
        let html = self.tera.render(TEMPLATE_NAME, &context)?;
        debug!(
            "Rendered invoice {} to {} bytes of HTML",
            model.invoice_number,
            html.len()
        );
        Ok(html)
    }

    /// Normalize and render in one step.
    pub fn render_input(&self, normalizer: &InvoiceNormalizer, input: &InvoiceInput) -> Result<String> {
        let model = normalizer.normalize(input)?;
        self.render_html(&model)
    }
}

/// Normalize with stock defaults and render with the built-in template.
pub fn render_invoice_html(input: &InvoiceInput) -> Result<String> {
    InvoiceRenderer::new()?.render_input(&InvoiceNormalizer::new(), input)
}
