//! Outgoing message types.

/// MIME type of rendered invoices.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    /// A PDF attachment.
    pub fn pdf(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            content,
        }
    }
}

/// A message with a plain-text body and a single attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachment: Attachment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_attachment() {
        let attachment = Attachment::pdf("INV-1.pdf", b"%PDF-1.4".to_vec());
        assert_eq!(attachment.filename, "INV-1.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.content, b"%PDF-1.4".to_vec());
    }
}
