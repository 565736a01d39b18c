use std::fs;
use std::path::PathBuf;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::text::{format_money, to_win_ansi};
use super::{DocumentRenderer, RenderError, document_path};
use crate::config::RenderConfig;
use crate::core::Invoice;

/// A4 in PDF points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

const ROW_PITCH: i64 = 20;
const TABLE_TOP: i64 = 230;
/// Nothing is drawn closer than this to the bottom edge.
const BOTTOM_MARGIN: i64 = 40;

/// Column x positions of the item table.
const COL_DESCRIPTION: i64 = 30;
const COL_QUANTITY: i64 = 250;
const COL_PRICE: i64 = 320;
const COL_SUBTOTAL: i64 = 400;

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Content stream under construction. `y` is measured from the top edge.
struct Page {
    operations: Vec<Operation>,
}

impl Page {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    fn text(&mut self, font: Font, size: i64, x: i64, y_from_top: i64, s: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    Object::Integer(size),
                ],
            ),
            Operation::new(
                "Td",
                vec![Object::Integer(x), Object::Integer(PAGE_HEIGHT - y_from_top)],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(s), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn encode(self) -> Result<Vec<u8>, RenderError> {
        Content {
            operations: self.operations,
        }
        .encode()
        .map_err(|e| RenderError::Pdf(format!("failed to encode page content: {e}")))
    }
}

/// One-page PDF invoice drawn with the standard Helvetica fonts.
///
/// ```
/// use facturador::config::RenderConfig;
/// use facturador::render::PdfRenderer;
/// use facturador::core::*;
/// use facturador::store::MemoryStore;
/// use rust_decimal_macros::dec;
///
/// let manager = InvoiceManager::new(MemoryStore::new()).unwrap();
/// let invoice = manager
///     .create_invoice(
///         Client::new("Ann Smith", "V-123", "Main St 1", "555-0100"),
///         vec![LineItem::new("Widget", 3, dec!(2.50))],
///         None,
///         None,
///     )
///     .unwrap();
///
/// let pdf = PdfRenderer::new(RenderConfig::default()).render(&invoice).unwrap();
/// assert!(pdf.starts_with(b"%PDF-"));
/// ```
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    config: RenderConfig,
}

impl PdfRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the invoice to PDF bytes.
    ///
    /// Fails with [`RenderError::Pdf`] when the item table does not fit on
    /// one page (more than [`PdfRenderer::max_items`] items).
    pub fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, RenderError> {
        let content = self.layout(invoice)?.encode()?;
        build_document(content)
    }

    /// Most items a single page holds, total line included.
    pub fn max_items() -> usize {
        ((PAGE_HEIGHT - BOTTOM_MARGIN - TABLE_TOP) / ROW_PITCH - 2) as usize
    }

    fn layout(&self, invoice: &Invoice) -> Result<Page, RenderError> {
        self.check_layout(invoice)?;

        let mut page = Page::new();
        let company = &self.config.company;

        // Company header, right of the logo area.
        page.text(Font::Bold, 16, 120, 50, &company.name);
        page.text(Font::Regular, 10, 120, 65, &company.tax_id);
        page.text(Font::Regular, 10, 120, 80, &company.address);
        page.text(Font::Regular, 10, 120, 95, &company.phone);

        let number = self.config.number_format.format(invoice.number());
        page.text(Font::Bold, 12, 30, 130, &format!("Invoice No: {number}"));
        page.text(
            Font::Regular,
            10,
            COL_SUBTOTAL,
            130,
            &format!("Date: {}", invoice.issued_at().format("%Y-%m-%d")),
        );

        let client = invoice.client();
        page.text(Font::Bold, 12, 30, 150, "Client:");
        page.text(Font::Regular, 10, 100, 150, &client.name);
        page.text(Font::Regular, 10, 100, 165, &format!("ID: {}", client.identification));
        page.text(Font::Regular, 10, 100, 180, &client.address);
        page.text(Font::Regular, 10, 100, 195, &client.phone);

        let mut y = TABLE_TOP;
        page.text(Font::Bold, 10, COL_DESCRIPTION, y, "Description");
        page.text(Font::Bold, 10, COL_QUANTITY, y, "Quantity");
        page.text(Font::Bold, 10, COL_PRICE, y, "Unit price");
        page.text(Font::Bold, 10, COL_SUBTOTAL, y, "Subtotal");

        for item in invoice.items() {
            y += ROW_PITCH;
            page.text(Font::Regular, 10, COL_DESCRIPTION, y, item.description());
            page.text(Font::Regular, 10, COL_QUANTITY, y, &item.quantity().to_string());
            page.text(Font::Regular, 10, COL_PRICE, y, &format_money(item.unit_price()));
            page.text(Font::Regular, 10, COL_SUBTOTAL, y, &format_money(item.subtotal()));
        }

        y += 2 * ROW_PITCH;
        page.text(Font::Bold, 12, COL_PRICE, y, "TOTAL:");
        page.text(Font::Bold, 12, COL_SUBTOTAL, y, &format_money(invoice.total()));
        Ok(page)
    }
}

impl DocumentRenderer for PdfRenderer {
    fn check_layout(&self, invoice: &Invoice) -> Result<(), RenderError> {
        let rows = invoice.items().len();
        if rows > Self::max_items() {
            return Err(RenderError::Pdf(format!(
                "{rows} items do not fit on one page (at most {})",
                Self::max_items()
            )));
        }
        Ok(())
    }

    fn render_to_file(&self, invoice: &Invoice) -> Result<PathBuf, RenderError> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.clone(),
            source,
        })?;

        let bytes = self.render(invoice)?;
        let path = document_path(dir, invoice.number(), "pdf");
        fs::write(&path, bytes).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(number = invoice.number(), path = %path.display(), "rendered invoice");
        Ok(path)
    }
}

fn build_document(content: Vec<u8>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => Object::Reference(regular_id),
            Font::Bold.resource_name() => Object::Reference(bold_id),
        },
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| RenderError::Pdf(format!("failed to save PDF: {e}")))?;
    Ok(output)
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_move_down_the_page() {
        let mut page = Page::new();
        page.text(Font::Regular, 10, 30, 250, "first");
        let td = &page.operations[2];
        assert_eq!(td.operator, "Td");
        assert_eq!(td.operands[1].as_i64().unwrap(), PAGE_HEIGHT - 250);
    }

    #[test]
    fn total_line_of_a_full_page_stays_above_the_margin() {
        let rows = PdfRenderer::max_items() as i64;
        let total_y = TABLE_TOP + (rows + 2) * ROW_PITCH;
        assert!(total_y <= PAGE_HEIGHT - BOTTOM_MARGIN);
        assert!(total_y + ROW_PITCH > PAGE_HEIGHT - BOTTOM_MARGIN);
    }
}
