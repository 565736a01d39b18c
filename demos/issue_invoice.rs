use facturador::config::{AppConfig, RenderConfig};
use facturador::core::*;
use facturador::render::{DocumentRenderer, PdfRenderer};
use facturador::store::CsvRecordStore;
use rust_decimal_macros::dec;

fn main() {
    let dir = std::env::temp_dir().join("facturador-demo");
    let config = AppConfig {
        render: RenderConfig {
            output_dir: dir.join("output"),
            number_format: NumberFormat::new("F-", 4),
            ..RenderConfig::default()
        },
        ..AppConfig::default()
    };

    // Issue an invoice against a CSV store in the temp directory
    let store = CsvRecordStore::new(dir.join("facturas.csv"));
    let manager = InvoiceManager::new(store).expect("record store should be writable");
    let invoice = manager
        .issue(
            Client::new(
                "Ann Smith",
                "V-12345678",
                "Main St 1, Springfield",
                "555-0100",
            ),
            vec![
                LineItem::new("Widget", 3, dec!(2.50)),
                LineItem::new("Installation (hours)", 2, dec!(45.00)),
            ],
            None,
        )
        .expect("invoice should be valid");

    let renderer = PdfRenderer::new(config.render);
    let path = renderer
        .render_to_file(&invoice)
        .expect("PDF should be written");

    println!(
        "Invoice: {}",
        renderer.config().number_format.format(invoice.number())
    );
    println!("Issued:  {}", invoice.issued_at().format("%Y-%m-%d %H:%M:%S"));
    println!("Client:  {}", invoice.client().name);
    println!("---");
    for item in invoice.items() {
        println!(
            "  {} x {} @ {} = {}",
            item.quantity(),
            item.description(),
            item.unit_price(),
            item.subtotal()
        );
    }
    println!("---");
    println!("Total:   {:.2}", invoice.total());
    println!("PDF:     {}", path.display());
}
