use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use facturador::core::*;
use facturador::render::{DocumentRenderer, RenderError};
use facturador::session::*;
use facturador::store::{MemoryStore, RecordStore};
use rust_decimal_macros::dec;

fn client() -> Client {
    Client::new("Ann Smith", "V-123", "Main St 1", "555-0100")
}

fn rows() -> Vec<ItemRow> {
    vec![
        ItemRow::new("Widget", "3", "2.50"),
        ItemRow::new("Bolt", "10", "0.10"),
    ]
}

fn session() -> InvoiceSession<MemoryStore> {
    InvoiceSession::open(InvoiceManager::new(MemoryStore::new()).unwrap()).unwrap()
}

/// Records the numbers it was asked to render; optionally fails.
struct FakeRenderer {
    rendered: Rc<Cell<u64>>,
    fail: bool,
    max_items: usize,
}

impl FakeRenderer {
    fn new(rendered: Rc<Cell<u64>>, fail: bool) -> Self {
        Self {
            rendered,
            fail,
            max_items: usize::MAX,
        }
    }
}

impl DocumentRenderer for FakeRenderer {
    fn check_layout(&self, invoice: &Invoice) -> Result<(), RenderError> {
        if invoice.items().len() > self.max_items {
            return Err(RenderError::Pdf("too many rows".into()));
        }
        Ok(())
    }

    fn render_to_file(&self, invoice: &Invoice) -> Result<PathBuf, RenderError> {
        if self.fail {
            return Err(RenderError::Pdf("printer on fire".into()));
        }
        self.rendered.set(invoice.number());
        Ok(PathBuf::from(format!("invoice_{}.fake", invoice.number())))
    }
}

#[test]
fn session_starts_at_store_next_number() {
    let manager = InvoiceManager::new(MemoryStore::new()).unwrap();
    for _ in 0..3 {
        manager
            .issue(client(), vec![LineItem::new("W", 1, dec!(1))], None)
            .unwrap();
    }
    let session = InvoiceSession::open(manager).unwrap();
    assert_eq!(session.next_number(), 4);
}

#[test]
fn submit_stores_and_advances() {
    let mut s = session();
    let first = s.submit(client(), &rows()).unwrap();
    assert_eq!(first.invoice.number(), 1);
    assert_eq!(first.invoice.total(), dec!(8.50));
    assert!(first.document.is_none());
    assert_eq!(s.next_number(), 2);

    let second = s.submit(client(), &rows()).unwrap();
    assert_eq!(second.invoice.number(), 2);
    assert_eq!(s.manager().store().max_number().unwrap(), 2);
}

#[test]
fn parse_failure_keeps_number_and_store() {
    let mut s = session();
    let bad = vec![ItemRow::new("Widget", "three", "2.50")];
    let err = s.submit(client(), &bad).unwrap_err();

    assert!(matches!(err, SessionError::Parse(ref p) if p.row == 1));
    assert!(err.is_user_error());
    assert_eq!(s.next_number(), 1);
    assert!(s.manager().store().records().is_empty());
}

#[test]
fn validation_failure_keeps_number() {
    let mut s = session();
    let err = s
        .submit(Client::new("", "V-1", "Main St", "555"), &rows())
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation(ref v) if v.field == "client.name"));
    assert_eq!(s.next_number(), 1);
}

#[test]
fn blank_quantity_surfaces_as_validation_error() {
    let mut s = session();
    let err = s
        .submit(client(), &[ItemRow::new("Widget", "", "2.50")])
        .unwrap_err();
    match err {
        SessionError::Validation(v) => {
            assert_eq!(v.field, "items[0].quantity");
            assert!(v.message.contains("Widget"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_table_is_rejected() {
    let mut s = session();
    let err = s.submit(client(), &[]).unwrap_err();
    assert!(err.to_string().contains("at least one item"));
}

#[test]
fn renderer_receives_issued_invoice() {
    let rendered = Rc::new(Cell::new(0));
    let mut s = session().with_renderer(FakeRenderer::new(Rc::clone(&rendered), false));

    let submission = s.submit(client(), &rows()).unwrap();
    assert_eq!(rendered.get(), 1);
    assert_eq!(submission.document, Some(PathBuf::from("invoice_1.fake")));
}

#[test]
fn render_failure_is_reported_after_the_row_is_stored() {
    let mut s = session().with_renderer(FakeRenderer::new(Rc::new(Cell::new(0)), true));

    let err = s.submit(client(), &rows()).unwrap_err();
    assert!(matches!(err, SessionError::Render(_)));
    assert!(!err.is_user_error());
    assert_eq!(s.manager().store().records().len(), 1);
    // The stored row owns number 1 now; it must not be offered again.
    assert_eq!(s.next_number(), 2);
}

#[test]
fn layout_rejection_stores_nothing() {
    let rendered = Rc::new(Cell::new(0));
    let mut s = session().with_renderer(FakeRenderer {
        max_items: 1,
        ..FakeRenderer::new(Rc::clone(&rendered), false)
    });

    let err = s.submit(client(), &rows()).unwrap_err();
    assert!(matches!(err, SessionError::Render(_)));
    assert!(s.manager().store().records().is_empty());
    assert_eq!(s.next_number(), 1);
    assert_eq!(rendered.get(), 0);
}

#[test]
fn total_preview_uses_parsed_rows() {
    let s = session();
    assert_eq!(s.total_preview(&rows()).unwrap(), dec!(8.50));

    let err = s
        .total_preview(&[ItemRow::new("Widget", "1", "two")])
        .unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
}

/// Two prices that each fit but whose sum does not.
fn overflowing_rows() -> Vec<ItemRow> {
    vec![
        ItemRow::new("A", "1", "50000000000000000000000000000"),
        ItemRow::new("B", "1", "50000000000000000000000000000"),
    ]
}

#[test]
fn total_preview_rejects_overflowing_total() {
    let err = session().total_preview(&overflowing_rows()).unwrap_err();
    match err {
        SessionError::Parse(p) => {
            assert_eq!(p.row, 2);
            assert!(p.message.contains("total is too large"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn submit_rejects_overflowing_total_without_storing() {
    let mut s = session();
    let err = s.submit(client(), &overflowing_rows()).unwrap_err();
    assert!(matches!(err, SessionError::Parse(ref p) if p.row == 2));
    assert!(err.is_user_error());
    assert!(s.manager().store().records().is_empty());
    assert_eq!(s.next_number(), 1);
}

#[test]
fn total_preview_of_empty_table_is_zero() {
    assert_eq!(session().total_preview(&[]).unwrap(), dec!(0));
}
