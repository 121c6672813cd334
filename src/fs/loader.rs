//! Off-thread directory scans for expand requests.
//!
//! The scan runs on tokio's blocking pool and the result is posted back to
//! the event loop, which applies it through `LazyTree::finish_expand` on the
//! UI thread.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::Event;
use crate::fs::scanner::{DirScanner, ScanResult};
use crate::fs::tree::ExpandTicket;

/// A finished background scan, tagged with the ticket that requested it.
#[derive(Debug)]
pub struct ScanComplete {
    pub ticket: ExpandTicket,
    pub result: Result<ScanResult>,
}

/// Scan `ticket.path()` in the background and send [`Event::ScanComplete`].
pub fn spawn_scan(scanner: DirScanner, ticket: ExpandTicket, tx: mpsc::UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || {
        let result = scanner.scan(ticket.path());
        tracing::trace!(
            path = %ticket.path().display(),
            generation = ticket.generation(),
            "background scan finished"
        );
        if tx.send(Event::ScanComplete(ScanComplete { ticket, result })).is_err() {
            tracing::debug!("event loop gone, dropping scan result");
        }
    });
}
