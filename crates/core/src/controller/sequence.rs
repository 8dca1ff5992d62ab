//! Per-section request sequencing.
//!
//! Intents can overlap: a slow discover request may still be in flight when
//! a newer one is issued for the same section. Each request takes a ticket,
//! and only the latest ticket of a section may render.

use std::sync::atomic::{AtomicU64, Ordering};

use super::render::Section;

/// Ticket identifying one request for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub section: Section,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct SectionSequencer {
    trending: AtomicU64,
    main: AtomicU64,
    detail: AtomicU64,
}

impl SectionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `section`, superseding any earlier one.
    pub fn begin(&self, section: Section) -> RequestTicket {
        let seq = self.counter(section).fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket { section, seq }
    }

    /// Whether `ticket` is still the latest for its section.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.counter(ticket.section).load(Ordering::SeqCst) == ticket.seq
    }

    fn counter(&self, section: Section) -> &AtomicU64 {
        match section {
            Section::Trending => &self.trending,
            Section::Main => &self.main,
            Section::Detail => &self.detail,
        }
    }
}
