//! Read-only sales aggregates.

mod repository;

pub use repository::ReportRepository;
