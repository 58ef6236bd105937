/// CSV export of projection rows.
pub mod export;
