pub mod box_preview;
pub mod field;
pub mod kpi_card;
pub mod rate_badge;
pub mod setup_table;
pub mod toast;
