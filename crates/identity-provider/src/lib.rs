pub mod provider;
pub mod records;

pub use provider::DataProvider;
pub use records::{AttestationRecord, KycRecord, ReportRecord, VouchEdge, VouchGraph, VouchRecord};
