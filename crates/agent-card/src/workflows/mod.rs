pub mod estimation;
pub mod leads;
pub mod qualification;
