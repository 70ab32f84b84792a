pub mod batch;
pub mod boundary;
pub mod track;
