/*!
# Record-oriented writing

Newline-delimited JSON output, one record per line.
!*/
mod jsonlwriter;

pub use jsonlwriter::JsonlWriter;
