/*! Corpus reading utilities

Raw text formats go through [LineReader], [TagLineReader],
[ElementReader] and [RecordReader], or declaratively through
[source::SourceSpec]; persisted pair corpora are re-read with
[PairReader].
!*/
mod pairreader;
mod recordreader;
pub mod source;
mod textreader;

pub use pairreader::PairReader;
pub use recordreader::RecordReader;
pub use source::{SourceFormat, SourceKind, SourceSpec};
pub use textreader::{ElementReader, LineReader, Quota, TagLineReader};
