/*!
# IO utilities

Corpus loading and record-oriented saving.
!*/
pub mod reader;
pub mod writer;
