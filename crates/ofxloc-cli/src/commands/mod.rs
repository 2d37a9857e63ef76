pub mod export;
pub mod suffixes;
