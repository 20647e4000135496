//! Reusable UI components

mod about;
mod compressor;
mod header;
mod status_bar;

pub use about::AboutBox;
pub use compressor::CompressorView;
