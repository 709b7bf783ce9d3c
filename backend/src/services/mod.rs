pub mod analyzer;
pub mod classification;
pub mod duration;
pub mod engagement;
pub mod loader;
pub mod statistics;
pub mod word_frequency;
