pub mod features;
pub mod lexicon;
pub mod signals;
pub mod text;
