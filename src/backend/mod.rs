pub mod catalog;
pub mod debounce;
pub mod filter;
pub mod record;
pub mod settings;
pub mod tokenizer;
