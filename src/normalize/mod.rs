mod header;
mod normalizer;
#[cfg(test)]
mod tests;

pub use header::HeaderResolver;
pub use normalizer::{NormalizedBatch, Normalizer, NormalizerConfig};
