//! Pseudo-random streams.
//!
//! Four independently seeded generators, one per output width. Range draws pick
//! the narrowest stream that covers the range, so draws of one width never
//! perturb another width's sequence.

mod stream;
mod streams;

pub use stream::StreamRng;
pub use streams::RandomStreams;
