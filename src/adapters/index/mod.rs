//! Vector index adapters.

pub mod pinecone;

pub use pinecone::PineconeIndex;
