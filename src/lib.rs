pub mod fingerprint;
pub mod media;
pub mod metadata;
pub mod organizer;
pub mod pipeline;
pub mod placement;
pub mod registry;
pub mod scanner;
