pub mod immich;

pub use immich::ImmichClient;
