// Adapters layer: concrete implementations for external systems (detector service, storage, export).

pub mod detector;
pub mod export;
pub mod storage;
