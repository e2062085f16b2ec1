// Domain layer - request validation, series decoding, spectrum
pub mod figure;
pub mod indicator;
pub mod series;
pub mod spectrum;
