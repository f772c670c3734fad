pub mod scaler;

pub use scaler::{ScalerState, StandardScaler};
