pub mod builder;
pub mod defaults;
pub mod runtime;
pub mod tensor;
pub mod traits;
