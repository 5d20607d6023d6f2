// Domain types and value objects
mod candle;
pub mod window;

// Re-export commonly used types to the world
pub use candle::{Candle, close_prices};
pub use window::WindowBounds;
