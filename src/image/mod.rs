pub mod buffer;
pub mod f32;
pub mod gray;
pub mod io;

pub use self::buffer::PixelBuffer;
pub use self::f32::ImageF32;
pub use self::gray::to_gray;
