//! Encryption method implementations

mod xor;

pub use xor::{xor_transform, XorMethod};
