//! Real-time face anonymization: read frames from a camera or file, find
//! faces, blur them irreversibly and show the result.

pub mod blurring;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
