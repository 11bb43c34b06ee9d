pub mod face_count_overlay;
pub mod frame_blurrer;
pub mod redaction_config;
pub mod redactor;
