pub mod camera_source;
pub mod ffmpeg_file_source;
pub mod highgui_presenter;
pub mod source_factory;
