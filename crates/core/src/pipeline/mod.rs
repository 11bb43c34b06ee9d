pub mod anonymize_stream_use_case;
pub mod pipeline_logger;
