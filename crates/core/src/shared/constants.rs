pub const CASCADE_MODEL_NAME: &str = "haarcascade_frontalface_default.xml";
pub const CASCADE_MODEL_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml";

pub const WINDOW_TITLE: &str = "Face Anonymization - Press q to quit";

/// Camera used when no source argument is given.
pub const DEFAULT_CAMERA_INDEX: u32 = 0;

/// Key that ends the session from the preview window.
pub const QUIT_KEY: char = 'q';

/// HighGUI key poll interval. Frame pacing comes from capture and detection.
pub const KEY_POLL_MS: i32 = 1;

/// Consecutive failed reads retried before the loop gives up.
pub const DEFAULT_READ_RETRIES: u32 = 3;
