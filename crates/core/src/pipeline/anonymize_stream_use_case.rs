use std::time::Instant;

use thiserror::Error;

use crate::blurring::domain::redactor::Redactor;
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::constants::DEFAULT_READ_RETRIES;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::presenter::Presenter;

use super::pipeline_logger::{stage, PipelineLogger, FACES_METRIC};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    QuitRequested,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: usize,
    pub stop_reason: StopReason,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read a frame ({attempts} consecutive attempts): {source}")]
    FrameRead {
        attempts: u32,
        source: Box<dyn std::error::Error>,
    },

    #[error("face detection failed on frame {frame}: {source}")]
    Detector {
        frame: usize,
        source: Box<dyn std::error::Error>,
    },

    #[error("redaction failed on frame {frame}: {source}")]
    Redaction {
        frame: usize,
        source: Box<dyn std::error::Error>,
    },

    #[error("display failed: {source}")]
    Presenter { source: Box<dyn std::error::Error> },

    #[error("Pipeline already executed")]
    AlreadyExecuted,
}

/// Runs the read, locate, redact, show loop until the stream ends or the
/// user quits.
///
/// Single-use: `execute` takes the owned components, so a second call fails
/// with [`PipelineError::AlreadyExecuted`]. Source and presenter are closed
/// exactly once on every exit path.
pub struct AnonymizeStreamUseCase {
    source: Option<Box<dyn FrameSource>>,
    locator: Option<FaceLocator>,
    redactor: Option<Redactor>,
    presenter: Option<Box<dyn Presenter>>,
    logger: Box<dyn PipelineLogger>,
    read_retries: u32,
    state: LoopState,
}

impl AnonymizeStreamUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        locator: FaceLocator,
        redactor: Redactor,
        presenter: Box<dyn Presenter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source: Some(source),
            locator: Some(locator),
            redactor: Some(redactor),
            presenter: Some(presenter),
            logger,
            read_retries: DEFAULT_READ_RETRIES,
            state: LoopState::Running,
        }
    }

    /// Consecutive failed reads that are retried before the run fails.
    /// Zero fails on the first error.
    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn execute(&mut self) -> Result<RunSummary, PipelineError> {
        let (Some(mut source), Some(mut locator), Some(redactor), Some(mut presenter)) = (
            self.source.take(),
            self.locator.take(),
            self.redactor.take(),
            self.presenter.take(),
        ) else {
            return Err(PipelineError::AlreadyExecuted);
        };

        self.state = LoopState::Running;
        let result = self.run(
            source.as_mut(),
            &mut locator,
            &redactor,
            presenter.as_mut(),
        );

        self.state = LoopState::Stopping;
        source.close();
        presenter.close();
        self.state = LoopState::Stopped;

        match &result {
            Ok(summary) => {
                let message = match summary.stop_reason {
                    StopReason::EndOfStream => "End of video stream",
                    StopReason::QuitRequested => "Quit requested",
                };
                self.logger.info(message);
            }
            Err(e) => log::error!("Stopping: {e}"),
        }
        self.logger.summary();
        result
    }

    fn run(
        &mut self,
        source: &mut dyn FrameSource,
        locator: &mut FaceLocator,
        redactor: &Redactor,
        presenter: &mut dyn Presenter,
    ) -> Result<RunSummary, PipelineError> {
        // Cameras may report a bogus frame count; treat them as unbounded.
        let meta = source.metadata();
        let total = if meta.is_live() { 0 } else { meta.total_frames };
        let mut processed = 0;

        loop {
            let started = Instant::now();
            let Some(mut frame) = self.read_frame(source)? else {
                return Ok(RunSummary {
                    frames_processed: processed,
                    stop_reason: StopReason::EndOfStream,
                });
            };
            self.logger.timing(stage::READ, elapsed_ms(started));

            self.process(&mut frame, locator, redactor)?;

            let started = Instant::now();
            presenter
                .show(&frame)
                .map_err(|source| PipelineError::Presenter { source })?;
            self.logger.timing(stage::SHOW, elapsed_ms(started));

            processed += 1;
            self.logger.progress(processed, total);

            let quit = presenter
                .poll_quit()
                .map_err(|source| PipelineError::Presenter { source })?;
            if quit {
                return Ok(RunSummary {
                    frames_processed: processed,
                    stop_reason: StopReason::QuitRequested,
                });
            }
        }
    }

    /// Locates and redacts faces in place.
    fn process(
        &mut self,
        frame: &mut Frame,
        locator: &mut FaceLocator,
        redactor: &Redactor,
    ) -> Result<(), PipelineError> {
        let index = frame.index();

        let started = Instant::now();
        let faces = locator
            .locate(frame)
            .map_err(|source| PipelineError::Detector {
                frame: index,
                source,
            })?;
        self.logger.timing(stage::LOCATE, elapsed_ms(started));

        let started = Instant::now();
        let redaction = redactor
            .redact(frame, &faces)
            .map_err(|source| PipelineError::Redaction {
                frame: index,
                source,
            })?;
        self.logger.timing(stage::REDACT, elapsed_ms(started));
        self.logger.metric(FACES_METRIC, redaction.faces as f64);
        log::trace!("Frame {index}: {}", redaction.label);
        Ok(())
    }

    /// Next frame. Up to `read_retries` consecutive failures are retried; the
    /// one after that is fatal.
    fn read_frame(&mut self, source: &mut dyn FrameSource) -> Result<Option<Frame>, PipelineError> {
        let mut failures = 0;
        loop {
            match source.next_frame() {
                Ok(frame) => return Ok(frame),
                Err(err) => {
                    failures += 1;
                    if failures > self.read_retries {
                        return Err(PipelineError::FrameRead {
                            attempts: failures,
                            source: err,
                        });
                    }
                    log::warn!(
                        "Frame read failed, retrying ({failures}/{}): {err}",
                        self.read_retries
                    );
                }
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
