use std::path::Path;

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::{FrameSource, SourceSpec, SourceUnavailable};

/// Decoder state that lives between `open` and end of stream.
struct Decoding {
    input: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    flushing: bool,
}

/// Pulls RGB24 frames from a video or still-image file via ffmpeg-next.
///
/// Still images go through the same demuxer and come out as a one-frame
/// stream.
pub struct FfmpegFileSource {
    decoding: Option<Decoding>,
    metadata: VideoMetadata,
    next_index: usize,
}

impl FfmpegFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceUnavailable> {
        let spec = SourceSpec::File(path.to_path_buf());
        if !path.is_file() {
            return Err(SourceUnavailable::new(&spec, "no such file"));
        }
        Self::open_decoder(path).map_err(|e| SourceUnavailable::new(&spec, e))
    }

    fn open_decoder(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let input = ffmpeg_next::format::input(path)?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };
        let total_frames = stream.frames().max(0) as usize;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };
        log::debug!(
            "Opened {} ({}x{}, {:.2} fps, codec {:?})",
            path.display(),
            width,
            height,
            fps,
            metadata.codec
        );

        Ok(Self {
            decoding: Some(Decoding {
                input,
                decoder,
                scaler,
                stream_index,
                flushing: false,
            }),
            metadata,
            next_index: 0,
        })
    }

    fn wrap(&mut self, rgb: &Video) -> Frame {
        let (width, height) = (self.metadata.width, self.metadata.height);
        let frame = Frame::new(
            extract_rgb_pixels(rgb, width, height),
            width,
            height,
            3,
            self.next_index,
        );
        self.next_index += 1;
        frame
    }
}

impl Decoding {
    /// One decoded picture already converted to RGB24, if the decoder has one.
    fn try_receive(&mut self) -> Result<Option<Video>, Box<dyn std::error::Error>> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb = Video::empty();
        self.scaler.run(&decoded, &mut rgb)?;
        Ok(Some(rgb))
    }

    /// Feeds packets until a picture comes out; `None` once fully drained.
    fn next_picture(&mut self) -> Result<Option<Video>, Box<dyn std::error::Error>> {
        if let Some(rgb) = self.try_receive()? {
            return Ok(Some(rgb));
        }
        if self.flushing {
            return Ok(None);
        }

        loop {
            let Some((stream, packet)) = self.input.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                return self.try_receive();
            };

            if stream.index() != self.stream_index {
                continue;
            }
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Skipping undecodable packet: {e}");
                continue;
            }
            if let Some(rgb) = self.try_receive()? {
                return Ok(Some(rgb));
            }
        }
    }
}

impl FrameSource for FfmpegFileSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(decoding) = self.decoding.as_mut() else {
            return Ok(None);
        };
        match decoding.next_picture()? {
            Some(rgb) => Ok(Some(self.wrap(&rgb))),
            None => {
                self.decoding = None;
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        if self.decoding.take().is_some() {
            log::debug!("Closed file source after {} frames", self.next_index);
        }
    }
}

/// Copies an RGB24 ffmpeg picture into a tightly packed buffer, dropping the
/// per-row stride padding.
fn extract_rgb_pixels(rgb: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}
