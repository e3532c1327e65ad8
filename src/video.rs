// src/video.rs - Webcam capture, mirroring, digital zoom and split screen
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, RgbaImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

pub struct VideoSource {
    camera: Camera,
    index: u32,
}

impl VideoSource {
    pub fn open(index: u32) -> Result<Self> {
        tracing::debug!(index, "opening camera");

        let format = CameraFormat::new(Resolution::new(640, 480), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| anyhow::anyhow!("Failed to open camera {}: {}", index, e))?;

        tracing::info!(index, name = %camera.info().human_name(), "camera opened");
        Ok(Self { camera, index })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    // Grabs one frame, mirrored so the player sees themselves as in a mirror.
    pub fn read_frame(&mut self) -> Result<DynamicImage> {
        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .map_err(|e| anyhow::anyhow!("Failed to open camera stream: {}", e))?;
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow::anyhow!("Failed to capture frame: {}", e))?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow::anyhow!("Failed to decode frame: {}", e))?;

        let (width, height) = (decoded.width(), decoded.height());
        let rgba = rgb_to_rgba(width, height, decoded.into_vec()).context("Camera frame had an unexpected size")?;
        Ok(DynamicImage::ImageRgba8(image::imageops::flip_horizontal(&rgba)))
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if self.camera.is_stream_open() {
            if let Err(e) = self.camera.stop_stream() {
                tracing::warn!("Failed to stop camera stream: {}", e);
            }
        }
    }
}

// Lists cameras for the startup log. Failure to query is not fatal.
pub fn list_cameras() -> Vec<String> {
    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => cameras.iter().map(|camera| camera.human_name()).collect(),
        Err(e) => {
            tracing::warn!("Failed to query cameras: {}", e);
            Vec::new()
        }
    }
}

pub fn rgb_to_rgba(width: u32, height: u32, rgb: Vec<u8>) -> Result<RgbaImage> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for chunk in rgb.chunks_exact(3) {
        rgba.extend_from_slice(chunk);
        rgba.push(255);
    }
    ImageBuffer::from_raw(width, height, rgba)
        .ok_or_else(|| anyhow::anyhow!("{} RGB bytes do not fill {}x{}", rgb.len(), width, height))
}

// Crops the centre `1/factor` of the frame and scales it back up.
pub fn zoom(frame: &DynamicImage, factor: f64) -> DynamicImage {
    if factor <= 1.0 {
        return frame.clone();
    }
    let (width, height) = frame.dimensions();
    let crop_w = ((width as f64 / factor) as u32).max(1);
    let crop_h = ((height as f64 / factor) as u32).max(1);
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;

    frame
        .crop_imm(x, y, crop_w, crop_h)
        .resize_exact(width, height, FilterType::Triangle)
}

// Left and right halves for two-player mode. The right half starts at
// `width / 2`.
pub fn split_halves(frame: &DynamicImage) -> (DynamicImage, DynamicImage) {
    let (width, height) = frame.dimensions();
    let mid = width / 2;
    (
        frame.crop_imm(0, 0, mid, height),
        frame.crop_imm(mid, 0, width - mid, height),
    )
}
