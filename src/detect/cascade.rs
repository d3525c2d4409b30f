use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Rect, Size, Vector},
    imgproc,
    objdetect::CascadeClassifier,
    prelude::*,
};

use crate::config::ModelConfig;

/// Haarカスケードによる顔・目検出
pub struct FaceDetector {
    face: CascadeClassifier,
    eye: CascadeClassifier,
}

impl FaceDetector {
    pub fn new(models: &ModelConfig) -> Result<Self> {
        let face = CascadeClassifier::new(&models.face_cascade)
            .with_context(|| format!("Failed to load face cascade: {}", models.face_cascade))?;
        let eye = CascadeClassifier::new(&models.eye_cascade)
            .with_context(|| format!("Failed to load eye cascade: {}", models.eye_cascade))?;

        Ok(Self { face, eye })
    }

    /// フレーム全体から顔を検出
    pub fn detect_faces(&mut self, frame: &Mat) -> Result<Vec<Rect>> {
        let gray = to_gray(frame)?;
        let mut faces = Vector::<Rect>::new();
        self.face.detect_multi_scale(
            &gray,
            &mut faces,
            1.1,
            5,
            0,
            Size::new(30, 30),
            Size::default(),
        )?;
        Ok(faces.to_vec())
    }

    /// フレーム全体から目を検出
    ///
    /// まず顔を検出し、顔ROIの内側で目カスケードを走らせる。
    /// 返る矩形はROIローカル座標だが、消費側は中心間距離しか
    /// 使わないのでそのままでよい。
    pub fn detect_eyes(&mut self, frame: &Mat) -> Result<Vec<Rect>> {
        let gray = to_gray(frame)?;
        let faces = {
            let mut faces = Vector::<Rect>::new();
            self.face.detect_multi_scale(
                &gray,
                &mut faces,
                1.1,
                5,
                0,
                Size::new(30, 30),
                Size::default(),
            )?;
            faces
        };

        let mut eyes = Vector::<Rect>::new();
        for face in faces.iter() {
            let roi = Mat::roi(&gray, face)?;
            self.eye.detect_multi_scale(
                &roi,
                &mut eyes,
                1.1,
                5,
                0,
                Size::new(30, 30),
                Size::default(),
            )?;
        }

        Ok(eyes.to_vec())
    }
}

/// BGR -> グレースケール
fn to_gray(frame: &Mat) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
    Ok(gray)
}
