use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::{
    core::{Mat, Size, CV_32FC3},
    imgproc,
    prelude::*,
};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::landmark::{HandLandmarkIndex, HandPose};

/// 手ランドマークモデルの入力サイズ
pub const HAND_INPUT_SIZE: i32 = 224;

/// OpenCV Mat を手ランドマークモデル用の入力テンソルに変換
///
/// - BGR -> RGB
/// - 224x224 にリサイズ
/// - [1, 224, 224, 3] の f32 テンソルに変換 (0.0-1.0)
pub fn preprocess_for_hand(frame: &Mat) -> Result<Array4<f32>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(HAND_INPUT_SIZE, HAND_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut float_mat = Mat::default();
    resized.convert_to(&mut float_mat, CV_32FC3, 1.0 / 255.0, 0.0)?;

    let size = HAND_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));

    for y in 0..HAND_INPUT_SIZE {
        for x in 0..HAND_INPUT_SIZE {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok(tensor)
}

/// 単一手のランドマーク検出器
///
/// モデルは手の有無を1つの信頼度スコアとして返すので、検出結果は
/// 0手か1手のリストになる。
pub struct HandDetector {
    session: Session,
}

impl HandDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load hand landmark model")?;

        Ok(Self { session })
    }

    /// 前処理済みテンソルから手を検出
    ///
    /// 入力: [1, 224, 224, 3] の f32 テンソル
    /// 出力: 検出された手（信頼度が閾値未満なら空）
    pub fn detect(&mut self, input: Array4<f32>, confidence_threshold: f32) -> Result<Vec<HandPose>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Hand inference failed")?;

        // 出力: "Identity" [1, 63] (x, y, z を入力ピクセル単位で21点)
        //       "Identity_1" [1, 1] 手の存在信頼度
        let confidence: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract hand confidence")?;
        if confidence[[0, 0]] < confidence_threshold {
            return Ok(Vec::new());
        }

        let landmarks: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract hand landmarks")?;

        let mut points = [[0.0f32; 2]; HandLandmarkIndex::COUNT];
        for i in 0..HandLandmarkIndex::COUNT {
            // 入力ピクセル座標 -> 正規化座標
            points[i] = [
                landmarks[[0, i * 3]] / HAND_INPUT_SIZE as f32,
                landmarks[[0, i * 3 + 1]] / HAND_INPUT_SIZE as f32,
            ];
        }

        Ok(vec![HandPose::new(points)])
    }
}
