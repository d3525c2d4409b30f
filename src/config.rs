use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub height: HeightConfig,
    #[serde(default)]
    pub somatotype: SomatotypeConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラインデックス
    #[serde(default = "default_camera_index")]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// 年齢分類ネットワーク (Caffe topology)
    #[serde(default = "default_age_proto")]
    pub age_proto: String,
    /// 年齢分類ネットワーク (weights)
    #[serde(default = "default_age_weights")]
    pub age_weights: String,
    /// 性別分類ネットワーク (Caffe topology)
    #[serde(default = "default_gender_proto")]
    pub gender_proto: String,
    /// 性別分類ネットワーク (weights)
    #[serde(default = "default_gender_weights")]
    pub gender_weights: String,
    /// 正面顔カスケード
    #[serde(default = "default_face_cascade")]
    pub face_cascade: String,
    /// 目カスケード
    #[serde(default = "default_eye_cascade")]
    pub eye_cascade: String,
    /// 姿勢推定ONNXモデル
    #[serde(default = "default_pose_model")]
    pub pose_model: String,
    /// 手ランドマークONNXモデル
    #[serde(default = "default_hand_model")]
    pub hand_model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// 顔サンプリング時間（秒）
    #[serde(default = "default_face_window_secs")]
    pub face_window_secs: u64,
    /// 体型解析前の待機時間（秒）
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
    /// 体型解析フェーズ全体の時間（秒）
    #[serde(default = "default_body_window_secs")]
    pub body_window_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeightConfig {
    /// 目間距離のピクセル→cm換算係数（未較正のプレースホルダ）
    #[serde(default = "default_px_to_cm")]
    pub px_to_cm: f32,
    /// cm→身長推定の換算係数（未較正のプレースホルダ）
    #[serde(default = "default_cm_to_height")]
    pub cm_to_height: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SomatotypeConfig {
    /// 肩幅/腰幅の比がこの値未満なら Endomorfo
    #[serde(default = "default_endomorph_max")]
    pub endomorph_max: f32,
    /// 肩幅/腰幅の比がこの値超過なら Ectomorfo
    #[serde(default = "default_ectomorph_min")]
    pub ectomorph_min: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// キーポイント信頼度の閾値
    #[serde(default = "default_keypoint_confidence")]
    pub keypoint_confidence: f32,
    /// 手検出信頼度の閾値
    #[serde(default = "default_hand_confidence")]
    pub hand_confidence: f32,
}

fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_age_proto() -> String { "models/age_deploy.prototxt".to_string() }
fn default_age_weights() -> String { "models/age_net.caffemodel".to_string() }
fn default_gender_proto() -> String { "models/gender_deploy.prototxt".to_string() }
fn default_gender_weights() -> String { "models/gender_net.caffemodel".to_string() }
fn default_face_cascade() -> String { "data/haarcascade/frontalface_default.xml".to_string() }
fn default_eye_cascade() -> String { "data/haarcascade/eye.xml".to_string() }
fn default_pose_model() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_hand_model() -> String { "models/hand_landmark.onnx".to_string() }
fn default_face_window_secs() -> u64 { 5 }
fn default_warmup_secs() -> u64 { 3 }
fn default_body_window_secs() -> u64 { 8 }
fn default_px_to_cm() -> f32 { 0.01 }
fn default_cm_to_height() -> f32 { 1.5 }
fn default_endomorph_max() -> f32 { 1.45 }
fn default_ectomorph_min() -> f32 { 1.85 }
fn default_keypoint_confidence() -> f32 { 0.3 }
fn default_hand_confidence() -> f32 { 0.5 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            age_proto: default_age_proto(),
            age_weights: default_age_weights(),
            gender_proto: default_gender_proto(),
            gender_weights: default_gender_weights(),
            face_cascade: default_face_cascade(),
            eye_cascade: default_eye_cascade(),
            pose_model: default_pose_model(),
            hand_model: default_hand_model(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            face_window_secs: default_face_window_secs(),
            warmup_secs: default_warmup_secs(),
            body_window_secs: default_body_window_secs(),
        }
    }
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            px_to_cm: default_px_to_cm(),
            cm_to_height: default_cm_to_height(),
        }
    }
}

impl Default for SomatotypeConfig {
    fn default() -> Self {
        Self {
            endomorph_max: default_endomorph_max(),
            ectomorph_min: default_ectomorph_min(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            keypoint_confidence: default_keypoint_confidence(),
            hand_confidence: default_hand_confidence(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルが無ければデフォルトで起動する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(_) => {
                println!("{} not found, using defaults", path.as_ref().display());
                Config::default()
            }
        }
    }
}
