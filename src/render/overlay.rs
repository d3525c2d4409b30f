use anyhow::Result;
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc,
    prelude::*,
};

use crate::plan::Plan;
use crate::pose::{KeypointIndex, Pose};
use crate::session::{Choice, Profile};

/// 骨格の接続定義 (開始キーポイント, 終了キーポイント)
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 16] = [
    // 顔
    (KeypointIndex::LeftEar, KeypointIndex::LeftEye),
    (KeypointIndex::LeftEye, KeypointIndex::Nose),
    (KeypointIndex::Nose, KeypointIndex::RightEye),
    (KeypointIndex::RightEye, KeypointIndex::RightEar),
    // 上半身
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // 胴体
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // 下半身
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

fn black() -> Scalar {
    Scalar::new(0.0, 0.0, 0.0, 0.0)
}

fn yellow() -> Scalar {
    Scalar::new(0.0, 255.0, 255.0, 0.0)
}

fn put_line(frame: &mut Mat, text: &str, org: Point, color: Scalar) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        org,
        imgproc::FONT_HERSHEY_DUPLEX,
        0.7,
        color,
        1,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// 赤の案内メッセージ（"Mira a la pantalla" など）
pub fn draw_prompt(frame: &mut Mat, text: &str) -> Result<()> {
    put_line(frame, text, Point::new(10, 30), red())
}

/// 緑のカウントダウン "Espera: N seg"
pub fn draw_countdown(frame: &mut Mat, remaining_secs: u64) -> Result<()> {
    let text = format!("Espera: {} seg", remaining_secs);
    put_line(frame, &text, Point::new(10, 30), green())
}

/// 検出した顔の矩形
pub fn draw_face_box(frame: &mut Mat, face: Rect) -> Result<()> {
    imgproc::rectangle(frame, face, green(), 2, imgproc::LINE_8, 0)?;
    Ok(())
}

/// 姿勢の骨格線とキーポイントをフレームに描き込む
pub fn draw_skeleton(frame: &mut Mat, pose: &Pose, confidence_threshold: f32) -> Result<()> {
    let width = frame.cols() as u32;
    let height = frame.rows() as u32;

    for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
        let start = pose.get(*start_idx);
        let end = pose.get(*end_idx);

        if start.is_valid(confidence_threshold) && end.is_valid(confidence_threshold) {
            let (x1, y1) = start.to_pixel(width, height);
            let (x2, y2) = end.to_pixel(width, height);
            imgproc::line(
                frame,
                Point::new(x1, y1),
                Point::new(x2, y2),
                yellow(),
                2,
                imgproc::LINE_8,
                0,
            )?;
        }
    }

    for kp in pose.keypoints.iter() {
        if kp.is_valid(confidence_threshold) {
            let (px, py) = kp.to_pixel(width, height);
            imgproc::circle(frame, Point::new(px, py), 4, green(), -1, imgproc::LINE_8, 0)?;
        }
    }

    Ok(())
}

/// 確定した最頻値とプランの一覧
pub fn draw_results(frame: &mut Mat, profile: &Profile, plan: &Plan) -> Result<()> {
    let lines = [
        format!("Sexo: {}", profile.gender.label()),
        format!("Edad: {}", profile.age.label()),
        format!("Altura: {:.2}", profile.height),
        format!("Complexion: {}", profile.build.label()),
        format!("Ejercicio: {}", plan.exercises.join(", ")),
        format!("RPM Spinning: {}", plan.rpm_target),
    ];

    for (i, line) in lines.iter().enumerate() {
        put_line(frame, line, Point::new(10, 30 + 20 * i as i32), green())?;
    }

    Ok(())
}

/// 分岐選択の指示行
pub fn draw_chooser(frame: &mut Mat) -> Result<()> {
    put_line(
        frame,
        "Escoge: <- Bicicleta | Ejercicio ->",
        Point::new(60, 200),
        red(),
    )
}

/// 選択済み分岐のインジケータ
pub fn draw_choice(frame: &mut Mat, choice: Choice) -> Result<()> {
    let label = match choice {
        Choice::CadenceView => "spinning_target",
        Choice::ExerciseView => "assigned_exercises",
    };
    let text = format!("Accion Elegida: {}", label);
    put_line(frame, &text, Point::new(60, 220), black())
}
