use anyhow::Result;
use opencv::core::Mat;
use std::time::Instant;

use spin_coach::camera::OpenCvCamera;
use spin_coach::config::Config;
use spin_coach::detect::attributes::estimate_height;
use spin_coach::detect::{AttributeEstimator, FaceDetector};
use spin_coach::geometry::inter_eye_distance;
use spin_coach::hand::{self, HandDetector};
use spin_coach::pose::{preprocess_for_movenet, PoseDetector};
use spin_coach::render::{overlay, MinifbRenderer};
use spin_coach::session::{Phase, Sample, Session};
use spin_coach::somatotype;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Spin Coach {}", env!("GIT_VERSION"));
    println!("Camera index: {}", config.camera.index);
    println!(
        "Windows: face {}s / warmup {}s / body {}s",
        config.timing.face_window_secs, config.timing.warmup_secs, config.timing.body_window_secs
    );
    println!("操作: [Q] 終了");
    println!();

    let mut camera = OpenCvCamera::open_with_resolution(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
    )?;
    let (width, height) = camera.resolution();
    println!("Camera: {}x{}", width, height);

    let mut face_detector = FaceDetector::new(&config.models)?;
    let mut attributes = AttributeEstimator::new(&config.models)?;
    let mut pose_detector = PoseDetector::new(&config.models.pose_model)?;
    let mut hand_detector = HandDetector::new(&config.models.hand_model)?;
    println!("Models loaded");

    let mut renderer = MinifbRenderer::new("Spin Coach", width as usize, height as usize)?;
    let mut session = Session::new(config.timing.clone());
    let mut last_phase = session.phase();

    while renderer.is_open() {
        // フレームが読めないtickは丸ごとスキップ
        let mut frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(_) => continue,
        };
        let now = Instant::now();

        match session.phase() {
            Phase::Waiting => {
                let faces = face_detector.detect_faces(&frame)?;
                match faces.first() {
                    Some(&face) => {
                        overlay::draw_face_box(&mut frame, face)?;
                        let sample = estimate_sample(
                            face,
                            &frame,
                            &mut attributes,
                            &mut face_detector,
                            &config,
                        )?;
                        session.observe_face(sample, now);
                        if let Some(elapsed) = session.elapsed_secs(now) {
                            let window = config.timing.face_window_secs;
                            if elapsed < window {
                                overlay::draw_countdown(&mut frame, window - elapsed)?;
                            }
                        }
                    }
                    None => {
                        session.face_lost();
                        overlay::draw_prompt(&mut frame, "Mira a la pantalla")?;
                    }
                }
            }
            Phase::Analyzing => {
                let in_warmup = session
                    .elapsed_secs(now)
                    .map_or(true, |elapsed| elapsed < config.timing.warmup_secs);
                if in_warmup {
                    // ウォームアップ中も時間を進めるだけのtick
                    session.observe_body(None, now);
                    overlay::draw_prompt(&mut frame, "Alejate de la pantalla")?;
                } else {
                    let input = preprocess_for_movenet(&frame)?;
                    let pose = pose_detector.detect(input)?;
                    overlay::draw_skeleton(&mut frame, &pose, config.detection.keypoint_confidence)?;

                    let build = somatotype::estimate(
                        &pose,
                        &config.somatotype,
                        config.detection.keypoint_confidence,
                    );
                    session.observe_body(build, now);
                    if let Some(elapsed) = session.elapsed_secs(now) {
                        let window = config.timing.body_window_secs;
                        if elapsed < window {
                            overlay::draw_countdown(&mut frame, window - elapsed)?;
                        }
                    }
                }
            }
            Phase::Displaying => {
                // 描画のない1tickの計算ステップ
                session.resolve()?;
            }
            Phase::Choosing => {
                if let (Some(profile), Some(plan)) = (session.profile(), session.plan()) {
                    overlay::draw_results(&mut frame, profile, plan)?;
                }
                overlay::draw_chooser(&mut frame)?;

                if session.choice().is_none() {
                    let input = hand::preprocess_for_hand(&frame)?;
                    let hands = hand_detector.detect(input, config.detection.hand_confidence)?;
                    let direction = hands.iter().find_map(hand::interpret);
                    session.observe_gesture(direction);
                }
                if let Some(choice) = session.choice() {
                    overlay::draw_choice(&mut frame, choice)?;
                }
            }
        }

        if session.phase() != last_phase {
            println!("Phase: {:?} -> {:?}", last_phase, session.phase());
            last_phase = session.phase();
        }

        renderer.draw_frame(&frame)?;
        renderer.update()?;
    }

    println!("Shutting down...");
    Ok(())
}

/// 顔1つ分の属性サンプルを作る
///
/// 目はフレーム全体から再検出する。目間距離が得られない場合は
/// 部分サンプルを作らず、このtickのサンプル自体を落とす。
fn estimate_sample(
    face: opencv::core::Rect,
    frame: &Mat,
    attributes: &mut AttributeEstimator,
    face_detector: &mut FaceDetector,
    config: &Config,
) -> Result<Option<Sample>> {
    let (age, gender) = attributes.estimate(face, frame)?;

    let eyes = face_detector.detect_eyes(frame)?;
    let sample = inter_eye_distance(&eyes).map(|px| Sample {
        age,
        gender,
        height: estimate_height(px, &config.height),
    });

    Ok(sample)
}
